//! The GEOGLOWS map plugin: base layers plus the streamflow service filtered
//! to one country, with the view fitted to that country.

use crate::schema::{ParamOption, ParamSpec, PluginSchema};
use glows_core::{GlowsError, Result};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::f64::consts::PI;

pub const NAME: &str = "geoglows_map";

/// Name of the layer the country filter is applied to.
pub const STREAMFLOW_LAYER: &str = "Geoglows Streamflow";

const STREAMFLOW_SERVICE: &str =
    "https://livefeeds3.arcgis.com/arcgis/rest/services/GEOGLOWS/GlobalWaterModel_Medium/MapServer";

const COUNTRY_EXTENTS: &str = include_str!("../data/countries_extents.json");

/// Degrees added on every side of a country's bounding box.
const EXTENT_PADDING: f64 = 0.1;

/// WGS84 semi-major axis in metres.
const EARTH_RADIUS: f64 = 6_378_137.0;

/// EPSG:4326 longitude/latitude to EPSG:3857 metres.
pub fn lonlat_to_web_mercator(lon: f64, lat: f64) -> (f64, f64) {
    let x = lon * EARTH_RADIUS * PI / 180.0;
    let y = EARTH_RADIUS * (PI / 4.0 + lat * PI / 360.0).tan().ln();
    (x, y)
}

/// Padded `[min_lon, min_lat, max_lon, max_lat]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent(pub [f64; 4]);

impl Extent {
    /// Corners projected to web mercator, in the same order.
    pub fn to_web_mercator(&self) -> [f64; 4] {
        let [min_lon, min_lat, max_lon, max_lat] = self.0;
        let (min_x, min_y) = lonlat_to_web_mercator(min_lon, min_lat);
        let (max_x, max_y) = lonlat_to_web_mercator(max_lon, max_lat);
        [min_x, min_y, max_x, max_y]
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MapConfiguration {
    pub map_config: Value,
    pub view_config: Value,
    pub layers: Vec<Value>,
    pub legend: Vec<Value>,
}

/// Countries known to the plugin and their extents (`None` for countries
/// without a usable bounding box).
#[derive(Debug, Clone)]
pub struct MapPlugin {
    countries: BTreeMap<String, Option<Extent>>,
}

impl MapPlugin {
    /// Load the embedded country table.
    pub fn new() -> Result<Self> {
        let raw: BTreeMap<String, Vec<f64>> = serde_json::from_str(COUNTRY_EXTENTS)?;
        let mut countries = BTreeMap::new();
        for (name, bounds) in raw {
            let extent = match bounds.as_slice() {
                [] => None,
                [min_lon, min_lat, max_lon, max_lat] => Some(Extent([
                    min_lon - EXTENT_PADDING,
                    min_lat - EXTENT_PADDING,
                    max_lon + EXTENT_PADDING,
                    max_lat + EXTENT_PADDING,
                ])),
                other => {
                    return Err(GlowsError::InvalidFormat(format!(
                        "extent of {name} has {} values, expected 4",
                        other.len()
                    )))
                }
            };
            countries.insert(name, extent);
        }
        Ok(MapPlugin { countries })
    }

    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.countries.keys().map(String::as_str)
    }

    pub fn extent(&self, country: &str) -> Result<Option<Extent>> {
        self.countries
            .get(country)
            .copied()
            .ok_or_else(|| GlowsError::InvalidParameter(format!("unknown country '{country}'")))
    }

    pub fn schema(&self) -> PluginSchema {
        let mut args = BTreeMap::new();
        args.insert(
            "country",
            ParamSpec::Options(self.countries().map(ParamOption::same).collect()),
        );
        PluginSchema {
            name: NAME,
            group: "GEOGLOWS",
            label: "GEOGLOWS Map",
            plugin_type: "map",
            tags: vec!["geoglows", "streamflow", "map"],
            description: "",
            attribution: "pygeoglows",
            args,
        }
    }

    /// Map configuration for one country.
    pub fn read(&self, country: &str) -> Result<MapConfiguration> {
        let extent = self.extent(country)?;
        log::info!("Building map configuration for {}", country);

        let view_config = match extent {
            Some(extent) => json!({
                "extent": extent.to_web_mercator(),
                "projection": "EPSG:3857",
            }),
            None => {
                log::debug!("{} has no extent, using the world view", country);
                json!({ "center": [0.0, 0.0], "zoom": 2, "projection": "EPSG:3857" })
            }
        };

        Ok(MapConfiguration {
            map_config: json!({
                "className": "ol-map",
                "style": { "width": "100%", "height": "100%", "position": "relative" },
            }),
            view_config,
            layers: vec![
                base_layer("World Light Gray Base", "Canvas/World_Light_Gray_Base"),
                base_layer("World Imagery", "World_Imagery"),
                streamflow_layer(country),
            ],
            legend: vec![streamflow_legend()],
        })
    }
}

fn base_layer(name: &str, service: &str) -> Value {
    json!({
        "type": "WebGLTile",
        "configuration": {
            "type": "WebGLTile",
            "props": {
                "name": name,
                "source": {
                    "type": "ESRI Tile",
                    "props": {
                        "url": format!(
                            "https://server.arcgisonline.com/arcgis/rest/services/{service}/MapServer"
                        ),
                    },
                },
            },
        },
    })
}

fn streamflow_layer(country: &str) -> Value {
    json!({
        "type": "ImageLayer",
        "configuration": {
            "type": "ImageLayer",
            "props": {
                "name": STREAMFLOW_LAYER,
                "source": {
                    "type": "ImageArcGISRest",
                    "props": {
                        "url": STREAMFLOW_SERVICE,
                        "params": {
                            "LAYERS": "show:0",
                            "LAYERDEFS": format!("0: rivercountry='{country}'"),
                        },
                    },
                },
            },
        },
    })
}

fn streamflow_legend() -> Value {
    let items: Vec<Value> = [
        ("Normal", "rgb(0, 112, 255)"),
        ("Exceeds 2yr", "rgb(254, 240, 1)"),
        ("Exceeds 10yr", "rgb(255, 56, 5)"),
        ("Exceeds 25yr", "rgb(255, 0, 0)"),
        ("Exceeds 50yr", "rgb(128, 0, 106)"),
    ]
    .into_iter()
    .map(|(label, color)| json!({ "label": label, "color": color, "symbol": "line" }))
    .collect();
    json!({ "title": STREAMFLOW_LAYER, "items": items })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_web_mercator() {
        let (x, y) = lonlat_to_web_mercator(0.0, 0.0);
        assert_abs_diff_eq!(x, 0.0);
        assert_abs_diff_eq!(y, 0.0, epsilon = 1e-6);
        let (x, _) = lonlat_to_web_mercator(180.0, 0.0);
        assert_abs_diff_eq!(x, 20_037_508.342_789_244, epsilon = 1e-6);
        let (_, y) = lonlat_to_web_mercator(0.0, 45.0);
        assert_abs_diff_eq!(y, 5_621_521.486_192_066, epsilon = 1e-3);
    }

    #[test]
    fn test_extents_are_padded() {
        let plugin = MapPlugin::new().unwrap();
        let Extent([min_lon, min_lat, max_lon, max_lat]) = plugin.extent("Bolivia").unwrap().unwrap();
        assert_abs_diff_eq!(min_lon, -69.74, epsilon = 1e-9);
        assert_abs_diff_eq!(min_lat, -23.0, epsilon = 1e-9);
        assert_abs_diff_eq!(max_lon, -57.35, epsilon = 1e-9);
        assert_abs_diff_eq!(max_lat, -9.58, epsilon = 1e-9);
        assert_eq!(plugin.extent("Antarctica").unwrap(), None);
        assert!(matches!(
            plugin.extent("Atlantis").unwrap_err(),
            GlowsError::InvalidParameter(_)
        ));
    }

    #[test]
    fn test_read_filters_streamflow_layer() {
        let plugin = MapPlugin::new().unwrap();
        let value = serde_json::to_value(plugin.read("Kenya").unwrap()).unwrap();
        let layers = value["layers"].as_array().unwrap();
        assert_eq!(layers.len(), 3);
        let props = &layers[2]["configuration"]["props"];
        assert_eq!(props["name"], STREAMFLOW_LAYER);
        assert_eq!(props["source"]["type"], "ImageArcGISRest");
        assert_eq!(props["source"]["props"]["params"]["LAYERDEFS"], "0: rivercountry='Kenya'");
        assert_eq!(value["viewConfig"]["extent"].as_array().unwrap().len(), 4);
        assert_eq!(value["legend"][0]["items"][4]["label"], "Exceeds 50yr");
        assert!(value["mapConfig"].is_object());
    }

    #[test]
    fn test_world_view_without_extent() {
        let plugin = MapPlugin::new().unwrap();
        let value = serde_json::to_value(plugin.read("Antarctica").unwrap()).unwrap();
        assert_eq!(value["viewConfig"]["zoom"], 2);
        assert!(value["viewConfig"].get("extent").is_none());
    }

    #[test]
    fn test_schema_lists_countries() {
        let plugin = MapPlugin::new().unwrap();
        let value = serde_json::to_value(plugin.schema()).unwrap();
        assert_eq!(value["type"], "map");
        let countries = value["args"]["country"].as_array().unwrap();
        assert_eq!(countries.len(), plugin.countries().count());
        assert_eq!(countries[0]["value"], "Antarctica");
        assert_eq!(countries[0]["label"], "Antarctica");
    }
}
