//! The GEOGLOWS plots plugin: validates a request, loads datasets through the
//! cache, applies bias correction when asked, and returns the chart JSON.

use crate::assemble::assemble;
use crate::inputs::{correct_inputs, Inputs, PlotData};
use crate::kind::PlotKind;
use crate::params::{PlotParams, PlotRequest, FIRST_YEAR};
use crate::schema::{ParamOption, ParamSpec, PluginSchema};
use glows_cache::{Clock, PlotCache, SystemClock};
use glows_chart::Figure;
use glows_core::{DatasetType, Result, StreamflowSource, TimeSeries};
use glows_stats::bias::{BiasCorrector, BiasMode};
use glows_utils::months;
use log::{debug, info};
use std::collections::BTreeMap;

pub const NAME: &str = "geoglows_plots";

const DESCRIPTION: &str = "Depicts various streamflow based interactive charts based on the \
geoglows streamflow model. Charts included are derived from deterministic forecasts, ensemble \
forecasts, and statistical analysis.";

pub struct PlotsPlugin<S, C: Clock = SystemClock> {
    cache: PlotCache<C>,
    source: S,
}

impl<S: StreamflowSource, C: Clock> PlotsPlugin<S, C> {
    pub fn new(cache: PlotCache<C>, source: S) -> Self {
        PlotsPlugin { cache, source }
    }

    pub fn cache(&self) -> &PlotCache<C> {
        &self.cache
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Parameter schema with years offered up to the year before `current_year`.
    pub fn schema(current_year: i32) -> PluginSchema {
        let mut args = BTreeMap::new();
        args.insert("river_id", ParamSpec::Field("text"));
        args.insert(
            "plot_name",
            ParamSpec::Options(
                PlotKind::all()
                    .map(|k| ParamOption::new(k.as_str(), k.label()))
                    .collect(),
            ),
        );
        args.insert(
            "month",
            ParamSpec::Options(
                (1..=12u32)
                    .filter_map(|m| months::long_name(m).map(|name| ParamOption::new(m, name)))
                    .collect(),
            ),
        );
        args.insert(
            "year",
            ParamSpec::Options(
                (FIRST_YEAR..current_year)
                    .map(|y| ParamOption::new(y, y.to_string()))
                    .collect(),
            ),
        );
        args.insert(
            "bias_correction",
            ParamSpec::Options(vec![
                ParamOption::new("none", "None"),
                ParamOption::new(BiasMode::Local.as_str(), "Local (observed data)"),
                ParamOption::new(BiasMode::Global.as_str(), "Global"),
            ]),
        );
        args.insert("observed_data", ParamSpec::Field("file"));

        PluginSchema {
            name: NAME,
            group: "GEOGLOWS",
            label: "GEOGLOWS Plots",
            plugin_type: "plotly",
            tags: vec!["geoglows", "streamflow", "ensemble", "exceedance", "return period"],
            description: DESCRIPTION,
            attribution: "pygeoglows",
            args,
        }
    }

    /// Validate `request` and return `{data, layout, config}`.
    pub async fn read(&self, request: &PlotRequest) -> Result<serde_json::Value> {
        let params = PlotParams::from_request(request, self.cache.today())?;
        let figure = self.figure(&params).await?;
        Ok(figure.to_json()?)
    }

    /// Build the figure for already validated parameters.
    pub async fn figure(&self, params: &PlotParams) -> Result<Figure> {
        let kind = params.kind;
        let mut simulated = Inputs::default();
        for dataset in kind.spec().datasets {
            let loaded = self.cache.get(&self.source, *dataset, params.river_id).await?;
            simulated.insert(*dataset, loaded);
        }

        let corrected = match params.bias {
            None => None,
            Some(mode) => {
                info!("Applying {} bias correction to {} for river {}", mode, kind, params.river_id);
                let retro_daily = match simulated.get(DatasetType::RetroDaily) {
                    Some(daily) => daily.clone(),
                    None => self.retro_daily(params).await?,
                };
                let corrector = match mode {
                    BiasMode::Local => BiasCorrector::local(&retro_daily, params.observed.as_ref())?,
                    BiasMode::Global => {
                        BiasCorrector::global(self.source.global_transform(params.river_id).await?)?
                    }
                };
                Some(correct_inputs(kind, &simulated, &corrector, &retro_daily)?)
            }
        };

        let data = PlotData { simulated, corrected };
        assemble(kind, &data, &params.context())
    }

    async fn retro_daily(&self, params: &PlotParams) -> Result<TimeSeries> {
        debug!("Loading retrospective daily series for bias correction");
        self.cache
            .get_series(&self.source, DatasetType::RetroDaily, params.river_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glows_core::{Dataset, RiverId, TransformTable};

    struct NoSource;

    impl StreamflowSource for NoSource {
        async fn fetch(&self, kind: DatasetType, river_id: RiverId) -> Result<Dataset> {
            Err(glows_core::GlowsError::DataUnavailable {
                dataset: kind.to_string(),
                river_id: river_id.to_string(),
                reason: "offline".to_string(),
            })
        }

        async fn global_transform(&self, _river_id: RiverId) -> Result<TransformTable> {
            Ok(TransformTable::default())
        }
    }

    #[test]
    fn test_schema() {
        let schema = PlotsPlugin::<NoSource>::schema(2025);
        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(value["name"], NAME);
        assert_eq!(value["type"], "plotly");
        assert_eq!(value["args"]["river_id"], "text");
        assert_eq!(value["args"]["observed_data"], "file");
        assert_eq!(value["args"]["plot_name"].as_array().unwrap().len(), 14);
        assert_eq!(value["args"]["plot_name"][0]["value"], "forecast");
        assert_eq!(value["args"]["month"][11]["label"], "December");
        let years = value["args"]["year"].as_array().unwrap();
        assert_eq!(years.len(), 85);
        assert_eq!(years[0]["value"], 1940);
        assert_eq!(years[84]["label"], "2024");
    }
}
