use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// A point on a categorical, numeric or date axis.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum AxisValue {
    Number(f64),
    Text(String),
}

impl From<f64> for AxisValue {
    fn from(v: f64) -> Self {
        AxisValue::Number(v)
    }
}

impl From<i32> for AxisValue {
    fn from(v: i32) -> Self {
        AxisValue::Number(v as f64)
    }
}

impl From<u32> for AxisValue {
    fn from(v: u32) -> Self {
        AxisValue::Number(v as f64)
    }
}

impl From<&str> for AxisValue {
    fn from(v: &str) -> Self {
        AxisValue::Text(v.to_string())
    }
}

impl From<String> for AxisValue {
    fn from(v: String) -> Self {
        AxisValue::Text(v)
    }
}

impl From<NaiveDateTime> for AxisValue {
    fn from(v: NaiveDateTime) -> Self {
        AxisValue::Text(v.format("%Y-%m-%d %H:%M:%S").to_string())
    }
}

impl From<NaiveDate> for AxisValue {
    fn from(v: NaiveDate) -> Self {
        AxisValue::Text(v.format("%Y-%m-%d").to_string())
    }
}

/// Convert any iterator of axis-compatible values.
pub fn axis<T: Into<AxisValue>>(values: impl IntoIterator<Item = T>) -> Vec<AxisValue> {
    values.into_iter().map(Into::into).collect()
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Mode {
    #[serde(rename = "lines")]
    Lines,
    #[serde(rename = "markers")]
    Markers,
    #[serde(rename = "lines+markers")]
    LinesMarkers,
}

#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct Line {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
}

impl Line {
    pub fn colored(color: &str) -> Self {
        Line {
            color: Some(color.to_string()),
            ..Line::default()
        }
    }

    pub fn width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn dash(mut self, dash: &str) -> Self {
        self.dash = Some(dash.to_string());
        self
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct Marker {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl Marker {
    pub fn new(color: &str, size: f64, symbol: &str) -> Self {
        Marker {
            color: Some(color.to_string()),
            size: Some(size),
            symbol: Some(symbol.to_string()),
        }
    }
}

/// Line or marker trace.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct Scatter {
    pub name: String,
    pub x: Vec<AxisValue>,
    pub y: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fillcolor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legendgroup: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoverinfo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertemplate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl Scatter {
    pub fn new(name: impl Into<String>, x: Vec<AxisValue>, y: Vec<f64>) -> Self {
        Scatter {
            name: name.into(),
            x,
            y,
            ..Scatter::default()
        }
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn line(mut self, line: Line) -> Self {
        self.line = Some(line);
        self
    }

    pub fn marker(mut self, marker: Marker) -> Self {
        self.marker = Some(marker);
        self
    }

    /// Fill to `fill` (e.g. `tozeroy`, `tonexty`, `toself`) with `color`.
    pub fn fill(mut self, fill: &str, color: &str) -> Self {
        self.fill = Some(fill.to_string());
        self.fillcolor = Some(color.to_string());
        self
    }

    pub fn legend_group(mut self, group: &str) -> Self {
        self.legendgroup = Some(group.to_string());
        self
    }

    pub fn show_legend(mut self, show: bool) -> Self {
        self.showlegend = Some(show);
        self
    }

    pub fn hover_info(mut self, info: &str) -> Self {
        self.hoverinfo = Some(info.to_string());
        self
    }

    pub fn hover_template(mut self, template: &str) -> Self {
        self.hovertemplate = Some(template.to_string());
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    /// Start hidden with a clickable legend entry.
    pub fn legend_only(mut self) -> Self {
        self.visible = Some(serde_json::Value::String("legendonly".to_string()));
        self
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Fill {
    pub color: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TableHeader {
    pub values: Vec<String>,
    pub fill: Fill,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TableCells {
    /// Column-major cell values.
    pub values: Vec<Vec<AxisValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Fill>,
}

/// Fraction of the plotting area a trace occupies.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Domain {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

/// Table trace.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Table {
    pub header: TableHeader,
    pub cells: TableCells,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<Domain>,
}

impl Table {
    /// Table with a transparent header and column-major `columns`.
    pub fn new(headers: Vec<String>, columns: Vec<Vec<AxisValue>>) -> Self {
        Table {
            header: TableHeader {
                values: headers,
                fill: Fill {
                    color: serde_json::Value::String("rgba(0, 0, 0, 0)".to_string()),
                },
            },
            cells: TableCells {
                values: columns,
                fill: None,
            },
            domain: None,
        }
    }

    /// Per-cell background colours, column-major like the values.
    pub fn cell_colors(mut self, colors: Vec<Vec<String>>) -> Self {
        self.cells.fill = Some(Fill {
            color: serde_json::json!(colors),
        });
        self
    }

    pub fn domain(mut self, domain: Domain) -> Self {
        self.domain = Some(domain);
        self
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Scatter(Scatter),
    Table(Table),
}

impl From<Scatter> for Trace {
    fn from(s: Scatter) -> Self {
        Trace::Scatter(s)
    }
}

impl From<Table> for Trace {
    fn from(t: Table) -> Self {
        Trace::Table(t)
    }
}
