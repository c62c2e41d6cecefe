//! Chart figure model.
//!
//! A [`Figure`] is a list of traces plus layout and config, serialized in the
//! `{data, layout, config}` shape the dashboard's plotting front end expects.
//! Optional fields are skipped when unset so the JSON stays close to what a
//! hand-written figure would contain.

pub mod layout;
pub mod trace;

pub use layout::{Annotation, Axis, Button, Layout, Legend, RangeSelector, Title};
pub use trace::{axis, AxisValue, Domain, Line, Marker, Mode, Scatter, Table, Trace};

use serde::Serialize;

/// Front-end rendering options.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Config {
    pub autosizable: bool,
    pub responsive: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            autosizable: true,
            responsive: true,
        }
    }
}

/// Traces, layout and config of one chart.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
    pub config: Config,
}

impl Figure {
    pub fn new(layout: Layout) -> Self {
        Figure {
            data: Vec::new(),
            layout,
            config: Config::default(),
        }
    }

    pub fn push(&mut self, trace: impl Into<Trace>) {
        self.data.push(trace.into());
    }

    pub fn extend<T: Into<Trace>>(&mut self, traces: impl IntoIterator<Item = T>) {
        self.data.extend(traces.into_iter().map(Into::into));
    }

    /// Largest finite y value over all scatter traces.
    pub fn max_y(&self) -> Option<f64> {
        self.data
            .iter()
            .filter_map(|t| match t {
                Trace::Scatter(s) => Some(s.y.iter()),
                Trace::Table(_) => None,
            })
            .flatten()
            .copied()
            .filter(|v| v.is_finite())
            .max_by(|a, b| a.total_cmp(b))
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}
