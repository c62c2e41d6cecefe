//! Colours shared by the plot assemblers.

use glows_stats::round_to;

/// Line and fill colours for one side of a simulated/corrected comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub prefix: &'static str,
    pub corrected: bool,
    /// Main series line.
    pub line: &'static str,
    /// Translucent fill matching `line`.
    pub band: &'static str,
    pub average: &'static str,
    pub median: &'static str,
    pub percentile_band: &'static str,
    pub marker: &'static str,
    pub symbol: &'static str,
}

pub const SIMULATED: Palette = Palette {
    prefix: "Simulated",
    corrected: false,
    line: "royalblue",
    band: "rgba(65, 105, 225, 0.2)",
    average: "blue",
    median: "red",
    percentile_band: "rgba(0, 128, 0, 0.15)",
    marker: "blue",
    symbol: "circle",
};

pub const CORRECTED: Palette = Palette {
    prefix: "Bias-Corrected",
    corrected: true,
    line: "darkorange",
    band: "rgba(255, 165, 0, 0.2)",
    average: "green",
    median: "darkorange",
    percentile_band: "rgba(255, 165, 0, 0.15)",
    marker: "red",
    symbol: "square",
};

impl Palette {
    /// Trace name: unchanged for simulated data, prefixed for corrected data.
    pub fn label(&self, name: &str) -> String {
        if self.corrected {
            format!("{} {}", self.prefix, name)
        } else {
            name.to_string()
        }
    }
}

/// Retrospective series colour.
pub const RETRO_LINE: &str = "rgb(0, 166, 255)";

/// Status band fills, wettest first.
pub const STATUS_COLORS: [&str; 5] = [
    "rgb(44, 125, 205)",
    "rgb(142, 206, 238)",
    "rgb(231,226,188)",
    "rgb(255, 168, 133)",
    "rgb(205, 35, 63)",
];

/// Transparent table background.
pub const CLEAR: &str = "rgba(0, 0, 0, 0)";

fn return_period_rgb(period: u32) -> (u8, u8, u8) {
    match period {
        2 => (254, 240, 1),
        5 => (253, 154, 1),
        10 => (255, 56, 5),
        20 => (128, 0, 246),
        25 => (255, 0, 0),
        50 => (128, 0, 106),
        100 => (128, 0, 246),
        _ => (128, 128, 128),
    }
}

/// Fill of a return period band.
pub fn return_period_color(period: u32) -> String {
    let (r, g, b) = return_period_rgb(period);
    format!("rgba({r}, {g}, {b}, .4)")
}

/// Exceedance table cell: the more members exceed, the stronger the tint.
pub fn exceedance_color(period: u32, percent: f64) -> String {
    let (r, g, b) = return_period_rgb(period);
    let alpha = round_to(percent * 0.005, 2);
    format!("rgba({r}, {g}, {b}, {alpha})")
}
