//! Standardized Streamflow Index charts.

use super::{time_axis, title};
use crate::colors::Palette;
use crate::inputs::{PlotContext, PlotData};
use glows_chart::{Figure, Layout, Line, Marker, Mode, Scatter};
use glows_core::{DatasetType, GlowsError, Result};
use glows_stats::ssi::{ssi_for_month, ssi_since_year as since_year, SsiRecord};
use glows_utils::months;

fn ssi_trace(records: &[SsiRecord], palette: &Palette) -> Scatter {
    let name = if palette.corrected {
        "Bias-Corrected SSI"
    } else {
        "Original SSI"
    };
    let times: Vec<_> = records.iter().map(|r| r.time).collect();
    Scatter::new(name, time_axis(&times), records.iter().map(|r| r.ssi).collect())
        .mode(Mode::LinesMarkers)
        .marker(Marker::new(palette.marker, 5.0, palette.symbol))
        .line(Line::colored(palette.marker))
}

fn ssi_figure(
    data: &PlotData,
    base: &str,
    ctx: &PlotContext,
    records: impl Fn(&[(chrono::NaiveDateTime, f64)]) -> Result<Vec<SsiRecord>>,
) -> Result<Figure> {
    let layout = Layout::titled(title(base, ctx, data))
        .x_title("Date")
        .y_title("SSI")
        .hover_mode("x");
    let mut figure = Figure::new(layout);
    for (palette, inputs) in data.variants() {
        let points = inputs.series(DatasetType::RetroSimulation)?.first_points();
        figure.push(ssi_trace(&records(points.as_slice())?, palette));
    }
    Ok(figure)
}

/// Every month's index from January of the requested year.
pub fn ssi_since_year(data: &PlotData, ctx: &PlotContext) -> Result<Figure> {
    let year = ctx.year()?;
    ssi_figure(data, &format!("SSI Monthly Values Since {year}"), ctx, |points| {
        since_year(points, year)
    })
}

/// One calendar month's index across every year of the record.
pub fn ssi_one_month(data: &PlotData, ctx: &PlotContext) -> Result<Figure> {
    let month = ctx.month()?;
    let name = months::long_name(month).ok_or_else(|| {
        GlowsError::InvalidParameter(format!("month must be between 1 and 12, got {month}"))
    })?;
    ssi_figure(data, &format!("SSI Monthly Values for {name} Over Time"), ctx, |points| {
        ssi_for_month(points, month)
    })
}
