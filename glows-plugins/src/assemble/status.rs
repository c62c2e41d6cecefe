//! Status-by-month charts: five stacked flow bands per calendar month with
//! one year drawn over them.

use crate::colors::{Palette, STATUS_COLORS};
use crate::inputs::{Inputs, PlotContext, PlotData};
use glows_chart::{Axis, AxisValue, Figure, Layout, Line, Mode, Scatter};
use glows_core::{DatasetType, GlowsError, Result};
use glows_stats::regime::{
    annual_status_bands, flow_regime_bands, year_monthly_means, MonthBands, BAND_LABELS,
    REGIME_BASELINE,
};
use glows_utils::months;

fn month_axis(months_drawn: impl Iterator<Item = u32>) -> Vec<AxisValue> {
    months_drawn
        .filter_map(months::short_name)
        .map(AxisValue::from)
        .collect()
}

/// One filled trace per band, wettest first so drier bands paint over it.
fn band_traces(bands: &[MonthBands]) -> Vec<Scatter> {
    BAND_LABELS
        .iter()
        .zip(STATUS_COLORS)
        .enumerate()
        .map(|(slot, (label, color))| {
            Scatter::new(
                *label,
                month_axis(bands.iter().map(|b| b.month)),
                bands.iter().map(|b| b.levels[slot]).collect(),
            )
            .mode(Mode::Lines)
            .fill("tozeroy", color)
            .line(Line::default().width(0.0))
        })
        .collect()
}

fn year_trace(monthly: &[(u32, f64)], year: i32, palette: &Palette) -> Result<Scatter> {
    if monthly.is_empty() {
        return Err(GlowsError::InvalidParameter(format!(
            "no retrospective data for year {year}"
        )));
    }
    let color = if palette.corrected { palette.line } else { "black" };
    Ok(Scatter::new(
        palette.label(&format!("year {year}")),
        month_axis(monthly.iter().map(|(m, _)| *m)),
        monthly.iter().map(|(_, v)| *v).collect(),
    )
    .mode(Mode::Lines)
    .line(Line::colored(color).width(2.0)))
}

fn status_layout(title: String) -> Layout {
    Layout::titled(title)
        .hover_mode("x")
        .x_title("Month")
        .y_axis(Axis::titled("Flow (m³/s)").from_zero())
}

/// Inputs the bands are computed from: corrected data when present.
fn band_source(data: &PlotData) -> &Inputs {
    data.corrected.as_ref().unwrap_or(&data.simulated)
}

/// Bands from percentiles of the daily values, the chosen year's monthly
/// means on top.
pub fn annual_status(data: &PlotData, ctx: &PlotContext) -> Result<Figure> {
    let year = ctx.year()?;
    let daily = band_source(data).series(DatasetType::RetroDaily)?.first_points();
    let mut figure = Figure::new(status_layout(format!(
        "Annual Status by Month for River: {}",
        ctx.river_id
    )));
    figure.extend(band_traces(&annual_status_bands(&daily)?));
    for (palette, inputs) in data.variants() {
        let monthly = inputs.series(DatasetType::RetroMonthly)?.first_points();
        figure.push(year_trace(&year_monthly_means(&monthly, year), year, palette)?);
    }
    Ok(figure)
}

/// Bands from the 1991-2020 flow regime, the chosen year's monthly means on
/// top.
pub fn flow_regime(data: &PlotData, ctx: &PlotContext) -> Result<Figure> {
    let year = ctx.year()?;
    let daily = band_source(data).series(DatasetType::RetroDaily)?.first_points();
    let (first, last) = REGIME_BASELINE;
    let mut figure = Figure::new(status_layout(format!(
        "Flow Regime ({first}-{last} baseline) for River: {}",
        ctx.river_id
    )));
    figure.extend(band_traces(&flow_regime_bands(&daily, REGIME_BASELINE)?));
    for (palette, inputs) in data.variants() {
        let points = inputs.series(DatasetType::RetroDaily)?.first_points();
        figure.push(year_trace(&year_monthly_means(&points, year), year, palette)?);
    }
    Ok(figure)
}
