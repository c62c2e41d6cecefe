//! Flow duration curves of the retrospective daily series.

use crate::inputs::{PlotContext, PlotData};
use glows_chart::{axis, Axis, Figure, Layout, Line, Mode, Scatter};
use glows_core::{DatasetType, Result};
use glows_stats::fdc::{exceedance_axis, fdc, monthly_fdc};
use glows_utils::months;

/// Whole-record curve plus one curve per calendar month.
///
/// Months without data are left out. Corrected monthly curves start hidden.
pub fn flow_duration(data: &PlotData, ctx: &PlotContext) -> Result<Figure> {
    let layout = Layout::titled(super::title("Flow Duration Curves", ctx, data))
        .hover_mode("x")
        .x_title("Percentile (100%)")
        .y_axis(Axis::titled("Flow (m³/s)").from_zero())
        .horizontal_legend();
    let mut figure = Figure::new(layout);
    let x = axis(exceedance_axis());

    for (palette, inputs) in data.variants() {
        let points = inputs.series(DatasetType::RetroDaily)?.first_points();
        let values: Vec<f64> = points.iter().map(|(_, v)| *v).collect();

        let mut curve = Scatter::new(palette.label("Flow Duration Curve"), x.clone(), fdc(&values)?)
            .mode(Mode::Lines);
        if palette.corrected {
            curve = curve.line(Line::colored(palette.line).dash("dash"));
        }
        figure.push(curve);

        for month in 1..=12 {
            let Some(name) = months::short_name(month) else {
                continue;
            };
            let Ok(y) = monthly_fdc(&points, month) else {
                log::debug!("No {} values for the flow duration curve", name);
                continue;
            };
            let mut trace =
                Scatter::new(palette.label(&format!("FDC {name}")), x.clone(), y).mode(Mode::Lines);
            if palette.corrected {
                trace = trace.legend_only();
            }
            figure.push(trace);
        }
    }
    Ok(figure)
}
