//! Forecast charts: median with uncertainty, statistics envelopes and
//! ensemble members.

use super::{
    column_points, envelope, max_of, return_period_bands, time_axis, time_bounds, title,
    unzip_points, UTC_AXIS_TITLE,
};
use crate::inputs::{PlotContext, PlotData};
use glows_chart::{Axis, Figure, Layout, Line, Scatter};
use glows_core::{DatasetType, GlowsError, Result};
use glows_stats::exceedance::HIGH_RES_MEMBER;

const STREAMFLOW_TITLE: &str = "Streamflow (m<sup>3</sup>/s)";
const HOVER_FORMAT: &str = "%d %b %Y %X";
const TICK_FORMAT: &str = "%b %d %Y";

/// Number of regular ensemble members, `ensemble_01` to `ensemble_51`.
const MEMBERS: u32 = 51;

fn forecast_layout(title: String, range: (chrono::NaiveDateTime, chrono::NaiveDateTime)) -> Layout {
    Layout::titled(title)
        .x_axis(
            Axis::titled(UTC_AXIS_TITLE)
                .range(range.0, range.1)
                .hover_format(HOVER_FORMAT)
                .tick_format(TICK_FORMAT),
        )
        .y_axis(Axis::titled(STREAMFLOW_TITLE).from_zero())
        .legend_title("Legend")
}

/// Median flow with its uncertainty band and return periods.
pub fn forecast(data: &PlotData, ctx: &PlotContext) -> Result<Figure> {
    let simulated = data.simulated.series(DatasetType::Forecast)?;
    let mut figure = Figure::new(forecast_layout(
        title("Forecasted Streamflow", ctx, data),
        time_bounds(simulated)?,
    ));

    let mut bands = Vec::new();
    for (palette, inputs) in data.variants() {
        let series = inputs.series(DatasetType::Forecast)?;
        let group = format!("{}_line", palette.prefix);
        let upper = column_points(series, "flow_uncertainty_upper")?;
        let lower = column_points(series, "flow_uncertainty_lower")?;
        let (x, y) = envelope(&upper, &lower);

        figure.push(
            Scatter::new(
                format!("{} (Median)", palette.prefix),
                time_axis(series.index()),
                series.require_column("flow_median")?.to_vec(),
            )
            .line(Line::colored(palette.line).width(2.0))
            .legend_group(&group),
        );
        figure.push(
            Scatter::new(format!("{} Uncertainty Bounds", palette.prefix), x, y)
                .fill("toself", palette.band)
                .line(Line::colored("rgba(0, 0, 0, 0)"))
                .show_legend(false)
                .legend_group(&group),
        );

        let (start, end) = time_bounds(series)?;
        let y_max = max_of(series, &["flow_uncertainty_upper"]);
        bands.extend(return_period_bands(start, end, inputs.return_periods()?, y_max, palette)?);
    }
    figure.extend(bands);
    Ok(figure)
}

/// Max/min and 25-75 percentile envelopes, average, median and the
/// high-resolution run.
pub fn forecast_stats(data: &PlotData, ctx: &PlotContext) -> Result<Figure> {
    let simulated = data.simulated.series(DatasetType::ForecastStats)?;
    let mut figure = Figure::new(forecast_layout(
        title("Forecasted Streamflow Statistics", ctx, data),
        time_bounds(simulated)?,
    ));

    let mut bands = Vec::new();
    for (palette, inputs) in data.variants() {
        let series = inputs.series(DatasetType::ForecastStats)?;
        let prefix = palette.prefix;

        let (x, y) = envelope(
            &column_points(series, "flow_max")?,
            &column_points(series, "flow_min")?,
        );
        figure.push(
            Scatter::new(format!("{prefix} Max & Min Flow"), x, y)
                .fill("toself", "rgba(211, 211, 211, 0.3)")
                .line(Line::colored("lightgray").dash("dash"))
                .legend_group(&format!("{prefix} Boundaries"))
                .legend_only(),
        );

        let (x, y) = envelope(
            &column_points(series, "flow_75p")?,
            &column_points(series, "flow_25p")?,
        );
        figure.push(
            Scatter::new(format!("{prefix} 25-75 Percentile Flow"), x, y)
                .fill("toself", palette.percentile_band)
                .line(Line::colored("rgba(0, 0, 0, 0)"))
                .legend_group(&format!("{prefix} Percentiles")),
        );

        let forecast_group = format!("{prefix} Forecast");
        for (name, column, color, width) in [
            ("High-Res Forecast", "high_res", "black", 1.5),
            ("Average Flow", "flow_avg", palette.average, 2.0),
            ("Median Flow", "flow_med", palette.median, 2.0),
        ] {
            let (x, y) = unzip_points(&column_points(series, column)?);
            figure.push(
                Scatter::new(format!("{prefix} {name}"), x, y)
                    .line(Line::colored(color).width(width))
                    .legend_group(&forecast_group),
            );
        }

        let (start, end) = time_bounds(series)?;
        let y_max = max_of(series, &["flow_max", "flow_75p", "flow_avg", "high_res"]);
        bands.extend(return_period_bands(start, end, inputs.return_periods()?, y_max, palette)?);
    }
    figure.extend(bands);
    Ok(figure)
}

/// Every ensemble member, the high-resolution member highlighted.
pub fn forecast_ensembles(data: &PlotData, ctx: &PlotContext) -> Result<Figure> {
    let simulated = data.simulated.series(DatasetType::ForecastEnsembles)?;
    let base = if data.is_corrected() {
        "Simulated vs Bias-Corrected Ensemble Forecasts".to_string()
    } else {
        format!("Ensemble Forecasts for River: {}", ctx.river_id)
    };
    let mut figure = Figure::new(forecast_layout(base, time_bounds(simulated)?));

    let mut bands = Vec::new();
    for (palette, inputs) in data.variants() {
        let series = inputs.series(DatasetType::ForecastEnsembles)?;
        let group = format!("{} Ensemble", palette.prefix);
        let mut drawn = 0;

        if let Some(points) = series.points(HIGH_RES_MEMBER) {
            let (x, y) = unzip_points(&points);
            figure.push(
                Scatter::new(group.clone(), x, y)
                    .line(Line::colored(palette.line).width(2.0))
                    .legend_group(&group)
                    .show_legend(true),
            );
            drawn += 1;
        }
        for member in 1..=MEMBERS {
            let name = format!("ensemble_{member:02}");
            let Some(points) = series.points(&name) else {
                continue;
            };
            let (x, y) = unzip_points(&points);
            figure.push(
                Scatter::new(name, x, y)
                    .line(Line::colored(palette.line).width(1.0))
                    .opacity(0.4)
                    .legend_group(&group)
                    .show_legend(false),
            );
            drawn += 1;
        }
        if drawn == 0 {
            return Err(GlowsError::InvalidFormat(
                "ensemble forecast has no ensemble_NN columns".to_string(),
            ));
        }

        let (start, end) = time_bounds(series)?;
        let y_max = series.max_value().unwrap_or(0.0);
        bands.extend(return_period_bands(start, end, inputs.return_periods()?, y_max, palette)?);
    }
    figure.extend(bands);
    Ok(figure)
}
