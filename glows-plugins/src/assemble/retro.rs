//! Retrospective simulation charts.

use super::{title, unzip_points};
use crate::colors::{Palette, RETRO_LINE};
use crate::inputs::{PlotContext, PlotData};
use chrono::NaiveDate;
use glows_chart::{axis, Axis, AxisValue, Button, Figure, Layout, Line, Mode, Scatter};
use glows_core::{DatasetType, GlowsError, Result};
use glows_stats::{resample, volume};
use glows_utils::months;
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

const DISCHARGE_TITLE: &str = "Discharge (m³/s)";

/// Leap year used to place day-of-year averages on a date axis.
const CLIMATOLOGY_YEAR: i32 = 2000;

fn require_points(
    inputs: &crate::inputs::Inputs,
    kind: DatasetType,
) -> Result<Vec<(chrono::NaiveDateTime, f64)>> {
    let points = inputs.series(kind)?.first_points();
    if points.is_empty() {
        return Err(GlowsError::InsufficientData(format!("{kind} has no values")));
    }
    Ok(points)
}

/// Suffix distinguishing the two daily/monthly lines when correcting.
fn retro_suffix(palette: &Palette, corrected: bool) -> &'static str {
    match (corrected, palette.corrected) {
        (false, _) => "",
        (true, false) => " Simulation",
        (true, true) => " Bias Corrected",
    }
}

/// Daily series with the monthly means behind it and a range selector.
pub fn retro_simulation(data: &PlotData, ctx: &PlotContext) -> Result<Figure> {
    let n_days = data.simulated.series(DatasetType::RetroDaily)?.len() as u32;
    let layout = Layout::titled(format!("Retrospective Simulation for River: {}", ctx.river_id))
        .hover_mode("x")
        .y_axis(Axis::titled(DISCHARGE_TITLE).from_zero())
        .x_axis(Axis::titled("Date (UTC +00:00)").date().range_selector(vec![
            Button::back(1, "1 Year", "year"),
            Button::back(5, "5 Years", "year"),
            Button::back(10, "10 Years", "year"),
            Button::back(30, "30 Years", "year"),
            Button::back(n_days, "All", "day"),
        ]));
    let mut figure = Figure::new(layout);

    let mut monthly_traces = Vec::new();
    for (palette, inputs) in data.variants() {
        let suffix = retro_suffix(palette, data.is_corrected());
        let (x, y) = unzip_points(&require_points(inputs, DatasetType::RetroDaily)?);
        figure.push(Scatter::new(format!("Daily Average{suffix}"), x, y).mode(Mode::Lines));

        let monthly_suffix = if palette.corrected { " Corrected" } else { suffix };
        let (x, y) = unzip_points(&require_points(inputs, DatasetType::RetroMonthly)?);
        monthly_traces.push(
            Scatter::new(format!("Monthly Average{monthly_suffix}"), x, y)
                .mode(Mode::Lines)
                .line(Line::colored(RETRO_LINE))
                .legend_only(),
        );
    }
    figure.extend(monthly_traces);
    Ok(figure)
}

/// Average flow for each calendar day across all years.
pub fn daily_averages(data: &PlotData, ctx: &PlotContext) -> Result<Figure> {
    let layout = Layout::titled(title("Daily Average Streamflow", ctx, data))
        .hover_mode("x")
        .x_axis(Axis::titled("Date").date().tick_format("%b %d"))
        .y_axis(Axis::titled(DISCHARGE_TITLE).from_zero());
    let mut figure = Figure::new(layout);
    for (palette, inputs) in data.variants() {
        let points = require_points(inputs, DatasetType::RetroDaily)?;
        let (x, y): (Vec<AxisValue>, Vec<f64>) = resample::day_of_year_means(&points)
            .into_iter()
            .filter_map(|((month, day), v)| {
                NaiveDate::from_ymd_opt(CLIMATOLOGY_YEAR, month, day).map(|d| (AxisValue::from(d), v))
            })
            .unzip();
        figure.push(
            Scatter::new(palette.label("Daily Average"), x, y)
                .mode(Mode::Lines)
                .line(Line::colored(palette.line)),
        );
    }
    Ok(figure)
}

/// Average flow for each calendar month across all years.
pub fn monthly_averages(data: &PlotData, ctx: &PlotContext) -> Result<Figure> {
    let layout = Layout::titled(title("Monthly Average Streamflow", ctx, data))
        .hover_mode("x")
        .x_title("Month")
        .y_axis(Axis::titled(DISCHARGE_TITLE).from_zero());
    let mut figure = Figure::new(layout);
    for (palette, inputs) in data.variants() {
        let points = require_points(inputs, DatasetType::RetroMonthly)?;
        let (x, y): (Vec<AxisValue>, Vec<f64>) = resample::monthly_climatology(&points)
            .into_iter()
            .filter_map(|(month, v)| months::short_name(month).map(|name| (AxisValue::from(name), v)))
            .unzip();
        figure.push(
            Scatter::new(palette.label("Monthly Average"), x, y)
                .mode(Mode::LinesMarkers)
                .line(Line::colored(palette.line)),
        );
    }
    Ok(figure)
}

/// Mean of each decade present in `yearly`, with its first and last year.
fn decade_means(yearly: &[(i32, f64)]) -> Vec<(i32, i32, i32, f64)> {
    let mut decades: BTreeMap<i32, Vec<(i32, f64)>> = BTreeMap::new();
    for (year, value) in yearly {
        decades.entry(year.div_euclid(10) * 10).or_default().push((*year, *value));
    }
    decades
        .into_iter()
        .filter_map(|(decade, rows)| {
            let first = rows.first()?.0;
            let last = rows.last()?.0;
            Some((decade, first, last, rows.iter().map(|(_, v)| *v).mean()))
        })
        .collect()
}

/// Annual average flow; decade means are added when comparing with
/// corrected data.
pub fn annual_averages(data: &PlotData, ctx: &PlotContext) -> Result<Figure> {
    let layout = Layout::titled(title("Annual Average Streamflow", ctx, data))
        .hover_mode("x")
        .x_title("Year")
        .y_axis(Axis::titled("Streamflow (m³/s)").from_zero());
    let mut figure = Figure::new(layout);
    let mut decade_traces = Vec::new();
    for (palette, inputs) in data.variants() {
        let yearly = resample::yearly_means(&require_points(inputs, DatasetType::RetroYearly)?);
        let (x, y): (Vec<AxisValue>, Vec<f64>) =
            yearly.iter().map(|(year, v)| (AxisValue::from(*year), *v)).unzip();
        let color = if palette.corrected { palette.line } else { palette.average };
        figure.push(
            Scatter::new(format!("{} Annual Flow", palette.prefix), x, y)
                .mode(Mode::Lines)
                .line(Line::colored(color))
                .legend_group(palette.prefix),
        );

        if data.is_corrected() {
            let group = format!("{} Decade Averages", palette.prefix);
            for (decade, first, last, value) in decade_means(&yearly) {
                decade_traces.push(
                    Scatter::new(
                        format!("{} {}s: {:.2} m³/s", palette.prefix, decade, value),
                        axis([first, last]),
                        vec![value, value],
                    )
                    .mode(Mode::Lines)
                    .line(Line::colored(color).dash("dash"))
                    .hover_info("name")
                    .legend_group(&group),
                );
            }
        }
    }
    figure.extend(decade_traces);
    Ok(figure)
}

/// Discharged volume per year with 5-year block means.
pub fn yearly_volumes(data: &PlotData, ctx: &PlotContext) -> Result<Figure> {
    let layout = Layout::titled(format!(
        "Yearly Cumulative Discharge Volume for River: {}",
        ctx.river_id
    ))
    .hover_mode("x")
    .x_title("Year")
    .y_axis(Axis::titled("Million Cubic Meters (m³ * 10^6)").from_zero())
    .horizontal_legend();
    let mut figure = Figure::new(layout);

    for (palette, inputs) in data.variants() {
        let yearly = resample::yearly_means(&require_points(inputs, DatasetType::RetroYearly)?);
        let volumes = volume::yearly_volumes(&yearly);
        let (x, y): (Vec<AxisValue>, Vec<f64>) =
            volumes.iter().map(|(year, v)| (AxisValue::from(*year), *v)).unzip();
        let (line, block) = if palette.corrected {
            (palette.line, "darkred")
        } else {
            (RETRO_LINE, "red")
        };
        figure.push(
            Scatter::new(palette.label("Annual Volume"), x, y)
                .mode(Mode::Lines)
                .line(Line::colored(line)),
        );

        let name = palette.label("5 Year Average");
        for (i, (start, value)) in volume::five_year_means(&volumes).into_iter().enumerate() {
            figure.push(
                Scatter::new(name.clone(), axis([start, start + 5]), vec![value, value])
                    .mode(Mode::Lines)
                    .line(Line::colored(block))
                    .legend_group(&name)
                    .show_legend(i == 0),
            );
        }
    }
    Ok(figure)
}
