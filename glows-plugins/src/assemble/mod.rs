//! Plot assemblers: one function per chart family.
//!
//! Every assembler draws the simulated traces and, when the [`PlotData`]
//! carries corrected inputs, the matching "Bias-Corrected" traces next to
//! them.

pub mod exceedance;
pub mod fdc;
pub mod forecast;
pub mod retro;
pub mod ssi;
pub mod status;

use crate::colors::{return_period_color, Palette};
use crate::inputs::{PlotContext, PlotData};
use crate::kind::PlotKind;
use chrono::NaiveDateTime;
use glows_chart::{axis, AxisValue, Figure, Line, Scatter};
use glows_core::{GlowsError, Result, ReturnPeriods, TimeSeries};

/// Signature shared by every assembler in the plot table.
pub type Assembler = fn(&PlotData, &PlotContext) -> Result<Figure>;

/// Build the figure for `kind`.
pub fn assemble(kind: PlotKind, data: &PlotData, ctx: &PlotContext) -> Result<Figure> {
    log::info!(
        "Assembling {} for river {}{}",
        kind,
        ctx.river_id,
        if data.is_corrected() { " with bias correction" } else { "" }
    );
    let figure = (kind.spec().assemble)(data, ctx)?;
    log::debug!("{} produced {} trace(s)", kind, figure.data.len());
    Ok(figure)
}

/// Title shared by UTC datetime axes.
pub const UTC_AXIS_TITLE: &str = "Datetime (UTC +00:00)";

pub(crate) fn time_axis(times: &[NaiveDateTime]) -> Vec<AxisValue> {
    axis(times.iter().copied())
}

/// Split non-missing points into axis values and ys.
pub(crate) fn unzip_points(points: &[(NaiveDateTime, f64)]) -> (Vec<AxisValue>, Vec<f64>) {
    points.iter().map(|(t, v)| (AxisValue::from(*t), *v)).unzip()
}

/// Closed polygon running along `upper` and back along `lower`.
pub(crate) fn envelope(
    upper: &[(NaiveDateTime, f64)],
    lower: &[(NaiveDateTime, f64)],
) -> (Vec<AxisValue>, Vec<f64>) {
    let (mut x, mut y) = unzip_points(upper);
    let (lx, ly) = unzip_points(lower);
    x.extend(lx.into_iter().rev());
    y.extend(ly.into_iter().rev());
    (x, y)
}

pub(crate) fn column_points(series: &TimeSeries, name: &str) -> Result<Vec<(NaiveDateTime, f64)>> {
    series
        .points(name)
        .ok_or_else(|| GlowsError::InvalidFormat(format!("series has no column '{name}'")))
}

pub(crate) fn time_bounds(series: &TimeSeries) -> Result<(NaiveDateTime, NaiveDateTime)> {
    match (series.start(), series.end()) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => Err(GlowsError::InsufficientData("series is empty".to_string())),
    }
}

/// Return period bands across `[start, end]`, hidden until toggled.
///
/// Each band spans from its period's flow to the next one; the last one
/// tops out at `max(1.75 * r100 - r25, y_max)`.
pub(crate) fn return_period_bands(
    start: NaiveDateTime,
    end: NaiveDateTime,
    rps: &ReturnPeriods,
    y_max: f64,
    palette: &Palette,
) -> Result<Vec<Scatter>> {
    let r2 = rps.require(2)?;
    let r5 = rps.require(5)?;
    let r10 = rps.require(10)?;
    let r25 = rps.require(25)?;
    let r50 = rps.require(50)?;
    let r100 = rps.require(100)?;
    let r_max = (1.75 * r100 - r25).max(y_max);

    let group = format!("{} Return Periods", palette.prefix);
    let bands = [
        (2, r2, r5),
        (5, r5, r10),
        (10, r10, r25),
        (25, r25, r50),
        (50, r50, r100),
        (100, r100, r_max),
    ];
    Ok(bands
        .into_iter()
        .map(|(period, low, high)| {
            let color = return_period_color(period);
            Scatter::new(
                format!("{} {}-Year", palette.prefix, period),
                axis([start, end, end, start]),
                vec![low, low, high, high],
            )
            .fill("toself", &color)
            .line(Line::colored(&color).width(0.0))
            .legend_group(&group)
            .legend_only()
        })
        .collect())
}

/// Largest finite value among the given columns of `series`.
pub(crate) fn max_of(series: &TimeSeries, names: &[&str]) -> f64 {
    names
        .iter()
        .filter_map(|name| series.column(name))
        .flatten()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max)
}

/// Title with the comparison noted when corrected data is drawn.
pub(crate) fn title(base: &str, ctx: &PlotContext, data: &PlotData) -> String {
    if data.is_corrected() {
        format!("{} for River: {} (Simulated vs Bias-Corrected)", base, ctx.river_id)
    } else {
        format!("{} for River: {}", base, ctx.river_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::SIMULATED;
    use chrono::NaiveDate;

    fn at(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn rps() -> ReturnPeriods {
        ReturnPeriods::from_pairs([(2, 10.0), (5, 20.0), (10, 30.0), (25, 40.0), (50, 50.0), (100, 60.0)])
    }

    #[test]
    fn test_return_period_bands() {
        let bands = return_period_bands(at(1), at(15), &rps(), 10.0, &SIMULATED).unwrap();
        assert_eq!(bands.len(), 6);
        assert_eq!(bands[0].name, "Simulated 2-Year");
        assert_eq!(bands[0].y, vec![10.0, 10.0, 20.0, 20.0]);
        // 1.75 * 60 - 40
        assert_eq!(bands[5].y[2], 65.0);
        assert_eq!(bands[0].x[1], AxisValue::from(at(15)));
        assert_eq!(bands[3].legendgroup.as_deref(), Some("Simulated Return Periods"));

        let tall = return_period_bands(at(1), at(15), &rps(), 500.0, &SIMULATED).unwrap();
        assert_eq!(tall[5].y[3], 500.0);
    }

    #[test]
    fn test_bands_need_every_period() {
        let partial = ReturnPeriods::from_pairs([(2, 10.0)]);
        assert!(return_period_bands(at(1), at(2), &partial, 0.0, &SIMULATED).is_err());
    }

    #[test]
    fn test_envelope_closes_polygon() {
        let upper = vec![(at(1), 5.0), (at(2), 6.0)];
        let lower = vec![(at(1), 1.0), (at(2), 2.0)];
        let (x, y) = envelope(&upper, &lower);
        assert_eq!(y, vec![5.0, 6.0, 2.0, 1.0]);
        assert_eq!(x[2], AxisValue::from(at(2)));
        assert_eq!(x[3], AxisValue::from(at(1)));
    }
}
