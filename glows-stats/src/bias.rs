//! Bias correction by monthly quantile mapping.
//!
//! Each simulated value is located on the simulated flow duration curve of its
//! calendar month and replaced by the flow at the same exceedance probability
//! on the corrected curve. Local correction builds the corrected curves from
//! uploaded observations; global correction uses the provider's precomputed
//! [`TransformTable`].

use chrono::Datelike;
use glows_core::transform::{CurvePoint, MonthlyCurve};
use glows_core::{GlowsError, Result, TimeSeries, TransformTable};
use glows_utils::months::SHORT_NAMES;
use std::{fmt, str::FromStr};

/// Column name of a corrected retrospective series.
pub const CORRECTED_COLUMN: &str = "Corrected Simulated Streamflow";

/// Exceedance probabilities (percent) at which curves are sampled.
const CURVE_STEPS: usize = 101;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiasMode {
    Local,
    Global,
}

impl BiasMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BiasMode::Local => "local",
            BiasMode::Global => "global",
        }
    }
}

impl FromStr for BiasMode {
    type Err = GlowsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(BiasMode::Local),
            "global" => Ok(BiasMode::Global),
            other => Err(GlowsError::InvalidParameter(format!(
                "bias correction must be 'local' or 'global', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for BiasMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flow at each exceedance probability 0..=100 percent, highest flow first.
///
/// Linear interpolation between order statistics; `None` without values.
pub fn exceedance_curve(values: &[f64]) -> Option<Vec<f64>> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));
    let last = (sorted.len() - 1) as f64;
    Some(
        (0..CURVE_STEPS)
            .map(|step| {
                let quantile = 1.0 - step as f64 / (CURVE_STEPS - 1) as f64;
                let pos = quantile * last;
                let lo = pos.floor() as usize;
                let hi = pos.ceil() as usize;
                sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
            })
            .collect(),
    )
}

fn month_list(months: &[u32]) -> String {
    months
        .iter()
        .map(|m| SHORT_NAMES[(*m as usize - 1) % 12])
        .collect::<Vec<_>>()
        .join(", ")
}

fn month_values(series: &TimeSeries, values: &[f64], month: u32) -> Vec<f64> {
    series
        .index()
        .iter()
        .zip(values)
        .filter(|(t, _)| t.month() == month)
        .map(|(_, v)| *v)
        .collect()
}

/// Monthly quantile mapping between two series.
#[derive(Debug, Clone, PartialEq)]
pub struct BiasCorrector {
    table: TransformTable,
}

impl BiasCorrector {
    /// Corrector built from the first column of the simulated and observed
    /// series.
    ///
    /// Fails with [`GlowsError::MissingObservedData`] when nothing was uploaded
    /// and with [`GlowsError::InvalidObservedData`] when any calendar month has
    /// no observations.
    pub fn local(simulated: &TimeSeries, observed: Option<&TimeSeries>) -> Result<Self> {
        let observed = observed
            .ok_or_else(|| GlowsError::MissingObservedData(BiasMode::Local.to_string()))?;
        let sim = simulated.first_column().ok_or_else(|| {
            GlowsError::InsufficientData("simulated series has no columns".to_string())
        })?;
        let obs = observed.first_column().ok_or_else(|| {
            GlowsError::InvalidObservedData("observed series has no columns".to_string())
        })?;

        let mut curves = Vec::with_capacity(12);
        let mut unobserved = Vec::new();
        let mut unsimulated = Vec::new();
        for month in 1..=12 {
            let sim_curve = exceedance_curve(&month_values(simulated, &sim.values, month));
            let obs_curve = exceedance_curve(&month_values(observed, &obs.values, month));
            let (sim_curve, obs_curve) = match (sim_curve, obs_curve) {
                (Some(s), Some(o)) => (s, o),
                (sim_curve, obs_curve) => {
                    if sim_curve.is_none() {
                        unsimulated.push(month);
                    }
                    if obs_curve.is_none() {
                        unobserved.push(month);
                    }
                    continue;
                }
            };
            let points = sim_curve
                .into_iter()
                .zip(obs_curve)
                .enumerate()
                .map(|(step, (simulated, corrected))| CurvePoint {
                    exceedance: step as f64,
                    simulated,
                    corrected,
                })
                .collect();
            curves.push(MonthlyCurve::new(month, points));
        }
        if !unobserved.is_empty() {
            log::warn!("Observed data is missing {} month(s)", unobserved.len());
            return Err(GlowsError::InvalidObservedData(format!(
                "observed data must cover every calendar month, no values for {}",
                month_list(&unobserved)
            )));
        }
        if !unsimulated.is_empty() {
            return Err(GlowsError::InsufficientData(format!(
                "simulated series has no values for {}",
                month_list(&unsimulated)
            )));
        }
        Ok(BiasCorrector {
            table: TransformTable::new(curves)?,
        })
    }

    /// Corrector applying a precomputed transform.
    ///
    /// Fails with [`GlowsError::InvalidFormat`] unless the table has a curve
    /// for every calendar month.
    pub fn global(table: TransformTable) -> Result<Self> {
        let missing: Vec<u32> = (1..=12).filter(|m| table.curve(*m).is_none()).collect();
        if !missing.is_empty() {
            return Err(GlowsError::InvalidFormat(format!(
                "bias correction transform has no curve for {}",
                month_list(&missing)
            )));
        }
        Ok(BiasCorrector { table })
    }

    pub fn table(&self) -> &TransformTable {
        &self.table
    }

    /// Map every column of `series`, keeping names and timestamps.
    pub fn correct(&self, series: &TimeSeries) -> Result<TimeSeries> {
        series.map_columns(|column| {
            series
                .index()
                .iter()
                .zip(&column.values)
                .map(|(time, value)| {
                    self.table
                        .curve(time.month())
                        .map_or(f64::NAN, |curve| map_value(curve, *value))
                })
                .collect()
        })
    }

    /// Correct the first column of a retrospective series into a single
    /// [`CORRECTED_COLUMN`].
    pub fn correct_retrospective(&self, simulated: &TimeSeries) -> Result<TimeSeries> {
        let first = simulated.first_column().ok_or_else(|| {
            GlowsError::InsufficientData("simulated series has no columns".to_string())
        })?;
        let corrected = self.correct(&simulated.select(&[first.name.as_str()]))?;
        let name = first.name.clone();
        Ok(corrected.rename_column(&name, CORRECTED_COLUMN))
    }
}

/// Corrected flow for `value` on one month's curves.
///
/// Values beyond either end of the simulated curve are scaled by the ratio of
/// the end points.
fn map_value(curve: &MonthlyCurve, value: f64) -> f64 {
    if value.is_nan() {
        return value;
    }
    let points = &curve.points;
    let (Some(high), Some(low)) = (points.first(), points.last()) else {
        return value;
    };
    if value >= high.simulated {
        return scale(value, high);
    }
    if value <= low.simulated {
        return scale(value, low);
    }
    for pair in points.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if value <= a.simulated && value >= b.simulated {
            let span = a.simulated - b.simulated;
            let frac = if span == 0.0 { 0.0 } else { (a.simulated - value) / span };
            return a.corrected + (b.corrected - a.corrected) * frac;
        }
    }
    value
}

fn scale(value: f64, end: &CurvePoint) -> f64 {
    if end.simulated == 0.0 {
        end.corrected
    } else {
        value * end.corrected / end.simulated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{NaiveDate, NaiveTime};
    use glows_core::date_range::DateRange;
    use glows_core::Column;

    fn daily(f: impl Fn(NaiveDate) -> f64) -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(2001, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2004, 12, 31).unwrap();
        TimeSeries::daily_from_fn("710093", DateRange(start, end), f)
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!("Local".parse::<BiasMode>().unwrap(), BiasMode::Local);
        assert_eq!("global".parse::<BiasMode>().unwrap(), BiasMode::Global);
        assert!("none".parse::<BiasMode>().is_err());
    }

    #[test]
    fn test_exceedance_curve() {
        let curve = exceedance_curve(&[0.0, 10.0, 20.0]).unwrap();
        assert_eq!(curve.len(), 101);
        assert_eq!(curve[0], 20.0);
        assert_eq!(curve[50], 10.0);
        assert_eq!(curve[100], 0.0);
        assert_relative_eq!(curve[25], 15.0, epsilon = 1e-12);
        assert!(exceedance_curve(&[f64::NAN]).is_none());
    }

    #[test]
    fn test_local_requires_observations() {
        let sim = daily(|_| 1.0);
        let err = BiasCorrector::local(&sim, None).unwrap_err();
        assert!(matches!(err, GlowsError::MissingObservedData(_)));
    }

    #[test]
    fn test_local_correction_removes_scale_bias() {
        // simulation runs twice as high as the gauge
        let flow = |d: NaiveDate| 10.0 + d.ordinal() as f64 + d.year() as f64 % 7.0;
        let sim = daily(|d| 2.0 * flow(d));
        let obs = daily(flow).rename_column("710093", "Streamflow (m3/s)");

        let corrector = BiasCorrector::local(&sim, Some(&obs)).unwrap();
        let corrected = corrector.correct_retrospective(&sim).unwrap();
        assert_eq!(
            corrected.column_names().collect::<Vec<_>>(),
            vec![CORRECTED_COLUMN]
        );
        let got = corrected.column(CORRECTED_COLUMN).unwrap();
        let want = obs.column("Streamflow (m3/s)").unwrap();
        for (g, w) in got.iter().zip(want) {
            assert_relative_eq!(*g, *w, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_local_rejects_months_without_observations() {
        let sim = daily(|d| 100.0 + d.ordinal() as f64);
        let obs = daily(|d| 50.0 + d.day() as f64)
            .filter_rows(|t| t.month() == 1)
            .rename_column("710093", "Streamflow (m3/s)");

        let err = BiasCorrector::local(&sim, Some(&obs)).unwrap_err();
        match err {
            GlowsError::InvalidObservedData(msg) => {
                assert!(msg.contains("Feb"), "{msg}");
                assert!(msg.contains("Dec"), "{msg}");
                assert!(!msg.contains("Jan"), "{msg}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    fn halving_curve(month: u32) -> MonthlyCurve {
        MonthlyCurve::new(
            month,
            vec![
                CurvePoint { exceedance: 0.0, simulated: 100.0, corrected: 50.0 },
                CurvePoint { exceedance: 100.0, simulated: 0.0, corrected: 0.0 },
            ],
        )
    }

    #[test]
    fn test_global_rejects_incomplete_table() {
        let table = TransformTable::new(vec![halving_curve(1), halving_curve(7)]).unwrap();
        let err = BiasCorrector::global(table).unwrap_err();
        match err {
            GlowsError::InvalidFormat(msg) => {
                assert!(msg.contains("Feb, Mar, Apr, May, Jun, Aug"), "{msg}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_global_correction_keeps_columns() {
        let table = TransformTable::new((1..=12).map(halving_curve).collect()).unwrap();
        let corrector = BiasCorrector::global(table).unwrap();
        let jan = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap().and_time(NaiveTime::MIN);
        let feb = NaiveDate::from_ymd_opt(2024, 2, 5).unwrap().and_time(NaiveTime::MIN);
        let series = TimeSeries::new(
            vec![jan, feb],
            vec![
                Column::new("flow_avg", vec![40.0, 40.0]),
                Column::new("flow_max", vec![200.0, f64::NAN]),
            ],
        )
        .unwrap();
        let corrected = corrector.correct(&series).unwrap();
        let avg = corrected.column("flow_avg").unwrap();
        assert_relative_eq!(avg[0], 20.0, epsilon = 1e-12);
        assert_relative_eq!(avg[1], 20.0, epsilon = 1e-12);
        assert_eq!(corrected.column("flow_max").unwrap()[0], 100.0);
        assert!(corrected.column("flow_max").unwrap()[1].is_nan());
    }
}
