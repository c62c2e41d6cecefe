//! Monthly status bands: where a month's flow sits relative to history.

use crate::{resample, Points};
use chrono::Datelike;
use glows_core::{GlowsError, Result};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

/// Baseline years for the flow regime climatology.
pub const REGIME_BASELINE: (i32, i32) = (1991, 2020);

/// Percentile thresholds separating the five regime bands, wettest first.
pub const REGIME_THRESHOLDS: [f64; 4] = [0.87, 0.72, 0.28, 0.13];

/// Index percentiles used by the annual status bands, wettest first.
pub const STATUS_PERCENTILES: [usize; 5] = [0, 13, 28, 72, 87];

/// Band names, wettest first.
pub const BAND_LABELS: [&str; 5] = ["Very Wet", "Wet", "Normal", "Dry", "Very Dry"];

/// Upper edges of the five bands for one calendar month, wettest first.
///
/// `levels[0]` is the top of "Very Wet", `levels[4]` the top of "Very Dry";
/// each band extends down to the next level (the last one to zero).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthBands {
    pub month: u32,
    pub levels: [f64; 5],
}

/// Linear interpolation of `target` in a `(percentile, value)` table sorted
/// by percentile.
///
/// Uses the last row at or below the target and the first row above it. A
/// target outside the table clamps to the nearest end row.
pub fn stream_estimate(table: &[(f64, f64)], target: f64) -> Result<f64> {
    let lower = table.iter().rev().find(|(p, _)| *p <= target);
    let upper = table.iter().find(|(p, _)| *p > target);
    match (lower, upper) {
        (Some(&(p_lo, v_lo)), Some(&(p_hi, v_hi))) => {
            Ok((v_hi - v_lo) / (p_hi - p_lo) * (target - p_lo) + v_lo)
        }
        (Some(&(_, v)), None) | (None, Some(&(_, v))) => Ok(v),
        (None, None) => Err(GlowsError::InsufficientData(
            "cannot interpolate in an empty percentile table".to_string(),
        )),
    }
}

/// Flow regime bands from the ratio of each year's monthly mean to the
/// baseline mean for that month.
///
/// Ratios are ranked ascending with percentile `rank / (n + 1)`, interpolated
/// at [`REGIME_THRESHOLDS`] and scaled back to flows. The top level is the
/// largest monthly mean in the baseline.
pub fn flow_regime_bands(points: &Points, baseline: (i32, i32)) -> Result<Vec<MonthBands>> {
    let mut by_month: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for ((year, month), value) in resample::year_month_means(points) {
        if (baseline.0..=baseline.1).contains(&year) {
            by_month.entry(month).or_default().push(value);
        }
    }
    if by_month.is_empty() {
        return Err(GlowsError::InsufficientData(format!(
            "no data between {} and {}",
            baseline.0, baseline.1
        )));
    }

    let mut bands = Vec::with_capacity(12);
    for (month, means) in by_month {
        let month_mean = means.iter().mean();
        let mut ratios: Vec<f64> = means.iter().map(|v| v / month_mean).collect();
        ratios.sort_by(|a, b| a.total_cmp(b));
        let n = ratios.len() as f64;
        let table: Vec<(f64, f64)> = ratios
            .iter()
            .enumerate()
            .map(|(i, r)| ((i + 1) as f64 / (n + 1.0), *r))
            .collect();

        let mut levels = [0.0; 5];
        levels[0] = means.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        for (slot, threshold) in REGIME_THRESHOLDS.iter().enumerate() {
            levels[slot + 1] = stream_estimate(&table, *threshold)? * month_mean;
        }
        bands.push(MonthBands { month, levels });
    }
    Ok(bands)
}

/// Annual status bands from the daily values of each calendar month.
///
/// Values are sorted descending and each level is
/// `values[len * p / 100]` for p in [`STATUS_PERCENTILES`].
pub fn annual_status_bands(points: &Points) -> Result<Vec<MonthBands>> {
    let mut by_month: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for (time, value) in points {
        if !value.is_nan() {
            by_month.entry(time.month()).or_default().push(*value);
        }
    }
    if by_month.is_empty() {
        return Err(GlowsError::InsufficientData(
            "no daily values to band".to_string(),
        ));
    }
    Ok(by_month
        .into_iter()
        .map(|(month, mut values)| {
            values.sort_by(|a, b| b.total_cmp(a));
            let mut levels = [0.0; 5];
            for (slot, p) in STATUS_PERCENTILES.iter().enumerate() {
                levels[slot] = values[values.len() * p / 100];
            }
            MonthBands { month, levels }
        })
        .collect())
}

/// Monthly means of one year, by calendar month.
pub fn year_monthly_means(points: &Points, year: i32) -> Vec<(u32, f64)> {
    resample::year_month_means(points)
        .into_iter()
        .filter(|((y, _), _)| *y == year)
        .map(|((_, m), v)| (m, v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
    use glows_core::date_range::DateRange;

    fn table() -> Vec<(f64, f64)> {
        vec![(0.2, 0.5), (0.4, 0.9), (0.6, 1.1), (0.8, 1.6)]
    }

    #[test]
    fn test_stream_estimate_exact_row() {
        for (p, v) in table() {
            assert_eq!(stream_estimate(&table(), p).unwrap(), v);
        }
    }

    #[test]
    fn test_stream_estimate_between_rows() {
        assert_relative_eq!(stream_estimate(&table(), 0.5).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(stream_estimate(&table(), 0.7).unwrap(), 1.35, epsilon = 1e-12);
    }

    #[test]
    fn test_stream_estimate_clamps() {
        assert_eq!(stream_estimate(&table(), 0.05).unwrap(), 0.5);
        assert_eq!(stream_estimate(&table(), 0.95).unwrap(), 1.6);
        assert!(stream_estimate(&[], 0.5).is_err());
    }

    fn daily(start_year: i32, end_year: i32, f: impl Fn(NaiveDate) -> f64) -> Vec<(NaiveDateTime, f64)> {
        let start = NaiveDate::from_ymd_opt(start_year, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(end_year, 12, 31).unwrap();
        DateRange(start, end)
            .map(|d| (d.and_time(NaiveTime::MIN), f(d)))
            .collect()
    }

    #[test]
    fn test_flow_regime_levels_are_ordered() {
        // each year a bit wetter than the last, plus a seasonal cycle
        let points = daily(1985, 2022, |d| {
            (d.year() - 1980) as f64 * (1.0 + d.month() as f64 / 12.0)
        });
        let bands = flow_regime_bands(&points, REGIME_BASELINE).unwrap();
        assert_eq!(bands.len(), 12);
        for band in &bands {
            assert!(band.levels.windows(2).all(|w| w[0] >= w[1]), "{band:?}");
        }
        // the baseline wettest year is 2020
        assert_relative_eq!(bands[0].levels[0], 40.0 * (1.0 + 1.0 / 12.0), epsilon = 1e-9);
    }

    #[test]
    fn test_flow_regime_without_baseline_data() {
        let points = daily(1950, 1951, |_| 1.0);
        assert!(flow_regime_bands(&points, REGIME_BASELINE).is_err());
    }

    #[test]
    fn test_annual_status_levels() {
        // January values 1..=100 spread over four Januaries
        let mut points = Vec::new();
        for i in 0..100u32 {
            let day = NaiveDate::from_ymd_opt(2000 + (i / 25) as i32, 1, 1 + i % 25).unwrap();
            points.push((day.and_time(NaiveTime::MIN), (i + 1) as f64));
        }
        let bands = annual_status_bands(&points).unwrap();
        assert_eq!(bands.len(), 1);
        assert_eq!(bands[0].levels, [100.0, 87.0, 72.0, 28.0, 13.0]);
    }

    #[test]
    fn test_year_monthly_means() {
        let points = daily(2000, 2001, |d| d.year() as f64);
        let means = year_monthly_means(&points, 2001);
        assert_eq!(means.len(), 12);
        assert!(means.iter().all(|(_, v)| *v == 2001.0));
    }
}
