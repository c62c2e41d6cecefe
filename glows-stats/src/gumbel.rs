//! Gumbel Type-I return period fit.

use crate::{round_to, Points};
use chrono::Datelike;
use glows_core::return_periods::STANDARD_PERIODS;
use glows_core::{GlowsError, Result, ReturnPeriods, TimeSeries};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

/// Discharge with a `return_period`-year recurrence, rounded to 2 decimals.
///
/// `mean` and `std` describe the annual maxima (population deviation).
pub fn gumbel_fit(return_period: u32, mean: f64, std: f64) -> f64 {
    let t = return_period as f64;
    let reduced = -(-(1.0 - 1.0 / t).ln()).ln();
    round_to(reduced * std * 0.7797 + mean - 0.45 * std, 2)
}

/// Largest value of each calendar year.
pub fn annual_maxima(points: &Points) -> Vec<(i32, f64)> {
    let mut maxima: BTreeMap<i32, f64> = BTreeMap::new();
    for (time, value) in points {
        if value.is_nan() {
            continue;
        }
        maxima
            .entry(time.year())
            .and_modify(|m| *m = m.max(*value))
            .or_insert(*value);
    }
    maxima.into_iter().collect()
}

/// Return period table for the named column of a daily series.
///
/// Also records the largest annual maximum as `max_simulated`.
pub fn return_periods_from_daily(series: &TimeSeries, column: &str) -> Result<ReturnPeriods> {
    let points = series.points(column).ok_or_else(|| {
        GlowsError::InvalidFormat(format!("series has no column '{column}'"))
    })?;
    return_periods_from_points(&points)
}

pub fn return_periods_from_points(points: &Points) -> Result<ReturnPeriods> {
    let maxima: Vec<f64> = annual_maxima(points).into_iter().map(|(_, v)| v).collect();
    if maxima.len() < 2 {
        return Err(GlowsError::InsufficientData(format!(
            "a return period fit needs at least 2 years of data, got {}",
            maxima.len()
        )));
    }
    let mu = maxima.iter().mean();
    let sigma = maxima.iter().population_std_dev();
    let max_simulated = maxima.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    log::debug!(
        "Gumbel fit over {} annual maxima: mean {:.2}, std {:.2}",
        maxima.len(),
        mu,
        sigma
    );
    Ok(ReturnPeriods::from_pairs(
        STANDARD_PERIODS
            .iter()
            .map(|&period| (period, gumbel_fit(period, mu, sigma))),
    )
    .with_max_simulated(round_to(max_simulated, 2)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{NaiveDate, NaiveTime};
    use glows_core::date_range::DateRange;

    #[test]
    fn test_gumbel_fit_known_value() {
        // T = 2: -ln(-ln(0.5)) = 0.366513
        let expected = 0.366_512_920_581_664_3 * 10.0 * 0.7797 + 100.0 - 4.5;
        assert_relative_eq!(gumbel_fit(2, 100.0, 10.0), round_to(expected, 2));
        assert_eq!(gumbel_fit(2, 100.0, 10.0), 98.36);
    }

    #[test]
    fn test_gumbel_fit_rounds_ties_to_even() {
        assert_eq!(gumbel_fit(10, 0.125, 0.0), 0.12);
        assert_eq!(gumbel_fit(10, 0.375, 0.0), 0.38);
    }

    #[test]
    fn test_gumbel_monotonic_in_return_period() {
        for (mu, sigma) in [(0.0, 1.0), (250.0, 80.0), (12.5, 0.3), (-5.0, 40.0)] {
            let values: Vec<f64> = STANDARD_PERIODS
                .iter()
                .map(|&t| gumbel_fit(t, mu, sigma))
                .collect();
            assert!(
                values.windows(2).all(|w| w[0] < w[1]),
                "not increasing for mean {mu}, std {sigma}: {values:?}"
            );
        }
    }

    #[test]
    fn test_return_periods_from_daily() {
        // peaks of 100, 200 and 300 in three successive years
        let start = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2002, 12, 31).unwrap();
        let series = TimeSeries::daily_from_fn("710093", DateRange(start, end), |d| {
            if d.month() == 6 && d.day() == 1 {
                100.0 * (d.year() - 1999) as f64
            } else {
                1.0
            }
        });
        let table = return_periods_from_daily(&series, "710093").unwrap();
        let sigma = (20000.0f64 / 3.0).sqrt();
        assert_eq!(table.get(10), Some(gumbel_fit(10, 200.0, sigma)));
        assert_eq!(table.max_simulated(), Some(300.0));
        assert!(table.is_complete());
    }

    #[test]
    fn test_single_year_is_insufficient() {
        let day = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let points = vec![(day.and_time(NaiveTime::MIN), 5.0)];
        assert!(matches!(
            return_periods_from_points(&points),
            Err(GlowsError::InsufficientData(_))
        ));
    }
}
