//! Probability that an ensemble forecast exceeds each return period.

use crate::round_to;
use chrono::NaiveDate;
use glows_core::{GlowsError, Result, ReturnPeriods, TimeSeries};
use std::collections::BTreeMap;

/// High-resolution member, which is not part of the 51-member spread.
pub const HIGH_RES_MEMBER: &str = "ensemble_52";

/// Percent of members exceeding each return period, per forecast day.
#[derive(Debug, Clone, PartialEq)]
pub struct ExceedanceTable {
    pub dates: Vec<NaiveDate>,
    /// `(return period, percent per date)` in ascending period order.
    pub columns: Vec<(u32, Vec<f64>)>,
}

impl ExceedanceTable {
    /// Column header for a return period, e.g. `"25 Year"`.
    pub fn label(period: u32) -> String {
        format!("{period} Year")
    }
}

/// Build the table from an ensemble forecast.
///
/// The high-resolution member and any row with a missing member are dropped,
/// each member is reduced to its daily maximum, and every cell is
/// `mean(daily_max > threshold) * 100` rounded to one decimal.
pub fn exceedance_table(ensembles: &TimeSeries, return_periods: &ReturnPeriods) -> Result<ExceedanceTable> {
    let members = ensembles.without_column(HIGH_RES_MEMBER).drop_missing_rows();
    let n_members = members.columns().len();
    if n_members == 0 || members.is_empty() {
        return Err(GlowsError::InsufficientData(
            "ensemble forecast has no complete rows".to_string(),
        ));
    }

    let mut daily_max: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for (row, time) in members.index().iter().enumerate() {
        let maxima = daily_max
            .entry(time.date())
            .or_insert_with(|| vec![f64::NEG_INFINITY; n_members]);
        for (col, column) in members.columns().iter().enumerate() {
            maxima[col] = maxima[col].max(column.values[row]);
        }
    }

    let columns = return_periods
        .iter()
        .map(|(period, threshold)| {
            let percents = daily_max
                .values()
                .map(|maxima| {
                    let exceeding = maxima.iter().filter(|v| **v > threshold).count();
                    round_to(exceeding as f64 / n_members as f64 * 100.0, 1)
                })
                .collect();
            (period, percents)
        })
        .collect();

    Ok(ExceedanceTable {
        dates: daily_max.into_keys().collect(),
        columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
    use glows_core::Column;

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, d)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(h, 0, 0).unwrap())
    }

    #[test]
    fn test_exceedance_table() {
        let index = vec![at(1, 0), at(1, 12), at(2, 0), at(2, 12)];
        let columns = vec![
            Column::new("ensemble_01", vec![1.0, 12.0, 1.0, 1.0]),
            Column::new("ensemble_02", vec![1.0, 1.0, 30.0, 1.0]),
            Column::new("ensemble_03", vec![6.0, 1.0, 1.0, 1.0]),
            Column::new("ensemble_04", vec![1.0, 1.0, 1.0, f64::NAN]),
            Column::new("ensemble_52", vec![f64::NAN, 99.0, 99.0, 99.0]),
        ];
        let ensembles = TimeSeries::new(index, columns).unwrap();
        let rps = ReturnPeriods::from_pairs([(2, 5.0), (10, 20.0)]);

        let table = exceedance_table(&ensembles, &rps).unwrap();
        // the last row has a missing member and is dropped; ensemble_52 is ignored
        assert_eq!(
            table.dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()
            ]
        );
        assert_eq!(table.columns[0], (2, vec![50.0, 25.0]));
        assert_eq!(table.columns[1], (10, vec![0.0, 25.0]));
        assert_eq!(ExceedanceTable::label(2), "2 Year");
    }

    #[test]
    fn test_all_rows_missing() {
        let ensembles = TimeSeries::new(
            vec![at(1, 0)],
            vec![Column::new("ensemble_01", vec![f64::NAN])],
        )
        .unwrap();
        assert!(exceedance_table(&ensembles, &ReturnPeriods::from_pairs([(2, 1.0)])).is_err());
    }
}
