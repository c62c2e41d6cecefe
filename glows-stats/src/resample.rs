//! Calendar resampling of `(timestamp, value)` series.
//!
//! Missing (`NaN`) values are skipped, and buckets without any value are left
//! out rather than emitted as `NaN`.

use crate::Points;
use chrono::{Datelike, NaiveDateTime};
use glows_core::{Column, Result, TimeSeries};
use glows_utils::dates::{month_end_stamp, month_start_stamp, year_start_stamp};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

fn bucket_means<K: Ord + Copy>(
    points: &Points,
    key: impl Fn(&NaiveDateTime) -> Option<K>,
) -> Vec<(K, f64)> {
    let mut buckets: BTreeMap<K, Vec<f64>> = BTreeMap::new();
    for (time, value) in points {
        if value.is_nan() {
            continue;
        }
        if let Some(k) = key(time) {
            buckets.entry(k).or_default().push(*value);
        }
    }
    buckets
        .into_iter()
        .map(|(k, values)| (k, values.iter().mean()))
        .collect()
}

/// Monthly means stamped at midnight on the last day of each month.
pub fn monthly_means(points: &Points) -> Vec<(NaiveDateTime, f64)> {
    bucket_means(points, |t| month_end_stamp(&t.date()))
}

/// Monthly means stamped at midnight on the first day of each month.
pub fn monthly_means_start(points: &Points) -> Vec<(NaiveDateTime, f64)> {
    bucket_means(points, |t| month_start_stamp(&t.date()))
}

/// Mean per `(year, month)`.
pub fn year_month_means(points: &Points) -> Vec<((i32, u32), f64)> {
    bucket_means(points, |t| Some((t.year(), t.month())))
}

/// Mean per calendar year.
pub fn yearly_means(points: &Points) -> Vec<(i32, f64)> {
    bucket_means(points, |t| Some(t.year()))
}

/// Mean per calendar day `(month, day)` across all years.
pub fn day_of_year_means(points: &Points) -> Vec<((u32, u32), f64)> {
    bucket_means(points, |t| Some((t.month(), t.day())))
}

/// Mean per calendar month across all years.
pub fn monthly_climatology(points: &Points) -> Vec<(u32, f64)> {
    bucket_means(points, |t| Some(t.month()))
}

/// Resample every column of `series` to month-end means.
pub fn monthly_mean_series(series: &TimeSeries) -> Result<TimeSeries> {
    resample_series(series, monthly_means)
}

/// Resample every column of `series` to means stamped on the first of each month.
pub fn monthly_start_mean_series(series: &TimeSeries) -> Result<TimeSeries> {
    resample_series(series, monthly_means_start)
}

/// Resample every column of `series` to yearly means stamped on January 1st.
pub fn yearly_mean_series(series: &TimeSeries) -> Result<TimeSeries> {
    resample_series(series, |points| {
        yearly_means(points)
            .into_iter()
            .filter_map(|(year, v)| year_start_stamp(year).map(|t| (t, v)))
            .collect()
    })
}

fn resample_series(
    series: &TimeSeries,
    resample: impl Fn(&Points) -> Vec<(NaiveDateTime, f64)>,
) -> Result<TimeSeries> {
    let mut buckets: BTreeMap<NaiveDateTime, Vec<f64>> = BTreeMap::new();
    let n_columns = series.columns().len();
    for (col, column) in series.columns().iter().enumerate() {
        let points = series.points(&column.name).unwrap_or_default();
        for (time, value) in resample(&points) {
            buckets.entry(time).or_insert_with(|| vec![f64::NAN; n_columns])[col] = value;
        }
    }
    let index: Vec<NaiveDateTime> = buckets.keys().copied().collect();
    let columns = series
        .columns()
        .iter()
        .enumerate()
        .map(|(col, c)| Column::new(c.name.clone(), buckets.values().map(|row| row[col]).collect()))
        .collect();
    TimeSeries::new(index, columns)
}
