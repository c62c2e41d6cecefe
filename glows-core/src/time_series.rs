//! Time-indexed numeric table.
//!
//! Mirrors the upstream CSV payloads: the first column is the timestamp index
//! and every other column is a named numeric series (a river id, an ensemble
//! member such as `ensemble_07`, or a statistic such as `flow_avg`). Missing
//! cells are stored as `NaN`.

use crate::date_range::DateRange;
use crate::error::{GlowsError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use csv::{ReaderBuilder, WriterBuilder};

/// Timestamp format written to cache files.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Header of the index column written to cache files.
pub const INDEX_HEADER: &str = "time";

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// A named column of values aligned with the series index.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Column {
            name: name.into(),
            values,
        }
    }
}

/// Ordered-by-timestamp table of named numeric columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeSeries {
    index: Vec<NaiveDateTime>,
    columns: Vec<Column>,
}

impl TimeSeries {
    /// Build a series, reordering rows by timestamp if needed.
    ///
    /// Every column must have exactly one value per index entry.
    pub fn new(index: Vec<NaiveDateTime>, columns: Vec<Column>) -> Result<Self> {
        for column in &columns {
            if column.values.len() != index.len() {
                return Err(GlowsError::InvalidFormat(format!(
                    "column '{}' has {} values for {} timestamps",
                    column.name,
                    column.values.len(),
                    index.len()
                )));
            }
        }
        let series = TimeSeries { index, columns };
        if series.index.is_sorted() {
            Ok(series)
        } else {
            Ok(series.sorted())
        }
    }

    /// Build a single-column series from `(timestamp, value)` pairs.
    pub fn single(name: impl Into<String>, points: Vec<(NaiveDateTime, f64)>) -> Self {
        let (index, values): (Vec<_>, Vec<_>) = points.into_iter().unzip();
        let series = TimeSeries {
            index,
            columns: vec![Column::new(name, values)],
        };
        if series.index.is_sorted() {
            series
        } else {
            series.sorted()
        }
    }

    /// Build a daily single-column series over `range` from a generator.
    pub fn daily_from_fn(
        name: impl Into<String>,
        range: DateRange,
        f: impl Fn(NaiveDate) -> f64,
    ) -> Self {
        let points = range
            .map(|day| (day.and_time(NaiveTime::MIN), f(day)))
            .collect();
        TimeSeries::single(name, points)
    }

    fn sorted(self) -> Self {
        let mut order: Vec<usize> = (0..self.index.len()).collect();
        order.sort_by_key(|&i| self.index[i]);
        let index = order.iter().map(|&i| self.index[i]).collect();
        let columns = self
            .columns
            .into_iter()
            .map(|c| Column {
                values: order.iter().map(|&i| c.values[i]).collect(),
                name: c.name,
            })
            .collect();
        TimeSeries { index, columns }
    }

    pub fn index(&self) -> &[NaiveDateTime] {
        &self.index
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Values of the named column, if present.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Values of the named column, or a format error naming what is missing.
    pub fn require_column(&self, name: &str) -> Result<&[f64]> {
        self.column(name).ok_or_else(|| {
            GlowsError::InvalidFormat(format!(
                "expected column '{}', found [{}]",
                name,
                self.column_names().collect::<Vec<_>>().join(", ")
            ))
        })
    }

    pub fn first_column(&self) -> Option<&Column> {
        self.columns.first()
    }

    pub fn start(&self) -> Option<NaiveDateTime> {
        self.index.first().copied()
    }

    pub fn end(&self) -> Option<NaiveDateTime> {
        self.index.last().copied()
    }

    /// Non-missing `(timestamp, value)` pairs of the named column.
    pub fn points(&self, name: &str) -> Option<Vec<(NaiveDateTime, f64)>> {
        self.column(name).map(|values| {
            self.index
                .iter()
                .zip(values)
                .filter(|(_, v)| !v.is_nan())
                .map(|(t, v)| (*t, *v))
                .collect()
        })
    }

    /// Non-missing pairs of the first column.
    pub fn first_points(&self) -> Vec<(NaiveDateTime, f64)> {
        self.first_column()
            .and_then(|c| self.points(&c.name))
            .unwrap_or_default()
    }

    /// Largest non-missing value across all columns.
    pub fn max_value(&self) -> Option<f64> {
        self.columns
            .iter()
            .flat_map(|c| c.values.iter().copied())
            .filter(|v| !v.is_nan())
            .max_by(|a, b| a.total_cmp(b))
    }

    /// Copy of the series without the named column (no-op if absent).
    pub fn without_column(&self, name: &str) -> Self {
        TimeSeries {
            index: self.index.clone(),
            columns: self
                .columns
                .iter()
                .filter(|c| c.name != name)
                .cloned()
                .collect(),
        }
    }

    /// Copy of the series keeping only the listed columns, in that order.
    pub fn select(&self, names: &[&str]) -> Self {
        TimeSeries {
            index: self.index.clone(),
            columns: names
                .iter()
                .filter_map(|n| self.columns.iter().find(|c| c.name == *n).cloned())
                .collect(),
        }
    }

    /// Copy of the series with the named column renamed.
    pub fn rename_column(mut self, from: &str, to: &str) -> Self {
        for column in &mut self.columns {
            if column.name == from {
                column.name = to.to_string();
            }
        }
        self
    }

    /// Rows for which `keep` returns true.
    pub fn filter_rows(&self, keep: impl Fn(&NaiveDateTime) -> bool) -> Self {
        let rows: Vec<usize> = (0..self.index.len())
            .filter(|&i| keep(&self.index[i]))
            .collect();
        self.take_rows(&rows)
    }

    /// Rows where no column is missing.
    pub fn drop_missing_rows(&self) -> Self {
        let rows: Vec<usize> = (0..self.index.len())
            .filter(|&i| self.columns.iter().all(|c| !c.values[i].is_nan()))
            .collect();
        self.take_rows(&rows)
    }

    fn take_rows(&self, rows: &[usize]) -> Self {
        TimeSeries {
            index: rows.iter().map(|&i| self.index[i]).collect(),
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    values: rows.iter().map(|&i| c.values[i]).collect(),
                })
                .collect(),
        }
    }

    /// Apply `f` to every column, keeping names and index.
    pub fn map_columns(&self, mut f: impl FnMut(&Column) -> Vec<f64>) -> Result<Self> {
        let columns = self
            .columns
            .iter()
            .map(|c| Column::new(c.name.clone(), f(c)))
            .collect();
        TimeSeries::new(self.index.clone(), columns)
    }

    /// Serialize with a `time` index column followed by each named column.
    pub fn to_csv(&self) -> Result<String> {
        let mut wtr = WriterBuilder::new().from_writer(Vec::new());
        let mut header = vec![INDEX_HEADER.to_string()];
        header.extend(self.columns.iter().map(|c| c.name.clone()));
        wtr.write_record(&header)?;
        for (row, time) in self.index.iter().enumerate() {
            let mut record = vec![time.format(TIME_FORMAT).to_string()];
            record.extend(self.columns.iter().map(|c| format_cell(c.values[row])));
            wtr.write_record(&record)?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| GlowsError::InvalidFormat(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| GlowsError::InvalidFormat(e.to_string()))
    }

    /// Parse a CSV whose first column is a timestamp.
    ///
    /// Accepts both the cache layout and the upstream API payloads, whose
    /// index header may be `time` or `datetime` and whose timestamps may carry
    /// a UTC offset.
    pub fn from_csv(data: &str) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(data.as_bytes());
        let headers = rdr.headers()?.clone();
        if headers.len() < 2 {
            return Err(GlowsError::InvalidFormat(format!(
                "expected a timestamp column and at least one value column, got {} columns",
                headers.len()
            )));
        }
        let names: Vec<String> = headers.iter().skip(1).map(|h| h.trim().to_string()).collect();
        let mut index = Vec::new();
        let mut values: Vec<Vec<f64>> = vec![Vec::new(); names.len()];

        for result in rdr.records() {
            let record = result?;
            let raw_time = record.get(0).unwrap_or("").trim();
            if raw_time.is_empty() {
                continue;
            }
            let time = parse_timestamp(raw_time).ok_or_else(|| {
                GlowsError::InvalidFormat(format!("unparseable timestamp '{raw_time}'"))
            })?;
            index.push(time);
            for (col, column_values) in values.iter_mut().enumerate() {
                column_values.push(parse_cell(record.get(col + 1).unwrap_or(""))?);
            }
        }

        let columns = names
            .into_iter()
            .zip(values)
            .map(|(name, values)| Column { name, values })
            .collect();
        TimeSeries::new(index, columns)
    }
}

fn format_cell(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

fn parse_cell(raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return Ok(f64::NAN);
    }
    trimmed
        .parse::<f64>()
        .map_err(|_| GlowsError::InvalidFormat(format!("non-numeric value '{trimmed}'")))
}

/// Parse the timestamp layouts seen in upstream payloads, normalised to UTC.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(dt.naive_utc());
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}
