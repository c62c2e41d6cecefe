use crate::error::{GlowsError, Result};
use csv::{ReaderBuilder, WriterBuilder};
use std::collections::BTreeMap;

/// Recurrence intervals, in years, that every table carries.
pub const STANDARD_PERIODS: [u32; 6] = [2, 5, 10, 25, 50, 100];

const MAX_SIMULATED: &str = "max_simulated";

/// Discharge threshold (m³/s) per return period in years.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReturnPeriods {
    values: BTreeMap<u32, f64>,
    max_simulated: Option<f64>,
}

impl ReturnPeriods {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (u32, f64)>) -> Self {
        ReturnPeriods {
            values: pairs.into_iter().collect(),
            max_simulated: None,
        }
    }

    pub fn with_max_simulated(mut self, value: f64) -> Self {
        self.max_simulated = Some(value);
        self
    }

    pub fn insert(&mut self, period: u32, value: f64) {
        self.values.insert(period, value);
    }

    pub fn get(&self, period: u32) -> Option<f64> {
        self.values.get(&period).copied()
    }

    /// Threshold for `period`, failing when the table does not carry it.
    pub fn require(&self, period: u32) -> Result<f64> {
        self.get(period).ok_or_else(|| {
            GlowsError::InvalidFormat(format!("return period table has no {period} year value"))
        })
    }

    pub fn max_simulated(&self) -> Option<f64> {
        self.max_simulated
    }

    /// `(period, threshold)` pairs in ascending period order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.values.iter().map(|(p, v)| (*p, *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when all of [`STANDARD_PERIODS`] are present.
    pub fn is_complete(&self) -> bool {
        STANDARD_PERIODS.iter().all(|p| self.values.contains_key(p))
    }

    /// Cache layout: `return_period,{label}` then one row per period.
    pub fn to_csv(&self, label: &str) -> Result<String> {
        let mut wtr = WriterBuilder::new().from_writer(Vec::new());
        wtr.write_record(["return_period", label])?;
        for (period, value) in self.iter() {
            wtr.write_record([period.to_string(), value.to_string()])?;
        }
        if let Some(max) = self.max_simulated {
            wtr.write_record([MAX_SIMULATED.to_string(), max.to_string()])?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| GlowsError::InvalidFormat(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| GlowsError::InvalidFormat(e.to_string()))
    }

    /// Parse either the long cache layout (`return_period,value` rows) or the
    /// wide upstream layout (one row, one column per period such as
    /// `return_period_10` or `10`).
    pub fn from_csv(data: &str) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(data.as_bytes());
        let headers = rdr.headers()?.clone();
        let long_layout = headers
            .get(0)
            .is_some_and(|h| h.trim().eq_ignore_ascii_case("return_period"));

        let mut table = ReturnPeriods::new();
        if long_layout {
            for result in rdr.records() {
                let record = result?;
                let key = record.get(0).unwrap_or("").trim();
                let value = parse_value(record.get(1).unwrap_or(""))?;
                if key == MAX_SIMULATED {
                    table.max_simulated = Some(value);
                } else if let Some(period) = period_from_label(key) {
                    table.insert(period, value);
                }
            }
        } else if let Some(result) = rdr.records().next() {
            let record = result?;
            for (header, cell) in headers.iter().zip(record.iter()) {
                let header = header.trim();
                if header == MAX_SIMULATED {
                    table.max_simulated = Some(parse_value(cell)?);
                } else if let Some(period) = period_from_label(header) {
                    table.insert(period, parse_value(cell)?);
                }
            }
        }

        if table.is_empty() {
            return Err(GlowsError::InvalidFormat(
                "no return period values found".to_string(),
            ));
        }
        Ok(table)
    }
}

/// Trailing integer of a label such as `return_period_25`, `rp25` or `25`.
fn period_from_label(label: &str) -> Option<u32> {
    let digits_start = label
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    label[digits_start..].parse().ok().filter(|p| *p > 0)
}

fn parse_value(raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    trimmed
        .parse::<f64>()
        .map_err(|_| GlowsError::InvalidFormat(format!("non-numeric return period value '{trimmed}'")))
}
