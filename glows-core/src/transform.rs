//! Per-month flow-duration curves pairing simulated and corrected flows.
//!
//! A [`TransformTable`] is what global bias correction applies: for each
//! calendar month, the flow a simulation produces at a given exceedance
//! probability and the flow it should have produced.

use crate::error::{GlowsError, Result};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CurvePoint {
    /// Exceedance probability in percent (0 = highest flow).
    pub exceedance: f64,
    pub simulated: f64,
    pub corrected: f64,
}

/// Paired curves for one calendar month, ordered by exceedance.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyCurve {
    pub month: u32,
    pub points: Vec<CurvePoint>,
}

impl MonthlyCurve {
    pub fn new(month: u32, mut points: Vec<CurvePoint>) -> Self {
        points.sort_by(|a, b| a.exceedance.total_cmp(&b.exceedance));
        MonthlyCurve { month, points }
    }
}

#[derive(Debug, Deserialize)]
struct TransformRow {
    month: u32,
    exceedance: f64,
    simulated: f64,
    corrected: f64,
}

/// Monthly curves for one river, months 1 to 12.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransformTable {
    curves: BTreeMap<u32, MonthlyCurve>,
}

impl TransformTable {
    pub fn new(curves: Vec<MonthlyCurve>) -> Result<Self> {
        let mut table = BTreeMap::new();
        for curve in curves {
            if !(1..=12).contains(&curve.month) {
                return Err(GlowsError::InvalidFormat(format!(
                    "transform curve for month {} is outside 1-12",
                    curve.month
                )));
            }
            if curve.points.is_empty() {
                return Err(GlowsError::InvalidFormat(format!(
                    "transform curve for month {} has no points",
                    curve.month
                )));
            }
            table.insert(curve.month, curve);
        }
        Ok(TransformTable { curves: table })
    }

    pub fn curve(&self, month: u32) -> Option<&MonthlyCurve> {
        self.curves.get(&month)
    }

    pub fn months(&self) -> impl Iterator<Item = u32> + '_ {
        self.curves.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Parse the long layout `month,exceedance,simulated,corrected`.
    pub fn from_csv(data: &str) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(data.as_bytes());
        let mut grouped: BTreeMap<u32, Vec<CurvePoint>> = BTreeMap::new();
        for result in rdr.deserialize() {
            let row: TransformRow = result?;
            grouped.entry(row.month).or_default().push(CurvePoint {
                exceedance: row.exceedance,
                simulated: row.simulated,
                corrected: row.corrected,
            });
        }
        if grouped.is_empty() {
            return Err(GlowsError::InvalidFormat(
                "transform table has no rows".to_string(),
            ));
        }
        TransformTable::new(
            grouped
                .into_iter()
                .map(|(month, points)| MonthlyCurve::new(month, points))
                .collect(),
        )
    }
}
