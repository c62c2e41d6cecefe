//! Flow duration curves.

use crate::Points;
use chrono::Datelike;
use glows_core::{GlowsError, Result};

/// Number of points on a sampled curve (every 2 percent).
pub const FDC_POINTS: usize = 51;

/// Exceedance axis matching [`fdc`]: 0, 2, ..., 100 percent.
pub fn exceedance_axis() -> Vec<f64> {
    (0..FDC_POINTS).map(|i| (i * 2) as f64).collect()
}

/// Sample a flow duration curve at 2 percent steps.
///
/// The first value is the largest flow (exceeded 0% of the time) and the last
/// is the smallest. `NaN` values are ignored.
pub fn fdc(values: &[f64]) -> Result<Vec<f64>> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return Err(GlowsError::InsufficientData(
            "a flow duration curve needs at least one value".to_string(),
        ));
    }
    sorted.sort_by(|a, b| a.total_cmp(b));
    let len = sorted.len();
    Ok((0..=100)
        .rev()
        .step_by(2)
        .map(|p| {
            let index = if p == 100 { len - 1 } else { len * p / 100 };
            sorted[index]
        })
        .collect())
}

/// Flow duration curve of the values falling in one calendar month.
pub fn monthly_fdc(points: &Points, month: u32) -> Result<Vec<f64>> {
    let values: Vec<f64> = points
        .iter()
        .filter(|(t, _)| t.month() == month)
        .map(|(_, v)| *v)
        .collect();
    fdc(&values)
}
