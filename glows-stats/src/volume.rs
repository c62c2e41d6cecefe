//! Yearly discharge volume.

use statrs::statistics::Statistics;
use std::collections::BTreeMap;

/// Seconds in a Julian year.
pub const SECONDS_PER_YEAR: f64 = 31_557_600.0;

/// Volume in million m³ discharged in a year at a mean flow of `mean_flow` m³/s.
pub fn yearly_volume(mean_flow: f64) -> f64 {
    mean_flow * SECONDS_PER_YEAR / 1e6
}

/// Yearly volumes from `(year, mean flow)` pairs.
pub fn yearly_volumes(yearly_means: &[(i32, f64)]) -> Vec<(i32, f64)> {
    yearly_means
        .iter()
        .map(|(year, flow)| (*year, yearly_volume(*flow)))
        .collect()
}

/// Mean volume per 5-year block, keyed by the block's first year
/// (`year / 5 * 5`).
pub fn five_year_means(volumes: &[(i32, f64)]) -> Vec<(i32, f64)> {
    let mut blocks: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for (year, volume) in volumes {
        blocks.entry(year.div_euclid(5) * 5).or_default().push(*volume);
    }
    blocks
        .into_iter()
        .map(|(start, values)| (start, values.iter().mean()))
        .collect()
}
