//! Statistical transforms over GEOGLOWS streamflow series.
//!
//! Everything here is a pure function of its inputs; nothing touches the
//! network or the cache.

pub mod bias;
pub mod exceedance;
pub mod fdc;
pub mod gumbel;
pub mod regime;
pub mod resample;
pub mod ssi;
pub mod volume;

use chrono::NaiveDateTime;

/// `(timestamp, value)` pairs, as returned by [`glows_core::TimeSeries::points`].
pub type Points = [(NaiveDateTime, f64)];

/// Round to `decimals` places, ties to even.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
