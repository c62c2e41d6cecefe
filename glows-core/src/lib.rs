//! Core types for the GEOGLOWS streamflow plugins.
//!
//! - [`time_series`]: time-indexed numeric columns and their CSV form
//! - [`return_periods`]: return period thresholds per recurrence interval
//! - [`dataset`]: the closed set of upstream dataset types
//! - [`observed`]: validation of user-uploaded observed streamflow
//! - [`transform`]: per-month flow-duration curves used by bias correction
//! - [`source`]: the upstream provider seam, with an HTTP client behind the `api` feature

pub mod dataset;
pub mod date_range;
pub mod error;
pub mod observed;
pub mod return_periods;
pub mod river;
pub mod source;
pub mod time_series;
pub mod transform;

#[cfg(feature = "api")]
pub mod http;

pub use dataset::{Dataset, DatasetType};
pub use error::{GlowsError, Result};
pub use return_periods::ReturnPeriods;
pub use river::RiverId;
pub use source::StreamflowSource;
pub use time_series::{Column, TimeSeries};
pub use transform::{MonthlyCurve, TransformTable};
