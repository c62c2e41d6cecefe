/// Error types for the GEOGLOWS plugin crates
use thiserror::Error;

/// Main error type shared by the library crates
#[derive(Error, Debug)]
pub enum GlowsError {
    /// Dataset type selector outside the supported set
    #[error("Unsupported dataset type: {0}")]
    UnsupportedDataset(String),

    /// Plot selector outside the supported set
    #[error("Unsupported plot: {0}")]
    UnsupportedPlot(String),

    /// Parameter outside its accepted range (month, year, river id)
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Uploaded observed data could not be validated
    #[error("Invalid observed data: {0}")]
    InvalidObservedData(String),

    /// Bias correction requested without the observed dataset it needs
    #[error("Bias correction mode '{0}' requires an observed dataset")]
    MissingObservedData(String),

    /// Upstream provider failed to deliver a dataset
    #[error("Data unavailable for {dataset} of river {river_id}: {reason}")]
    DataUnavailable {
        dataset: String,
        river_id: String,
        reason: String,
    },

    /// A statistic needs more samples than it was given
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Payload parsed but did not have the expected shape
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Cache directory access failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse CSV data
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Failed to (de)serialize JSON
    #[error("Failed to process JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request failed
    #[cfg(feature = "api")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl GlowsError {
    /// Errors caused by what the dashboard user entered, as opposed to
    /// internal or upstream failures.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            GlowsError::InvalidParameter(_)
                | GlowsError::InvalidObservedData(_)
                | GlowsError::MissingObservedData(_)
                | GlowsError::UnsupportedPlot(_)
        )
    }
}

/// Type alias for Results using GlowsError
pub type Result<T> = std::result::Result<T, GlowsError>;
