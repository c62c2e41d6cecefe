use crate::error::{GlowsError, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// GEOGLOWS river (reach) identifier, e.g. `710093` or `160064246`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RiverId(pub u64);

impl RiverId {
    /// Parse a river id typed into the dashboard's free-text field.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        match trimmed.parse::<u64>() {
            Ok(0) | Err(_) => Err(GlowsError::InvalidParameter(format!(
                "river_id must be a positive integer, got '{trimmed}'"
            ))),
            Ok(id) => Ok(RiverId(id)),
        }
    }
}

impl FromStr for RiverId {
    type Err = GlowsError;

    fn from_str(s: &str) -> Result<Self> {
        RiverId::parse(s)
    }
}

impl fmt::Display for RiverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
