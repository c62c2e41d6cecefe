//! Request parameters as the dashboard sends them, and their validated form.

use crate::inputs::PlotContext;
use crate::kind::{ExtraParam, PlotKind};
use chrono::{Datelike, NaiveDate};
use glows_core::observed::parse_observed;
use glows_core::{GlowsError, Result, RiverId, TimeSeries};
use glows_stats::bias::BiasMode;
use serde::Deserialize;

/// Earliest year of the retrospective simulation.
pub const FIRST_YEAR: i32 = 1940;

/// Raw `read()` arguments.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct PlotRequest {
    pub river_id: String,
    pub plot_name: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub bias_correction: Option<String>,
    /// JSON record set uploaded through the file field.
    #[serde(default)]
    pub observed_data: Option<String>,
}

impl PlotRequest {
    pub fn new(river_id: impl Into<String>, plot_name: impl Into<String>) -> Self {
        PlotRequest {
            river_id: river_id.into(),
            plot_name: plot_name.into(),
            ..PlotRequest::default()
        }
    }
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotParams {
    pub river_id: RiverId,
    pub kind: PlotKind,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub bias: Option<BiasMode>,
    pub observed: Option<TimeSeries>,
}

impl PlotParams {
    /// Validate a request against the plot's extra parameter.
    ///
    /// Parameters the plot does not use are dropped. Local bias correction
    /// without an upload fails here, before anything is fetched.
    pub fn from_request(request: &PlotRequest, today: NaiveDate) -> Result<Self> {
        let river_id = RiverId::parse(&request.river_id)?;
        let kind: PlotKind = request.plot_name.parse()?;
        let current_year = today.year();

        let (mut year, mut month) = (None, None);
        match kind.extra() {
            ExtraParam::None => {}
            ExtraParam::Year => year = Some(require_year(request.year, FIRST_YEAR, current_year)?),
            ExtraParam::SinceYear => {
                year = Some(require_year(request.year, FIRST_YEAR + 1, current_year)?)
            }
            ExtraParam::Month => month = Some(require_month(request.month)?),
        }

        let bias = match request.bias_correction.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) if raw.eq_ignore_ascii_case("none") => None,
            Some(raw) => Some(raw.parse::<BiasMode>()?),
        };

        let observed = match request.observed_data.as_deref() {
            Some(raw) if !raw.trim().is_empty() => Some(parse_observed(raw)?),
            _ => None,
        };
        if bias == Some(BiasMode::Local) && observed.is_none() {
            return Err(GlowsError::MissingObservedData(BiasMode::Local.to_string()));
        }

        Ok(PlotParams {
            river_id,
            kind,
            year,
            month,
            bias,
            observed,
        })
    }

    pub fn context(&self) -> PlotContext {
        PlotContext {
            river_id: self.river_id,
            year: self.year,
            month: self.month,
        }
    }
}

fn require_year(year: Option<i32>, first: i32, last: i32) -> Result<i32> {
    match year {
        Some(y) if (first..=last).contains(&y) => Ok(y),
        Some(y) => Err(GlowsError::InvalidParameter(format!(
            "year must be between {first} and {last}, got {y}"
        ))),
        None => Err(GlowsError::InvalidParameter("a year is required".to_string())),
    }
}

fn require_month(month: Option<u32>) -> Result<u32> {
    match month {
        Some(m) if (1..=12).contains(&m) => Ok(m),
        Some(m) => Err(GlowsError::InvalidParameter(format!(
            "month must be between 1 and 12, got {m}"
        ))),
        None => Err(GlowsError::InvalidParameter("a month is required".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
    }

    fn request(plot: &str) -> PlotRequest {
        PlotRequest::new("710093", plot)
    }

    #[test]
    fn test_plain_request() {
        let params = PlotParams::from_request(&request("forecast"), today()).unwrap();
        assert_eq!(params.river_id, RiverId(710093));
        assert_eq!(params.kind, PlotKind::Forecast);
        assert_eq!(params.bias, None);
    }

    #[test]
    fn test_year_ranges() {
        let mut req = request("retro-status");
        req.year = Some(1940);
        assert_eq!(PlotParams::from_request(&req, today()).unwrap().year, Some(1940));
        req.year = Some(2026);
        assert!(PlotParams::from_request(&req, today()).is_err());
        req.year = None;
        assert!(PlotParams::from_request(&req, today()).is_err());

        let mut req = request("ssi-monthly");
        req.year = Some(1940);
        let err = PlotParams::from_request(&req, today()).unwrap_err();
        assert!(matches!(err, GlowsError::InvalidParameter(_)));
        req.year = Some(1941);
        assert!(PlotParams::from_request(&req, today()).is_ok());
    }

    #[test]
    fn test_month_range_and_unused_params() {
        let mut req = request("ssi-one-month");
        req.month = Some(0);
        assert!(PlotParams::from_request(&req, today()).is_err());
        req.month = Some(12);
        req.year = Some(1800);
        let params = PlotParams::from_request(&req, today()).unwrap();
        assert_eq!(params.month, Some(12));
        assert_eq!(params.year, None);
    }

    #[test]
    fn test_bias_modes() {
        let mut req = request("forecast");
        req.bias_correction = Some("None".into());
        assert_eq!(PlotParams::from_request(&req, today()).unwrap().bias, None);
        req.bias_correction = Some("global".into());
        assert_eq!(
            PlotParams::from_request(&req, today()).unwrap().bias,
            Some(BiasMode::Global)
        );
        req.bias_correction = Some("sideways".into());
        assert!(PlotParams::from_request(&req, today()).is_err());
    }

    #[test]
    fn test_local_bias_requires_upload() {
        let mut req = request("forecast");
        req.bias_correction = Some("local".into());
        let err = PlotParams::from_request(&req, today()).unwrap_err();
        assert!(matches!(err, GlowsError::MissingObservedData(_)));

        req.observed_data = Some("not json".into());
        let err = PlotParams::from_request(&req, today()).unwrap_err();
        assert!(err.is_user_facing());
    }

    #[test]
    fn test_request_deserializes_with_defaults() {
        let req: PlotRequest =
            serde_json::from_str(r#"{"river_id": "710093", "plot_name": "retro-fdc"}"#).unwrap();
        assert_eq!(req, request("retro-fdc"));
    }

    #[test]
    fn test_rejects_bad_selectors() {
        let err = PlotParams::from_request(&request("hydrograph"), today()).unwrap_err();
        assert!(matches!(err, GlowsError::UnsupportedPlot(_)));
        let err = PlotParams::from_request(&PlotRequest::new("abc", "forecast"), today()).unwrap_err();
        assert!(matches!(err, GlowsError::InvalidParameter(_)));
    }
}
