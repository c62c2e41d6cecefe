//! Closed set of plot kinds and the table that drives them.

use crate::assemble::{self, Assembler};
use glows_core::{DatasetType, GlowsError, Result};
use std::{fmt, str::FromStr};

/// Every chart the plots plugin can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlotKind {
    Forecast,
    ForecastStats,
    ForecastEnsembles,
    RetroSimulation,
    RetroDaily,
    RetroMonthly,
    RetroYearly,
    RetroYearlyVolume,
    RetroStatus,
    FlowRegime,
    RetroFdc,
    Exceedance,
    SsiMonthly,
    SsiOneMonth,
}

/// Parameter a plot needs beyond the river id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraParam {
    None,
    /// Year to overlay on the status bands.
    Year,
    /// First year shown.
    SinceYear,
    Month,
}

/// One row of the plot table.
pub struct PlotSpec {
    pub kind: PlotKind,
    pub selector: &'static str,
    pub label: &'static str,
    pub extra: ExtraParam,
    /// Datasets loaded through the cache before assembly.
    pub datasets: &'static [DatasetType],
    pub assemble: Assembler,
}

use DatasetType as D;

/// Plot table, in [`PlotKind`] declaration order.
pub static PLOT_SPECS: [PlotSpec; 14] = [
    PlotSpec {
        kind: PlotKind::Forecast,
        selector: "forecast",
        label: "Forecast",
        extra: ExtraParam::None,
        datasets: &[D::Forecast, D::ReturnPeriods],
        assemble: assemble::forecast::forecast,
    },
    PlotSpec {
        kind: PlotKind::ForecastStats,
        selector: "forecast-stats",
        label: "Forecast Statistics",
        extra: ExtraParam::None,
        datasets: &[D::ForecastStats, D::ReturnPeriods],
        assemble: assemble::forecast::forecast_stats,
    },
    PlotSpec {
        kind: PlotKind::ForecastEnsembles,
        selector: "forecast-ensembles",
        label: "Forecast Ensembles",
        extra: ExtraParam::None,
        datasets: &[D::ForecastEnsembles, D::ReturnPeriods],
        assemble: assemble::forecast::forecast_ensembles,
    },
    PlotSpec {
        kind: PlotKind::RetroSimulation,
        selector: "retro-simulation",
        label: "Retrospective Simulation",
        extra: ExtraParam::None,
        datasets: &[D::RetroDaily, D::RetroMonthly],
        assemble: assemble::retro::retro_simulation,
    },
    PlotSpec {
        kind: PlotKind::RetroDaily,
        selector: "retro-daily",
        label: "Retrospective Daily Averages",
        extra: ExtraParam::None,
        datasets: &[D::RetroDaily],
        assemble: assemble::retro::daily_averages,
    },
    PlotSpec {
        kind: PlotKind::RetroMonthly,
        selector: "retro-monthly",
        label: "Retrospective Monthly Averages",
        extra: ExtraParam::None,
        datasets: &[D::RetroMonthly],
        assemble: assemble::retro::monthly_averages,
    },
    PlotSpec {
        kind: PlotKind::RetroYearly,
        selector: "retro-yearly",
        label: "Retrospective Yearly Averages",
        extra: ExtraParam::None,
        datasets: &[D::RetroYearly],
        assemble: assemble::retro::annual_averages,
    },
    PlotSpec {
        kind: PlotKind::RetroYearlyVolume,
        selector: "retro-yearly-volume",
        label: "Yearly Cumulative Discharge Volume",
        extra: ExtraParam::None,
        datasets: &[D::RetroYearly],
        assemble: assemble::retro::yearly_volumes,
    },
    PlotSpec {
        kind: PlotKind::RetroStatus,
        selector: "retro-status",
        label: "Annual Status by Month",
        extra: ExtraParam::Year,
        datasets: &[D::RetroDaily, D::RetroMonthly],
        assemble: assemble::status::annual_status,
    },
    PlotSpec {
        kind: PlotKind::FlowRegime,
        selector: "flow-regime",
        label: "Flow Regime",
        extra: ExtraParam::Year,
        datasets: &[D::RetroDaily],
        assemble: assemble::status::flow_regime,
    },
    PlotSpec {
        kind: PlotKind::RetroFdc,
        selector: "retro-fdc",
        label: "Flow Duration",
        extra: ExtraParam::None,
        datasets: &[D::RetroDaily],
        assemble: assemble::fdc::flow_duration,
    },
    PlotSpec {
        kind: PlotKind::Exceedance,
        selector: "exceedance",
        label: "Exceedance",
        extra: ExtraParam::None,
        datasets: &[D::ForecastEnsembles, D::ReturnPeriods],
        assemble: assemble::exceedance::exceedance,
    },
    PlotSpec {
        kind: PlotKind::SsiMonthly,
        selector: "ssi-monthly",
        label: "SSI Monthly",
        extra: ExtraParam::SinceYear,
        datasets: &[D::RetroSimulation],
        assemble: assemble::ssi::ssi_since_year,
    },
    PlotSpec {
        kind: PlotKind::SsiOneMonth,
        selector: "ssi-one-month",
        label: "SSI One Month",
        extra: ExtraParam::Month,
        datasets: &[D::RetroSimulation],
        assemble: assemble::ssi::ssi_one_month,
    },
];

impl PlotKind {
    pub fn spec(&self) -> &'static PlotSpec {
        &PLOT_SPECS[*self as usize]
    }

    pub fn as_str(&self) -> &'static str {
        self.spec().selector
    }

    pub fn label(&self) -> &'static str {
        self.spec().label
    }

    pub fn extra(&self) -> ExtraParam {
        self.spec().extra
    }

    pub fn all() -> impl Iterator<Item = PlotKind> {
        PLOT_SPECS.iter().map(|s| s.kind)
    }
}

impl FromStr for PlotKind {
    type Err = GlowsError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        PLOT_SPECS
            .iter()
            .find(|spec| spec.selector == s)
            .map(|spec| spec.kind)
            .ok_or_else(|| GlowsError::UnsupportedPlot(s.to_string()))
    }
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_order_matches_enum() {
        for (i, spec) in PLOT_SPECS.iter().enumerate() {
            assert_eq!(spec.kind as usize, i, "{} is out of place", spec.selector);
            assert!(!spec.datasets.is_empty());
        }
    }

    #[test]
    fn test_parse_selectors() {
        for kind in PlotKind::all() {
            assert_eq!(kind.as_str().parse::<PlotKind>().unwrap(), kind);
        }
        assert_eq!(" retro-fdc ".parse::<PlotKind>().unwrap(), PlotKind::RetroFdc);
        let err = "hydrograph".parse::<PlotKind>().unwrap_err();
        assert!(matches!(err, GlowsError::UnsupportedPlot(ref s) if s == "hydrograph"));
    }

    #[test]
    fn test_extra_params() {
        assert_eq!(PlotKind::RetroStatus.extra(), ExtraParam::Year);
        assert_eq!(PlotKind::SsiMonthly.extra(), ExtraParam::SinceYear);
        assert_eq!(PlotKind::SsiOneMonth.extra(), ExtraParam::Month);
        assert_eq!(PlotKind::Forecast.extra(), ExtraParam::None);
        assert_eq!(PlotKind::RetroYearlyVolume.label(), "Yearly Cumulative Discharge Volume");
    }
}
