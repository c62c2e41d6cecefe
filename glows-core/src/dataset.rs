use crate::error::{GlowsError, Result};
use crate::return_periods::ReturnPeriods;
use crate::time_series::TimeSeries;
use std::{fmt, str::FromStr};

/// Upstream dataset kinds the cache knows how to store.
///
/// The canonical name doubles as the cache file prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetType {
    Forecast,
    ForecastStats,
    ForecastEnsembles,
    RetroSimulation,
    RetroDaily,
    RetroMonthly,
    RetroYearly,
    ReturnPeriods,
    DailyAverages,
    MonthlyAverages,
}

impl DatasetType {
    pub const ALL: [DatasetType; 10] = [
        DatasetType::Forecast,
        DatasetType::ForecastStats,
        DatasetType::ForecastEnsembles,
        DatasetType::RetroSimulation,
        DatasetType::RetroDaily,
        DatasetType::RetroMonthly,
        DatasetType::RetroYearly,
        DatasetType::ReturnPeriods,
        DatasetType::DailyAverages,
        DatasetType::MonthlyAverages,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetType::Forecast => "forecast",
            DatasetType::ForecastStats => "forecast-stats",
            DatasetType::ForecastEnsembles => "forecast-ensembles",
            DatasetType::RetroSimulation => "retro-simulation",
            DatasetType::RetroDaily => "retro-daily",
            DatasetType::RetroMonthly => "retro-monthly",
            DatasetType::RetroYearly => "retro-yearly",
            DatasetType::ReturnPeriods => "return-periods",
            DatasetType::DailyAverages => "daily-averages",
            DatasetType::MonthlyAverages => "monthly-averages",
        }
    }

    /// Path segment of the GEOGLOWS v2 REST endpoint serving this dataset.
    pub fn endpoint(&self) -> &'static str {
        match self {
            DatasetType::Forecast => "forecast",
            DatasetType::ForecastStats => "forecaststats",
            DatasetType::ForecastEnsembles => "forecastensembles",
            DatasetType::RetroSimulation => "retrospective",
            DatasetType::RetroDaily => "retrospectivedaily",
            DatasetType::RetroMonthly => "retrospectivemonthly",
            DatasetType::RetroYearly => "retrospectiveyearly",
            DatasetType::ReturnPeriods => "returnperiods",
            DatasetType::DailyAverages => "dailyaverages",
            DatasetType::MonthlyAverages => "monthlyaverages",
        }
    }

    /// Everything except the return period table is a time-indexed series.
    pub fn is_time_indexed(&self) -> bool {
        !matches!(self, DatasetType::ReturnPeriods)
    }
}

impl FromStr for DatasetType {
    type Err = GlowsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            // older plugin revisions asked for "historical"
            "historical" => Ok(DatasetType::RetroSimulation),
            other => DatasetType::ALL
                .into_iter()
                .find(|d| d.as_str() == other)
                .ok_or_else(|| GlowsError::UnsupportedDataset(other.to_string())),
        }
    }
}

impl fmt::Display for DatasetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fetched or cached dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum Dataset {
    Series(TimeSeries),
    ReturnPeriods(ReturnPeriods),
}

impl Dataset {
    pub fn into_series(self) -> Result<TimeSeries> {
        match self {
            Dataset::Series(series) => Ok(series),
            Dataset::ReturnPeriods(_) => Err(GlowsError::InvalidFormat(
                "expected a time series, found a return period table".to_string(),
            )),
        }
    }

    pub fn into_return_periods(self) -> Result<ReturnPeriods> {
        match self {
            Dataset::ReturnPeriods(table) => Ok(table),
            Dataset::Series(_) => Err(GlowsError::InvalidFormat(
                "expected a return period table, found a time series".to_string(),
            )),
        }
    }

    /// Parse a CSV payload in the layout `kind` uses.
    pub fn from_csv(kind: DatasetType, data: &str) -> Result<Self> {
        if kind.is_time_indexed() {
            TimeSeries::from_csv(data).map(Dataset::Series)
        } else {
            ReturnPeriods::from_csv(data).map(Dataset::ReturnPeriods)
        }
    }

    /// CSV cache representation; `label` names the return period value column.
    pub fn to_csv(&self, label: &str) -> Result<String> {
        match self {
            Dataset::Series(series) => series.to_csv(),
            Dataset::ReturnPeriods(table) => table.to_csv(label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dataset_types() {
        for kind in DatasetType::ALL {
            assert_eq!(kind.as_str().parse::<DatasetType>().unwrap(), kind);
        }
        assert_eq!(
            "historical".parse::<DatasetType>().unwrap(),
            DatasetType::RetroSimulation
        );
        let err = "retro-hourly".parse::<DatasetType>().unwrap_err();
        assert!(matches!(err, GlowsError::UnsupportedDataset(ref s) if s == "retro-hourly"));
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(DatasetType::ForecastStats.endpoint(), "forecaststats");
        assert_eq!(DatasetType::RetroSimulation.endpoint(), "retrospective");
        assert!(!DatasetType::ReturnPeriods.is_time_indexed());
    }

    #[test]
    fn test_dataset_from_csv_dispatch() {
        let rp = Dataset::from_csv(DatasetType::ReturnPeriods, "return_period,7\n2,10.5\n").unwrap();
        assert_eq!(rp.clone().into_return_periods().unwrap().get(2), Some(10.5));
        assert!(rp.into_series().is_err());

        let series = Dataset::from_csv(DatasetType::RetroDaily, "time,7\n2020-01-01,1.0\n").unwrap();
        assert_eq!(series.into_series().unwrap().len(), 1);
    }
}
