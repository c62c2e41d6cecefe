//! Datasets gathered for one plot, and their bias-corrected counterparts.

use crate::colors::{Palette, CORRECTED, SIMULATED};
use crate::kind::PlotKind;
use glows_core::{Dataset, DatasetType, GlowsError, Result, ReturnPeriods, RiverId, TimeSeries};
use glows_stats::bias::BiasCorrector;
use glows_stats::gumbel::return_periods_from_points;
use glows_stats::resample::{monthly_start_mean_series, yearly_mean_series};
use std::collections::HashMap;

/// Series and return periods loaded for one side of a plot.
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    series: HashMap<DatasetType, TimeSeries>,
    return_periods: Option<ReturnPeriods>,
}

impl Inputs {
    pub fn insert(&mut self, kind: DatasetType, dataset: Dataset) {
        match dataset {
            Dataset::Series(series) => {
                self.series.insert(kind, series);
            }
            Dataset::ReturnPeriods(rps) => self.return_periods = Some(rps),
        }
    }

    pub fn with_series(mut self, kind: DatasetType, series: TimeSeries) -> Self {
        self.series.insert(kind, series);
        self
    }

    pub fn with_return_periods(mut self, rps: ReturnPeriods) -> Self {
        self.return_periods = Some(rps);
        self
    }

    pub fn get(&self, kind: DatasetType) -> Option<&TimeSeries> {
        self.series.get(&kind)
    }

    pub fn series(&self, kind: DatasetType) -> Result<&TimeSeries> {
        self.get(kind)
            .ok_or_else(|| GlowsError::InvalidFormat(format!("dataset {kind} was not loaded")))
    }

    pub fn return_periods(&self) -> Result<&ReturnPeriods> {
        self.return_periods
            .as_ref()
            .ok_or_else(|| GlowsError::InvalidFormat("return periods were not loaded".to_string()))
    }
}

/// Everything an assembler draws from.
#[derive(Debug, Clone, Default)]
pub struct PlotData {
    pub simulated: Inputs,
    pub corrected: Option<Inputs>,
}

impl PlotData {
    pub fn simulated(simulated: Inputs) -> Self {
        PlotData {
            simulated,
            corrected: None,
        }
    }

    pub fn is_corrected(&self) -> bool {
        self.corrected.is_some()
    }

    /// Simulated inputs first, then the corrected ones if present.
    pub fn variants(&self) -> impl Iterator<Item = (&'static Palette, &Inputs)> {
        std::iter::once((&SIMULATED, &self.simulated))
            .chain(self.corrected.iter().map(|c| (&CORRECTED, c)))
    }
}

/// Request details an assembler may need besides the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotContext {
    pub river_id: RiverId,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl PlotContext {
    pub fn new(river_id: RiverId) -> Self {
        PlotContext {
            river_id,
            year: None,
            month: None,
        }
    }

    pub fn year(&self) -> Result<i32> {
        self.year
            .ok_or_else(|| GlowsError::InvalidParameter("a year is required".to_string()))
    }

    pub fn month(&self) -> Result<u32> {
        self.month
            .ok_or_else(|| GlowsError::InvalidParameter("a month is required".to_string()))
    }
}

/// Corrected versions of the datasets `kind` draws.
///
/// Forecasts are mapped column by column. Retrospective monthly and yearly
/// series are resampled from the corrected daily series, and return periods
/// are refitted to it rather than reused.
pub fn correct_inputs(
    kind: PlotKind,
    simulated: &Inputs,
    corrector: &BiasCorrector,
    retro_daily: &TimeSeries,
) -> Result<Inputs> {
    let datasets = kind.spec().datasets;
    let needs_daily = datasets.iter().any(|d| {
        matches!(
            d,
            DatasetType::RetroDaily
                | DatasetType::RetroMonthly
                | DatasetType::RetroYearly
                | DatasetType::ReturnPeriods
        )
    });
    let corrected_daily = if needs_daily {
        Some(corrector.correct_retrospective(retro_daily)?)
    } else {
        None
    };

    let mut corrected = Inputs::default();
    for dataset in datasets {
        match (dataset, &corrected_daily) {
            (DatasetType::ReturnPeriods, Some(daily)) => {
                corrected.return_periods = Some(return_periods_from_points(&daily.first_points())?);
            }
            (DatasetType::RetroDaily, Some(daily)) => {
                corrected.series.insert(*dataset, daily.clone());
            }
            (DatasetType::RetroMonthly, Some(daily)) => {
                corrected.series.insert(*dataset, monthly_start_mean_series(daily)?);
            }
            (DatasetType::RetroYearly, Some(daily)) => {
                corrected.series.insert(*dataset, yearly_mean_series(daily)?);
            }
            (DatasetType::RetroSimulation, _) => {
                let series = corrector.correct_retrospective(simulated.series(*dataset)?)?;
                corrected.series.insert(*dataset, series);
            }
            _ => {
                let series = corrector.correct(simulated.series(*dataset)?)?;
                corrected.series.insert(*dataset, series);
            }
        }
    }
    log::debug!("Corrected {} dataset(s) for {}", datasets.len(), kind);
    Ok(corrected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate};
    use glows_core::date_range::DateRange;
    use glows_core::transform::{CurvePoint, MonthlyCurve};
    use glows_core::TransformTable;
    use glows_stats::bias::CORRECTED_COLUMN;
    use statrs::statistics::Statistics;

    fn halving() -> BiasCorrector {
        let curves = (1..=12)
            .map(|month| {
                MonthlyCurve::new(
                    month,
                    vec![
                        CurvePoint { exceedance: 0.0, simulated: 1000.0, corrected: 500.0 },
                        CurvePoint { exceedance: 100.0, simulated: 0.0, corrected: 0.0 },
                    ],
                )
            })
            .collect();
        BiasCorrector::global(TransformTable::new(curves).unwrap()).unwrap()
    }

    fn daily() -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(2001, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2005, 12, 31).unwrap();
        TimeSeries::daily_from_fn("710093", DateRange(start, end), |d| {
            100.0 + (d.ordinal() % 50) as f64
        })
    }

    #[test]
    fn test_yearly_volume_uses_corrected_daily() {
        let sim = Inputs::default().with_series(DatasetType::RetroYearly, daily());
        let corrected = correct_inputs(PlotKind::RetroYearlyVolume, &sim, &halving(), &daily()).unwrap();
        let yearly = corrected.series(DatasetType::RetroYearly).unwrap();
        assert_eq!(yearly.len(), 5);
        assert_eq!(yearly.column_names().collect::<Vec<_>>(), vec![CORRECTED_COLUMN]);
        let simulated_mean = daily().filter_rows(|t| t.year() == 2001).first_column().unwrap().values.iter().mean();
        approx::assert_relative_eq!(yearly.column(CORRECTED_COLUMN).unwrap()[0], simulated_mean / 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_return_periods_refitted() {
        let sim = Inputs::default()
            .with_series(DatasetType::Forecast, daily())
            .with_return_periods(ReturnPeriods::from_pairs([(2, 1.0)]));
        let corrected = correct_inputs(PlotKind::Forecast, &sim, &halving(), &daily()).unwrap();
        let rps = corrected.return_periods().unwrap();
        assert!(rps.is_complete());
        assert!(rps.require(2).unwrap() > 50.0);
        assert!(corrected.series(DatasetType::Forecast).is_ok());
    }

    #[test]
    fn test_missing_dataset_is_reported() {
        let err = Inputs::default().series(DatasetType::Forecast).unwrap_err();
        assert!(matches!(err, GlowsError::InvalidFormat(_)));
        assert!(PlotContext::new(RiverId(1)).year().is_err());
    }
}
