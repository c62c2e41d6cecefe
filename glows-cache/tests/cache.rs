use chrono::{NaiveDate, NaiveTime};
use glows_cache::{FixedClock, PlotCache};
use glows_core::{
    Dataset, DatasetType, GlowsError, Result, ReturnPeriods, RiverId, StreamflowSource,
    TimeSeries, TransformTable,
};
use std::cell::Cell;

/// Serves a fixed series and counts how often it is asked.
struct CountingSource {
    fetches: Cell<usize>,
    fail: bool,
}

impl CountingSource {
    fn new() -> Self {
        CountingSource {
            fetches: Cell::new(0),
            fail: false,
        }
    }

    fn failing() -> Self {
        CountingSource {
            fetches: Cell::new(0),
            fail: true,
        }
    }
}

impl StreamflowSource for CountingSource {
    async fn fetch(&self, kind: DatasetType, river_id: RiverId) -> Result<Dataset> {
        self.fetches.set(self.fetches.get() + 1);
        if self.fail {
            return Err(GlowsError::DataUnavailable {
                dataset: kind.to_string(),
                river_id: river_id.to_string(),
                reason: "offline".to_string(),
            });
        }
        if kind == DatasetType::ReturnPeriods {
            return Ok(Dataset::ReturnPeriods(
                ReturnPeriods::from_pairs([(2, 10.0), (5, 20.0)]).with_max_simulated(30.0),
            ));
        }
        let day = NaiveDate::from_ymd_opt(2024, 4, 30).unwrap();
        Ok(Dataset::Series(TimeSeries::single(
            river_id.to_string(),
            vec![(day.and_time(NaiveTime::MIN), 42.5)],
        )))
    }

    async fn global_transform(&self, _river_id: RiverId) -> Result<TransformTable> {
        Ok(TransformTable::default())
    }
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
}

#[tokio::test]
async fn test_same_day_requests_fetch_once() {
    let dir = tempfile::tempdir().unwrap();
    let cache = PlotCache::new(dir.path(), FixedClock(day(1))).unwrap();
    let source = CountingSource::new();

    let first = cache
        .get_series(&source, DatasetType::RetroDaily, RiverId(710093))
        .await
        .unwrap();
    let second = cache
        .get_series(&source, DatasetType::RetroDaily, RiverId(710093))
        .await
        .unwrap();

    assert_eq!(source.fetches.get(), 1);
    assert_eq!(first, second);
    assert!(dir.path().join("retro-daily-710093-20240501.csv").exists());
}

#[tokio::test]
async fn test_stale_file_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let old = dir.path().join("forecast-710093-20240430.csv");
    std::fs::write(&old, "time,710093\n2024-04-29 00:00:00,1\n").unwrap();

    let cache = PlotCache::new(dir.path(), FixedClock(day(1))).unwrap();
    let source = CountingSource::new();
    let series = cache
        .get_series(&source, DatasetType::Forecast, RiverId(710093))
        .await
        .unwrap();

    assert_eq!(source.fetches.get(), 1);
    assert_eq!(series.column("710093").unwrap(), &[42.5]);
    assert!(!old.exists());
    assert!(dir.path().join("forecast-710093-20240501.csv").exists());
}

#[tokio::test]
async fn test_aliases_share_one_entry() {
    let dir = tempfile::tempdir().unwrap();
    let cache = PlotCache::new(dir.path(), FixedClock(day(1))).unwrap();
    let source = CountingSource::new();

    for name in ["historical", "retro-simulation"] {
        let kind: DatasetType = name.parse().unwrap();
        cache.get(&source, kind, RiverId(5)).await.unwrap();
    }
    assert_eq!(source.fetches.get(), 1);
}

#[tokio::test]
async fn test_return_periods_survive_the_cache() {
    let dir = tempfile::tempdir().unwrap();
    let cache = PlotCache::new(dir.path(), FixedClock(day(1))).unwrap();
    let source = CountingSource::new();

    let fetched = cache.get_return_periods(&source, RiverId(9)).await.unwrap();
    let cached = cache.get_return_periods(&source, RiverId(9)).await.unwrap();
    assert_eq!(source.fetches.get(), 1);
    assert_eq!(fetched, cached);
    assert_eq!(cached.max_simulated(), Some(30.0));
}

#[tokio::test]
async fn test_upstream_failure_keeps_old_file() {
    let dir = tempfile::tempdir().unwrap();
    let old = dir.path().join("forecast-3-20240430.csv");
    std::fs::write(&old, "time,3\n2024-04-29 00:00:00,1\n").unwrap();

    let cache = PlotCache::new(dir.path(), FixedClock(day(1))).unwrap();
    let err = cache
        .get(&CountingSource::failing(), DatasetType::Forecast, RiverId(3))
        .await
        .unwrap_err();
    assert!(matches!(err, GlowsError::DataUnavailable { .. }));
    assert!(old.exists());
}

#[tokio::test]
async fn test_next_day_refetches() {
    let dir = tempfile::tempdir().unwrap();
    let source = CountingSource::new();

    let monday = PlotCache::new(dir.path(), FixedClock(day(6))).unwrap();
    monday.get(&source, DatasetType::Forecast, RiverId(1)).await.unwrap();
    let tuesday = PlotCache::new(dir.path(), FixedClock(day(7))).unwrap();
    tuesday.get(&source, DatasetType::Forecast, RiverId(1)).await.unwrap();

    assert_eq!(source.fetches.get(), 2);
    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["forecast-1-20240507.csv".to_string()]);
}
