//! Daily file cache for GEOGLOWS datasets.
//!
//! One CSV file per `(dataset, river)` named `{dataset}-{river_id}-{YYYYMMDD}.csv`.
//! A file stamped with today's (UTC) date is served from disk; anything older
//! triggers one upstream fetch, after which the superseded files are deleted.
//!
//! Concurrent cold-cache requests for the same key are not serialized. Each
//! caller fetches and writes the same file name, and any leftover stale files
//! are removed by the next refresh or by [`PlotCache::prune`].

pub mod clock;

pub use clock::{Clock, FixedClock, SystemClock};

use chrono::NaiveDate;
use glows_core::{
    Dataset, DatasetType, Result, ReturnPeriods, RiverId, StreamflowSource, TimeSeries,
};
use glows_utils::dates::{format_stamp, parse_stamp};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Default cache directory name, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = "geoglows_plots_cache";

const EXTENSION: &str = ".csv";

/// A cache file found on disk for one key.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    stamp: Option<NaiveDate>,
    path: PathBuf,
}

/// Handle on a cache directory with an injected clock.
#[derive(Debug, Clone)]
pub struct PlotCache<C: Clock = SystemClock> {
    dir: PathBuf,
    clock: C,
}

impl<C: Clock> PlotCache<C> {
    /// Open (creating if needed) the cache directory.
    pub fn new(dir: impl Into<PathBuf>, clock: C) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(PlotCache { dir, clock })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// File name for a key on a given day.
    pub fn file_name(kind: DatasetType, river_id: RiverId, day: &NaiveDate) -> String {
        format!("{}{}{}", key_prefix(kind, river_id), format_stamp(day), EXTENSION)
    }

    /// Freshest dataset for the key, fetching from `source` at most once per day.
    pub async fn get<S: StreamflowSource>(
        &self,
        source: &S,
        kind: DatasetType,
        river_id: RiverId,
    ) -> Result<Dataset> {
        let today = self.clock.today();
        let entries = self.entries(kind, river_id)?;

        if let Some(fresh) = entries.iter().find(|e| e.stamp == Some(today)) {
            match self.load(kind, &fresh.path) {
                Ok(dataset) => {
                    debug!("Cache hit for {} of river {}", kind, river_id);
                    return Ok(dataset);
                }
                Err(e) => warn!(
                    "Discarding unreadable cache file {}: {}",
                    fresh.path.display(),
                    e
                ),
            }
        }

        info!("Cache miss for {} of river {}, fetching", kind, river_id);
        let dataset = source.fetch(kind, river_id).await?;

        let path = self.dir.join(Self::file_name(kind, river_id, &today));
        fs::write(&path, dataset.to_csv(&river_id.to_string())?)?;
        debug!("Wrote {}", path.display());

        for stale in entries.iter().filter(|e| e.path != path) {
            remove_file(&stale.path);
        }
        Ok(dataset)
    }

    pub async fn get_series<S: StreamflowSource>(
        &self,
        source: &S,
        kind: DatasetType,
        river_id: RiverId,
    ) -> Result<TimeSeries> {
        self.get(source, kind, river_id).await?.into_series()
    }

    pub async fn get_return_periods<S: StreamflowSource>(
        &self,
        source: &S,
        river_id: RiverId,
    ) -> Result<ReturnPeriods> {
        self.get(source, DatasetType::ReturnPeriods, river_id)
            .await?
            .into_return_periods()
    }

    /// Delete every cache file not stamped today; returns how many went.
    pub fn prune(&self) -> Result<usize> {
        let today = self.clock.today();
        let mut removed = 0;
        for dir_entry in fs::read_dir(&self.dir)? {
            let path = dir_entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(stem) = name.strip_suffix(EXTENSION) else {
                continue;
            };
            let stamp = stem.rsplit('-').next().and_then(|s| parse_stamp(s).ok());
            if stamp != Some(today) && remove_file(&path) {
                removed += 1;
            }
        }
        info!("Pruned {} stale cache files from {}", removed, self.dir.display());
        Ok(removed)
    }

    /// Files belonging to exactly this key, newest stamp first.
    fn entries(&self, kind: DatasetType, river_id: RiverId) -> Result<Vec<Entry>> {
        let prefix = key_prefix(kind, river_id);
        let mut entries = Vec::new();
        for dir_entry in fs::read_dir(&self.dir)? {
            let path = dir_entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(rest) = name.strip_prefix(&prefix) else {
                continue;
            };
            let Some(stamp) = rest.strip_suffix(EXTENSION) else {
                continue;
            };
            // river 12 must not pick up "forecast-12-3-..." style names
            if !stamp.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            entries.push(Entry {
                stamp: parse_stamp(stamp).ok(),
                path,
            });
        }
        entries.sort_by(|a, b| b.stamp.cmp(&a.stamp));
        Ok(entries)
    }

    fn load(&self, kind: DatasetType, path: &Path) -> Result<Dataset> {
        let data = fs::read_to_string(path)?;
        Dataset::from_csv(kind, &data)
    }
}

fn key_prefix(kind: DatasetType, river_id: RiverId) -> String {
    format!("{}-{}-", kind.as_str(), river_id)
}

fn remove_file(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed stale cache file {}", path.display());
            true
        }
        Err(e) => {
            warn!("Failed to remove {}: {}", path.display(), e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(
            PlotCache::<FixedClock>::file_name(DatasetType::ForecastStats, RiverId(710093), &day),
            "forecast-stats-710093-20240501.csv"
        );
    }

    #[test]
    fn test_entries_match_exact_key() {
        let dir = tempfile::tempdir().unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let cache = PlotCache::new(dir.path(), FixedClock(day)).unwrap();
        for name in [
            "forecast-123-20240501.csv",
            "forecast-1234-20240501.csv",
            "forecast-stats-123-20240501.csv",
            "forecast-123-20240430.csv",
            "notes.txt",
        ] {
            fs::write(dir.path().join(name), "x").unwrap();
        }
        let entries = cache.entries(DatasetType::Forecast, RiverId(123)).unwrap();
        let stamps: Vec<_> = entries.iter().map(|e| e.stamp).collect();
        assert_eq!(
            stamps,
            vec![Some(day), NaiveDate::from_ymd_opt(2024, 4, 30)]
        );
    }

    #[test]
    fn test_prune_keeps_today() {
        let dir = tempfile::tempdir().unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let cache = PlotCache::new(dir.path(), FixedClock(day)).unwrap();
        fs::write(dir.path().join("forecast-1-20240501.csv"), "x").unwrap();
        fs::write(dir.path().join("forecast-1-20240430.csv"), "x").unwrap();
        fs::write(dir.path().join("retro-daily-2-20231231.csv"), "x").unwrap();
        assert_eq!(cache.prune().unwrap(), 2);
        assert!(dir.path().join("forecast-1-20240501.csv").exists());
    }
}
