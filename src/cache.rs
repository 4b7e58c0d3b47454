//! On-disk layout for cached market time series.
//!
//! Nothing is fetched yet; this fixes where price, dividend and metric files
//! for each ticker will live so later fetchers agree on paths.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use tracing::debug;

use crate::config::AppConfig;
use crate::error::Result;

/// Where one fund's series are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPaths {
    pub ticker: String,
    pub symbol: String,
    pub prices: PathBuf,
    pub dividends: PathBuf,
    pub metrics: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePaths {
    root: PathBuf,
}

impl CachePaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.cache_dir())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn prices_dir(&self) -> PathBuf {
        self.root.join("prices")
    }

    pub fn dividends_dir(&self) -> PathBuf {
        self.root.join("dividends")
    }

    pub fn benchmarks_dir(&self) -> PathBuf {
        self.root.join("benchmarks")
    }

    pub fn derived_dir(&self) -> PathBuf {
        self.root.join("derived")
    }

    pub fn metrics_dir(&self) -> PathBuf {
        self.root.join("metrics")
    }

    pub fn meta_dir(&self) -> PathBuf {
        self.root.join("meta")
    }

    /// Every directory created by [`ensure_dirs`](Self::ensure_dirs).
    pub fn all_dirs(&self) -> Vec<PathBuf> {
        vec![
            self.prices_dir(),
            self.dividends_dir(),
            self.benchmarks_dir(),
            self.derived_dir().join("total_return"),
            self.metrics_dir(),
            self.meta_dir(),
        ]
    }

    /// Create the cache tree. Safe to call repeatedly.
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in self.all_dirs() {
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create cache directory {}", dir.display()))?;
            debug!("Cache directory ready: {}", dir.display());
        }
        Ok(())
    }

    pub fn prices_path(&self, ticker: &str) -> PathBuf {
        self.prices_dir().join(format!("{}.parquet", ticker))
    }

    pub fn dividends_path(&self, ticker: &str) -> PathBuf {
        self.dividends_dir().join(format!("{}.parquet", ticker))
    }

    pub fn metrics_path(&self, ticker: &str) -> PathBuf {
        self.metrics_dir().join(format!("{}.json", ticker))
    }

    /// Index series drop the `^` so file names stay portable.
    pub fn benchmark_path(&self, symbol: &str) -> PathBuf {
        self.benchmarks_dir()
            .join(format!("{}.parquet", symbol.trim().trim_start_matches('^')))
    }

    pub fn series_for(&self, ticker: &str) -> SeriesPaths {
        let ticker = ticker.trim().to_uppercase();
        SeriesPaths {
            symbol: to_yahoo(&ticker),
            prices: self.prices_path(&ticker),
            dividends: self.dividends_path(&ticker),
            metrics: self.metrics_path(&ticker),
            ticker,
        }
    }
}

/// Yahoo Finance symbol for a B3 ticker. Index symbols (`^IFIX`) pass
/// through unchanged.
pub fn to_yahoo(ticker: &str) -> String {
    let ticker = ticker.trim().to_uppercase();
    if ticker.starts_with('^') {
        ticker
    } else {
        format!("{}.SA", ticker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_paths() {
        let cache = CachePaths::new("/c");
        assert_eq!(cache.prices_path("HGLG11"), PathBuf::from("/c/prices/HGLG11.parquet"));
        assert_eq!(
            cache.dividends_path("HGLG11"),
            PathBuf::from("/c/dividends/HGLG11.parquet")
        );
        assert_eq!(cache.metrics_path("HGLG11"), PathBuf::from("/c/metrics/HGLG11.json"));
    }

    #[test]
    fn test_ensure_dirs_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = CachePaths::new(tmp.path().join("cache"));
        cache.ensure_dirs().unwrap();
        cache.ensure_dirs().unwrap();
        for dir in cache.all_dirs() {
            assert!(dir.is_dir(), "{} missing", dir.display());
        }
        assert!(tmp.path().join("cache/derived/total_return").is_dir());
    }

    #[test]
    fn test_from_config_uses_cache_dir() {
        let config = AppConfig::with_data_dir("/d");
        assert_eq!(CachePaths::from_config(&config).root(), Path::new("/d/cache"));
    }

    #[test]
    fn test_to_yahoo() {
        assert_eq!(to_yahoo("hglg11"), "HGLG11.SA");
        assert_eq!(to_yahoo(" MXRF11 "), "MXRF11.SA");
        assert_eq!(to_yahoo("^ifix"), "^IFIX");
    }

    #[test]
    fn test_series_for_normalizes_ticker() {
        let cache = CachePaths::new("/c");
        let series = cache.series_for(" knri11");
        assert_eq!(series.ticker, "KNRI11");
        assert_eq!(series.symbol, "KNRI11.SA");
        assert_eq!(series.prices, PathBuf::from("/c/prices/KNRI11.parquet"));
        assert_eq!(series.metrics, PathBuf::from("/c/metrics/KNRI11.json"));
    }

    #[test]
    fn test_benchmark_path_drops_caret() {
        let cache = CachePaths::new("/c");
        assert_eq!(
            cache.benchmark_path("^IFIX"),
            PathBuf::from("/c/benchmarks/IFIX.parquet")
        );
    }
}
