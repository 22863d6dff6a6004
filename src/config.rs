//! Command-line configuration.
//!
//! Every option can also come from a `STOREFRONT_*` environment variable.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use crate::catalog;
use crate::feed;
use crate::loader;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Directory for the store and the log file.
    #[arg(long, env = "STOREFRONT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Number of generated catalog products.
    #[arg(long, env = "STOREFRONT_CATALOG_SIZE", default_value_t = catalog::DEFAULT_SIZE)]
    pub catalog_size: usize,

    /// Products per page.
    #[arg(long, env = "STOREFRONT_PAGE_SIZE", default_value_t = feed::DEFAULT_PAGE_SIZE, value_parser = parse_page_size)]
    pub page_size: usize,

    /// Catalog seed; random when omitted.
    #[arg(long, env = "STOREFRONT_SEED")]
    pub seed: Option<u64>,

    /// Simulated page latency in milliseconds.
    #[arg(long, env = "STOREFRONT_LATENCY_MS", default_value_t = loader::DEFAULT_LATENCY.as_millis() as u64)]
    pub latency_ms: u64,

    /// Rows from the end of the list at which the next page is requested.
    /// Kept below the page size.
    #[arg(long, env = "STOREFRONT_PREFETCH", default_value_t = 5)]
    pub prefetch: usize,
}

fn parse_page_size(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("page size must be at least 1".into()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

/// Resolved settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub catalog_size: usize,
    pub page_size: usize,
    pub seed: u64,
    pub latency: Duration,
    pub prefetch: usize,
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self> {
        let data_dir = match args.data_dir {
            Some(dir) => dir,
            None => dirs::data_dir()
                .or_else(dirs::home_dir)
                .context("could not determine a data directory; pass --data-dir")?
                .join("storefront"),
        };

        Ok(Self {
            data_dir,
            catalog_size: args.catalog_size,
            page_size: args.page_size,
            seed: args.seed.unwrap_or_else(rand::random),
            latency: Duration::from_millis(args.latency_ms),
            prefetch: args.prefetch.min(args.page_size - 1),
        })
    }

    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join("store.json")
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("storefront.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_feed_constants() {
        let args = Args::try_parse_from(["storefront", "--data-dir", "/tmp/sf", "--seed", "4"]).unwrap();
        let config = Config::from_args(args).unwrap();

        assert_eq!(config.catalog_size, 10_000);
        assert_eq!(config.page_size, 20);
        assert_eq!(config.latency, Duration::from_millis(500));
        assert_eq!(config.seed, 4);
        assert_eq!(config.store_path(), PathBuf::from("/tmp/sf/store.json"));
    }

    #[test]
    fn prefetch_is_clamped_below_page_size() {
        let args = Args::try_parse_from([
            "storefront", "--data-dir", "/tmp/sf", "--page-size", "10", "--prefetch", "50",
        ])
        .unwrap();
        assert_eq!(Config::from_args(args).unwrap().prefetch, 9);

        let args = Args::try_parse_from(["storefront", "--data-dir", "/tmp/sf", "--page-size", "1"]).unwrap();
        assert_eq!(Config::from_args(args).unwrap().prefetch, 0);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert!(Args::try_parse_from(["storefront", "--page-size", "0"]).is_err());
    }
}
