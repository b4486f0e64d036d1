//! Pool History Dataset
//!
//! One JSON object per line, one line per block:
//!
//! ```text
//! {"block":276000000,"timestamp":1731888000,"sqrt_price":1.2e-2,"liquidity":3.1e18}
//! ```
//!
//! Files live at `{dataset_dir}/{pool}_data.jsonl` where `pool` is the
//! lower-cased address without its `0x` / `\x` prefix. The loader returns the
//! two aligned sequences the engine consumes.

use chrono::{NaiveDate, NaiveTime};
use eyre::{eyre, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Date format used on the command line and in config files
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Last observed pool state within one block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoolRecord {
    pub block: u64,
    /// Unix seconds
    pub timestamp: i64,
    pub sqrt_price: f64,
    pub liquidity: f64,
}

/// `0xC696...` / `\xc696...` -> `c696...`
pub fn normalize_pool_address(address: &str) -> String {
    address.replace("0x", "").replace("\\x", "").to_lowercase()
}

pub fn dataset_path<P: AsRef<Path>>(dataset_dir: P, pool_address: &str) -> PathBuf {
    dataset_dir
        .as_ref()
        .join(format!("{}_data.jsonl", normalize_pool_address(pool_address)))
}

/// Parse a `DD-MM-YYYY` date into unix seconds at 00:00 UTC
pub fn parse_date_start(date: &str) -> Result<i64> {
    let day = NaiveDate::parse_from_str(date, DATE_FORMAT)
        .wrap_err_with(|| format!("Invalid date '{}' (expected DD-MM-YYYY)", date))?;
    Ok(day.and_time(NaiveTime::MIN).and_utc().timestamp())
}

/// Ordered per-block history of one pool
#[derive(Debug, Clone, PartialEq)]
pub struct PoolSeries {
    pub pool: String,
    pub records: Vec<PoolRecord>,
}

impl PoolSeries {
    pub fn new(pool: &str, records: Vec<PoolRecord>) -> Self {
        Self {
            pool: normalize_pool_address(pool),
            records,
        }
    }

    /// Load `{dataset_dir}/{pool}_data.jsonl`
    pub fn load<P: AsRef<Path>>(dataset_dir: P, pool_address: &str) -> Result<Self> {
        let path = dataset_path(dataset_dir, pool_address);
        let file = fs::File::open(&path)
            .wrap_err_with(|| format!("Failed to open dataset {}", path.display()))?;

        let series = Self::from_reader(pool_address, BufReader::new(file))
            .wrap_err_with(|| format!("Failed to read dataset {}", path.display()))?;
        info!("Loaded {} records from {}", series.len(), path.display());
        Ok(series)
    }

    /// Parse JSON Lines; blank lines are skipped
    pub fn from_reader<R: BufRead>(pool_address: &str, reader: R) -> Result<Self> {
        let mut records = Vec::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let record: PoolRecord = serde_json::from_str(line)
                .wrap_err_with(|| format!("Bad record on line {}", line_no + 1))?;
            records.push(record);
        }
        Ok(Self::new(pool_address, records))
    }

    /// Write as JSON Lines, creating parent directories
    pub fn write_jsonl<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = BufWriter::new(fs::File::create(path.as_ref())?);
        for record in &self.records {
            serde_json::to_writer(&mut out, record)?;
            writeln!(out)?;
        }
        out.flush()?;
        Ok(())
    }

    /// Keep records with `start 00:00 UTC <= timestamp <= end 00:00 UTC`
    pub fn filter_dates(self, date_start: &str, date_end: &str) -> Result<Self> {
        let ts_start = parse_date_start(date_start)?;
        let ts_end = parse_date_start(date_end)?;
        if ts_start > ts_end {
            return Err(eyre!(
                "Date range is reversed: {} is after {}",
                date_start,
                date_end
            ));
        }

        let total = self.records.len();
        let records: Vec<PoolRecord> = self
            .records
            .into_iter()
            .filter(|r| r.timestamp >= ts_start && r.timestamp <= ts_end)
            .collect();

        match (records.first(), records.last()) {
            (Some(first), Some(last)) => {
                info!("Block range: {} to {}", first.block, last.block)
            }
            _ => return Err(eyre!("No records between {} and {}", date_start, date_end)),
        }
        debug!("Date filter kept {}/{} records", records.len(), total);

        Ok(Self {
            pool: self.pool,
            records,
        })
    }

    /// Enforce the engine's input contract and block ordering
    pub fn validate(&self) -> Result<()> {
        if self.records.len() < 2 {
            return Err(eyre!(
                "Need at least 2 records to simulate, got {}",
                self.records.len()
            ));
        }
        for (i, pair) in self.records.windows(2).enumerate() {
            if pair[1].block <= pair[0].block {
                return Err(eyre!(
                    "Blocks out of order at record {}: {} after {}",
                    i + 1,
                    pair[1].block,
                    pair[0].block
                ));
            }
        }
        for (i, r) in self.records.iter().enumerate() {
            if !(r.sqrt_price.is_finite() && r.sqrt_price > 0.0) {
                return Err(eyre!("Record {} (block {}) has sqrt_price {}", i, r.block, r.sqrt_price));
            }
            if !(r.liquidity.is_finite() && r.liquidity >= 0.0) {
                return Err(eyre!("Record {} (block {}) has liquidity {}", i, r.block, r.liquidity));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn sqrt_prices(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.sqrt_price).collect()
    }

    pub fn liquidities(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.liquidity).collect()
    }

    pub fn block_range(&self) -> Option<(u64, u64)> {
        Some((self.records.first()?.block, self.records.last()?.block))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const DAY: i64 = 86_400;
    // 18-11-2025 00:00 UTC
    const NOV_18: i64 = 1_763_424_000;

    fn record(block: u64, timestamp: i64) -> PoolRecord {
        PoolRecord {
            block,
            timestamp,
            sqrt_price: 1.0 + block as f64 * 1e-4,
            liquidity: 1e18,
        }
    }

    #[test]
    fn test_normalize_pool_address() {
        assert_eq!(
            normalize_pool_address("0xC6962004f452bE9203591991D15f6b388e09E8D0"),
            "c6962004f452be9203591991d15f6b388e09e8d0"
        );
        assert_eq!(normalize_pool_address("\\xABCD"), "abcd");
    }

    #[test]
    fn test_dataset_path() {
        let path = dataset_path("dataset", "0xAbC");
        assert_eq!(path, PathBuf::from("dataset/abc_data.jsonl"));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date_start("18-11-2025").unwrap(), NOV_18);
        assert!(parse_date_start("2025-11-18").is_err());
        assert!(parse_date_start("31-02-2025").is_err());
    }

    #[test]
    fn test_from_reader_skips_blank_lines() {
        let data = "\
{\"block\":1,\"timestamp\":10,\"sqrt_price\":1.5,\"liquidity\":2.0}

{\"block\":2,\"timestamp\":22,\"sqrt_price\":1.6,\"liquidity\":0.0}
";
        let series = PoolSeries::from_reader("0xAA", Cursor::new(data)).unwrap();
        assert_eq!(series.pool, "aa");
        assert_eq!(series.len(), 2);
        assert_eq!(series.sqrt_prices(), vec![1.5, 1.6]);
        assert_eq!(series.liquidities(), vec![2.0, 0.0]);
    }

    #[test]
    fn test_from_reader_reports_bad_line() {
        let data = "{\"block\":1,\"timestamp\":10,\"sqrt_price\":1.5,\"liquidity\":2.0}\nnot json\n";
        let err = PoolSeries::from_reader("aa", Cursor::new(data)).unwrap_err();
        assert!(format!("{}", err).contains("line 2"));
    }

    #[test]
    fn test_filter_dates_inclusive_bounds() {
        let records = vec![
            record(1, NOV_18 - 1),
            record(2, NOV_18),
            record(3, NOV_18 + DAY / 2),
            record(4, NOV_18 + DAY),
            record(5, NOV_18 + DAY + 1),
        ];
        let series = PoolSeries::new("aa", records)
            .filter_dates("18-11-2025", "19-11-2025")
            .unwrap();

        let blocks: Vec<u64> = series.records.iter().map(|r| r.block).collect();
        assert_eq!(blocks, vec![2, 3, 4]);
        assert_eq!(series.block_range(), Some((2, 4)));
    }

    #[test]
    fn test_filter_dates_rejects_empty_and_reversed() {
        let series = PoolSeries::new("aa", vec![record(1, NOV_18)]);
        assert!(series.clone().filter_dates("01-01-2024", "02-01-2024").is_err());
        assert!(series.filter_dates("19-11-2025", "18-11-2025").is_err());
    }

    #[test]
    fn test_validate() {
        let good = PoolSeries::new("aa", vec![record(1, 0), record(2, 1)]);
        assert!(good.validate().is_ok());

        let short = PoolSeries::new("aa", vec![record(1, 0)]);
        assert!(short.validate().is_err());

        let unordered = PoolSeries::new("aa", vec![record(2, 0), record(1, 1)]);
        assert!(unordered.validate().is_err());

        let mut bad = record(3, 2);
        bad.sqrt_price = 0.0;
        let zero_price = PoolSeries::new("aa", vec![record(1, 0), bad]);
        assert!(zero_price.validate().is_err());

        let mut bad = record(3, 2);
        bad.liquidity = f64::NAN;
        let nan_liq = PoolSeries::new("aa", vec![record(1, 0), bad]);
        assert!(nan_liq.validate().is_err());
    }

    #[test]
    fn test_write_then_load() {
        let dir = std::env::temp_dir().join(format!("toxicity-dataset-{}", std::process::id()));
        let series = PoolSeries::new("0xBeef", vec![record(7, 70), record(8, 80)]);

        series.write_jsonl(dataset_path(&dir, "0xBeef")).unwrap();
        let loaded = PoolSeries::load(&dir, "0xBEEF").unwrap();
        assert_eq!(loaded, series);

        fs::remove_dir_all(&dir).ok();
    }
}
