//! Fat-percentage to rate-per-liter lookup.
//!
//! Loaded once at startup from a CSV file with named `Fat` and `Rate` columns.
//! A missing file is non-fatal: the table stays empty and the operator enters
//! rates manually.

use anyhow::{Context, Result};
use log::{info, warn};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RateRow {
    #[serde(rename = "Fat")]
    fat: f64,
    #[serde(rename = "Rate")]
    rate: f64,
}

/// Immutable fat → rate mapping, keyed by fat in integer tenths of a percent.
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    rates: HashMap<i64, f64>,
}

impl RateTable {
    /// An empty table; every lookup falls back to manual rate entry.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the table from a CSV source. A missing file yields an empty table
    /// with a warning; a present but malformed file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(
                "Rate table {} not found; rates must be entered manually",
                path.display()
            );
            return Ok(Self::empty());
        }

        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("Failed to open rate table {}", path.display()))?;

        let mut rates = HashMap::new();
        for row in reader.deserialize() {
            let row: RateRow =
                row.with_context(|| format!("Malformed row in rate table {}", path.display()))?;
            rates.insert(fat_key(row.fat), row.rate);
        }

        info!("Loaded {} rates from {}", rates.len(), path.display());
        Ok(Self { rates })
    }

    /// Look up the rate for a fat percentage, rounding half-up to one decimal
    /// first. `None` means the caller must accept a manually entered rate.
    pub fn lookup(&self, fat: f64) -> Option<f64> {
        self.rates.get(&fat_key(fat)).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }
}

/// Round a fat percentage half-up to one decimal, as integer tenths. The
/// epsilon absorbs decimal halves that sit just below .5 in binary (4.55 is
/// stored as 4.5499…, but must round to 4.6).
fn fat_key(fat: f64) -> i64 {
    (fat * 10.0 + 0.5 + 1e-6).floor() as i64
}
