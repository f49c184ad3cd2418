//! # Dairy Tracker Backend
//!
//! Non-presentation core of the dairy collection tracker: the SQLite store,
//! the domain services (customers, collection entries, billing), the fat→rate
//! lookup table, and the bill PDF export. The presentation layer is the sole
//! caller of these services and must refresh its cached listings after every
//! mutating call.

use anyhow::Result;
use log::error;
use std::path::PathBuf;

pub mod db;
pub mod domain;
pub mod error;
pub mod storage;

pub use db::DbConnection;
pub use error::{DomainError, DomainResult};

use domain::{BillingService, CollectionService, CustomerService, ExportService, RateTable};

/// Startup configuration for the backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub database_url: String,
    /// CSV source for the fat→rate table; missing is non-fatal.
    pub rate_table_path: PathBuf,
    /// Directory containing the TTF font family used for bill PDFs.
    pub fonts_dir: PathBuf,
    /// Directory bill PDFs are written into.
    pub export_dir: PathBuf,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:dairy.db".to_string(),
            rate_table_path: PathBuf::from("fat_rate.csv"),
            fonts_dir: PathBuf::from("./fonts"),
            export_dir: PathBuf::from("."),
        }
    }
}

/// Main backend struct that orchestrates all services
pub struct Backend {
    pub customer_service: CustomerService,
    pub collection_service: CollectionService,
    pub billing_service: BillingService,
    pub export_service: ExportService,
    pub rate_table: RateTable,
}

impl Backend {
    /// Create a new backend instance with all services wired over one
    /// connection. The rate table is loaded once here; an absent source file
    /// leaves it empty and rates are entered manually.
    pub async fn new(config: BackendConfig) -> Result<Self> {
        let db = DbConnection::new(&config.database_url).await?;
        let rate_table = RateTable::load(&config.rate_table_path).unwrap_or_else(|e| {
            error!("Could not load rate table: {:#}; continuing with manual rate entry", e);
            RateTable::empty()
        });

        Ok(Backend {
            customer_service: CustomerService::new(db.clone()),
            collection_service: CollectionService::new(db.clone()),
            billing_service: BillingService::new(db),
            export_service: ExportService::new(config.fonts_dir, config.export_dir),
            rate_table,
        })
    }
}
