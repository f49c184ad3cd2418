//! Domain services: the business-rule layer between the presentation forms
//! and the storage repositories.

pub mod billing_service;
pub mod collection_service;
pub mod customer_service;
pub mod export_service;
pub mod rate_table;
pub mod validation;

pub use billing_service::BillingService;
pub use collection_service::CollectionService;
pub use customer_service::CustomerService;
pub use export_service::{BillLayout, ExportService};
pub use rate_table::RateTable;
