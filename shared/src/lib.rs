//! Shared data types for the dairy collection tracker.
//!
//! These are the view-model objects exchanged between the presentation layer
//! and the backend services: entity snapshots, request/response structs, and
//! the closed `Session` / `AnimalType` enumerations. The presentation layer
//! holds only transient copies of these and must refresh its listings from the
//! store after every mutating call.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two daily collection slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Session {
    Morning,
    Evening,
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Session::Morning => write!(f, "Morning"),
            Session::Evening => write!(f, "Evening"),
        }
    }
}

impl FromStr for Session {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Morning" => Ok(Session::Morning),
            "Evening" => Ok(Session::Evening),
            other => Err(format!("unknown session: {}", other)),
        }
    }
}

/// Which animals a customer keeps, or which animal a collection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimalType {
    Cow,
    Buffalo,
    /// Customer keeps both; stored as `Buffalo&Cow`.
    BuffaloAndCow,
}

impl fmt::Display for AnimalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnimalType::Cow => write!(f, "Cow"),
            AnimalType::Buffalo => write!(f, "Buffalo"),
            AnimalType::BuffaloAndCow => write!(f, "Buffalo&Cow"),
        }
    }
}

impl FromStr for AnimalType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Cow" => Ok(AnimalType::Cow),
            "Buffalo" => Ok(AnimalType::Buffalo),
            "Buffalo&Cow" => Ok(AnimalType::BuffaloAndCow),
            other => Err(format!("unknown animal type: {}", other)),
        }
    }
}

/// A registered customer as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Numeric code assigned by the store on registration.
    pub code: i64,
    pub name: String,
    /// Date of joining.
    pub doj: NaiveDate,
    pub phone: String,
    pub address: String,
    pub animal_type: AnimalType,
}

/// Identity-only customer shape for selection widgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRef {
    pub code: i64,
    pub name: String,
}

/// One milk collection entry as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionRecord {
    pub id: i64,
    pub customer_code: i64,
    pub date: NaiveDate,
    pub session: Session,
    pub animal_type: AnimalType,
    pub quantity_liters: f64,
    /// Milk fat percentage, the basis for rate determination.
    pub fat: f64,
    /// Price per liter, looked up by fat percentage or entered manually.
    pub rate: f64,
    /// Derived monetary value: `quantity_liters * rate`.
    pub amount: f64,
}

/// Registration form contents for a new customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    /// Date of joining as entered, `YYYY-MM-DD`.
    pub doj: String,
    pub phone: String,
    pub address: String,
    pub animal_type: AnimalType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerResponse {
    pub customer: Customer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerListResponse {
    pub customers: Vec<Customer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRefsResponse {
    pub customers: Vec<CustomerRef>,
}

/// Collection entry form contents. Quantity, fat and rate are kept as the raw
/// text the user typed; the collection service parse-validates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionEntryRequest {
    pub customer_code: i64,
    /// Collection date as entered, `YYYY-MM-DD`.
    pub date: String,
    pub session: Session,
    pub animal_type: AnimalType,
    pub quantity: String,
    pub fat: String,
    pub rate: String,
}

/// Update of an existing entry; all fields are replaced and the amount is
/// re-derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateCollectionRequest {
    pub id: i64,
    pub entry: CollectionEntryRequest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionResponse {
    pub record: CollectionRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentCollectionsResponse {
    pub records: Vec<CollectionRecord>,
}

/// Bill query: one customer, inclusive date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillRequest {
    pub customer_code: i64,
    /// Range start as entered, `YYYY-MM-DD`.
    pub start_date: String,
    /// Range end as entered, `YYYY-MM-DD`, inclusive.
    pub end_date: String,
}

/// One line of a bill, in date order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillLine {
    pub date: NaiveDate,
    pub session: Session,
    pub animal_type: AnimalType,
    pub quantity_liters: f64,
    pub fat: f64,
    pub rate: f64,
    pub amount: f64,
}

/// Aggregated view of a customer's collections over a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillResponse {
    pub customer: CustomerRef,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub lines: Vec<BillLine>,
    /// Exact sum of line amounts; rounding happens at presentation time only.
    pub total: f64,
}

/// Outcome of writing a bill PDF to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportBillResponse {
    pub filename: String,
    pub file_path: String,
    pub line_count: usize,
}
