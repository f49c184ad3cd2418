use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::str::FromStr;

use crate::db::DbConnection;
use crate::error::{DomainError, DomainResult};
use shared::{AnimalType, Customer, CustomerRef};

/// Repository for customer rows. Customers are created by registration and
/// never deleted or updated by this system.
#[derive(Clone)]
pub struct CustomerRepository {
    db: DbConnection,
}

impl CustomerRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Insert a new customer and return the code the store assigned.
    pub async fn insert(
        &self,
        name: &str,
        doj: NaiveDate,
        phone: &str,
        address: &str,
        animal_type: AnimalType,
    ) -> DomainResult<i64> {
        let result = sqlx::query(
            "INSERT INTO customers (name, doj, phone, address, animal_type) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(name)
        .bind(doj)
        .bind(phone)
        .bind(address)
        .bind(animal_type.to_string())
        .execute(self.db.pool())
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Fetch one customer by code.
    pub async fn get(&self, code: i64) -> DomainResult<Option<Customer>> {
        let row = sqlx::query(
            "SELECT code, name, doj, phone, address, animal_type FROM customers WHERE code = ?",
        )
        .bind(code)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(customer_from_row).transpose()
    }

    /// Full-attribute listing for the customer directory, ordered by code.
    pub async fn list(&self) -> DomainResult<Vec<Customer>> {
        let rows = sqlx::query(
            "SELECT code, name, doj, phone, address, animal_type FROM customers ORDER BY code",
        )
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(customer_from_row).collect()
    }

    /// Identity-only listing for selection widgets, ordered by code.
    pub async fn list_refs(&self) -> DomainResult<Vec<CustomerRef>> {
        let rows = sqlx::query("SELECT code, name FROM customers ORDER BY code")
            .fetch_all(self.db.pool())
            .await?;

        rows.iter()
            .map(|row| {
                Ok(CustomerRef {
                    code: row.try_get("code")?,
                    name: row.try_get("name")?,
                })
            })
            .collect()
    }
}

fn customer_from_row(row: &SqliteRow) -> DomainResult<Customer> {
    let animal_type: String = row.try_get("animal_type")?;

    Ok(Customer {
        code: row.try_get("code")?,
        name: row.try_get("name")?,
        doj: row.try_get("doj")?,
        phone: row.try_get("phone")?,
        address: row.try_get("address")?,
        animal_type: AnimalType::from_str(&animal_type)
            .map_err(|reason| DomainError::StoreUnavailable { reason })?,
    })
}
