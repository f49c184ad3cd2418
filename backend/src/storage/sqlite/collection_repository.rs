use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::str::FromStr;

use crate::db::DbConnection;
use crate::error::{DomainError, DomainResult};
use shared::{AnimalType, CollectionRecord, Session};

/// Field set for an insert or full-row update of a collection entry. The
/// amount is derived by the service before it reaches the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCollection {
    pub customer_code: i64,
    pub date: NaiveDate,
    pub session: Session,
    pub animal_type: AnimalType,
    pub quantity_liters: f64,
    pub fat: f64,
    pub rate: f64,
    pub amount: f64,
}

/// Repository for milk collection rows.
#[derive(Clone)]
pub struct CollectionRepository {
    db: DbConnection,
}

impl CollectionRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Insert a new entry and return the id the store assigned. A second entry
    /// for the same (customer, date, session) is rejected by the
    /// `unique_collection` constraint and reported as `DuplicateEntry`.
    pub async fn insert(&self, fields: &NewCollection) -> DomainResult<i64> {
        let result = sqlx::query(
            r#"INSERT INTO milk_collection
               (customer_code, collection_date, session, animal_type, quantity_liters, fat, rate, amount)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(fields.customer_code)
        .bind(fields.date)
        .bind(fields.session.to_string())
        .bind(fields.animal_type.to_string())
        .bind(fields.quantity_liters)
        .bind(fields.fat)
        .bind(fields.rate)
        .bind(fields.amount)
        .execute(self.db.pool())
        .await
        .map_err(|err| translate_constraint(err, fields))?;

        Ok(result.last_insert_rowid())
    }

    /// Replace all fields of an existing entry. The uniqueness constraint is
    /// re-checked by the store, so moving an entry onto an occupied
    /// (customer, date, session) triple fails the same way a create would.
    pub async fn update(&self, id: i64, fields: &NewCollection) -> DomainResult<()> {
        let result = sqlx::query(
            r#"UPDATE milk_collection
               SET customer_code = ?, collection_date = ?, session = ?, animal_type = ?,
                   quantity_liters = ?, fat = ?, rate = ?, amount = ?
               WHERE id = ?"#,
        )
        .bind(fields.customer_code)
        .bind(fields.date)
        .bind(fields.session.to_string())
        .bind(fields.animal_type.to_string())
        .bind(fields.quantity_liters)
        .bind(fields.fat)
        .bind(fields.rate)
        .bind(fields.amount)
        .bind(id)
        .execute(self.db.pool())
        .await
        .map_err(|err| translate_constraint(err, fields))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound { entity: "collection record", id });
        }
        Ok(())
    }

    /// Delete one entry by id. Deletion is permanent.
    pub async fn delete(&self, id: i64) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM milk_collection WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound { entity: "collection record", id });
        }
        Ok(())
    }

    /// Fetch one entry by id.
    pub async fn get(&self, id: i64) -> DomainResult<Option<CollectionRecord>> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COLLECTION))
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(collection_from_row).transpose()
    }

    /// Most recent entries first, for the entry-screen table.
    pub async fn list_recent(&self, limit: u32) -> DomainResult<Vec<CollectionRecord>> {
        let rows = sqlx::query(&format!("{} ORDER BY id DESC LIMIT ?", SELECT_COLLECTION))
            .bind(limit as i64)
            .fetch_all(self.db.pool())
            .await?;

        rows.iter().map(collection_from_row).collect()
    }

    /// All entries of one customer with date in [start, end] inclusive,
    /// ordered by date.
    pub async fn query_range(
        &self,
        customer_code: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<Vec<CollectionRecord>> {
        let rows = sqlx::query(&format!(
            "{} WHERE customer_code = ? AND collection_date BETWEEN ? AND ? ORDER BY collection_date, id",
            SELECT_COLLECTION
        ))
        .bind(customer_code)
        .bind(start)
        .bind(end)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(collection_from_row).collect()
    }
}

const SELECT_COLLECTION: &str = "SELECT id, customer_code, collection_date, session, animal_type, \
     quantity_liters, fat, rate, amount FROM milk_collection";

fn translate_constraint(err: sqlx::Error, fields: &NewCollection) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return DomainError::DuplicateEntry {
                customer_code: fields.customer_code,
                date: fields.date,
                session: fields.session,
            };
        }
        if db_err.is_foreign_key_violation() {
            return DomainError::NotFound {
                entity: "customer",
                id: fields.customer_code,
            };
        }
    }
    err.into()
}

fn collection_from_row(row: &SqliteRow) -> DomainResult<CollectionRecord> {
    let session: String = row.try_get("session")?;
    let animal_type: String = row.try_get("animal_type")?;

    Ok(CollectionRecord {
        id: row.try_get("id")?,
        customer_code: row.try_get("customer_code")?,
        date: row.try_get("collection_date")?,
        session: Session::from_str(&session)
            .map_err(|reason| DomainError::StoreUnavailable { reason })?,
        animal_type: AnimalType::from_str(&animal_type)
            .map_err(|reason| DomainError::StoreUnavailable { reason })?,
        quantity_liters: row.try_get("quantity_liters")?,
        fat: row.try_get("fat")?,
        rate: row.try_get("rate")?,
        amount: row.try_get("amount")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sqlite::CustomerRepository;

    async fn setup_test() -> (CollectionRepository, i64) {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let customers = CustomerRepository::new(db.clone());
        let code = customers
            .insert(
                "Ravi",
                NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
                "",
                "",
                AnimalType::Cow,
            )
            .await
            .unwrap();
        (CollectionRepository::new(db), code)
    }

    fn entry(code: i64, date: NaiveDate, session: Session) -> NewCollection {
        NewCollection {
            customer_code: code,
            date,
            session,
            animal_type: AnimalType::Cow,
            quantity_liters: 10.0,
            fat: 4.0,
            rate: 40.0,
            amount: 400.0,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_round_trip() {
        let (repo, code) = setup_test().await;
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let id = repo.insert(&entry(code, date, Session::Morning)).await.unwrap();
        let stored = repo.get(id).await.unwrap().unwrap();

        assert_eq!(stored.customer_code, code);
        assert_eq!(stored.date, date);
        assert_eq!(stored.session, Session::Morning);
        assert_eq!(stored.amount, 400.0);
    }

    #[tokio::test]
    async fn test_duplicate_triple_is_translated() {
        let (repo, code) = setup_test().await;
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        repo.insert(&entry(code, date, Session::Morning)).await.unwrap();
        let err = repo.insert(&entry(code, date, Session::Morning)).await.unwrap_err();

        match err {
            DomainError::DuplicateEntry { customer_code, date: d, session } => {
                assert_eq!(customer_code, code);
                assert_eq!(d, date);
                assert_eq!(session, Session::Morning);
            }
            other => panic!("expected DuplicateEntry, got {:?}", other),
        }

        // The evening slot on the same day is still free.
        repo.insert(&entry(code, date, Session::Evening)).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_onto_occupied_triple_is_duplicate() {
        let (repo, code) = setup_test().await;
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        repo.insert(&entry(code, date, Session::Morning)).await.unwrap();
        let evening_id = repo.insert(&entry(code, date, Session::Evening)).await.unwrap();

        let err = repo
            .update(evening_id, &entry(code, date, Session::Morning))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateEntry { .. }));
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_id() {
        let (repo, code) = setup_test().await;
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let err = repo.update(99, &entry(code, date, Session::Morning)).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "collection record", id: 99 }));

        let err = repo.delete(99).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "collection record", id: 99 }));
    }

    #[tokio::test]
    async fn test_delete_removes_exactly_one_row() {
        let (repo, code) = setup_test().await;
        let day1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let day2 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();

        let id1 = repo.insert(&entry(code, day1, Session::Morning)).await.unwrap();
        let id2 = repo.insert(&entry(code, day2, Session::Morning)).await.unwrap();

        repo.delete(id1).await.unwrap();

        assert!(repo.get(id1).await.unwrap().is_none());
        assert!(repo.get(id2).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_list_recent_is_newest_first_and_limited() {
        let (repo, code) = setup_test().await;

        for day in 1..=5 {
            let date = NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
            repo.insert(&entry(code, date, Session::Morning)).await.unwrap();
        }

        let recent = repo.list_recent(3).await.unwrap();
        assert_eq!(recent.len(), 3);
        assert!(recent.windows(2).all(|w| w[0].id > w[1].id));
    }

    #[tokio::test]
    async fn test_query_range_is_inclusive_and_date_ordered() {
        let (repo, code) = setup_test().await;
        let jan1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let jan15 = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let jan31 = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let feb1 = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();

        // Inserted out of date order on purpose.
        repo.insert(&entry(code, jan31, Session::Morning)).await.unwrap();
        repo.insert(&entry(code, jan1, Session::Morning)).await.unwrap();
        repo.insert(&entry(code, jan15, Session::Morning)).await.unwrap();
        repo.insert(&entry(code, feb1, Session::Morning)).await.unwrap();

        let rows = repo.query_range(code, jan1, jan31).await.unwrap();
        let dates: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![jan1, jan15, jan31]);
    }
}
