use anyhow::Result;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::sync::Arc;

// The database URL for the production database
const DATABASE_URL: &str = "sqlite:dairy.db";

/// DbConnection manages database operations
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection
    pub async fn new(url: &str) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?
        }

        // Connect to the database
        let pool = SqlitePool::connect(url).await?;

        // Setup database schema
        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize the standard database
    pub async fn init() -> Result<Self> {
        Self::new(DATABASE_URL).await
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        // Generate a unique database name for tests
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query("PRAGMA foreign_keys = ON;").execute(pool).await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS customers (
                code INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                doj TEXT NOT NULL,
                phone TEXT NOT NULL DEFAULT '',
                address TEXT NOT NULL DEFAULT '',
                animal_type TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        // One entry per (customer, date, session); the UNIQUE constraint is
        // the authority, not any read-before-write in the services.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS milk_collection (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                customer_code INTEGER NOT NULL REFERENCES customers(code),
                collection_date TEXT NOT NULL,
                session TEXT NOT NULL,
                animal_type TEXT NOT NULL,
                quantity_liters REAL NOT NULL,
                fat REAL NOT NULL,
                rate REAL NOT NULL,
                amount REAL NOT NULL,
                CONSTRAINT unique_collection UNIQUE (customer_code, collection_date, session)
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Get the underlying SQLite pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
