use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{FromRow, Sqlite, SqlitePool, migrate::MigrateDatabase};
use tracing::info;

use crate::models::Tyre;

/// A stored tyre, flattened the way the `tyres` table holds it.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct TyreRow {
    pub id: i64,
    pub website: String,
    pub name: String,
    pub brand: String,
    pub size: String,
    pub price: f64,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub tyre_type: Option<String>,
    pub wet_grip: Option<String>,
    pub fuel_efficiency: Option<String>,
    pub load_index: Option<i64>,
    pub speed_rating: Option<String>,
    pub electric: Option<bool>,
    pub self_seal: Option<bool>,
    pub run_flat: Option<bool>,
    pub noise_reduction: Option<bool>,
    pub seasonality: Option<String>,
    pub scraped_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(db_url: &str) -> Result<Self> {
        // Create database file if it doesn't exist
        if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
            info!("Creating database file");
            Sqlite::create_database(db_url).await?;
        }

        let pool = SqlitePool::connect(db_url).await?;
        Self::with_pool(pool).await
    }

    /// Private in-memory database, mainly for tests.
    pub async fn in_memory() -> Result<Self> {
        // A single connection, otherwise every pooled connection sees its own database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;

        info!("Database initialized successfully");
        Ok(Self { pool })
    }

    /// Stores a tyre, stamped with the current time as its scrape time.
    pub async fn save_tyre(&self, tyre: &Tyre) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO tyres (
                website, name, brand, size, price, type, wet_grip, fuel_efficiency,
                load_index, speed_rating, electric, self_seal, run_flat, noise_reduction,
                seasonality, scraped_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(&tyre.website)
        .bind(&tyre.name)
        .bind(&tyre.brand)
        .bind(&tyre.size)
        .bind(tyre.price)
        .bind(tyre.tyre_type.map(|t| t.as_str()))
        .bind(tyre.wet_grip.map(|g| g.as_str()))
        .bind(tyre.fuel_efficiency.map(|g| g.as_str()))
        .bind(tyre.load_index.map(i64::from))
        .bind(tyre.speed_rating.map(|s| s.as_str()))
        .bind(tyre.electric)
        .bind(tyre.self_seal)
        .bind(tyre.run_flat)
        .bind(tyre.noise_reduction)
        .bind(tyre.seasonality.map(|s| s.as_str()))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn fetch_all(&self) -> Result<Vec<TyreRow>> {
        let rows = sqlx::query_as::<_, TyreRow>("SELECT * FROM tyres ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tyres")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
