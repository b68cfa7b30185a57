//! SQLite-backed ticket store.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use ticket_core::{Ticket, TicketId};

use crate::error::{Result, StoreError};
use crate::models::TicketRow;
use crate::{not_found, TicketStore};

/// Ticket store on a SQLite connection pool.
#[derive(Debug, Clone)]
pub struct SqliteTicketStore {
    pool: SqlitePool,
}

impl SqliteTicketStore {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 10;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> ticket_store::Result<()> {
    /// // File database
    /// let store = ticket_store::SqliteTicketStore::connect("sqlite:data/landtena.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing, use a single connection)
    /// let store = ticket_store::SqliteTicketStore::connect_with_pool_size("sqlite::memory:", 1).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to ticket database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running ticket store migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn stored_version(&self, id: &TicketId) -> Result<Option<u64>> {
        let version = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT version FROM tickets WHERE id = ?
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(version.map(|v| v as u64))
    }
}

#[async_trait]
impl TicketStore for SqliteTicketStore {
    async fn insert(&self, ticket: &Ticket) -> Result<()> {
        let row = TicketRow::from_ticket(ticket)?;

        sqlx::query(
            r#"
            INSERT INTO tickets (id, version, status, created_by, assigned_to, contractor_email, data)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&row.id)
        .bind(row.version)
        .bind(&row.status)
        .bind(&row.created_by)
        .bind(&row.assigned_to)
        .bind(&row.contractor_email)
        .bind(&row.data)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_unique_violation() {
                    return StoreError::AlreadyExists {
                        entity: "Ticket",
                        id: row.id.clone(),
                    };
                }
            }
            StoreError::Sqlx(e)
        })?;

        Ok(())
    }

    async fn get(&self, id: &TicketId) -> Result<Ticket> {
        sqlx::query_as::<_, TicketRow>(
            r#"
            SELECT id, version, status, created_by, assigned_to, contractor_email, data
            FROM tickets
            WHERE id = ?
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found(id))?
        .into_ticket()
    }

    async fn list(&self) -> Result<Vec<Ticket>> {
        let rows = sqlx::query_as::<_, TicketRow>(
            r#"
            SELECT id, version, status, created_by, assigned_to, contractor_email, data
            FROM tickets
            ORDER BY seq
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TicketRow::into_ticket).collect()
    }

    async fn replace(&self, ticket: &Ticket, expected_version: u64) -> Result<()> {
        let row = TicketRow::from_ticket(ticket)?;

        let result = sqlx::query(
            r#"
            UPDATE tickets
            SET version = ?, status = ?, assigned_to = ?, contractor_email = ?, data = ?,
                updated_at = datetime('now')
            WHERE id = ? AND version = ?
            "#,
        )
        .bind(row.version)
        .bind(&row.status)
        .bind(&row.assigned_to)
        .bind(&row.contractor_email)
        .bind(&row.data)
        .bind(&row.id)
        .bind(expected_version as i64)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return match self.stored_version(&ticket.id).await? {
                Some(found) => Err(StoreError::VersionConflict {
                    id: row.id,
                    expected: expected_version,
                    found,
                }),
                None => Err(not_found(&ticket.id)),
            };
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}
