//! services/tracker/src/adapters/db.rs
//!
//! This module contains the local store adapter, which is the concrete implementation
//! of the `LocalStore` port from the `core` crate. It keeps both tables in a
//! single SQLite file using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, SqlitePool};
use std::str::FromStr;
use study_os_core::domain::{AppState, User};
use study_os_core::ports::{LocalStore, PortError, PortResult};
use tracing::{debug, info};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A store adapter that implements the `LocalStore` port.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    const DEFAULT_POOL_SIZE: u32 = 5;

    /// Opens the database at `url`, creating the file if needed. In-memory
    /// databases get a single connection that is never recycled, so every
    /// query sees the same data.
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let in_memory = url.contains(":memory:");
        let pool_size = if in_memory { 1 } else { Self::DEFAULT_POOL_SIZE };

        let mut pool_options = SqlitePoolOptions::new().max_connections(pool_size);
        if in_memory {
            // The database lives and dies with its one connection.
            pool_options = pool_options
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }
        let pool = pool_options.connect_with(options).await?;

        info!("Connected to local store: {} (pool size: {})", url, pool_size);
        Ok(Self { pool })
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    // Fixed width so that text ordering matches time ordering; nanoseconds keep it lossless.
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn unexpected(e: impl std::fmt::Display) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: String,
    username: String,
    last_login: String,
}
impl UserRecord {
    fn to_domain(self) -> PortResult<User> {
        Ok(User {
            id: Uuid::parse_str(&self.id).map_err(unexpected)?,
            username: self.username,
            last_login: DateTime::parse_from_rfc3339(&self.last_login)
                .map_err(unexpected)?
                .with_timezone(&Utc),
        })
    }
}

#[derive(FromRow)]
struct UserDataRecord {
    state: String,
}
impl UserDataRecord {
    fn to_domain(self) -> PortResult<AppState> {
        serde_json::from_str(&self.state).map_err(unexpected)
    }
}

//=========================================================================================
// `LocalStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl LocalStore for SqliteStore {
    async fn put_user(&self, user: &User) -> PortResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, last_login)
            VALUES (?, ?, ?)
            ON CONFLICT (id) DO UPDATE
            SET username = excluded.username, last_login = excluded.last_login
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(timestamp(user.last_login))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_unique_violation() {
                    return PortError::Conflict(format!("username '{}'", user.username));
                }
            }
            unexpected(e)
        })?;

        debug!(user_id = %user.id, "user record written");
        Ok(())
    }

    async fn get_user(&self, user_id: Uuid) -> PortResult<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, last_login FROM users WHERE id = ?",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        record.map(UserRecord::to_domain).transpose()
    }

    async fn find_user_by_username(&self, username: &str) -> PortResult<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, last_login FROM users WHERE username = ? LIMIT 1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        record.map(UserRecord::to_domain).transpose()
    }

    async fn list_users(&self) -> PortResult<Vec<User>> {
        let records = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, last_login FROM users ORDER BY last_login DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        records.into_iter().map(UserRecord::to_domain).collect()
    }

    async fn put_state(&self, user_id: Uuid, state: &AppState) -> PortResult<()> {
        let blob = serde_json::to_string(state).map_err(unexpected)?;

        sqlx::query(
            r#"
            INSERT INTO user_data (user_id, state, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT (user_id) DO UPDATE
            SET state = excluded.state, updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id.to_string())
        .bind(blob)
        .bind(timestamp(Utc::now()))
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;

        debug!(%user_id, "state snapshot written");
        Ok(())
    }

    async fn get_state(&self, user_id: Uuid) -> PortResult<Option<AppState>> {
        let record = sqlx::query_as::<_, UserDataRecord>(
            "SELECT state FROM user_data WHERE user_id = ?",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        record.map(UserDataRecord::to_domain).transpose()
    }
}
