//! SQLite-backed document store
//!
//! Rows are treated as documents: the family list and the alert snapshots are
//! embedded JSON text columns, read and written whole. Email is not UNIQUE at
//! the schema level; the duplicate check happens at registration time only.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

use crate::alert::{AlertRecord, AlertStatus};
use crate::error::{Result, StoreError};
use crate::store::Store;
use crate::user::{UserProfile, UserRecord};

/// Document store backed by SQLite
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open or create a store at the given path
    ///
    /// Creates the database file and tables if they don't exist.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::invalid(
                    "path",
                    format!("failed to create directory {}: {}", parent.display(), e),
                )
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;

        info!("Document store opened at {}", path.display());
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    ///
    /// Capped at one connection: SQLite `:memory:` databases are
    /// per-connection, so a larger pool would hand out empty databases.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Initialize database schema
    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                user_id TEXT PRIMARY KEY,
                username TEXT NOT NULL,
                email TEXT NOT NULL,
                mobile_number TEXT NOT NULL,
                family_members TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL,
                updated_at TEXT,
                last_login TEXT,
                is_active INTEGER NOT NULL DEFAULT 1
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sos_alerts (
                alert_id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                triggered_at TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'active',
                location TEXT NOT NULL,
                message TEXT NOT NULL,
                family_notified TEXT NOT NULL DEFAULT '[]',
                user_snapshot TEXT NOT NULL,
                contact_snapshots TEXT NOT NULL DEFAULT '[]',
                resolved_at TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_alerts_user ON sos_alerts(user_id)")
            .execute(&self.pool)
            .await?;

        debug!("Document store schema initialized");
        Ok(())
    }

    // =========================================================================
    // Row Converters
    // =========================================================================

    fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<UserRecord> {
        let family_json: String = row.get("family_members");
        let created_str: String = row.get("created_at");
        let updated_str: Option<String> = row.get("updated_at");
        let last_login_str: Option<String> = row.get("last_login");

        Ok(UserRecord {
            user_id: row.get("user_id"),
            username: row.get("username"),
            email: row.get("email"),
            mobile_number: row.get("mobile_number"),
            family_members: serde_json::from_str(&family_json)?,
            created_at: parse_timestamp(&created_str),
            updated_at: updated_str.as_deref().map(parse_timestamp),
            last_login: last_login_str.as_deref().map(parse_timestamp),
            is_active: row.get("is_active"),
        })
    }

    fn row_to_alert(row: &sqlx::sqlite::SqliteRow) -> Result<AlertRecord> {
        let status_str: String = row.get("status");
        let triggered_str: String = row.get("triggered_at");
        let resolved_str: Option<String> = row.get("resolved_at");
        let notified_json: String = row.get("family_notified");
        let user_json: String = row.get("user_snapshot");
        let contacts_json: String = row.get("contact_snapshots");

        let user_snapshot: UserProfile = serde_json::from_str(&user_json)?;
        let contact_snapshots: Vec<UserProfile> = serde_json::from_str(&contacts_json)?;

        Ok(AlertRecord {
            alert_id: row.get("alert_id"),
            user_id: row.get("user_id"),
            triggered_at: parse_timestamp(&triggered_str),
            status: AlertStatus::parse(&status_str).unwrap_or(AlertStatus::Active),
            location: row.get("location"),
            message: row.get("message"),
            family_notified: serde_json::from_str(&notified_json)?,
            user_snapshot,
            contact_snapshots,
            resolved_at: resolved_str.as_deref().map(parse_timestamp),
        })
    }
}

/// Parse an RFC 3339 timestamp column, defaulting to now on corrupt data
fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[async_trait]
impl Store for SqliteStore {
    async fn insert_user(&self, user: &UserRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (user_id, username, email, mobile_number, family_members,
                               created_at, updated_at, last_login, is_active)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.user_id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.mobile_number)
        .bind(serde_json::to_string(&user.family_members)?)
        .bind(user.created_at.to_rfc3339())
        .bind(user.updated_at.map(|d| d.to_rfc3339()))
        .bind(user.last_login.map(|d| d.to_rfc3339()))
        .bind(user.is_active)
        .execute(&self.pool)
        .await?;

        info!(user_id = %user.user_id, email = %user.email, "Created user");
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>> {
        let row = sqlx::query("SELECT * FROM users WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ? LIMIT 1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn update_last_login(&self, user_id: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();

        sqlx::query("UPDATE users SET last_login = ? WHERE user_id = ?")
            .bind(&now)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn put_family_members(&self, user_id: &str, members: &[String]) -> Result<()> {
        let now = Utc::now().to_rfc3339();

        sqlx::query("UPDATE users SET family_members = ?, updated_at = ? WHERE user_id = ?")
            .bind(serde_json::to_string(members)?)
            .bind(&now)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        debug!(user_id, count = members.len(), "Updated family list");
        Ok(())
    }

    async fn delete_user(&self, user_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_alert(&self, alert: &AlertRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO sos_alerts (alert_id, user_id, triggered_at, status, location, message,
                                    family_notified, user_snapshot, contact_snapshots, resolved_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&alert.alert_id)
        .bind(&alert.user_id)
        .bind(alert.triggered_at.to_rfc3339())
        .bind(alert.status.as_str())
        .bind(&alert.location)
        .bind(&alert.message)
        .bind(serde_json::to_string(&alert.family_notified)?)
        .bind(serde_json::to_string(&alert.user_snapshot)?)
        .bind(serde_json::to_string(&alert.contact_snapshots)?)
        .bind(alert.resolved_at.map(|d| d.to_rfc3339()))
        .execute(&self.pool)
        .await?;

        info!(alert_id = %alert.alert_id, user_id = %alert.user_id, "Created SOS alert");
        Ok(())
    }

    async fn get_alert(&self, alert_id: &str) -> Result<Option<AlertRecord>> {
        let row = sqlx::query("SELECT * FROM sos_alerts WHERE alert_id = ?")
            .bind(alert_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(Self::row_to_alert(&row)?)),
            None => Ok(None),
        }
    }

    async fn alerts_for_user(&self, user_id: &str) -> Result<Vec<AlertRecord>> {
        let rows =
            sqlx::query("SELECT * FROM sos_alerts WHERE user_id = ? ORDER BY triggered_at DESC")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        let mut alerts = Vec::with_capacity(rows.len());
        for row in rows {
            alerts.push(Self::row_to_alert(&row)?);
        }

        Ok(alerts)
    }

    async fn resolve_alert(&self, alert_id: &str, resolved_at: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE sos_alerts SET status = ?, resolved_at = ? WHERE alert_id = ?")
            .bind(AlertStatus::Resolved.as_str())
            .bind(resolved_at.to_rfc3339())
            .bind(alert_id)
            .execute(&self.pool)
            .await?;

        info!(alert_id, "Resolved SOS alert");
        Ok(())
    }
}
