//! Store trait
//!
//! Abstraction over the keyed-document store so the HTTP layer can be handed
//! any implementation (file-backed for serving, in-memory for tests).

use async_trait::async_trait;

use crate::alert::AlertRecord;
use crate::error::Result;
use crate::user::UserRecord;

/// Keyed-document store over the `users` and `sos_alerts` collections
///
/// Every method is a single keyed read, keyed write, or simple
/// equality/ordering query. There are no transactions: callers that
/// read-modify-write (the family-list mutations) race against concurrent
/// writers, and the last put wins.
#[async_trait]
pub trait Store: Send + Sync {
    // Users collection

    /// Insert a new identity record
    async fn insert_user(&self, user: &UserRecord) -> Result<()>;

    /// Get a user by id
    async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>>;

    /// Find a user by email (registration-time duplicate check)
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>>;

    /// Stamp the user's last-login time with the current UTC time
    async fn update_last_login(&self, user_id: &str) -> Result<()>;

    /// Overwrite the user's family list, stamping `updated_at`
    ///
    /// Last write wins; this is the non-transactional half of the
    /// read-modify-write sequence performed by the relationship handlers.
    async fn put_family_members(&self, user_id: &str, members: &[String]) -> Result<()>;

    /// Delete a user record outright
    ///
    /// Not reachable from the HTTP surface; used by tests and operators to
    /// simulate contacts whose records have disappeared.
    async fn delete_user(&self, user_id: &str) -> Result<bool>;

    // SOS alerts collection

    /// Insert a new alert record
    async fn insert_alert(&self, alert: &AlertRecord) -> Result<()>;

    /// Get an alert by id
    async fn get_alert(&self, alert_id: &str) -> Result<Option<AlertRecord>>;

    /// All alerts owned by the user, newest first
    async fn alerts_for_user(&self, user_id: &str) -> Result<Vec<AlertRecord>>;

    /// Mark an alert resolved, stamping `resolved_at` with the given time
    ///
    /// No status precondition: resolving an already-resolved alert succeeds
    /// and overwrites the previous resolution time.
    async fn resolve_alert(
        &self,
        alert_id: &str,
        resolved_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<()>;
}
