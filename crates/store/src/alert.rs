//! SOS alert records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::user::UserProfile;

/// Lifecycle status of an alert
///
/// The only allowed transition is `Active → Resolved`. Re-resolving an
/// already-resolved alert is not guarded; it overwrites `resolved_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    /// Alert is open
    Active,
    /// Alert has been resolved by its owner
    Resolved,
}

impl AlertStatus {
    /// Parse status from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "resolved" => Some(Self::Resolved),
            _ => None,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Resolved => "resolved",
        }
    }
}

impl std::fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stored SOS alert
///
/// `user_id`, `triggered_at`, and the snapshots are immutable once created;
/// only `status` and `resolved_at` change afterwards.
#[derive(Debug, Clone)]
pub struct AlertRecord {
    /// Unique alert id (UUID)
    pub alert_id: String,
    /// Owning user id
    pub user_id: String,
    /// When the alert was triggered
    pub triggered_at: DateTime<Utc>,
    /// Lifecycle status
    pub status: AlertStatus,
    /// Free-text location
    pub location: String,
    /// Free-text message
    pub message: String,
    /// The user's stored contact-id list at trigger time
    ///
    /// Carried whole, including ids whose records no longer resolve; history
    /// counts this list, not the resolved snapshots.
    pub family_notified: Vec<String>,
    /// Identity snapshot of the owning user at trigger time
    pub user_snapshot: UserProfile,
    /// Identity snapshots of the contacts that still resolved at trigger time
    pub contact_snapshots: Vec<UserProfile>,
    /// When the alert was resolved
    pub resolved_at: Option<DateTime<Utc>>,
}

impl AlertRecord {
    /// Create a new active alert (generates a UUID)
    pub fn new(
        user_snapshot: UserProfile,
        family_notified: Vec<String>,
        contact_snapshots: Vec<UserProfile>,
        location: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            alert_id: uuid::Uuid::new_v4().to_string(),
            user_id: user_snapshot.user_id.clone(),
            triggered_at: Utc::now(),
            status: AlertStatus::Active,
            location: location.into(),
            message: message.into(),
            family_notified,
            user_snapshot,
            contact_snapshots,
            resolved_at: None,
        }
    }
}
