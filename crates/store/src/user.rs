//! Identity records

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Prefix for server-generated user ids
pub const USER_ID_PREFIX: &str = "SANGAM_";

const ID_SUFFIX_LEN: usize = 8;
const ID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a candidate user id: `SANGAM_` + 8 random uppercase-alphanumeric
/// characters.
///
/// Callers that need uniqueness must check the store before committing; the
/// generator itself makes no guarantee.
pub fn generate_user_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_CHARSET[rng.gen_range(0..ID_CHARSET.len())] as char)
        .collect();
    format!("{USER_ID_PREFIX}{suffix}")
}

/// Stored identity record
///
/// The `family_members` list holds ids of other identity records. The
/// relation is directional: nothing requires the linked record to point back.
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Unique user id (immutable once assigned)
    pub user_id: String,
    /// Display name
    pub username: String,
    /// Email address (uniqueness checked at registration time only)
    pub email: String,
    /// Mobile number
    pub mobile_number: String,
    /// Ordered list of linked contact ids
    pub family_members: Vec<String>,
    /// When the record was created
    pub created_at: DateTime<Utc>,
    /// When the family list was last mutated
    pub updated_at: Option<DateTime<Utc>>,
    /// When the user last logged in
    pub last_login: Option<DateTime<Utc>>,
    /// Active flag
    pub is_active: bool,
}

impl UserRecord {
    /// Create a fresh record with an empty family list
    pub fn new(
        user_id: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        mobile_number: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            email: email.into(),
            mobile_number: mobile_number.into(),
            family_members: Vec::new(),
            created_at: Utc::now(),
            updated_at: None,
            last_login: None,
            is_active: true,
        }
    }

    /// Public identity fields, as embedded in alerts and API responses
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            user_id: self.user_id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            mobile_number: self.mobile_number.clone(),
        }
    }
}

/// Public identity fields of a user
///
/// This is the snapshot denormalized into alert records at trigger time, and
/// the shape returned for resolved contacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub mobile_number: String,
}
