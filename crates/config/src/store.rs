//! Document store configuration

use serde::Deserialize;

/// Document store configuration
///
/// # Example
///
/// ```toml
/// [store]
/// path = "/var/lib/sangam/sangam.db"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StoreConfig {
    /// Path to the SQLite database file
    /// Default: data/sangam.db
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "data/sangam.db".to_string(),
        }
    }
}
