//! SANGAM document store
//!
//! Keyed-document persistence for the two collections the backend relies on:
//! `users` (identity records with their linked-contact lists) and
//! `sos_alerts` (SOS events with denormalized identity snapshots).
//!
//! The [`Store`] trait is the seam the HTTP layer is injected with; the
//! shipped implementation is [`SqliteStore`], which treats rows as documents
//! (list and snapshot fields are embedded JSON, not relational joins).
//!
//! # Example
//!
//! ```ignore
//! use sangam_store::{SqliteStore, Store, UserRecord};
//!
//! let store = SqliteStore::open("data/sangam.db").await?;
//! let user = UserRecord::new("SANGAM_AB12CD34", "priya", "priya@example.com", "+91-9000000000");
//! store.insert_user(&user).await?;
//! ```

pub mod alert;
pub mod error;
pub mod sqlite;
pub mod store;
pub mod user;

pub use alert::{AlertRecord, AlertStatus};
pub use error::{Result, StoreError};
pub use sqlite::SqliteStore;
pub use store::Store;
pub use user::{generate_user_id, UserProfile, UserRecord};
