//! SANGAM API
//!
//! HTTP API for the SANGAM emergency-contact / SOS alerting backend.
//!
//! # Overview
//!
//! Built on Axum over an injected [`sangam_store::Store`] and
//! [`sangam_notify::Notifier`]. Handlers are straight-line: validate the
//! payload, do one or more keyed document reads, optionally mutate a list
//! field, write back, return JSON. All responses carry `success: bool`.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use sangam_api::{build_router, AppState};
//! use sangam_notify::TranscriptNotifier;
//! use sangam_store::SqliteStore;
//!
//! let store = Arc::new(SqliteStore::open("data/sangam.db").await?);
//! let state = AppState::new(store, Arc::new(TranscriptNotifier::new()));
//! let app = build_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
//! axum::serve(listener, app).await?;
//! ```
//!
//! # Endpoints
//!
//! ## Identity
//! - `POST /register` - create a user (201)
//! - `POST /login` - fetch a user by id, stamping last-login
//!
//! ## Family
//! - `POST /@{user_id}/add_family` - link a contact
//! - `GET /@{user_id}/family` - list linked contacts
//! - `POST /@{user_id}/remove_family` - unlink a contact
//!
//! ## SOS
//! - `POST /@{user_id}/sos` - trigger an alert and notify contacts
//! - `GET /@{user_id}/sos/history` - list the user's alerts, newest first
//! - `POST /@{user_id}/sos/{alert_id}/resolve` - resolve an alert
//!
//! ## Operations
//! - `GET /health` - liveness probe

pub mod error;
pub mod routes;
pub mod state;

// Re-exports
pub use error::{ApiError, Result};
pub use routes::build_router;
pub use state::AppState;
