//! API routes
//!
//! Domain-grouped HTTP route handlers.

pub mod family;
pub mod identity;
pub mod ops;
pub mod sos;

use axum::Router;
use axum::routing::{get, post};

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Build the complete API router
///
/// User-scoped paths carry the `@`-prefixed user handle as a single path
/// segment, e.g. `/@SANGAM_AB12CD34/sos`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Operations routes (no auth)
        .merge(ops::routes())
        // Identity routes
        .route("/register", post(identity::register))
        .route("/login", post(identity::login))
        // Family routes
        .route("/{user_handle}/add_family", post(family::add_family_member))
        .route("/{user_handle}/family", get(family::list_family_members))
        .route(
            "/{user_handle}/remove_family",
            post(family::remove_family_member),
        )
        // SOS routes
        .route("/{user_handle}/sos", post(sos::trigger_sos))
        .route("/{user_handle}/sos/history", get(sos::sos_history))
        .route(
            "/{user_handle}/sos/{alert_id}/resolve",
            post(sos::resolve_sos_alert),
        )
        .with_state(state)
}

/// Extract the user id from an `@`-prefixed path segment
///
/// Paths without the `@` prefix do not name a user resource and read as
/// not found, the same as they would against the original route table.
pub(crate) fn user_id_from_handle(handle: &str) -> Result<&str> {
    handle
        .strip_prefix('@')
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::not_found("User not found"))
}
