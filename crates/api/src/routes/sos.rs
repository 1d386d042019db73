//! SOS routes
//!
//! Trigger alerts, list alert history, resolve alerts. Triggering snapshots
//! the user and every resolvable contact into the alert record, then hands
//! the alert to the notifier; the shipped notifier only logs a transcript.

use axum::Json;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use sangam_store::{AlertRecord, AlertStatus, UserProfile};

use crate::error::{ApiError, Result};
use crate::routes::user_id_from_handle;
use crate::state::AppState;

const DEFAULT_LOCATION: &str = "Unknown";
const DEFAULT_MESSAGE: &str = "Emergency SOS triggered";

/// Trigger payload; both fields optional, and the body itself may be absent
#[derive(Debug, Default, Deserialize)]
pub struct TriggerRequest {
    pub location: Option<String>,
    pub message: Option<String>,
}

/// Trigger response
#[derive(Debug, Serialize)]
pub struct TriggerResponse {
    pub success: bool,
    pub message: &'static str,
    pub alert_id: String,
    pub user_id: String,
    pub triggered_at: DateTime<Utc>,
    pub family_members_notified: usize,
    pub family_members: Vec<UserProfile>,
    pub status: AlertStatus,
}

/// Trigger an SOS alert and notify the user's family members
///
/// POST /@{user_id}/sos
pub async fn trigger_sos(
    State(state): State<AppState>,
    Path(user_handle): Path<String>,
    payload: Option<Json<TriggerRequest>>,
) -> Result<Json<TriggerResponse>> {
    let user_id = user_id_from_handle(&user_handle)?;
    let req = payload.map(|Json(r)| r).unwrap_or_default();

    let user = state
        .store
        .get_user(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    // Resolve contacts to identity snapshots, skipping records that no
    // longer exist. The stored id list goes into the alert whole; only the
    // snapshots are existing-only.
    let mut contact_snapshots = Vec::with_capacity(user.family_members.len());
    for member_id in &user.family_members {
        if let Some(member) = state.store.get_user(member_id).await? {
            contact_snapshots.push(member.profile());
        }
    }

    let alert = AlertRecord::new(
        user.profile(),
        user.family_members.clone(),
        contact_snapshots,
        req.location.unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
        req.message.unwrap_or_else(|| DEFAULT_MESSAGE.to_string()),
    );
    state.store.insert_alert(&alert).await?;

    // Simulated dispatch; results carry no delivery guarantee.
    let deliveries = state.notifier.dispatch(&alert).await;
    debug!(
        alert_id = %alert.alert_id,
        accepted = deliveries.iter().filter(|d| d.accepted).count(),
        "notification dispatch complete"
    );

    Ok(Json(TriggerResponse {
        success: true,
        message: "SOS alert triggered successfully",
        alert_id: alert.alert_id,
        user_id: user.user_id,
        triggered_at: alert.triggered_at,
        family_members_notified: alert.contact_snapshots.len(),
        family_members: alert.contact_snapshots,
        status: alert.status,
    }))
}

/// One alert in a history listing
#[derive(Debug, Serialize)]
pub struct AlertSummary {
    pub alert_id: String,
    pub triggered_at: DateTime<Utc>,
    pub status: AlertStatus,
    pub location: String,
    pub message: String,
    pub family_members_notified: usize,
}

/// History response
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub user_id: String,
    pub alerts: Vec<AlertSummary>,
    pub total_alerts: usize,
}

/// List a user's SOS alerts, newest first
///
/// GET /@{user_id}/sos/history
///
/// History is not guarded by ownership: any caller naming an existing user id
/// reads that user's alerts.
pub async fn sos_history(
    State(state): State<AppState>,
    Path(user_handle): Path<String>,
) -> Result<Json<HistoryResponse>> {
    let user_id = user_id_from_handle(&user_handle)?;

    if state.store.get_user(user_id).await?.is_none() {
        return Err(ApiError::not_found("User not found"));
    }

    let alerts: Vec<AlertSummary> = state
        .store
        .alerts_for_user(user_id)
        .await?
        .into_iter()
        .map(|a| AlertSummary {
            alert_id: a.alert_id,
            triggered_at: a.triggered_at,
            status: a.status,
            location: a.location,
            message: a.message,
            family_members_notified: a.family_notified.len(),
        })
        .collect();

    let total_alerts = alerts.len();
    Ok(Json(HistoryResponse {
        success: true,
        user_id: user_id.to_string(),
        alerts,
        total_alerts,
    }))
}

/// Resolve response
#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub success: bool,
    pub message: &'static str,
    pub alert_id: String,
    pub resolved_at: DateTime<Utc>,
}

/// Resolve an SOS alert
///
/// POST /@{user_id}/sos/{alert_id}/resolve
///
/// Only the alert's owner (per the path user id) may resolve it. There is no
/// check that the alert is still active: re-resolving succeeds and overwrites
/// the resolution time.
pub async fn resolve_sos_alert(
    State(state): State<AppState>,
    Path((user_handle, alert_id)): Path<(String, String)>,
) -> Result<Json<ResolveResponse>> {
    let user_id = user_id_from_handle(&user_handle)?;

    let alert = state
        .store
        .get_alert(&alert_id)
        .await?
        .ok_or_else(|| ApiError::not_found("SOS alert not found"))?;

    if alert.user_id != user_id {
        return Err(ApiError::forbidden("Unauthorized access to SOS alert"));
    }

    let resolved_at = Utc::now();
    state.store.resolve_alert(&alert_id, resolved_at).await?;

    Ok(Json(ResolveResponse {
        success: true,
        message: "SOS alert resolved successfully",
        alert_id,
        resolved_at,
    }))
}
