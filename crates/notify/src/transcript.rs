//! Log-transcript notifier
//!
//! Simulates multi-channel dispatch by writing a human-readable transcript of
//! the alert to the operational log.

use async_trait::async_trait;
use tracing::info;

use sangam_store::AlertRecord;

use crate::{Channel, DeliveryResult, Notifier};

const SIMULATED_CHANNELS: [Channel; 3] = [Channel::Sms, Channel::Email, Channel::Push];

/// Notifier that logs a notification transcript instead of sending anything
#[derive(Debug, Default)]
pub struct TranscriptNotifier;

impl TranscriptNotifier {
    /// Create a new transcript notifier
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for TranscriptNotifier {
    async fn dispatch(&self, alert: &AlertRecord) -> Vec<DeliveryResult> {
        info!(
            alert_id = %alert.alert_id,
            user_id = %alert.user_id,
            "SOS ALERT TRIGGERED"
        );
        info!(
            username = %alert.user_snapshot.username,
            email = %alert.user_snapshot.email,
            mobile = %alert.user_snapshot.mobile_number,
            location = %alert.location,
            message = %alert.message,
            triggered_at = %alert.triggered_at.to_rfc3339(),
            "alert details"
        );

        if alert.contact_snapshots.is_empty() {
            info!("no family members registered; nobody to notify");
        }

        let mut results = Vec::with_capacity(alert.contact_snapshots.len());
        for (i, contact) in alert.contact_snapshots.iter().enumerate() {
            info!(
                n = i + 1,
                contact_id = %contact.user_id,
                username = %contact.username,
                email = %contact.email,
                mobile = %contact.mobile_number,
                "family member notified"
            );
            results.push(DeliveryResult {
                contact_id: contact.user_id.clone(),
                channels: SIMULATED_CHANNELS.to_vec(),
                accepted: true,
            });
        }

        info!(
            contacts = results.len(),
            "notification simulation complete: SMS sent, email alerts dispatched, push notifications sent"
        );

        results
    }
}
