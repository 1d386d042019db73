//! Recording notifier (test double)

use std::sync::Mutex;

use async_trait::async_trait;

use sangam_store::AlertRecord;

use crate::{Channel, DeliveryResult, Notifier};

/// Notifier that records every dispatched alert instead of logging
///
/// Intended for tests that assert on fan-out: the captured alerts carry the
/// full contact snapshots taken at trigger time.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    dispatched: Mutex<Vec<AlertRecord>>,
}

impl RecordingNotifier {
    /// Create a new recording notifier
    pub fn new() -> Self {
        Self::default()
    }

    /// Alerts dispatched so far, in order
    pub fn dispatched(&self) -> Vec<AlertRecord> {
        self.dispatched.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn dispatch(&self, alert: &AlertRecord) -> Vec<DeliveryResult> {
        self.dispatched.lock().unwrap().push(alert.clone());

        alert
            .contact_snapshots
            .iter()
            .map(|c| DeliveryResult {
                contact_id: c.user_id.clone(),
                channels: vec![Channel::Sms, Channel::Email, Channel::Push],
                accepted: true,
            })
            .collect()
    }
}
