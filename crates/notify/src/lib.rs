//! SANGAM notification dispatch
//!
//! When an SOS alert is triggered, the backend hands it to a [`Notifier`] and
//! receives per-contact delivery results. The only shipped implementation,
//! [`TranscriptNotifier`], writes a human-readable transcript to the
//! operational log; it stands in for real multi-channel dispatch (SMS,
//! email, push) and makes no delivery guarantee. There is no confirmation,
//! retry, or failure path anywhere in this crate: results report what was
//! *attempted*, not what arrived.
//!
//! [`RecordingNotifier`] is a test double that captures dispatched alerts so
//! suites can assert on fan-out without scraping logs.

pub mod recording;
pub mod transcript;

pub use recording::RecordingNotifier;
pub use transcript::TranscriptNotifier;

use async_trait::async_trait;

use sangam_store::AlertRecord;

/// Channels a notification is (nominally) sent over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// SMS to the contact's mobile number
    Sms,
    /// Email to the contact's address
    Email,
    /// Push notification to the contact's app
    Push,
}

impl Channel {
    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sms => "sms",
            Self::Email => "email",
            Self::Push => "push",
        }
    }
}

/// Outcome of attempting to notify one contact
#[derive(Debug, Clone)]
pub struct DeliveryResult {
    /// The contact the notification was addressed to
    pub contact_id: String,
    /// Channels the dispatch was attempted on
    pub channels: Vec<Channel>,
    /// Whether the notifier accepted the notification for dispatch
    ///
    /// Acceptance is not delivery; nothing downstream confirms receipt.
    pub accepted: bool,
}

/// Notification dispatch capability
///
/// Injected into the HTTP layer alongside the store. Dispatch is infallible
/// by contract: a notifier reports per-contact outcomes rather than erroring
/// the alert itself, so a broken notification path can never block an SOS
/// from being recorded.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Dispatch notifications for a freshly triggered alert
    ///
    /// Returns one [`DeliveryResult`] per contact snapshot in the alert.
    async fn dispatch(&self, alert: &AlertRecord) -> Vec<DeliveryResult>;
}
