// ── Webhook domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A platform webhook registration.
///
/// The event counters are server-authoritative and opaque: no
/// monotonicity or consistency is assumed, and they are never
/// incremented locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookSubscription {
    pub id: String,
    pub tenant_id: String,
    pub platform: String,
    pub callback_url: String,
    /// Shared secret; the server only returns it on create.
    pub webhook_token: Option<String>,
    pub is_active: bool,
    pub is_verified: bool,
    pub total_events_received: u64,
    pub successful_events: u64,
    pub failed_events: u64,
    pub created_at: Option<DateTime<Utc>>,
}

impl WebhookSubscription {
    /// Delivery success rate in percent, if any events were received.
    pub fn success_rate(&self) -> Option<f64> {
        if self.total_events_received == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        Some(self.successful_events as f64 / self.total_events_received as f64 * 100.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub id: String,
    pub subscription_id: Option<String>,
    pub platform: Option<String>,
    pub event_type: Option<String>,
    pub status: Option<String>,
    pub received_at: Option<DateTime<Utc>>,
}
