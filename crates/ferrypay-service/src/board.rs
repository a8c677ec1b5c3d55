//! In-memory record of webhook-delivered payment statuses.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use ferrypay_core::Payload;
use serde::Serialize;
use tokio::sync::RwLock;

/// How long a status stays on the board unless configured otherwise.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(24 * 60 * 60);

/// Latest verified notification for one order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentStatus {
    /// Notification fields, without the signature.
    #[serde(flatten)]
    pub fields: Payload,
    /// When the gateway accepted the notification.
    pub received_at: DateTime<Utc>,
}

/// Latest payment status per order, fed by verified webhooks.
///
/// Only authenticated notifications are recorded; the board is never touched
/// for a rejected webhook. Entries older than the retention window are
/// dropped on the next insert and are no longer returned, so the board holds
/// at most one window's worth of orders.
#[derive(Debug)]
pub struct StatusBoard {
    entries: RwLock<HashMap<String, PaymentStatus>>,
    /// `None` keeps entries forever (window too large for chrono).
    retention: Option<chrono::Duration>,
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusBoard {
    /// Create an empty board with [`DEFAULT_RETENTION`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_retention(DEFAULT_RETENTION)
    }

    /// Create an empty board keeping each status for `retention`.
    #[must_use]
    pub fn with_retention(retention: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            retention: chrono::Duration::from_std(retention).ok(),
        }
    }

    /// Record `fields` as the latest status of `order_id`, replacing any
    /// earlier entry.
    pub async fn record(&self, order_id: &str, fields: Payload) -> PaymentStatus {
        self.record_at(order_id, fields, Utc::now()).await
    }

    async fn record_at(
        &self,
        order_id: &str,
        fields: Payload,
        received_at: DateTime<Utc>,
    ) -> PaymentStatus {
        let status = PaymentStatus {
            fields,
            received_at,
        };

        let mut entries = self.entries.write().await;
        if let Some(cutoff) = self.cutoff() {
            let before = entries.len();
            entries.retain(|_, entry| entry.received_at >= cutoff);
            let expired = before - entries.len();
            if expired > 0 {
                tracing::debug!(expired, "Dropped expired payment statuses");
            }
        }
        entries.insert(order_id.to_string(), status.clone());
        status
    }

    /// Latest status of `order_id`, if a webhook arrived for it within the
    /// retention window.
    pub async fn get(&self, order_id: &str) -> Option<PaymentStatus> {
        let cutoff = self.cutoff();
        self.entries
            .read()
            .await
            .get(order_id)
            .filter(|entry| cutoff.map_or(true, |cutoff| entry.received_at >= cutoff))
            .cloned()
    }

    /// Number of orders currently held, including expired entries not yet
    /// dropped.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether no status is held.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    fn cutoff(&self) -> Option<DateTime<Utc>> {
        self.retention
            .and_then(|retention| Utc::now().checked_sub_signed(retention))
    }
}
