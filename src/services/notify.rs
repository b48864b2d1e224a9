use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QueueEventKind {
    BookingCreated,
    BookingUpdated,
    StatusChanged,
    BookingMoved,
}

impl QueueEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueueEventKind::BookingCreated => "booking_created",
            QueueEventKind::BookingUpdated => "booking_updated",
            QueueEventKind::StatusChanged => "status_changed",
            QueueEventKind::BookingMoved => "booking_moved",
        }
    }
}

/// A toast for every open board; boards refetch when they see one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueEvent {
    pub kind: QueueEventKind,
    pub booking_id: String,
    pub message: String,
    pub at: String,
}

impl QueueEvent {
    pub fn new(kind: QueueEventKind, booking_id: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            booking_id: booking_id.to_string(),
            message: message.into(),
            at: chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, event: QueueEvent) -> anyhow::Result<()>;
}

/// Fans events out to SSE subscribers.
pub struct BroadcastNotifier {
    tx: broadcast::Sender<QueueEvent>,
}

impl BroadcastNotifier {
    pub fn new(tx: broadcast::Sender<QueueEvent>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl Notifier for BroadcastNotifier {
    async fn notify(&self, event: QueueEvent) -> anyhow::Result<()> {
        tracing::debug!(kind = event.kind.as_str(), booking_id = %event.booking_id, "queue event");
        // No open boards is not an error.
        let _ = self.tx.send(event);
        Ok(())
    }
}
