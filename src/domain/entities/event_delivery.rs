use crate::domain::value_objects::ids::{DeliveryId, WebhookId};
use crate::domain::value_objects::timestamps::Timestamp;
use crate::domain::workflows::event_type::EventType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    Pending,
    Success,
    Failed,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "pending",
            DeliveryStatus::Success => "success",
            DeliveryStatus::Failed => "failed",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "pending" => Some(DeliveryStatus::Pending),
            "success" => Some(DeliveryStatus::Success),
            "failed" => Some(DeliveryStatus::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, DeliveryStatus::Pending)
    }
}

/// A durable record of one (event, webhook) dispatch.
///
/// Async deliveries are persisted before enqueueing; sync deliveries are
/// built in memory only and never hit the store.
#[derive(Debug, Clone)]
pub struct EventDelivery {
    pub id: DeliveryId,
    pub webhook_id: WebhookId,
    pub event_type: EventType,
    pub payload: String,
    pub status: DeliveryStatus,
    pub attempt_count: u32,
    pub last_error: Option<String>,
    pub created_at: Timestamp,
}

impl EventDelivery {
    pub fn pending(
        webhook_id: WebhookId,
        event_type: EventType,
        payload: String,
        now: Timestamp,
    ) -> Self {
        Self {
            id: DeliveryId::new(),
            webhook_id,
            event_type,
            payload,
            status: DeliveryStatus::Pending,
            attempt_count: 0,
            last_error: None,
            created_at: now,
        }
    }
}
