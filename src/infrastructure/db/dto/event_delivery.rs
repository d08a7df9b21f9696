use crate::domain::entities::event_delivery::{DeliveryStatus, EventDelivery};
use crate::domain::value_objects::timestamps::Timestamp;
use time::OffsetDateTime;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventDeliveryRow {
    pub id: uuid::Uuid,
    pub webhook_id: uuid::Uuid,
    pub event_type: String,
    pub payload: String,
    pub status: String,
    pub attempt_count: i32,
    pub last_error: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct EventDeliveryStats {
    pub pending: i64,
    pub success: i64,
    pub failed: i64,
}

impl EventDeliveryRow {
    pub fn from_entity(delivery: &EventDelivery, now: Timestamp) -> Self {
        Self {
            id: delivery.id.0,
            webhook_id: delivery.webhook_id.0,
            event_type: delivery.event_type.as_str().to_string(),
            payload: delivery.payload.clone(),
            status: delivery.status.as_str().to_string(),
            attempt_count: delivery.attempt_count as i32,
            last_error: delivery.last_error.clone(),
            created_at: delivery.created_at.as_inner(),
            updated_at: now.as_inner(),
        }
    }

    /// A row with an unknown status code is never treated as pending.
    pub fn is_pending(&self) -> bool {
        matches!(
            DeliveryStatus::parse(&self.status),
            Some(DeliveryStatus::Pending)
        )
    }
}
