use crate::domain::value_objects::ids::{AttemptId, DeliveryId};
use crate::domain::value_objects::timestamps::Timestamp;

/// One HTTP call executed for a delivery. Attempts are append-only history;
/// they are never updated after being recorded.
#[derive(Debug, Clone)]
pub struct DeliveryAttempt {
    pub id: AttemptId,
    pub delivery_id: DeliveryId,
    pub attempt_number: u32,
    pub response_status: Option<u16>,
    pub duration_ms: u64,
    pub error: Option<String>,
    pub created_at: Timestamp,
}

impl DeliveryAttempt {
    pub fn record(
        delivery_id: DeliveryId,
        attempt_number: u32,
        response_status: Option<u16>,
        duration_ms: u64,
        error: Option<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id: AttemptId::new(),
            delivery_id,
            attempt_number,
            response_status,
            duration_ms,
            error,
            created_at: now,
        }
    }
}
