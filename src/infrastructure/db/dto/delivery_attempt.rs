use crate::domain::entities::delivery_attempt::DeliveryAttempt;
use time::OffsetDateTime;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DeliveryAttemptRow {
    pub id: uuid::Uuid,
    pub delivery_id: uuid::Uuid,
    pub attempt_number: i32,
    pub response_status: Option<i32>,
    pub duration_ms: i64,
    pub error: Option<String>,
    pub created_at: OffsetDateTime,
}

impl DeliveryAttemptRow {
    pub fn from_entity(attempt: &DeliveryAttempt) -> Self {
        Self {
            id: attempt.id.0,
            delivery_id: attempt.delivery_id.0,
            attempt_number: attempt.attempt_number as i32,
            response_status: attempt.response_status.map(|s| s as i32),
            duration_ms: attempt.duration_ms as i64,
            error: attempt.error.clone(),
            created_at: attempt.created_at.as_inner(),
        }
    }
}
