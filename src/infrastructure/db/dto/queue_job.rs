use time::OffsetDateTime;

/// Durable queue job. Carries only the delivery id plus retry metadata so
/// the queue stays small; workers fetch the payload from the delivery store.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct QueueJobRow {
    pub id: uuid::Uuid,
    pub delivery_id: uuid::Uuid,
    pub queue: String,
    pub status: String,
    pub attempt: i32,
    pub max_retries: i32,
    pub retry_backoff_seconds: i64,
    pub next_attempt_at: OffsetDateTime,
    pub lease_owner: Option<String>,
    pub lease_expires_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl QueueJobRow {
    pub fn is_queued(&self) -> bool {
        self.status == "queued"
    }

    pub fn is_done(&self) -> bool {
        self.status == "done"
    }

    pub fn is_dead(&self) -> bool {
        self.status == "dead"
    }
}
