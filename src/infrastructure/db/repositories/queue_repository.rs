use crate::infrastructure::db::dto::QueueJobRow;
use crate::infrastructure::db::stores::queue_store::{QueueRepositoryError, QueueStore};
use std::sync::Arc;
use time::OffsetDateTime;

pub struct QueueRepository {
    store: Arc<dyn QueueStore>,
}

impl QueueRepository {
    /// Build a repository that uses the given store implementation.
    pub fn new(store: Arc<dyn QueueStore>) -> Self {
        Self { store }
    }

    /// Enqueue a durable job. Returns once the queue has acknowledged it.
    pub async fn enqueue(&self, row: &QueueJobRow) -> Result<QueueJobRow, QueueRepositoryError> {
        self.store.enqueue(row).await
    }

    /// Claim the next due job on one of the given queues for the worker.
    pub async fn claim_next_due(
        &self,
        worker_id: &str,
        queues: &[String],
        now: OffsetDateTime,
        lease_expires_at: OffsetDateTime,
    ) -> Result<Option<QueueJobRow>, QueueRepositoryError> {
        self.store
            .claim_next_due(worker_id, queues, now, lease_expires_at)
            .await
    }

    /// Mark a claimed job done.
    pub async fn mark_done(
        &self,
        job_id: uuid::Uuid,
        now: OffsetDateTime,
    ) -> Result<(), QueueRepositoryError> {
        self.store.mark_done(job_id, now).await
    }

    /// Reschedule a claimed job for a later retry attempt.
    pub async fn reschedule(
        &self,
        job_id: uuid::Uuid,
        attempt: i32,
        next_attempt_at: OffsetDateTime,
        now: OffsetDateTime,
    ) -> Result<(), QueueRepositoryError> {
        self.store
            .reschedule(job_id, attempt, next_attempt_at, now)
            .await
    }

    /// Mark a claimed job dead after retry exhaustion.
    pub async fn mark_dead(
        &self,
        job_id: uuid::Uuid,
        now: OffsetDateTime,
    ) -> Result<(), QueueRepositoryError> {
        self.store.mark_dead(job_id, now).await
    }

    /// Requeue jobs whose worker lease expired without completion.
    pub async fn release_expired(
        &self,
        now: OffsetDateTime,
        limit: u32,
    ) -> Result<u64, QueueRepositoryError> {
        self.store.release_expired(now, limit).await
    }

    /// Fetch a job by the delivery it carries.
    pub async fn get_by_delivery(
        &self,
        delivery_id: uuid::Uuid,
    ) -> Result<Option<QueueJobRow>, QueueRepositoryError> {
        self.store.get_by_delivery(delivery_id).await
    }
}
