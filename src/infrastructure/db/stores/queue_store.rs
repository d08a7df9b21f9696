use crate::infrastructure::db::database::DatabaseError;
use crate::infrastructure::db::dto::QueueJobRow;
use async_trait::async_trait;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueRepositoryError {
    NotFound,
    InvalidInput,
    StorageUnavailable,
}

impl From<DatabaseError> for QueueRepositoryError {
    fn from(_: DatabaseError) -> Self {
        QueueRepositoryError::StorageUnavailable
    }
}

#[async_trait]
pub trait QueueStore: Send + Sync {
    /// Enqueue a job. The insert is the durable acknowledgment: once it
    /// returns, the delivery will eventually be attempted.
    async fn enqueue(&self, row: &QueueJobRow) -> Result<QueueJobRow, QueueRepositoryError>;
    /// Claim the next due job on one of the given queues and attach a
    /// lease. Jobs on other queues are left alone; concurrent workers never
    /// claim the same job.
    async fn claim_next_due(
        &self,
        worker_id: &str,
        queues: &[String],
        now: OffsetDateTime,
        lease_expires_at: OffsetDateTime,
    ) -> Result<Option<QueueJobRow>, QueueRepositoryError>;
    /// Mark a claimed job done.
    async fn mark_done(
        &self,
        job_id: uuid::Uuid,
        now: OffsetDateTime,
    ) -> Result<(), QueueRepositoryError>;
    /// Reschedule a claimed job for a later retry attempt.
    async fn reschedule(
        &self,
        job_id: uuid::Uuid,
        attempt: i32,
        next_attempt_at: OffsetDateTime,
        now: OffsetDateTime,
    ) -> Result<(), QueueRepositoryError>;
    /// Mark a claimed job dead after retry exhaustion.
    async fn mark_dead(
        &self,
        job_id: uuid::Uuid,
        now: OffsetDateTime,
    ) -> Result<(), QueueRepositoryError>;
    /// Requeue jobs whose worker lease expired without completion.
    async fn release_expired(
        &self,
        now: OffsetDateTime,
        limit: u32,
    ) -> Result<u64, QueueRepositoryError>;
    /// Fetch a job by the delivery it carries.
    async fn get_by_delivery(
        &self,
        delivery_id: uuid::Uuid,
    ) -> Result<Option<QueueJobRow>, QueueRepositoryError>;
}

/// A no-op queue store used when persistence is not configured.
pub struct DisabledQueueStore;

#[async_trait]
impl QueueStore for DisabledQueueStore {
    async fn enqueue(&self, _row: &QueueJobRow) -> Result<QueueJobRow, QueueRepositoryError> {
        Err(QueueRepositoryError::StorageUnavailable)
    }

    async fn claim_next_due(
        &self,
        _worker_id: &str,
        _queues: &[String],
        _now: OffsetDateTime,
        _lease_expires_at: OffsetDateTime,
    ) -> Result<Option<QueueJobRow>, QueueRepositoryError> {
        Err(QueueRepositoryError::StorageUnavailable)
    }

    async fn mark_done(
        &self,
        _job_id: uuid::Uuid,
        _now: OffsetDateTime,
    ) -> Result<(), QueueRepositoryError> {
        Err(QueueRepositoryError::StorageUnavailable)
    }

    async fn reschedule(
        &self,
        _job_id: uuid::Uuid,
        _attempt: i32,
        _next_attempt_at: OffsetDateTime,
        _now: OffsetDateTime,
    ) -> Result<(), QueueRepositoryError> {
        Err(QueueRepositoryError::StorageUnavailable)
    }

    async fn mark_dead(
        &self,
        _job_id: uuid::Uuid,
        _now: OffsetDateTime,
    ) -> Result<(), QueueRepositoryError> {
        Err(QueueRepositoryError::StorageUnavailable)
    }

    async fn release_expired(
        &self,
        _now: OffsetDateTime,
        _limit: u32,
    ) -> Result<u64, QueueRepositoryError> {
        Err(QueueRepositoryError::StorageUnavailable)
    }

    async fn get_by_delivery(
        &self,
        _delivery_id: uuid::Uuid,
    ) -> Result<Option<QueueJobRow>, QueueRepositoryError> {
        Err(QueueRepositoryError::StorageUnavailable)
    }
}
