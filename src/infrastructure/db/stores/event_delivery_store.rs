use crate::infrastructure::db::database::DatabaseError;
use crate::infrastructure::db::dto::{EventDeliveryRow, EventDeliveryStats};
use async_trait::async_trait;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDeliveryRepositoryError {
    NotFound,
    InvalidInput,
    StorageUnavailable,
}

impl From<DatabaseError> for EventDeliveryRepositoryError {
    fn from(_: DatabaseError) -> Self {
        EventDeliveryRepositoryError::StorageUnavailable
    }
}

#[async_trait]
pub trait EventDeliveryStore: Send + Sync {
    /// Fetch a delivery by its ID. Returns `None` if it doesn't exist.
    async fn get(
        &self,
        delivery_id: uuid::Uuid,
    ) -> Result<Option<EventDeliveryRow>, EventDeliveryRepositoryError>;
    /// Create a delivery and return exactly what was stored in the database.
    async fn insert(
        &self,
        row: &EventDeliveryRow,
    ) -> Result<EventDeliveryRow, EventDeliveryRepositoryError>;
    /// Conditionally move a pending delivery to a terminal status.
    ///
    /// Returns the updated row, or `None` when the delivery was already
    /// terminal (the update is a no-op; the stored status wins).
    async fn finish(
        &self,
        delivery_id: uuid::Uuid,
        status: &str,
        attempt_count: i32,
        last_error: Option<&str>,
        now: OffsetDateTime,
    ) -> Result<Option<EventDeliveryRow>, EventDeliveryRepositoryError>;
    /// Bump the audit attempt counter on a still-pending delivery.
    async fn record_attempt(
        &self,
        delivery_id: uuid::Uuid,
        attempt_count: i32,
        last_error: Option<&str>,
        now: OffsetDateTime,
    ) -> Result<(), EventDeliveryRepositoryError>;
    /// Aggregate delivery counts by status.
    async fn stats(&self) -> Result<EventDeliveryStats, EventDeliveryRepositoryError>;
}

/// A no-op delivery store used when persistence is not configured.
pub struct DisabledEventDeliveryStore;

#[async_trait]
impl EventDeliveryStore for DisabledEventDeliveryStore {
    async fn get(
        &self,
        _delivery_id: uuid::Uuid,
    ) -> Result<Option<EventDeliveryRow>, EventDeliveryRepositoryError> {
        Err(EventDeliveryRepositoryError::StorageUnavailable)
    }

    async fn insert(
        &self,
        _row: &EventDeliveryRow,
    ) -> Result<EventDeliveryRow, EventDeliveryRepositoryError> {
        Err(EventDeliveryRepositoryError::StorageUnavailable)
    }

    async fn finish(
        &self,
        _delivery_id: uuid::Uuid,
        _status: &str,
        _attempt_count: i32,
        _last_error: Option<&str>,
        _now: OffsetDateTime,
    ) -> Result<Option<EventDeliveryRow>, EventDeliveryRepositoryError> {
        Err(EventDeliveryRepositoryError::StorageUnavailable)
    }

    async fn record_attempt(
        &self,
        _delivery_id: uuid::Uuid,
        _attempt_count: i32,
        _last_error: Option<&str>,
        _now: OffsetDateTime,
    ) -> Result<(), EventDeliveryRepositoryError> {
        Err(EventDeliveryRepositoryError::StorageUnavailable)
    }

    async fn stats(&self) -> Result<EventDeliveryStats, EventDeliveryRepositoryError> {
        Err(EventDeliveryRepositoryError::StorageUnavailable)
    }
}
