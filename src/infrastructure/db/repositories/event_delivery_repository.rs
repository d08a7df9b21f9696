use crate::infrastructure::db::dto::{EventDeliveryRow, EventDeliveryStats};
use crate::infrastructure::db::stores::event_delivery_store::{
    EventDeliveryRepositoryError, EventDeliveryStore,
};
use std::sync::Arc;
use time::OffsetDateTime;

pub struct EventDeliveryRepository {
    store: Arc<dyn EventDeliveryStore>,
}

impl EventDeliveryRepository {
    /// Build a repository that uses the given store implementation.
    pub fn new(store: Arc<dyn EventDeliveryStore>) -> Self {
        Self { store }
    }

    /// Fetch a delivery by its ID. Returns `None` if it doesn't exist.
    pub async fn get(
        &self,
        delivery_id: uuid::Uuid,
    ) -> Result<Option<EventDeliveryRow>, EventDeliveryRepositoryError> {
        self.store.get(delivery_id).await
    }

    /// Create a delivery and return what was stored in the database.
    pub async fn insert(
        &self,
        row: &EventDeliveryRow,
    ) -> Result<EventDeliveryRow, EventDeliveryRepositoryError> {
        self.store.insert(row).await
    }

    /// Conditionally move a pending delivery to a terminal status.
    /// Returns `None` when the delivery was already terminal.
    pub async fn finish(
        &self,
        delivery_id: uuid::Uuid,
        status: &str,
        attempt_count: i32,
        last_error: Option<&str>,
        now: OffsetDateTime,
    ) -> Result<Option<EventDeliveryRow>, EventDeliveryRepositoryError> {
        self.store
            .finish(delivery_id, status, attempt_count, last_error, now)
            .await
    }

    /// Bump the audit attempt counter on a still-pending delivery.
    pub async fn record_attempt(
        &self,
        delivery_id: uuid::Uuid,
        attempt_count: i32,
        last_error: Option<&str>,
        now: OffsetDateTime,
    ) -> Result<(), EventDeliveryRepositoryError> {
        self.store
            .record_attempt(delivery_id, attempt_count, last_error, now)
            .await
    }

    /// Return aggregate delivery counts by status.
    pub async fn stats(&self) -> Result<EventDeliveryStats, EventDeliveryRepositoryError> {
        self.store.stats().await
    }
}
