use crate::infrastructure::db::dto::DeliveryAttemptRow;
use crate::infrastructure::db::stores::delivery_attempt_store::{
    DeliveryAttemptRepositoryError, DeliveryAttemptStore,
};
use std::sync::Arc;

pub struct DeliveryAttemptRepository {
    store: Arc<dyn DeliveryAttemptStore>,
}

impl DeliveryAttemptRepository {
    /// Build a repository that uses the given store implementation.
    pub fn new(store: Arc<dyn DeliveryAttemptStore>) -> Self {
        Self { store }
    }

    /// Append an attempt record to a delivery's history.
    pub async fn insert(
        &self,
        row: &DeliveryAttemptRow,
    ) -> Result<DeliveryAttemptRow, DeliveryAttemptRepositoryError> {
        self.store.insert(row).await
    }

    /// List attempts for a delivery, oldest first.
    pub async fn list_for_delivery(
        &self,
        delivery_id: uuid::Uuid,
    ) -> Result<Vec<DeliveryAttemptRow>, DeliveryAttemptRepositoryError> {
        self.store.list_for_delivery(delivery_id).await
    }
}
