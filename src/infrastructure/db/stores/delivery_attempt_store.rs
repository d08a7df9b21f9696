use crate::infrastructure::db::database::DatabaseError;
use crate::infrastructure::db::dto::DeliveryAttemptRow;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryAttemptRepositoryError {
    InvalidInput,
    StorageUnavailable,
}

impl From<DatabaseError> for DeliveryAttemptRepositoryError {
    fn from(_: DatabaseError) -> Self {
        DeliveryAttemptRepositoryError::StorageUnavailable
    }
}

#[async_trait]
pub trait DeliveryAttemptStore: Send + Sync {
    /// Append an attempt record. Attempts are never updated or deleted.
    async fn insert(
        &self,
        row: &DeliveryAttemptRow,
    ) -> Result<DeliveryAttemptRow, DeliveryAttemptRepositoryError>;
    /// List attempts for a delivery, oldest first.
    async fn list_for_delivery(
        &self,
        delivery_id: uuid::Uuid,
    ) -> Result<Vec<DeliveryAttemptRow>, DeliveryAttemptRepositoryError>;
}

/// A no-op attempt store used when persistence is not configured.
pub struct DisabledDeliveryAttemptStore;

#[async_trait]
impl DeliveryAttemptStore for DisabledDeliveryAttemptStore {
    async fn insert(
        &self,
        _row: &DeliveryAttemptRow,
    ) -> Result<DeliveryAttemptRow, DeliveryAttemptRepositoryError> {
        Err(DeliveryAttemptRepositoryError::StorageUnavailable)
    }

    async fn list_for_delivery(
        &self,
        _delivery_id: uuid::Uuid,
    ) -> Result<Vec<DeliveryAttemptRow>, DeliveryAttemptRepositoryError> {
        Err(DeliveryAttemptRepositoryError::StorageUnavailable)
    }
}
