use crate::infrastructure::db::dto::WebhookRow;
use crate::infrastructure::db::stores::webhook_store::{WebhookRepositoryError, WebhookStore};
use std::sync::Arc;

pub struct WebhookRepository {
    store: Arc<dyn WebhookStore>,
}

impl WebhookRepository {
    /// Build a repository that uses the given store implementation.
    pub fn new(store: Arc<dyn WebhookStore>) -> Self {
        Self { store }
    }

    /// Fetch a webhook by its ID. Returns `None` if it doesn't exist.
    pub async fn get(
        &self,
        webhook_id: uuid::Uuid,
    ) -> Result<Option<WebhookRow>, WebhookRepositoryError> {
        self.store.get(webhook_id).await
    }

    /// Create a webhook and return what was stored in the database.
    pub async fn insert(&self, row: &WebhookRow) -> Result<WebhookRow, WebhookRepositoryError> {
        self.store.insert(row).await
    }

    /// Delete a webhook by its ID. Returns an error if it doesn't exist.
    pub async fn delete(&self, webhook_id: uuid::Uuid) -> Result<(), WebhookRepositoryError> {
        self.store.delete(webhook_id).await
    }

    /// List active webhooks subscribed to the given event-type code.
    pub async fn list_active_for_event(
        &self,
        event_code: &str,
    ) -> Result<Vec<WebhookRow>, WebhookRepositoryError> {
        self.store.list_active_for_event(event_code).await
    }
}
