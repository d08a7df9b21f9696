// Use case: unregister_webhook.

use crate::application::context::AppContext;
use crate::domain::value_objects::ids::WebhookId;
use crate::infrastructure::db::stores::webhook_store::WebhookRepositoryError;
use tracing::info;

/// Removes a subscriber endpoint. Deliveries already persisted for it keep
/// their history; pending ones fail at send time when the webhook is gone.
pub struct UnregisterWebhookUseCase;

#[derive(Debug, PartialEq)]
pub enum UnregisterWebhookError {
    NotFound,
    Storage(String),
}

impl UnregisterWebhookUseCase {
    pub async fn execute(
        ctx: &AppContext,
        webhook_id: WebhookId,
    ) -> Result<(), UnregisterWebhookError> {
        ctx.repos
            .webhook
            .delete(webhook_id.0)
            .await
            .map_err(|e| match e {
                WebhookRepositoryError::NotFound => UnregisterWebhookError::NotFound,
                other => UnregisterWebhookError::Storage(format!("{other:?}")),
            })?;

        info!(webhook_id = %webhook_id, "webhook_unregistered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{UnregisterWebhookError, UnregisterWebhookUseCase};
    use crate::application::context::test_support::{RecordingTransport, memory_context};
    use crate::domain::entities::webhook::Webhook;
    use crate::domain::value_objects::ids::{AppId, WebhookId};
    use crate::domain::value_objects::timestamps::Timestamp;
    use crate::domain::workflows::event_type::EventType;
    use crate::infrastructure::db::dto::WebhookRow;

    #[tokio::test]
    async fn given_registered_webhook_when_unregistered_should_remove_it() {
        let harness = memory_context(RecordingTransport::always(200, "{}"));
        let webhook = Webhook {
            id: WebhookId::new(),
            app_id: AppId::new(),
            target_url: "https://app.example.com/hook".to_string(),
            secret: "s3cr3t".to_string(),
            is_active: true,
            events: vec![EventType::CheckoutUpdated],
            channel: None,
            created_at: Timestamp::now_utc(),
        };
        harness
            .webhooks
            .rows
            .lock()
            .unwrap()
            .push(WebhookRow::from_entity(&webhook));

        UnregisterWebhookUseCase::execute(&harness.ctx, webhook.id)
            .await
            .unwrap();

        assert!(harness.webhooks.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn given_unknown_webhook_when_unregistered_should_return_not_found() {
        let harness = memory_context(RecordingTransport::always(200, "{}"));

        let result = UnregisterWebhookUseCase::execute(&harness.ctx, WebhookId::new()).await;

        assert_eq!(result.unwrap_err(), UnregisterWebhookError::NotFound);
    }
}
