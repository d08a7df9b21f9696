// Use case: register_webhook.

use crate::application::context::AppContext;
use crate::domain::entities::webhook::Webhook;
use crate::domain::value_objects::ids::{AppId, WebhookId};
use crate::domain::value_objects::timestamps::Timestamp;
use crate::domain::workflows::event_type::EventType;
use crate::infrastructure::db::dto::WebhookRow;
use crate::infrastructure::db::stores::webhook_store::WebhookRepositoryError;
use tracing::info;

/// Registers a subscriber endpoint with its event subscriptions.
pub struct RegisterWebhookUseCase;

#[derive(Debug, Clone)]
pub struct NewWebhook {
    pub app_id: AppId,
    pub target_url: String,
    pub secret: String,
    pub events: Vec<String>,
    pub channel: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum RegisterWebhookError {
    /// The target URL is not an absolute http(s) URL.
    InvalidTargetUrl,
    /// A webhook must subscribe to at least one event type.
    NoEvents,
    /// One of the requested event codes is not known.
    UnknownEventType(String),
    /// The signing secret must not be empty.
    EmptySecret,
    Conflict,
    Storage(String),
}

impl RegisterWebhookUseCase {
    pub async fn execute(
        ctx: &AppContext,
        request: NewWebhook,
    ) -> Result<Webhook, RegisterWebhookError> {
        // Step 1: Validate the registration before touching storage.
        if !request.target_url.starts_with("https://")
            && !request.target_url.starts_with("http://")
        {
            return Err(RegisterWebhookError::InvalidTargetUrl);
        }
        if request.secret.is_empty() {
            return Err(RegisterWebhookError::EmptySecret);
        }
        if request.events.is_empty() {
            return Err(RegisterWebhookError::NoEvents);
        }
        let mut events = Vec::with_capacity(request.events.len());
        for code in &request.events {
            match EventType::parse(code) {
                Some(event_type) => events.push(event_type),
                None => return Err(RegisterWebhookError::UnknownEventType(code.clone())),
            }
        }

        // Step 2: Persist the webhook; it is active immediately.
        let webhook = Webhook {
            id: WebhookId::new(),
            app_id: request.app_id,
            target_url: request.target_url,
            secret: request.secret,
            is_active: true,
            events,
            channel: request.channel,
            created_at: Timestamp::now_utc(),
        };
        let stored = ctx
            .repos
            .webhook
            .insert(&WebhookRow::from_entity(&webhook))
            .await
            .map_err(|e| match e {
                WebhookRepositoryError::Conflict => RegisterWebhookError::Conflict,
                other => RegisterWebhookError::Storage(format!("{other:?}")),
            })?;

        info!(
            webhook_id = %webhook.id,
            app_id = %webhook.app_id,
            events = webhook.events.len(),
            "webhook_registered"
        );
        Ok(stored.into_entity())
    }
}
