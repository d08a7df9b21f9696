// Use case: call_sync_webhook.

use crate::application::context::AppContext;
use crate::domain::entities::event_delivery::EventDelivery;
use crate::domain::entities::webhook::Webhook;
use crate::domain::value_objects::ids::WebhookId;
use crate::domain::workflows::event_type::EventType;
use crate::domain::workflows::sync_response::{ResponseParseError, SyncResponse};
use crate::infrastructure::transport::TransportError;
use std::time::Duration;
use tracing::warn;

/// One blocking call to a sync subscriber. Nothing is persisted here; the
/// delivery is an in-memory value and the response flows straight back into
/// the triggering business transaction.
pub struct CallSyncWebhookUseCase;

/// Parsed contribution from one sync subscriber, attributable to the
/// webhook that produced it.
#[derive(Debug)]
pub struct SyncCallResult {
    pub webhook_id: WebhookId,
    pub event_type: EventType,
    pub response: SyncResponse,
    pub duration_ms: u64,
}

#[derive(Debug)]
pub enum CallSyncWebhookError {
    /// The event type is async and has no sync response contract.
    NotSyncEvent,
    /// The subscriber did not answer within the sync timeout.
    Timeout,
    /// The subscriber answered with a non-2xx status.
    Http { status: u16 },
    /// The request failed before a response arrived.
    Transport(String),
    /// The subscriber answered 2xx but the body did not match the
    /// response contract for this event type.
    ResponseParse(String),
}

impl CallSyncWebhookUseCase {
    pub async fn execute(
        ctx: &AppContext,
        webhook: &Webhook,
        delivery: &EventDelivery,
    ) -> Result<SyncCallResult, CallSyncWebhookError> {
        // Step 1: Only sync event types have a response to wait for.
        if !delivery.event_type.is_sync() {
            return Err(CallSyncWebhookError::NotSyncEvent);
        }

        // Step 2: Post the signed envelope with the bounded sync timeout.
        let timeout = Duration::from_millis(ctx.settings.delivery.sync_timeout_ms);
        let response = ctx
            .transport
            .post_signed(&webhook.target_url, &webhook.secret, &delivery.payload, timeout)
            .await
            .map_err(|err| match err {
                TransportError::Timeout => CallSyncWebhookError::Timeout,
                TransportError::Request(message) => CallSyncWebhookError::Transport(message),
            })?;

        if !response.is_success() {
            return Err(CallSyncWebhookError::Http {
                status: response.status,
            });
        }

        // Step 3: Parse the contribution against the event-type contract.
        let parsed = SyncResponse::parse(delivery.event_type, &response.body).map_err(|err| {
            warn!(
                webhook_id = %webhook.id,
                event_type = delivery.event_type.as_str(),
                "sync_response_malformed"
            );
            match err {
                ResponseParseError::Malformed(message) => {
                    CallSyncWebhookError::ResponseParse(message)
                }
                ResponseParseError::NotSyncEvent => CallSyncWebhookError::NotSyncEvent,
            }
        })?;

        Ok(SyncCallResult {
            webhook_id: webhook.id,
            event_type: delivery.event_type,
            response: parsed,
            duration_ms: response.duration_ms,
        })
    }
}
