// Use case: find_webhooks.

use crate::application::context::AppContext;
use crate::domain::entities::webhook::Webhook;
use crate::domain::workflows::event_type::EventType;

/// Registry lookup: active webhooks subscribed to an event type, scoped to
/// an optional channel.
pub struct FindWebhooksUseCase;

#[derive(Debug)]
pub enum FindWebhooksError {
    Storage(String),
}

impl FindWebhooksUseCase {
    /// Return the matching webhooks in registry iteration order.
    /// An empty result is valid, not an error.
    pub async fn execute(
        ctx: &AppContext,
        event_type: EventType,
        channel: Option<&str>,
    ) -> Result<Vec<Webhook>, FindWebhooksError> {
        // Step 1: Narrow by active flag and subscription in storage.
        let rows = ctx
            .repos
            .webhook
            .list_active_for_event(event_type.as_str())
            .await
            .map_err(|e| FindWebhooksError::Storage(format!("{e:?}")))?;

        // Step 2: Map to entities and apply channel scoping.
        let webhooks = rows
            .into_iter()
            .map(|row| row.into_entity())
            .filter(|hook| hook.subscribes_to(event_type) && hook.matches_channel(channel))
            .collect();

        Ok(webhooks)
    }
}
