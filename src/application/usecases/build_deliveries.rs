// Use case: build_deliveries.

use crate::application::context::AppContext;
use crate::domain::entities::event_delivery::EventDelivery;
use crate::domain::entities::webhook::Webhook;
use crate::domain::value_objects::timestamps::Timestamp;
use crate::domain::workflows::envelope::Envelope;
use crate::domain::workflows::event_type::EventType;
use crate::infrastructure::db::dto::EventDeliveryRow;
use serde_json::Value;
use tracing::warn;

/// Builds one delivery per webhook, serializing the payload envelope.
pub struct BuildDeliveriesUseCase;

#[derive(Debug)]
pub enum BuildDeliveriesError {
    Storage(String),
}

#[derive(Debug)]
pub struct BuiltDeliveries {
    pub deliveries: Vec<EventDelivery>,
    /// Webhooks skipped because their envelope could not be serialized.
    pub skipped: usize,
}

impl BuildDeliveriesUseCase {
    /// Build and persist one pending delivery per webhook (async path).
    ///
    /// A serialization failure for one webhook is isolated: the webhook is
    /// skipped and the remaining deliveries are still constructed.
    pub async fn execute(
        ctx: &AppContext,
        event_type: EventType,
        payload: &Value,
        subject_id: &str,
        webhooks: &[Webhook],
    ) -> Result<BuiltDeliveries, BuildDeliveriesError> {
        let now = Timestamp::now_utc();
        let mut deliveries = Vec::with_capacity(webhooks.len());
        let mut skipped = 0;

        for webhook in webhooks {
            // Step 1: Serialize the versioned envelope for this webhook.
            let Some(delivery) = Self::build_one(event_type, payload, subject_id, webhook, now)
            else {
                skipped += 1;
                continue;
            };

            // Step 2: Persist the pending delivery row.
            ctx.repos
                .delivery
                .insert(&EventDeliveryRow::from_entity(&delivery, now))
                .await
                .map_err(|e| BuildDeliveriesError::Storage(format!("{e:?}")))?;

            deliveries.push(delivery);
        }

        Ok(BuiltDeliveries {
            deliveries,
            skipped,
        })
    }

    /// Build deliveries in memory only (sync path: no rows are persisted).
    pub fn build_ephemeral(
        event_type: EventType,
        payload: &Value,
        subject_id: &str,
        webhooks: &[Webhook],
    ) -> BuiltDeliveries {
        let now = Timestamp::now_utc();
        let mut deliveries = Vec::with_capacity(webhooks.len());
        let mut skipped = 0;

        for webhook in webhooks {
            match Self::build_one(event_type, payload, subject_id, webhook, now) {
                Some(delivery) => deliveries.push(delivery),
                None => skipped += 1,
            }
        }

        BuiltDeliveries {
            deliveries,
            skipped,
        }
    }

    fn build_one(
        event_type: EventType,
        payload: &Value,
        subject_id: &str,
        webhook: &Webhook,
        now: Timestamp,
    ) -> Option<EventDelivery> {
        let envelope = Envelope::build(
            event_type,
            payload.clone(),
            subject_id,
            webhook.id,
            now.as_inner(),
        );
        match envelope.to_body() {
            Ok(body) => Some(EventDelivery::pending(webhook.id, event_type, body, now)),
            Err(err) => {
                warn!(
                    webhook_id = %webhook.id,
                    event_type = event_type.as_str(),
                    error = ?err,
                    "delivery_payload_serialization_failed"
                );
                None
            }
        }
    }
}
