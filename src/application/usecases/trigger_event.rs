// Use case: trigger_event.

use crate::application::context::AppContext;
use crate::application::usecases::build_deliveries::BuildDeliveriesUseCase;
use crate::application::usecases::enqueue_delivery::EnqueueDeliveryUseCase;
use crate::application::usecases::find_webhooks::FindWebhooksUseCase;
use crate::domain::value_objects::ids::DeliveryId;
use crate::domain::value_objects::timestamps::Timestamp;
use crate::domain::workflows::event_type::EventType;
use metrics::counter;
use serde_json::Value;
use tracing::{info, warn};

/// Orchestrates one async event: match webhooks, build deliveries, enqueue.
///
/// Completion means every matched webhook has a persisted delivery and a
/// durably acknowledged queue job; no subscriber has been contacted yet.
pub struct TriggerEventUseCase;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerOutcome {
    pub matched: usize,
    pub enqueued: usize,
    /// Webhooks skipped because their envelope could not be serialized.
    pub skipped: usize,
    /// Deliveries failed terminally because the queue rejected the job.
    pub failed: usize,
    /// Ids of the deliveries that were enqueued, one per webhook.
    pub delivery_ids: Vec<DeliveryId>,
}

#[derive(Debug)]
pub enum TriggerEventError {
    /// Sync event types never go through the queue pipeline.
    NotAsyncEvent,
    Registry(String),
    Builder(String),
}

impl TriggerEventUseCase {
    pub async fn execute(
        ctx: &AppContext,
        event_type: EventType,
        subject_id: &str,
        channel: Option<&str>,
        payload: &Value,
    ) -> Result<TriggerOutcome, TriggerEventError> {
        // Step 1: Only async event types are routed through the queue.
        let Some(route) = ctx.routing.route_for(event_type) else {
            return Err(TriggerEventError::NotAsyncEvent);
        };

        // Step 2: Match active subscribed webhooks, scoped to the channel.
        let webhooks = FindWebhooksUseCase::execute(ctx, event_type, channel)
            .await
            .map_err(|e| TriggerEventError::Registry(format!("{e:?}")))?;

        // Step 3: Zero matches is the common case; nothing is built or written.
        if webhooks.is_empty() {
            return Ok(TriggerOutcome {
                matched: 0,
                enqueued: 0,
                skipped: 0,
                failed: 0,
                delivery_ids: Vec::new(),
            });
        }

        // Step 4: Build and persist one pending delivery per webhook.
        let built =
            BuildDeliveriesUseCase::execute(ctx, event_type, payload, subject_id, &webhooks)
                .await
                .map_err(|e| TriggerEventError::Builder(format!("{e:?}")))?;

        // Step 5: Enqueue each delivery. A queue rejection fails that one
        // delivery; the remaining webhooks still get theirs.
        let mut enqueued = 0;
        let mut failed = 0;
        let mut delivery_ids = Vec::with_capacity(built.deliveries.len());
        for delivery in &built.deliveries {
            match EnqueueDeliveryUseCase::execute(ctx, delivery.id, &route).await {
                Ok(_) => {
                    enqueued += 1;
                    delivery_ids.push(delivery.id);
                }
                Err(err) => {
                    failed += 1;
                    counter!("hookrelay_deliveries_total", "outcome" => "enqueue_failed")
                        .increment(1);
                    warn!(
                        delivery_id = %delivery.id,
                        webhook_id = %delivery.webhook_id,
                        error = ?err,
                        "delivery_enqueue_failed"
                    );
                    if let Err(err) = ctx
                        .repos
                        .delivery
                        .finish(
                            delivery.id.0,
                            "failed",
                            0,
                            Some("queue rejected the job"),
                            Timestamp::now_utc().as_inner(),
                        )
                        .await
                    {
                        warn!(delivery_id = %delivery.id, error = ?err, "delivery_finish_failed");
                    }
                }
            }
        }

        info!(
            event_type = event_type.as_str(),
            subject_id,
            matched = webhooks.len(),
            enqueued,
            queue = %route.queue,
            "event_triggered"
        );

        Ok(TriggerOutcome {
            matched: webhooks.len(),
            enqueued,
            skipped: built.skipped,
            failed,
            delivery_ids,
        })
    }
}
