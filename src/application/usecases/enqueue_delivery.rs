// Use case: enqueue_delivery.

use crate::application::context::AppContext;
use crate::domain::value_objects::ids::{DeliveryId, QueueJobId};
use crate::domain::value_objects::timestamps::Timestamp;
use crate::domain::workflows::routing::Route;
use crate::infrastructure::db::dto::QueueJobRow;

/// Enqueues a durable job carrying only the delivery id.
pub struct EnqueueDeliveryUseCase;

#[derive(Debug)]
pub enum EnqueueDeliveryError {
    Queue(String),
}

impl EnqueueDeliveryUseCase {
    /// Enqueue on the routed queue with retry metadata attached at enqueue
    /// time. Returns once the queue has durably acknowledged the job; the
    /// subscriber endpoint is never contacted here.
    pub async fn execute(
        ctx: &AppContext,
        delivery_id: DeliveryId,
        route: &Route,
    ) -> Result<QueueJobRow, EnqueueDeliveryError> {
        let now = Timestamp::now_utc().as_inner();
        let row = QueueJobRow {
            id: QueueJobId::new().0,
            delivery_id: delivery_id.0,
            queue: route.queue.clone(),
            status: "queued".to_string(),
            attempt: 0,
            max_retries: route.retry_policy.max_retries as i32,
            retry_backoff_seconds: route.retry_policy.retry_backoff_seconds as i64,
            next_attempt_at: now,
            lease_owner: None,
            lease_expires_at: None,
            created_at: now,
            updated_at: now,
        };

        ctx.repos
            .queue
            .enqueue(&row)
            .await
            .map_err(|e| EnqueueDeliveryError::Queue(format!("{e:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::EnqueueDeliveryUseCase;
    use crate::application::context::test_support::{RecordingTransport, memory_context, test_context};
    use crate::domain::value_objects::ids::DeliveryId;
    use crate::domain::workflows::event_type::EventType;

    #[tokio::test]
    async fn given_checkout_route_when_executed_should_carry_retry_metadata() {
        let harness = memory_context(RecordingTransport::always(200, "{}"));
        let delivery_id = DeliveryId::new();
        let route = harness
            .ctx
            .routing
            .route_for(EventType::CheckoutUpdated)
            .unwrap();

        let job = EnqueueDeliveryUseCase::execute(&harness.ctx, delivery_id, &route)
            .await
            .unwrap();

        assert_eq!(job.queue, "checkout-webhook-events");
        assert_eq!(job.delivery_id, delivery_id.0);
        assert_eq!(job.max_retries, 5);
        assert_eq!(job.retry_backoff_seconds, 10);
        assert_eq!(harness.queue.rows.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn given_unavailable_queue_when_executed_should_surface_error() {
        let ctx = test_context();
        let route = ctx.routing.route_for(EventType::CheckoutUpdated).unwrap();

        let result = EnqueueDeliveryUseCase::execute(&ctx, DeliveryId::new(), &route).await;

        assert!(result.is_err());
    }
}
