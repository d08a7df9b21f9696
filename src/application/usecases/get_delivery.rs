// Use case: get_delivery.

use crate::application::context::AppContext;
use crate::domain::value_objects::ids::DeliveryId;
use crate::infrastructure::db::dto::{DeliveryAttemptRow, EventDeliveryRow};

/// Fetches one delivery with its attempt history for inspection.
pub struct GetDeliveryUseCase;

#[derive(Debug)]
pub struct DeliveryDetails {
    pub delivery: EventDeliveryRow,
    pub attempts: Vec<DeliveryAttemptRow>,
}

#[derive(Debug)]
pub enum GetDeliveryError {
    NotFound,
    Storage(String),
}

impl GetDeliveryUseCase {
    pub async fn execute(
        ctx: &AppContext,
        delivery_id: DeliveryId,
    ) -> Result<DeliveryDetails, GetDeliveryError> {
        let delivery = ctx
            .repos
            .delivery
            .get(delivery_id.0)
            .await
            .map_err(|e| GetDeliveryError::Storage(format!("{e:?}")))?
            .ok_or(GetDeliveryError::NotFound)?;

        let attempts = ctx
            .repos
            .attempt
            .list_for_delivery(delivery_id.0)
            .await
            .map_err(|e| GetDeliveryError::Storage(format!("{e:?}")))?;

        Ok(DeliveryDetails { delivery, attempts })
    }
}

#[cfg(test)]
mod tests {
    use super::{GetDeliveryError, GetDeliveryUseCase};
    use crate::application::context::test_support::{RecordingTransport, memory_context};
    use crate::domain::entities::delivery_attempt::DeliveryAttempt;
    use crate::domain::entities::event_delivery::EventDelivery;
    use crate::domain::value_objects::ids::{DeliveryId, WebhookId};
    use crate::domain::value_objects::timestamps::Timestamp;
    use crate::domain::workflows::event_type::EventType;
    use crate::infrastructure::db::dto::{DeliveryAttemptRow, EventDeliveryRow};

    #[tokio::test]
    async fn given_delivery_with_attempts_when_fetched_should_return_history() {
        let harness = memory_context(RecordingTransport::always(200, "{}"));
        let delivery = EventDelivery::pending(
            WebhookId::new(),
            EventType::CheckoutUpdated,
            "{}".to_string(),
            Timestamp::now_utc(),
        );
        harness
            .deliveries
            .rows
            .lock()
            .unwrap()
            .push(EventDeliveryRow::from_entity(&delivery, Timestamp::now_utc()));
        let attempt = DeliveryAttempt::record(
            delivery.id,
            1,
            Some(500),
            12,
            Some("subscriber answered 500".to_string()),
            Timestamp::now_utc(),
        );
        harness
            .attempts
            .rows
            .lock()
            .unwrap()
            .push(DeliveryAttemptRow::from_entity(&attempt));

        let details = GetDeliveryUseCase::execute(&harness.ctx, delivery.id)
            .await
            .unwrap();

        assert_eq!(details.delivery.id, delivery.id.0);
        assert_eq!(details.attempts.len(), 1);
        assert_eq!(details.attempts[0].response_status, Some(500));
    }

    #[tokio::test]
    async fn given_unknown_delivery_when_fetched_should_return_not_found() {
        let harness = memory_context(RecordingTransport::always(200, "{}"));

        let result = GetDeliveryUseCase::execute(&harness.ctx, DeliveryId::new()).await;

        assert!(matches!(result, Err(GetDeliveryError::NotFound)));
    }
}
