// Use case: delivery_stats.

use crate::application::context::AppContext;
use crate::infrastructure::db::dto::EventDeliveryStats;

/// Aggregate delivery counts by status, for operators and readiness probes.
pub struct DeliveryStatsUseCase;

#[derive(Debug)]
pub enum DeliveryStatsError {
    Storage(String),
}

impl DeliveryStatsUseCase {
    pub async fn execute(ctx: &AppContext) -> Result<EventDeliveryStats, DeliveryStatsError> {
        ctx.repos
            .delivery
            .stats()
            .await
            .map_err(|e| DeliveryStatsError::Storage(format!("{e:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::DeliveryStatsUseCase;
    use crate::application::context::test_support::{RecordingTransport, memory_context};
    use crate::domain::entities::event_delivery::EventDelivery;
    use crate::domain::value_objects::ids::WebhookId;
    use crate::domain::value_objects::timestamps::Timestamp;
    use crate::domain::workflows::event_type::EventType;
    use crate::infrastructure::db::dto::EventDeliveryRow;

    #[tokio::test]
    async fn given_mixed_statuses_when_counted_should_group_by_status() {
        let harness = memory_context(RecordingTransport::always(200, "{}"));
        for status in ["pending", "pending", "success", "failed"] {
            let delivery = EventDelivery::pending(
                WebhookId::new(),
                EventType::OrderCreated,
                "{}".to_string(),
                Timestamp::now_utc(),
            );
            let mut row = EventDeliveryRow::from_entity(&delivery, Timestamp::now_utc());
            row.status = status.to_string();
            harness.deliveries.rows.lock().unwrap().push(row);
        }

        let stats = DeliveryStatsUseCase::execute(&harness.ctx).await.unwrap();

        assert_eq!(stats.pending, 2);
        assert_eq!(stats.success, 1);
        assert_eq!(stats.failed, 1);
    }
}
