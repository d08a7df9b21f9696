use std::sync::Arc;

use crate::infrastructure::db::postgres::PostgresDatabase;
use crate::infrastructure::db::postgres::delivery_attempt_store_postgres::DeliveryAttemptStorePostgres;
use crate::infrastructure::db::postgres::event_delivery_store_postgres::EventDeliveryStorePostgres;
use crate::infrastructure::db::postgres::queue_store_postgres::QueueStorePostgres;
use crate::infrastructure::db::postgres::webhook_store_postgres::WebhookStorePostgres;
use crate::infrastructure::db::repositories::delivery_attempt_repository::DeliveryAttemptRepository;
use crate::infrastructure::db::repositories::event_delivery_repository::EventDeliveryRepository;
use crate::infrastructure::db::repositories::queue_repository::QueueRepository;
use crate::infrastructure::db::repositories::webhook_repository::WebhookRepository;

#[derive(Clone)]
pub struct Repositories {
    pub webhook: Arc<WebhookRepository>,
    pub delivery: Arc<EventDeliveryRepository>,
    pub attempt: Arc<DeliveryAttemptRepository>,
    pub queue: Arc<QueueRepository>,
}

impl Repositories {
    /// Build all repositories backed by Postgres stores.
    pub fn postgres(db: Arc<PostgresDatabase>) -> Self {
        let webhook_store = Arc::new(WebhookStorePostgres::new(db.clone()));
        let delivery_store = Arc::new(EventDeliveryStorePostgres::new(db.clone()));
        let attempt_store = Arc::new(DeliveryAttemptStorePostgres::new(db.clone()));
        let queue_store = Arc::new(QueueStorePostgres::new(db));

        Self {
            webhook: Arc::new(WebhookRepository::new(webhook_store)),
            delivery: Arc::new(EventDeliveryRepository::new(delivery_store)),
            attempt: Arc::new(DeliveryAttemptRepository::new(attempt_store)),
            queue: Arc::new(QueueRepository::new(queue_store)),
        }
    }
}
