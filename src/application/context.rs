use std::sync::Arc;

use crate::config::Settings;
use crate::domain::workflows::routing::RoutingTable;
use crate::infrastructure::db::repositories::Repositories;
use crate::infrastructure::transport::WebhookTransport;

/// Shared application resources used by use cases and workers.
pub struct AppContext {
    pub repos: Repositories,
    pub transport: Arc<dyn WebhookTransport>,
    pub routing: RoutingTable,
    pub settings: Settings,
}

impl AppContext {
    /// Build a new application context with shared repositories and transport.
    pub fn new(
        repos: Repositories,
        transport: Arc<dyn WebhookTransport>,
        routing: RoutingTable,
        settings: Settings,
    ) -> Self {
        Self {
            repos,
            transport,
            routing,
            settings,
        }
    }
}

#[cfg(test)]
pub mod test_support {
    use super::AppContext;
    use crate::config::{
        Db, Delivery, Observability, Queues, Server, Settings, Workers,
    };
    use crate::domain::workflows::routing::RoutingTable;
    use crate::infrastructure::db::dto::{
        DeliveryAttemptRow, EventDeliveryRow, EventDeliveryStats, QueueJobRow, WebhookRow,
    };
    use crate::infrastructure::db::repositories::Repositories;
    use crate::infrastructure::db::repositories::delivery_attempt_repository::DeliveryAttemptRepository;
    use crate::infrastructure::db::repositories::event_delivery_repository::EventDeliveryRepository;
    use crate::infrastructure::db::repositories::queue_repository::QueueRepository;
    use crate::infrastructure::db::repositories::webhook_repository::WebhookRepository;
    use crate::infrastructure::db::stores::delivery_attempt_store::{
        DeliveryAttemptRepositoryError, DeliveryAttemptStore, DisabledDeliveryAttemptStore,
    };
    use crate::infrastructure::db::stores::event_delivery_store::{
        DisabledEventDeliveryStore, EventDeliveryRepositoryError, EventDeliveryStore,
    };
    use crate::infrastructure::db::stores::queue_store::{
        DisabledQueueStore, QueueRepositoryError, QueueStore,
    };
    use crate::infrastructure::db::stores::webhook_store::{
        DisabledWebhookStore, WebhookRepositoryError, WebhookStore,
    };
    use crate::infrastructure::transport::{
        TransportError, TransportResponse, WebhookTransport,
    };
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use time::OffsetDateTime;

    pub fn test_settings() -> Settings {
        Settings {
            server: Server {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            db: Db {
                url: "postgres://localhost/hookrelay_test".to_string(),
            },
            workers: Workers {
                count: 1,
                poll_interval_ms: 250,
                batch_size: 10,
                lease_timeout_seconds: 30,
            },
            delivery: Delivery {
                request_timeout_ms: 2_000,
                sync_timeout_ms: 20_000,
                max_retries: 5,
                retry_backoff_seconds: 10,
                backoff_max_ms: 600_000,
            },
            queues: Queues {
                default: "webhook-events".to_string(),
                checkout_events: "checkout-webhook-events".to_string(),
            },
            observability: Observability {
                service_name: "hook-relay".to_string(),
                enable_metrics: false,
                log_filter: "info".to_string(),
            },
        }
    }

    /// Context backed by disabled stores and a failing transport.
    /// Tests swap in memory stores or recording transports as needed.
    pub fn test_context() -> AppContext {
        let settings = test_settings();
        let repos = Repositories {
            webhook: Arc::new(WebhookRepository::new(Arc::new(DisabledWebhookStore))),
            delivery: Arc::new(EventDeliveryRepository::new(Arc::new(
                DisabledEventDeliveryStore,
            ))),
            attempt: Arc::new(DeliveryAttemptRepository::new(Arc::new(
                DisabledDeliveryAttemptStore,
            ))),
            queue: Arc::new(QueueRepository::new(Arc::new(DisabledQueueStore))),
        };
        AppContext {
            repos,
            transport: Arc::new(FailingTransport),
            routing: RoutingTable::from_settings(&settings),
            settings,
        }
    }

    /// Transport that fails every call; the default for tests that must not
    /// reach the network.
    pub struct FailingTransport;

    #[async_trait]
    impl WebhookTransport for FailingTransport {
        async fn post_signed(
            &self,
            _target_url: &str,
            _secret: &str,
            _body: &str,
            _timeout: Duration,
        ) -> Result<TransportResponse, TransportError> {
            Err(TransportError::Request("transport disabled".to_string()))
        }
    }

    /// One recorded outbound call.
    #[derive(Debug, Clone)]
    pub struct RecordedCall {
        pub target_url: String,
        pub secret: String,
        pub body: String,
        pub timeout: Duration,
    }

    /// Transport fake that records calls and replays queued responses.
    pub struct RecordingTransport {
        pub calls: Mutex<Vec<RecordedCall>>,
        pub responses: Mutex<Vec<Result<TransportResponse, TransportError>>>,
    }

    impl RecordingTransport {
        /// Answer every call with the given status and body.
        pub fn always(status: u16, body: &str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                responses: Mutex::new(vec![Ok(TransportResponse {
                    status,
                    body: body.to_string(),
                    duration_ms: 1,
                })]),
            }
        }

        /// Answer calls with the given responses in order; the last one
        /// repeats once the list is exhausted.
        pub fn sequence(responses: Vec<Result<TransportResponse, TransportError>>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                responses: Mutex::new(responses),
            }
        }

        /// Fail every call with the given transport error.
        pub fn failing(error: TransportError) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                responses: Mutex::new(vec![Err(error)]),
            }
        }

        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WebhookTransport for RecordingTransport {
        async fn post_signed(
            &self,
            target_url: &str,
            secret: &str,
            body: &str,
            timeout: Duration,
        ) -> Result<TransportResponse, TransportError> {
            self.calls.lock().unwrap().push(RecordedCall {
                target_url: target_url.to_string(),
                secret: secret.to_string(),
                body: body.to_string(),
                timeout,
            });
            let responses = self.responses.lock().unwrap();
            // Last response repeats once the queue is exhausted.
            let index = (self.calls.lock().unwrap().len() - 1).min(responses.len() - 1);
            responses[index].clone()
        }
    }

    /// In-memory webhook store for registry tests.
    #[derive(Default)]
    pub struct MemoryWebhookStore {
        pub rows: Mutex<Vec<WebhookRow>>,
    }

    impl MemoryWebhookStore {
        pub fn with(rows: Vec<WebhookRow>) -> Self {
            Self {
                rows: Mutex::new(rows),
            }
        }
    }

    #[async_trait]
    impl WebhookStore for MemoryWebhookStore {
        async fn get(
            &self,
            webhook_id: uuid::Uuid,
        ) -> Result<Option<WebhookRow>, WebhookRepositoryError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id == webhook_id)
                .cloned())
        }

        async fn insert(&self, row: &WebhookRow) -> Result<WebhookRow, WebhookRepositoryError> {
            let mut rows = self.rows.lock().unwrap();
            if rows.iter().any(|r| r.id == row.id) {
                return Err(WebhookRepositoryError::Conflict);
            }
            rows.push(row.clone());
            Ok(row.clone())
        }

        async fn delete(&self, webhook_id: uuid::Uuid) -> Result<(), WebhookRepositoryError> {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|r| r.id != webhook_id);
            if rows.len() == before {
                return Err(WebhookRepositoryError::NotFound);
            }
            Ok(())
        }

        async fn list_active_for_event(
            &self,
            event_code: &str,
        ) -> Result<Vec<WebhookRow>, WebhookRepositoryError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.is_active && r.events.iter().any(|e| e == event_code))
                .cloned()
                .collect())
        }
    }

    /// In-memory delivery store for dispatch tests.
    #[derive(Default)]
    pub struct MemoryDeliveryStore {
        pub rows: Mutex<Vec<EventDeliveryRow>>,
    }

    #[async_trait]
    impl EventDeliveryStore for MemoryDeliveryStore {
        async fn get(
            &self,
            delivery_id: uuid::Uuid,
        ) -> Result<Option<EventDeliveryRow>, EventDeliveryRepositoryError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id == delivery_id)
                .cloned())
        }

        async fn insert(
            &self,
            row: &EventDeliveryRow,
        ) -> Result<EventDeliveryRow, EventDeliveryRepositoryError> {
            self.rows.lock().unwrap().push(row.clone());
            Ok(row.clone())
        }

        async fn finish(
            &self,
            delivery_id: uuid::Uuid,
            status: &str,
            attempt_count: i32,
            last_error: Option<&str>,
            now: OffsetDateTime,
        ) -> Result<Option<EventDeliveryRow>, EventDeliveryRepositoryError> {
            let mut rows = self.rows.lock().unwrap();
            let Some(row) = rows
                .iter_mut()
                .find(|r| r.id == delivery_id && r.status == "pending")
            else {
                return Ok(None);
            };
            row.status = status.to_string();
            row.attempt_count = attempt_count;
            row.last_error = last_error.map(|e| e.to_string());
            row.updated_at = now;
            Ok(Some(row.clone()))
        }

        async fn record_attempt(
            &self,
            delivery_id: uuid::Uuid,
            attempt_count: i32,
            last_error: Option<&str>,
            now: OffsetDateTime,
        ) -> Result<(), EventDeliveryRepositoryError> {
            let mut rows = self.rows.lock().unwrap();
            if let Some(row) = rows
                .iter_mut()
                .find(|r| r.id == delivery_id && r.status == "pending")
            {
                row.attempt_count = attempt_count;
                row.last_error = last_error.map(|e| e.to_string());
                row.updated_at = now;
            }
            Ok(())
        }

        async fn stats(&self) -> Result<EventDeliveryStats, EventDeliveryRepositoryError> {
            let rows = self.rows.lock().unwrap();
            Ok(EventDeliveryStats {
                pending: rows.iter().filter(|r| r.status == "pending").count() as i64,
                success: rows.iter().filter(|r| r.status == "success").count() as i64,
                failed: rows.iter().filter(|r| r.status == "failed").count() as i64,
            })
        }
    }

    /// In-memory attempt store recording append-only history.
    #[derive(Default)]
    pub struct MemoryAttemptStore {
        pub rows: Mutex<Vec<DeliveryAttemptRow>>,
    }

    #[async_trait]
    impl DeliveryAttemptStore for MemoryAttemptStore {
        async fn insert(
            &self,
            row: &DeliveryAttemptRow,
        ) -> Result<DeliveryAttemptRow, DeliveryAttemptRepositoryError> {
            self.rows.lock().unwrap().push(row.clone());
            Ok(row.clone())
        }

        async fn list_for_delivery(
            &self,
            delivery_id: uuid::Uuid,
        ) -> Result<Vec<DeliveryAttemptRow>, DeliveryAttemptRepositoryError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.delivery_id == delivery_id)
                .cloned()
                .collect())
        }
    }

    /// In-memory queue store capturing enqueues and status changes.
    #[derive(Default)]
    pub struct MemoryQueueStore {
        pub rows: Mutex<Vec<QueueJobRow>>,
    }

    #[async_trait]
    impl QueueStore for MemoryQueueStore {
        async fn enqueue(&self, row: &QueueJobRow) -> Result<QueueJobRow, QueueRepositoryError> {
            self.rows.lock().unwrap().push(row.clone());
            Ok(row.clone())
        }

        async fn claim_next_due(
            &self,
            worker_id: &str,
            queues: &[String],
            now: OffsetDateTime,
            lease_expires_at: OffsetDateTime,
        ) -> Result<Option<QueueJobRow>, QueueRepositoryError> {
            let mut rows = self.rows.lock().unwrap();
            let Some(row) = rows.iter_mut().find(|r| {
                r.status == "queued" && queues.contains(&r.queue) && r.next_attempt_at <= now
            }) else {
                return Ok(None);
            };
            row.status = "assigned".to_string();
            row.lease_owner = Some(worker_id.to_string());
            row.lease_expires_at = Some(lease_expires_at);
            row.updated_at = now;
            Ok(Some(row.clone()))
        }

        async fn mark_done(
            &self,
            job_id: uuid::Uuid,
            now: OffsetDateTime,
        ) -> Result<(), QueueRepositoryError> {
            self.set_status(job_id, "done", now)
        }

        async fn reschedule(
            &self,
            job_id: uuid::Uuid,
            attempt: i32,
            next_attempt_at: OffsetDateTime,
            now: OffsetDateTime,
        ) -> Result<(), QueueRepositoryError> {
            let mut rows = self.rows.lock().unwrap();
            let Some(row) = rows.iter_mut().find(|r| r.id == job_id) else {
                return Err(QueueRepositoryError::NotFound);
            };
            row.status = "queued".to_string();
            row.attempt = attempt;
            row.next_attempt_at = next_attempt_at;
            row.lease_owner = None;
            row.lease_expires_at = None;
            row.updated_at = now;
            Ok(())
        }

        async fn mark_dead(
            &self,
            job_id: uuid::Uuid,
            now: OffsetDateTime,
        ) -> Result<(), QueueRepositoryError> {
            self.set_status(job_id, "dead", now)
        }

        async fn release_expired(
            &self,
            now: OffsetDateTime,
            _limit: u32,
        ) -> Result<u64, QueueRepositoryError> {
            let mut rows = self.rows.lock().unwrap();
            let mut released = 0;
            for row in rows.iter_mut() {
                if row.status == "assigned"
                    && row.lease_expires_at.map(|at| at <= now).unwrap_or(false)
                {
                    row.status = "queued".to_string();
                    row.lease_owner = None;
                    row.lease_expires_at = None;
                    row.updated_at = now;
                    released += 1;
                }
            }
            Ok(released)
        }

        async fn get_by_delivery(
            &self,
            delivery_id: uuid::Uuid,
        ) -> Result<Option<QueueJobRow>, QueueRepositoryError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.delivery_id == delivery_id)
                .cloned())
        }
    }

    impl MemoryQueueStore {
        fn set_status(
            &self,
            job_id: uuid::Uuid,
            status: &str,
            now: OffsetDateTime,
        ) -> Result<(), QueueRepositoryError> {
            let mut rows = self.rows.lock().unwrap();
            let Some(row) = rows.iter_mut().find(|r| r.id == job_id) else {
                return Err(QueueRepositoryError::NotFound);
            };
            row.status = status.to_string();
            row.lease_owner = None;
            row.lease_expires_at = None;
            row.updated_at = now;
            Ok(())
        }
    }

    /// Context wired with memory stores; returns the stores for assertions.
    pub struct MemoryContext {
        pub ctx: AppContext,
        pub webhooks: Arc<MemoryWebhookStore>,
        pub deliveries: Arc<MemoryDeliveryStore>,
        pub attempts: Arc<MemoryAttemptStore>,
        pub queue: Arc<MemoryQueueStore>,
        pub transport: Arc<RecordingTransport>,
    }

    pub fn memory_context(transport: RecordingTransport) -> MemoryContext {
        let settings = test_settings();
        let webhooks = Arc::new(MemoryWebhookStore::default());
        let deliveries = Arc::new(MemoryDeliveryStore::default());
        let attempts = Arc::new(MemoryAttemptStore::default());
        let queue = Arc::new(MemoryQueueStore::default());
        let transport = Arc::new(transport);

        let repos = Repositories {
            webhook: Arc::new(WebhookRepository::new(webhooks.clone())),
            delivery: Arc::new(EventDeliveryRepository::new(deliveries.clone())),
            attempt: Arc::new(DeliveryAttemptRepository::new(attempts.clone())),
            queue: Arc::new(QueueRepository::new(queue.clone())),
        };

        MemoryContext {
            ctx: AppContext {
                repos,
                transport: transport.clone(),
                routing: RoutingTable::from_settings(&settings),
                settings,
            },
            webhooks,
            deliveries,
            attempts,
            queue,
            transport,
        }
    }
}
