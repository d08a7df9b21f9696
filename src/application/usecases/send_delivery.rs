// Use case: send_delivery.

use crate::application::context::AppContext;
use crate::domain::entities::delivery_attempt::DeliveryAttempt;
use crate::domain::value_objects::ids::DeliveryId;
use crate::domain::value_objects::timestamps::Timestamp;
use crate::domain::workflows::retry_policy::RetryPolicy;
use crate::infrastructure::db::dto::{DeliveryAttemptRow, QueueJobRow};
use crate::infrastructure::transport::{TransportError, TransportResponse};
use metrics::counter;
use std::time::Duration;
use tracing::{info, warn};

/// Executes one claimed queue job: a single HTTP attempt for its delivery,
/// followed by the success / retry / exhaustion bookkeeping.
pub struct SendDeliveryUseCase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The subscriber acknowledged with a 2xx response.
    Delivered,
    /// The attempt failed and a retry was scheduled.
    Rescheduled,
    /// The attempt failed and no retries remain.
    Exhausted,
    /// The delivery was already terminal; the job is a duplicate and is
    /// completed without contacting the subscriber.
    AlreadyTerminal,
    /// The delivery or its webhook no longer exists.
    Missing,
}

#[derive(Debug)]
pub enum SendDeliveryError {
    Storage(String),
    Queue(String),
}

impl SendDeliveryUseCase {
    pub async fn execute(
        ctx: &AppContext,
        job: &QueueJobRow,
    ) -> Result<SendOutcome, SendDeliveryError> {
        let now = Timestamp::now_utc();

        // Step 1: Load the delivery the job points at.
        let Some(delivery) = ctx
            .repos
            .delivery
            .get(job.delivery_id)
            .await
            .map_err(|e| SendDeliveryError::Storage(format!("{e:?}")))?
        else {
            warn!(delivery_id = %job.delivery_id, "delivery_missing_for_job");
            Self::complete_job(ctx, job, now).await?;
            return Ok(SendOutcome::Missing);
        };

        // Step 2: Duplicate executions of a finished delivery are no-ops.
        if !delivery.is_pending() {
            Self::complete_job(ctx, job, now).await?;
            return Ok(SendOutcome::AlreadyTerminal);
        }

        // Step 3: Load the subscriber endpoint.
        let Some(webhook) = ctx
            .repos
            .webhook
            .get(delivery.webhook_id)
            .await
            .map_err(|e| SendDeliveryError::Storage(format!("{e:?}")))?
        else {
            warn!(
                delivery_id = %job.delivery_id,
                webhook_id = %delivery.webhook_id,
                "webhook_missing_for_delivery"
            );
            ctx.repos
                .delivery
                .finish(
                    job.delivery_id,
                    "failed",
                    job.attempt,
                    Some("webhook no longer registered"),
                    now.as_inner(),
                )
                .await
                .map_err(|e| SendDeliveryError::Storage(format!("{e:?}")))?;
            Self::complete_job(ctx, job, now).await?;
            return Ok(SendOutcome::Missing);
        };

        // Step 4: One HTTP attempt, signed, with the worker request timeout.
        let attempt_number = job.attempt + 1;
        let timeout = Duration::from_millis(ctx.settings.delivery.request_timeout_ms);
        let result = ctx
            .transport
            .post_signed(&webhook.target_url, &webhook.secret, &delivery.payload, timeout)
            .await;

        // Step 5: Append the attempt to the audit history, for any outcome.
        let attempt = Self::attempt_record(job.delivery_id, attempt_number as u32, &result, now);
        ctx.repos
            .attempt
            .insert(&DeliveryAttemptRow::from_entity(&attempt))
            .await
            .map_err(|e| SendDeliveryError::Storage(format!("{e:?}")))?;

        match result {
            Ok(response) if response.is_success() => {
                // Step 6a: Success. Finish the delivery, then complete the job.
                ctx.repos
                    .delivery
                    .finish(job.delivery_id, "success", attempt_number, None, now.as_inner())
                    .await
                    .map_err(|e| SendDeliveryError::Storage(format!("{e:?}")))?;
                Self::complete_job(ctx, job, now).await?;
                counter!("hookrelay_deliveries_total", "outcome" => "success").increment(1);
                info!(
                    delivery_id = %job.delivery_id,
                    attempt = attempt_number,
                    status = response.status,
                    "delivery_succeeded"
                );
                Ok(SendOutcome::Delivered)
            }
            other => {
                // Step 6b: Failure. Retry with backoff or give up.
                let error = Self::describe_failure(&other);
                Self::handle_failure(ctx, job, attempt_number, &error, now).await
            }
        }
    }

    async fn handle_failure(
        ctx: &AppContext,
        job: &QueueJobRow,
        attempt_number: i32,
        error: &str,
        now: Timestamp,
    ) -> Result<SendOutcome, SendDeliveryError> {
        let policy = RetryPolicy {
            max_retries: job.max_retries.clamp(0, u8::MAX as i32) as u8,
            retry_backoff_seconds: job.retry_backoff_seconds.max(0) as u64,
            max_delay_ms: ctx.settings.delivery.backoff_max_ms,
        };

        // `job.attempt` counts retries already used; the first attempt is free.
        if policy.can_retry(job.attempt.clamp(0, u8::MAX as i32) as u8) {
            let delay = policy.next_delay(attempt_number.clamp(1, u8::MAX as i32) as u8);
            ctx.repos
                .delivery
                .record_attempt(job.delivery_id, attempt_number, Some(error), now.as_inner())
                .await
                .map_err(|e| SendDeliveryError::Storage(format!("{e:?}")))?;
            ctx.repos
                .queue
                .reschedule(job.id, attempt_number, now.as_inner() + delay, now.as_inner())
                .await
                .map_err(|e| SendDeliveryError::Queue(format!("{e:?}")))?;
            warn!(
                delivery_id = %job.delivery_id,
                attempt = attempt_number,
                delay_ms = delay.whole_milliseconds() as i64,
                error,
                "delivery_attempt_failed_retrying"
            );
            Ok(SendOutcome::Rescheduled)
        } else {
            ctx.repos
                .delivery
                .finish(job.delivery_id, "failed", attempt_number, Some(error), now.as_inner())
                .await
                .map_err(|e| SendDeliveryError::Storage(format!("{e:?}")))?;
            ctx.repos
                .queue
                .mark_dead(job.id, now.as_inner())
                .await
                .map_err(|e| SendDeliveryError::Queue(format!("{e:?}")))?;
            counter!("hookrelay_deliveries_total", "outcome" => "failed").increment(1);
            warn!(
                delivery_id = %job.delivery_id,
                attempt = attempt_number,
                error,
                "delivery_retries_exhausted"
            );
            Ok(SendOutcome::Exhausted)
        }
    }

    async fn complete_job(
        ctx: &AppContext,
        job: &QueueJobRow,
        now: Timestamp,
    ) -> Result<(), SendDeliveryError> {
        ctx.repos
            .queue
            .mark_done(job.id, now.as_inner())
            .await
            .map_err(|e| SendDeliveryError::Queue(format!("{e:?}")))
    }

    fn attempt_record(
        delivery_id: uuid::Uuid,
        attempt_number: u32,
        result: &Result<TransportResponse, TransportError>,
        now: Timestamp,
    ) -> DeliveryAttempt {
        match result {
            Ok(response) => DeliveryAttempt::record(
                DeliveryId(delivery_id),
                attempt_number,
                Some(response.status),
                response.duration_ms,
                if response.is_success() {
                    None
                } else {
                    Some(format!("subscriber answered {}", response.status))
                },
                now,
            ),
            Err(err) => DeliveryAttempt::record(
                DeliveryId(delivery_id),
                attempt_number,
                None,
                0,
                Some(Self::describe_error(err)),
                now,
            ),
        }
    }

    fn describe_failure(result: &Result<TransportResponse, TransportError>) -> String {
        match result {
            Ok(response) => format!("subscriber answered {}", response.status),
            Err(err) => Self::describe_error(err),
        }
    }

    fn describe_error(err: &TransportError) -> String {
        match err {
            TransportError::Timeout => "request timed out".to_string(),
            TransportError::Request(message) => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SendDeliveryUseCase, SendOutcome};
    use crate::application::context::test_support::{
        MemoryContext, RecordingTransport, memory_context,
    };
    use crate::domain::entities::event_delivery::EventDelivery;
    use crate::domain::entities::webhook::Webhook;
    use crate::domain::value_objects::ids::{AppId, DeliveryId, QueueJobId, WebhookId};
    use crate::domain::value_objects::timestamps::Timestamp;
    use crate::domain::workflows::event_type::EventType;
    use crate::infrastructure::db::dto::{EventDeliveryRow, QueueJobRow, WebhookRow};
    use crate::infrastructure::transport::TransportError;
    use time::Duration;

    fn seed(harness: &MemoryContext, attempt: i32) -> QueueJobRow {
        let webhook = Webhook {
            id: WebhookId::new(),
            app_id: AppId::new(),
            target_url: "https://app.example.com/hook".to_string(),
            secret: "s3cr3t".to_string(),
            is_active: true,
            events: vec![EventType::CheckoutUpdated],
            channel: None,
            created_at: Timestamp::now_utc(),
        };
        let delivery = EventDelivery::pending(
            webhook.id,
            EventType::CheckoutUpdated,
            r#"{"version":1}"#.to_string(),
            Timestamp::now_utc(),
        );
        harness
            .webhooks
            .rows
            .lock()
            .unwrap()
            .push(WebhookRow::from_entity(&webhook));
        harness
            .deliveries
            .rows
            .lock()
            .unwrap()
            .push(EventDeliveryRow::from_entity(&delivery, Timestamp::now_utc()));

        let now = Timestamp::now_utc().as_inner();
        let job = QueueJobRow {
            id: QueueJobId::new().0,
            delivery_id: delivery.id.0,
            queue: "checkout-webhook-events".to_string(),
            status: "assigned".to_string(),
            attempt,
            max_retries: 5,
            retry_backoff_seconds: 10,
            next_attempt_at: now,
            lease_owner: Some("worker-0".to_string()),
            lease_expires_at: Some(now + Duration::seconds(30)),
            created_at: now,
            updated_at: now,
        };
        harness.queue.rows.lock().unwrap().push(job.clone());
        job
    }

    #[tokio::test]
    async fn given_success_response_when_sent_should_finish_delivery_and_complete_job() {
        let harness = memory_context(RecordingTransport::always(200, "{}"));
        let job = seed(&harness, 0);

        let outcome = SendDeliveryUseCase::execute(&harness.ctx, &job).await.unwrap();

        assert_eq!(outcome, SendOutcome::Delivered);
        let delivery = harness.deliveries.rows.lock().unwrap()[0].clone();
        assert_eq!(delivery.status, "success");
        assert_eq!(delivery.attempt_count, 1);
        assert!(harness.queue.rows.lock().unwrap()[0].is_done());

        let attempts = harness.attempts.rows.lock().unwrap();
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].response_status, Some(200));

        let calls = harness.transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].target_url, "https://app.example.com/hook");
        assert_eq!(calls[0].secret, "s3cr3t");
        assert_eq!(
            calls[0].timeout,
            std::time::Duration::from_millis(
                harness.ctx.settings.delivery.request_timeout_ms
            )
        );
    }

    #[tokio::test]
    async fn given_server_error_when_retries_remain_should_reschedule_with_backoff() {
        let harness = memory_context(RecordingTransport::always(500, "boom"));
        let job = seed(&harness, 0);
        let before = Timestamp::now_utc().as_inner();

        let outcome = SendDeliveryUseCase::execute(&harness.ctx, &job).await.unwrap();

        assert_eq!(outcome, SendOutcome::Rescheduled);
        let requeued = harness.queue.rows.lock().unwrap()[0].clone();
        assert!(requeued.is_queued());
        assert_eq!(requeued.attempt, 1);
        // First retry backs off by retry_backoff_seconds.
        assert!(requeued.next_attempt_at >= before + Duration::seconds(10));

        let delivery = harness.deliveries.rows.lock().unwrap()[0].clone();
        assert_eq!(delivery.status, "pending");
        assert_eq!(delivery.attempt_count, 1);
        assert!(delivery.last_error.unwrap().contains("500"));
    }

    #[tokio::test]
    async fn given_timeout_when_retries_exhausted_should_fail_delivery_and_mark_dead() {
        let harness = memory_context(RecordingTransport::failing(TransportError::Timeout));
        let job = seed(&harness, 5);

        let outcome = SendDeliveryUseCase::execute(&harness.ctx, &job).await.unwrap();

        assert_eq!(outcome, SendOutcome::Exhausted);
        let delivery = harness.deliveries.rows.lock().unwrap()[0].clone();
        assert_eq!(delivery.status, "failed");
        assert_eq!(delivery.attempt_count, 6);
        assert_eq!(delivery.last_error.as_deref(), Some("request timed out"));
        assert!(harness.queue.rows.lock().unwrap()[0].is_dead());

        let attempts = harness.attempts.rows.lock().unwrap();
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].response_status, None);
    }

    #[tokio::test]
    async fn given_terminal_delivery_when_sent_again_should_skip_subscriber() {
        let harness = memory_context(RecordingTransport::always(200, "{}"));
        let job = seed(&harness, 0);
        harness.deliveries.rows.lock().unwrap()[0].status = "success".to_string();

        let outcome = SendDeliveryUseCase::execute(&harness.ctx, &job).await.unwrap();

        assert_eq!(outcome, SendOutcome::AlreadyTerminal);
        assert!(harness.transport.calls().is_empty());
        assert!(harness.queue.rows.lock().unwrap()[0].is_done());
    }

    #[tokio::test]
    async fn given_deleted_webhook_when_sent_should_fail_delivery_without_call() {
        let harness = memory_context(RecordingTransport::always(200, "{}"));
        let job = seed(&harness, 0);
        harness.webhooks.rows.lock().unwrap().clear();

        let outcome = SendDeliveryUseCase::execute(&harness.ctx, &job).await.unwrap();

        assert_eq!(outcome, SendOutcome::Missing);
        assert!(harness.transport.calls().is_empty());
        assert_eq!(harness.deliveries.rows.lock().unwrap()[0].status, "failed");
        assert!(harness.queue.rows.lock().unwrap()[0].is_done());
    }
}
