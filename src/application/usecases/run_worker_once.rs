// Use case: run_worker_once.

use crate::application::context::AppContext;
use crate::application::usecases::send_delivery::{SendDeliveryUseCase, SendOutcome};
use crate::domain::value_objects::timestamps::Timestamp;
use time::Duration;
use tracing::info;

/// One worker tick: claim the next due job under a lease and execute it.
/// When the queue is idle the tick reclaims jobs whose lease expired.
pub struct RunWorkerOnceUseCase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerTick {
    /// A job was claimed and executed.
    Processed(SendOutcome),
    /// Nothing was due; expired leases were requeued instead.
    Idle { released: u64 },
}

#[derive(Debug)]
pub enum RunWorkerError {
    Queue(String),
    Send(String),
}

impl RunWorkerOnceUseCase {
    pub async fn execute(ctx: &AppContext, worker_id: &str) -> Result<WorkerTick, RunWorkerError> {
        let now = Timestamp::now_utc().as_inner();
        let lease_expires_at =
            now + Duration::seconds(ctx.settings.workers.lease_timeout_seconds as i64);

        // Step 1: Claim the next due job from the routed queues. The lease
        // keeps other workers off it until the tick finishes or expires.
        let queues = ctx.routing.queue_names();
        let claimed = ctx
            .repos
            .queue
            .claim_next_due(worker_id, &queues, now, lease_expires_at)
            .await
            .map_err(|e| RunWorkerError::Queue(format!("{e:?}")))?;

        match claimed {
            Some(job) => {
                // Step 2: Execute the claimed job.
                let outcome = SendDeliveryUseCase::execute(ctx, &job)
                    .await
                    .map_err(|e| RunWorkerError::Send(format!("{e:?}")))?;
                Ok(WorkerTick::Processed(outcome))
            }
            None => {
                // Step 3: Idle tick. Requeue work stuck behind dead workers.
                let released = ctx
                    .repos
                    .queue
                    .release_expired(now, ctx.settings.workers.batch_size)
                    .await
                    .map_err(|e| RunWorkerError::Queue(format!("{e:?}")))?;
                if released > 0 {
                    info!(worker_id, released, "expired_leases_released");
                }
                Ok(WorkerTick::Idle { released })
            }
        }
    }
}
