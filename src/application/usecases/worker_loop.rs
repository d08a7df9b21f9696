// Use case: worker_loop.

use crate::application::context::AppContext;
use crate::application::usecases::run_worker_once::{RunWorkerOnceUseCase, WorkerTick};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

/// Long-running queue consumer. Drains due jobs back to back, then sleeps
/// one poll interval; a watch signal stops it between jobs.
pub struct WorkerLoop;

impl WorkerLoop {
    pub async fn run(
        ctx: Arc<AppContext>,
        worker_id: String,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let poll_interval = Duration::from_millis(ctx.settings.workers.poll_interval_ms);
        info!(worker_id = %worker_id, "worker_started");

        loop {
            if *shutdown.borrow() {
                break;
            }

            match RunWorkerOnceUseCase::execute(&ctx, &worker_id).await {
                // More work may be due; go straight to the next claim.
                Ok(WorkerTick::Processed(_)) => continue,
                Ok(WorkerTick::Idle { .. }) => {}
                Err(err) => {
                    warn!(worker_id = %worker_id, error = ?err, "worker_tick_failed");
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(poll_interval) => {}
                _ = shutdown.changed() => {}
            }
        }

        info!(worker_id = %worker_id, "worker_stopped");
    }
}
