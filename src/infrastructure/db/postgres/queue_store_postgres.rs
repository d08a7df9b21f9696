use crate::infrastructure::db::dto::QueueJobRow;
use crate::infrastructure::db::postgres::PostgresDatabase;
use crate::infrastructure::db::stores::queue_store::{QueueRepositoryError, QueueStore};
use async_trait::async_trait;
use sqlx::PgConnection;
use time::OffsetDateTime;

#[derive(Clone)]
pub struct QueueStorePostgres {
    db: std::sync::Arc<PostgresDatabase>,
}

impl QueueStorePostgres {
    /// Build a Postgres-backed delivery queue store.
    pub fn new(db: std::sync::Arc<PostgresDatabase>) -> Self {
        Self { db }
    }

    async fn enqueue_impl_conn(
        conn: &mut PgConnection,
        row: &QueueJobRow,
    ) -> Result<QueueJobRow, QueueRepositoryError> {
        let stored = sqlx::query_as::<_, QueueJobRow>(
            "INSERT INTO delivery_queue (
                id,
                delivery_id,
                queue,
                status,
                attempt,
                max_retries,
                retry_backoff_seconds,
                next_attempt_at,
                lease_owner,
                lease_expires_at,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING
                id,
                delivery_id,
                queue,
                status,
                attempt,
                max_retries,
                retry_backoff_seconds,
                next_attempt_at,
                lease_owner,
                lease_expires_at,
                created_at,
                updated_at",
        )
        .bind(row.id)
        .bind(row.delivery_id)
        .bind(&row.queue)
        .bind(&row.status)
        .bind(row.attempt)
        .bind(row.max_retries)
        .bind(row.retry_backoff_seconds)
        .bind(row.next_attempt_at)
        .bind(&row.lease_owner)
        .bind(row.lease_expires_at)
        .bind(row.created_at)
        .bind(row.updated_at)
        .fetch_one(&mut *conn)
        .await
        .map_err(|_| QueueRepositoryError::StorageUnavailable)?;

        Ok(stored)
    }

    async fn claim_next_due_impl_conn(
        conn: &mut PgConnection,
        worker_id: &str,
        queues: &[String],
        now: OffsetDateTime,
        lease_expires_at: OffsetDateTime,
    ) -> Result<Option<QueueJobRow>, QueueRepositoryError> {
        // Step 1: Claim the oldest due job on one of the drained queues and
        // attach a lease.
        let row = sqlx::query_as::<_, QueueJobRow>(
            "WITH next_job AS (
                SELECT id
                FROM delivery_queue
                WHERE status = 'queued'
                  AND queue = ANY($4)
                  AND next_attempt_at <= $3
                ORDER BY next_attempt_at ASC
                FOR UPDATE SKIP LOCKED
                LIMIT 1
            )
            UPDATE delivery_queue
            SET status = 'assigned',
                lease_owner = $1,
                lease_expires_at = $2,
                updated_at = $3
            WHERE id IN (SELECT id FROM next_job)
            RETURNING
                id,
                delivery_id,
                queue,
                status,
                attempt,
                max_retries,
                retry_backoff_seconds,
                next_attempt_at,
                lease_owner,
                lease_expires_at,
                created_at,
                updated_at",
        )
        .bind(worker_id)
        .bind(lease_expires_at)
        .bind(now)
        .bind(queues)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|_| QueueRepositoryError::StorageUnavailable)?;

        Ok(row)
    }

    async fn mark_done_impl_conn(
        conn: &mut PgConnection,
        job_id: uuid::Uuid,
        now: OffsetDateTime,
    ) -> Result<(), QueueRepositoryError> {
        let result = sqlx::query(
            "UPDATE delivery_queue
            SET status = 'done',
                lease_owner = NULL,
                lease_expires_at = NULL,
                updated_at = $2
            WHERE id = $1",
        )
        .bind(job_id)
        .bind(now)
        .execute(&mut *conn)
        .await
        .map_err(|_| QueueRepositoryError::StorageUnavailable)?;

        if result.rows_affected() == 0 {
            return Err(QueueRepositoryError::NotFound);
        }
        Ok(())
    }

    async fn reschedule_impl_conn(
        conn: &mut PgConnection,
        job_id: uuid::Uuid,
        attempt: i32,
        next_attempt_at: OffsetDateTime,
        now: OffsetDateTime,
    ) -> Result<(), QueueRepositoryError> {
        let result = sqlx::query(
            "UPDATE delivery_queue
            SET status = 'queued',
                attempt = $2,
                next_attempt_at = $3,
                lease_owner = NULL,
                lease_expires_at = NULL,
                updated_at = $4
            WHERE id = $1",
        )
        .bind(job_id)
        .bind(attempt)
        .bind(next_attempt_at)
        .bind(now)
        .execute(&mut *conn)
        .await
        .map_err(|_| QueueRepositoryError::StorageUnavailable)?;

        if result.rows_affected() == 0 {
            return Err(QueueRepositoryError::NotFound);
        }
        Ok(())
    }

    async fn mark_dead_impl_conn(
        conn: &mut PgConnection,
        job_id: uuid::Uuid,
        now: OffsetDateTime,
    ) -> Result<(), QueueRepositoryError> {
        let result = sqlx::query(
            "UPDATE delivery_queue
            SET status = 'dead',
                lease_owner = NULL,
                lease_expires_at = NULL,
                updated_at = $2
            WHERE id = $1",
        )
        .bind(job_id)
        .bind(now)
        .execute(&mut *conn)
        .await
        .map_err(|_| QueueRepositoryError::StorageUnavailable)?;

        if result.rows_affected() == 0 {
            return Err(QueueRepositoryError::NotFound);
        }
        Ok(())
    }

    async fn release_expired_impl_conn(
        conn: &mut PgConnection,
        now: OffsetDateTime,
        limit: u32,
    ) -> Result<u64, QueueRepositoryError> {
        // Requeue assigned jobs whose worker stopped heartbeating.
        let result = sqlx::query(
            "UPDATE delivery_queue
            SET status = 'queued',
                lease_owner = NULL,
                lease_expires_at = NULL,
                updated_at = $1
            WHERE id IN (
                SELECT id
                FROM delivery_queue
                WHERE status = 'assigned'
                  AND lease_expires_at IS NOT NULL
                  AND lease_expires_at <= $1
                ORDER BY lease_expires_at ASC
                FOR UPDATE SKIP LOCKED
                LIMIT $2
            )",
        )
        .bind(now)
        .bind(limit as i64)
        .execute(&mut *conn)
        .await
        .map_err(|_| QueueRepositoryError::StorageUnavailable)?;

        Ok(result.rows_affected())
    }

    async fn get_by_delivery_impl_conn(
        conn: &mut PgConnection,
        delivery_id: uuid::Uuid,
    ) -> Result<Option<QueueJobRow>, QueueRepositoryError> {
        let row = sqlx::query_as::<_, QueueJobRow>(
            "SELECT
                id,
                delivery_id,
                queue,
                status,
                attempt,
                max_retries,
                retry_backoff_seconds,
                next_attempt_at,
                lease_owner,
                lease_expires_at,
                created_at,
                updated_at
            FROM delivery_queue
            WHERE delivery_id = $1",
        )
        .bind(delivery_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|_| QueueRepositoryError::StorageUnavailable)?;

        Ok(row)
    }
}

#[async_trait]
impl QueueStore for QueueStorePostgres {
    async fn enqueue(&self, row: &QueueJobRow) -> Result<QueueJobRow, QueueRepositoryError> {
        let row = row.clone();
        self.db
            .with_conn(move |conn| {
                let row = row;
                Box::pin(async move { Self::enqueue_impl_conn(conn, &row).await })
            })
            .await
    }

    async fn claim_next_due(
        &self,
        worker_id: &str,
        queues: &[String],
        now: OffsetDateTime,
        lease_expires_at: OffsetDateTime,
    ) -> Result<Option<QueueJobRow>, QueueRepositoryError> {
        let worker_id = worker_id.to_string();
        let queues = queues.to_vec();
        self.db
            .with_conn(move |conn| {
                let worker_id = worker_id;
                let queues = queues;
                Box::pin(async move {
                    Self::claim_next_due_impl_conn(conn, &worker_id, &queues, now, lease_expires_at)
                        .await
                })
            })
            .await
    }

    async fn mark_done(
        &self,
        job_id: uuid::Uuid,
        now: OffsetDateTime,
    ) -> Result<(), QueueRepositoryError> {
        self.db
            .with_conn(move |conn| Box::pin(Self::mark_done_impl_conn(conn, job_id, now)))
            .await
    }

    async fn reschedule(
        &self,
        job_id: uuid::Uuid,
        attempt: i32,
        next_attempt_at: OffsetDateTime,
        now: OffsetDateTime,
    ) -> Result<(), QueueRepositoryError> {
        self.db
            .with_conn(move |conn| {
                Box::pin(Self::reschedule_impl_conn(
                    conn,
                    job_id,
                    attempt,
                    next_attempt_at,
                    now,
                ))
            })
            .await
    }

    async fn mark_dead(
        &self,
        job_id: uuid::Uuid,
        now: OffsetDateTime,
    ) -> Result<(), QueueRepositoryError> {
        self.db
            .with_conn(move |conn| Box::pin(Self::mark_dead_impl_conn(conn, job_id, now)))
            .await
    }

    async fn release_expired(
        &self,
        now: OffsetDateTime,
        limit: u32,
    ) -> Result<u64, QueueRepositoryError> {
        self.db
            .with_conn(move |conn| Box::pin(Self::release_expired_impl_conn(conn, now, limit)))
            .await
    }

    async fn get_by_delivery(
        &self,
        delivery_id: uuid::Uuid,
    ) -> Result<Option<QueueJobRow>, QueueRepositoryError> {
        self.db
            .with_conn(move |conn| Box::pin(Self::get_by_delivery_impl_conn(conn, delivery_id)))
            .await
    }
}
