use crate::infrastructure::db::dto::{EventDeliveryRow, EventDeliveryStats};
use crate::infrastructure::db::postgres::PostgresDatabase;
use crate::infrastructure::db::stores::event_delivery_store::{
    EventDeliveryRepositoryError, EventDeliveryStore,
};
use async_trait::async_trait;
use sqlx::PgConnection;
use time::OffsetDateTime;

#[derive(Clone)]
pub struct EventDeliveryStorePostgres {
    db: std::sync::Arc<PostgresDatabase>,
}

impl EventDeliveryStorePostgres {
    /// Build a Postgres-backed event delivery store.
    pub fn new(db: std::sync::Arc<PostgresDatabase>) -> Self {
        Self { db }
    }

    async fn get_impl_conn(
        conn: &mut PgConnection,
        delivery_id: uuid::Uuid,
    ) -> Result<Option<EventDeliveryRow>, EventDeliveryRepositoryError> {
        let row = sqlx::query_as::<_, EventDeliveryRow>(
            "SELECT
                id,
                webhook_id,
                event_type,
                payload,
                status,
                attempt_count,
                last_error,
                created_at,
                updated_at
            FROM event_deliveries
            WHERE id = $1",
        )
        .bind(delivery_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|_| EventDeliveryRepositoryError::StorageUnavailable)?;

        Ok(row)
    }

    async fn insert_impl_conn(
        conn: &mut PgConnection,
        row: &EventDeliveryRow,
    ) -> Result<EventDeliveryRow, EventDeliveryRepositoryError> {
        let stored = sqlx::query_as::<_, EventDeliveryRow>(
            "INSERT INTO event_deliveries (
                id,
                webhook_id,
                event_type,
                payload,
                status,
                attempt_count,
                last_error,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING
                id,
                webhook_id,
                event_type,
                payload,
                status,
                attempt_count,
                last_error,
                created_at,
                updated_at",
        )
        .bind(row.id)
        .bind(row.webhook_id)
        .bind(&row.event_type)
        .bind(&row.payload)
        .bind(&row.status)
        .bind(row.attempt_count)
        .bind(&row.last_error)
        .bind(row.created_at)
        .bind(row.updated_at)
        .fetch_one(&mut *conn)
        .await
        .map_err(|_| EventDeliveryRepositoryError::StorageUnavailable)?;

        Ok(stored)
    }

    async fn finish_impl_conn(
        conn: &mut PgConnection,
        delivery_id: uuid::Uuid,
        status: &str,
        attempt_count: i32,
        last_error: Option<&str>,
        now: OffsetDateTime,
    ) -> Result<Option<EventDeliveryRow>, EventDeliveryRepositoryError> {
        // Conditional update: a delivery already in a terminal status is left
        // untouched, which makes duplicate executions a no-op.
        let row = sqlx::query_as::<_, EventDeliveryRow>(
            "UPDATE event_deliveries
            SET status = $2,
                attempt_count = $3,
                last_error = $4,
                updated_at = $5
            WHERE id = $1
              AND status = 'pending'
            RETURNING
                id,
                webhook_id,
                event_type,
                payload,
                status,
                attempt_count,
                last_error,
                created_at,
                updated_at",
        )
        .bind(delivery_id)
        .bind(status)
        .bind(attempt_count)
        .bind(last_error)
        .bind(now)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|_| EventDeliveryRepositoryError::StorageUnavailable)?;

        Ok(row)
    }

    async fn record_attempt_impl_conn(
        conn: &mut PgConnection,
        delivery_id: uuid::Uuid,
        attempt_count: i32,
        last_error: Option<&str>,
        now: OffsetDateTime,
    ) -> Result<(), EventDeliveryRepositoryError> {
        sqlx::query(
            "UPDATE event_deliveries
            SET attempt_count = $2,
                last_error = $3,
                updated_at = $4
            WHERE id = $1
              AND status = 'pending'",
        )
        .bind(delivery_id)
        .bind(attempt_count)
        .bind(last_error)
        .bind(now)
        .execute(&mut *conn)
        .await
        .map_err(|_| EventDeliveryRepositoryError::StorageUnavailable)?;

        Ok(())
    }

    async fn stats_impl_conn(
        conn: &mut PgConnection,
    ) -> Result<EventDeliveryStats, EventDeliveryRepositoryError> {
        let stats = sqlx::query_as::<_, EventDeliveryStats>(
            "SELECT
                COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                COUNT(*) FILTER (WHERE status = 'success') AS success,
                COUNT(*) FILTER (WHERE status = 'failed') AS failed
            FROM event_deliveries",
        )
        .fetch_one(&mut *conn)
        .await
        .map_err(|_| EventDeliveryRepositoryError::StorageUnavailable)?;

        Ok(stats)
    }
}

#[async_trait]
impl EventDeliveryStore for EventDeliveryStorePostgres {
    async fn get(
        &self,
        delivery_id: uuid::Uuid,
    ) -> Result<Option<EventDeliveryRow>, EventDeliveryRepositoryError> {
        self.db
            .with_conn(move |conn| Box::pin(Self::get_impl_conn(conn, delivery_id)))
            .await
    }

    async fn insert(
        &self,
        row: &EventDeliveryRow,
    ) -> Result<EventDeliveryRow, EventDeliveryRepositoryError> {
        let row = row.clone();
        self.db
            .with_conn(move |conn| {
                let row = row;
                Box::pin(async move { Self::insert_impl_conn(conn, &row).await })
            })
            .await
    }

    async fn finish(
        &self,
        delivery_id: uuid::Uuid,
        status: &str,
        attempt_count: i32,
        last_error: Option<&str>,
        now: OffsetDateTime,
    ) -> Result<Option<EventDeliveryRow>, EventDeliveryRepositoryError> {
        let status = status.to_string();
        let last_error = last_error.map(|e| e.to_string());
        self.db
            .with_conn(move |conn| {
                let status = status;
                let last_error = last_error;
                Box::pin(async move {
                    Self::finish_impl_conn(
                        conn,
                        delivery_id,
                        &status,
                        attempt_count,
                        last_error.as_deref(),
                        now,
                    )
                    .await
                })
            })
            .await
    }

    async fn record_attempt(
        &self,
        delivery_id: uuid::Uuid,
        attempt_count: i32,
        last_error: Option<&str>,
        now: OffsetDateTime,
    ) -> Result<(), EventDeliveryRepositoryError> {
        let last_error = last_error.map(|e| e.to_string());
        self.db
            .with_conn(move |conn| {
                let last_error = last_error;
                Box::pin(async move {
                    Self::record_attempt_impl_conn(
                        conn,
                        delivery_id,
                        attempt_count,
                        last_error.as_deref(),
                        now,
                    )
                    .await
                })
            })
            .await
    }

    async fn stats(&self) -> Result<EventDeliveryStats, EventDeliveryRepositoryError> {
        self.db
            .with_conn(move |conn| Box::pin(Self::stats_impl_conn(conn)))
            .await
    }
}
