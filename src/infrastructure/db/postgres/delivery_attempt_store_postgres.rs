use crate::infrastructure::db::dto::DeliveryAttemptRow;
use crate::infrastructure::db::postgres::PostgresDatabase;
use crate::infrastructure::db::stores::delivery_attempt_store::{
    DeliveryAttemptRepositoryError, DeliveryAttemptStore,
};
use async_trait::async_trait;
use sqlx::PgConnection;

#[derive(Clone)]
pub struct DeliveryAttemptStorePostgres {
    db: std::sync::Arc<PostgresDatabase>,
}

impl DeliveryAttemptStorePostgres {
    /// Build a Postgres-backed delivery attempt store.
    pub fn new(db: std::sync::Arc<PostgresDatabase>) -> Self {
        Self { db }
    }

    async fn insert_impl_conn(
        conn: &mut PgConnection,
        row: &DeliveryAttemptRow,
    ) -> Result<DeliveryAttemptRow, DeliveryAttemptRepositoryError> {
        let stored = sqlx::query_as::<_, DeliveryAttemptRow>(
            "INSERT INTO delivery_attempts (
                id,
                delivery_id,
                attempt_number,
                response_status,
                duration_ms,
                error,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING
                id,
                delivery_id,
                attempt_number,
                response_status,
                duration_ms,
                error,
                created_at",
        )
        .bind(row.id)
        .bind(row.delivery_id)
        .bind(row.attempt_number)
        .bind(row.response_status)
        .bind(row.duration_ms)
        .bind(&row.error)
        .bind(row.created_at)
        .fetch_one(&mut *conn)
        .await
        .map_err(|_| DeliveryAttemptRepositoryError::StorageUnavailable)?;

        Ok(stored)
    }

    async fn list_for_delivery_impl_conn(
        conn: &mut PgConnection,
        delivery_id: uuid::Uuid,
    ) -> Result<Vec<DeliveryAttemptRow>, DeliveryAttemptRepositoryError> {
        let rows = sqlx::query_as::<_, DeliveryAttemptRow>(
            "SELECT
                id,
                delivery_id,
                attempt_number,
                response_status,
                duration_ms,
                error,
                created_at
            FROM delivery_attempts
            WHERE delivery_id = $1
            ORDER BY attempt_number ASC",
        )
        .bind(delivery_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|_| DeliveryAttemptRepositoryError::StorageUnavailable)?;

        Ok(rows)
    }
}

#[async_trait]
impl DeliveryAttemptStore for DeliveryAttemptStorePostgres {
    async fn insert(
        &self,
        row: &DeliveryAttemptRow,
    ) -> Result<DeliveryAttemptRow, DeliveryAttemptRepositoryError> {
        let row = row.clone();
        self.db
            .with_conn(move |conn| {
                let row = row;
                Box::pin(async move { Self::insert_impl_conn(conn, &row).await })
            })
            .await
    }

    async fn list_for_delivery(
        &self,
        delivery_id: uuid::Uuid,
    ) -> Result<Vec<DeliveryAttemptRow>, DeliveryAttemptRepositoryError> {
        self.db
            .with_conn(move |conn| Box::pin(Self::list_for_delivery_impl_conn(conn, delivery_id)))
            .await
    }
}
