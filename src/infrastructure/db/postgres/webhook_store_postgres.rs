use crate::infrastructure::db::dto::WebhookRow;
use crate::infrastructure::db::postgres::PostgresDatabase;
use crate::infrastructure::db::stores::webhook_store::{WebhookRepositoryError, WebhookStore};
use async_trait::async_trait;
use sqlx::PgConnection;

#[derive(Clone)]
pub struct WebhookStorePostgres {
    db: std::sync::Arc<PostgresDatabase>,
}

impl WebhookStorePostgres {
    /// Build a Postgres-backed webhook store.
    pub fn new(db: std::sync::Arc<PostgresDatabase>) -> Self {
        Self { db }
    }

    async fn get_impl_conn(
        conn: &mut PgConnection,
        webhook_id: uuid::Uuid,
    ) -> Result<Option<WebhookRow>, WebhookRepositoryError> {
        let row = sqlx::query_as::<_, WebhookRow>(
            "SELECT
                id,
                app_id,
                target_url,
                secret,
                is_active,
                events,
                channel,
                created_at
            FROM webhooks
            WHERE id = $1",
        )
        .bind(webhook_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|_| WebhookRepositoryError::StorageUnavailable)?;

        Ok(row)
    }

    async fn insert_impl_conn(
        conn: &mut PgConnection,
        row: &WebhookRow,
    ) -> Result<WebhookRow, WebhookRepositoryError> {
        let stored = sqlx::query_as::<_, WebhookRow>(
            "INSERT INTO webhooks (
                id,
                app_id,
                target_url,
                secret,
                is_active,
                events,
                channel,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING
                id,
                app_id,
                target_url,
                secret,
                is_active,
                events,
                channel,
                created_at",
        )
        .bind(row.id)
        .bind(row.app_id)
        .bind(&row.target_url)
        .bind(&row.secret)
        .bind(row.is_active)
        .bind(&row.events)
        .bind(&row.channel)
        .bind(row.created_at)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                WebhookRepositoryError::Conflict
            }
            _ => WebhookRepositoryError::StorageUnavailable,
        })?;

        Ok(stored)
    }

    async fn delete_impl_conn(
        conn: &mut PgConnection,
        webhook_id: uuid::Uuid,
    ) -> Result<(), WebhookRepositoryError> {
        let result = sqlx::query("DELETE FROM webhooks WHERE id = $1")
            .bind(webhook_id)
            .execute(&mut *conn)
            .await
            .map_err(|_| WebhookRepositoryError::StorageUnavailable)?;

        if result.rows_affected() == 0 {
            return Err(WebhookRepositoryError::NotFound);
        }
        Ok(())
    }

    async fn list_active_for_event_impl_conn(
        conn: &mut PgConnection,
        event_code: &str,
    ) -> Result<Vec<WebhookRow>, WebhookRepositoryError> {
        let rows = sqlx::query_as::<_, WebhookRow>(
            "SELECT
                id,
                app_id,
                target_url,
                secret,
                is_active,
                events,
                channel,
                created_at
            FROM webhooks
            WHERE is_active = TRUE
              AND $1 = ANY(events)
            ORDER BY created_at ASC",
        )
        .bind(event_code)
        .fetch_all(&mut *conn)
        .await
        .map_err(|_| WebhookRepositoryError::StorageUnavailable)?;

        Ok(rows)
    }
}

#[async_trait]
impl WebhookStore for WebhookStorePostgres {
    async fn get(
        &self,
        webhook_id: uuid::Uuid,
    ) -> Result<Option<WebhookRow>, WebhookRepositoryError> {
        self.db
            .with_conn(move |conn| Box::pin(Self::get_impl_conn(conn, webhook_id)))
            .await
    }

    async fn insert(&self, row: &WebhookRow) -> Result<WebhookRow, WebhookRepositoryError> {
        let row = row.clone();
        self.db
            .with_conn(move |conn| {
                let row = row;
                Box::pin(async move { Self::insert_impl_conn(conn, &row).await })
            })
            .await
    }

    async fn delete(&self, webhook_id: uuid::Uuid) -> Result<(), WebhookRepositoryError> {
        self.db
            .with_conn(move |conn| Box::pin(Self::delete_impl_conn(conn, webhook_id)))
            .await
    }

    async fn list_active_for_event(
        &self,
        event_code: &str,
    ) -> Result<Vec<WebhookRow>, WebhookRepositoryError> {
        let event_code = event_code.to_string();
        self.db
            .with_conn(move |conn| {
                let event_code = event_code;
                Box::pin(async move {
                    Self::list_active_for_event_impl_conn(conn, &event_code).await
                })
            })
            .await
    }
}
