// HTTP routes: webhook registration.

use crate::application::usecases::register_webhook::{
    NewWebhook, RegisterWebhookError, RegisterWebhookUseCase,
};
use crate::application::usecases::unregister_webhook::{
    UnregisterWebhookError, UnregisterWebhookUseCase,
};
use crate::domain::value_objects::ids::{AppId, WebhookId};
use crate::interface::http::dto::webhook::{
    RegisterWebhookRequest, RegisterWebhookResponse, UnregisterWebhookResponse,
};
use crate::interface::http::problem::{
    HRL_REQUEST_MALFORMED, HRL_STORAGE_DB_ERROR, HRL_WEBHOOK_CONFLICT, HRL_WEBHOOK_NOT_FOUND,
    HRL_WEBHOOK_VALIDATION_FAILED, problem,
};
use crate::interface::http::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, post};
use time::format_description::well_known::Rfc3339;

/// Builds webhook registry routes.
pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/webhooks", post(register_webhook))
        .route("/webhooks/:webhook_id", delete(unregister_webhook))
}

/// Registers a webhook.
async fn register_webhook(
    State(state): State<AppState>,
    Json(payload): Json<RegisterWebhookRequest>,
) -> Response {
    // Step 1: Parse the owning app id.
    let app_id = match uuid::Uuid::parse_str(&payload.app_id) {
        Ok(id) => AppId(id),
        Err(_) => {
            return problem(
                StatusCode::BAD_REQUEST,
                HRL_REQUEST_MALFORMED,
                Some("invalid app_id".to_string()),
                None,
            );
        }
    };

    // Step 2: Execute the use case.
    let result = RegisterWebhookUseCase::execute(
        &state.ctx,
        NewWebhook {
            app_id,
            target_url: payload.target_url,
            secret: payload.secret,
            events: payload.events,
            channel: payload.channel,
        },
    )
    .await;

    // Step 3: Map output to HTTP response.
    match result {
        Ok(webhook) => {
            let response = RegisterWebhookResponse {
                webhook_id: webhook.id.to_string(),
                is_active: webhook.is_active,
                events: webhook
                    .events
                    .iter()
                    .map(|e| e.as_str().to_string())
                    .collect(),
                created_at: webhook
                    .created_at
                    .as_inner()
                    .format(&Rfc3339)
                    .unwrap_or_default(),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(RegisterWebhookError::UnknownEventType(code)) => problem(
            StatusCode::BAD_REQUEST,
            HRL_WEBHOOK_VALIDATION_FAILED,
            Some(format!("unknown event type: {code}")),
            None,
        ),
        Err(
            RegisterWebhookError::InvalidTargetUrl
            | RegisterWebhookError::NoEvents
            | RegisterWebhookError::EmptySecret,
        ) => problem(
            StatusCode::BAD_REQUEST,
            HRL_WEBHOOK_VALIDATION_FAILED,
            Some("invalid webhook registration".to_string()),
            None,
        ),
        Err(RegisterWebhookError::Conflict) => problem(
            StatusCode::CONFLICT,
            HRL_WEBHOOK_CONFLICT,
            Some("webhook already exists".to_string()),
            None,
        ),
        Err(RegisterWebhookError::Storage(_)) => problem(
            StatusCode::SERVICE_UNAVAILABLE,
            HRL_STORAGE_DB_ERROR,
            Some("storage unavailable".to_string()),
            None,
        ),
    }
}

/// Unregisters a webhook.
async fn unregister_webhook(
    State(state): State<AppState>,
    Path(webhook_id): Path<String>,
) -> Response {
    // Step 1: Parse webhook id.
    let webhook_id = match uuid::Uuid::parse_str(&webhook_id) {
        Ok(id) => WebhookId(id),
        Err(_) => {
            return problem(
                StatusCode::BAD_REQUEST,
                HRL_REQUEST_MALFORMED,
                Some("invalid webhook_id".to_string()),
                None,
            );
        }
    };

    // Step 2: Execute the use case.
    let result = UnregisterWebhookUseCase::execute(&state.ctx, webhook_id).await;

    // Step 3: Map output to HTTP response.
    match result {
        Ok(()) => (
            StatusCode::OK,
            Json(UnregisterWebhookResponse { deleted: true }),
        )
            .into_response(),
        Err(UnregisterWebhookError::NotFound) => problem(
            StatusCode::NOT_FOUND,
            HRL_WEBHOOK_NOT_FOUND,
            Some("webhook not found".to_string()),
            None,
        ),
        Err(UnregisterWebhookError::Storage(_)) => problem(
            StatusCode::SERVICE_UNAVAILABLE,
            HRL_STORAGE_DB_ERROR,
            Some("storage unavailable".to_string()),
            None,
        ),
    }
}
