// HTTP routes: delivery inspection.

use crate::application::usecases::delivery_stats::{DeliveryStatsError, DeliveryStatsUseCase};
use crate::application::usecases::get_delivery::{GetDeliveryError, GetDeliveryUseCase};
use crate::domain::value_objects::ids::DeliveryId;
use crate::interface::http::dto::delivery::{
    AttemptResponse, DeliveryResponse, DeliveryStatsResponse,
};
use crate::interface::http::problem::{
    HRL_DELIVERY_NOT_FOUND, HRL_REQUEST_MALFORMED, HRL_STORAGE_DB_ERROR, problem,
};
use crate::interface::http::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use time::format_description::well_known::Rfc3339;

/// Builds delivery inspection routes.
pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/deliveries/stats", get(delivery_stats))
        .route("/deliveries/:delivery_id", get(get_delivery))
}

/// Returns one delivery with its attempt history.
async fn get_delivery(
    State(state): State<AppState>,
    Path(delivery_id): Path<String>,
) -> Response {
    // Step 1: Parse delivery id.
    let delivery_id = match uuid::Uuid::parse_str(&delivery_id) {
        Ok(id) => DeliveryId(id),
        Err(_) => {
            return problem(
                StatusCode::BAD_REQUEST,
                HRL_REQUEST_MALFORMED,
                Some("invalid delivery_id".to_string()),
                None,
            );
        }
    };

    // Step 2: Execute the use case.
    let result = GetDeliveryUseCase::execute(&state.ctx, delivery_id).await;

    // Step 3: Map output to HTTP response.
    match result {
        Ok(details) => {
            let response = DeliveryResponse {
                delivery_id: details.delivery.id.to_string(),
                webhook_id: details.delivery.webhook_id.to_string(),
                event_type: details.delivery.event_type,
                status: details.delivery.status,
                attempt_count: details.delivery.attempt_count,
                last_error: details.delivery.last_error,
                created_at: details
                    .delivery
                    .created_at
                    .format(&Rfc3339)
                    .unwrap_or_default(),
                updated_at: details
                    .delivery
                    .updated_at
                    .format(&Rfc3339)
                    .unwrap_or_default(),
                attempts: details
                    .attempts
                    .into_iter()
                    .map(|attempt| AttemptResponse {
                        attempt_number: attempt.attempt_number,
                        response_status: attempt.response_status,
                        duration_ms: attempt.duration_ms,
                        error: attempt.error,
                        created_at: attempt.created_at.format(&Rfc3339).unwrap_or_default(),
                    })
                    .collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(GetDeliveryError::NotFound) => problem(
            StatusCode::NOT_FOUND,
            HRL_DELIVERY_NOT_FOUND,
            Some("delivery not found".to_string()),
            None,
        ),
        Err(GetDeliveryError::Storage(_)) => problem(
            StatusCode::SERVICE_UNAVAILABLE,
            HRL_STORAGE_DB_ERROR,
            Some("storage unavailable".to_string()),
            None,
        ),
    }
}

/// Returns aggregate delivery counts by status.
async fn delivery_stats(State(state): State<AppState>) -> Response {
    match DeliveryStatsUseCase::execute(&state.ctx).await {
        Ok(stats) => (
            StatusCode::OK,
            Json(DeliveryStatsResponse {
                pending: stats.pending,
                success: stats.success,
                failed: stats.failed,
            }),
        )
            .into_response(),
        Err(DeliveryStatsError::Storage(_)) => problem(
            StatusCode::SERVICE_UNAVAILABLE,
            HRL_STORAGE_DB_ERROR,
            Some("storage unavailable".to_string()),
            None,
        ),
    }
}
