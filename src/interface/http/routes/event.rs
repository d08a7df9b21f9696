// HTTP routes: event triggering.

use crate::application::usecases::checkout_event::{
    CheckoutEventError, CheckoutEventOutcome, CheckoutEventUseCase,
};
use crate::application::usecases::trigger_event::{TriggerEventError, TriggerEventUseCase};
use crate::domain::workflows::event_type::EventType;
use crate::interface::http::dto::event::{
    CheckoutSyncSummary, ExcludedMethodEntry, ShippingMethodEntry, ShippingMethodsEntry,
    TaxLineEntry, TaxesEntry, TriggerEventRequest, TriggerEventResponse,
};
use crate::interface::http::problem::{
    HRL_EVENT_NOT_ASYNC, HRL_EVENT_UNKNOWN_TYPE, HRL_INTERNAL, problem,
};
use crate::interface::http::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;

/// Builds the event trigger route.
pub fn router() -> axum::Router<AppState> {
    axum::Router::new().route("/events", post(trigger_event))
}

/// Triggers an event. Checkout events also run their sync call sequence;
/// sync-only event types cannot be triggered directly.
async fn trigger_event(
    State(state): State<AppState>,
    Json(payload): Json<TriggerEventRequest>,
) -> Response {
    // Step 1: Parse the event type.
    let Some(event_type) = EventType::parse(&payload.event_type) else {
        return problem(
            StatusCode::BAD_REQUEST,
            HRL_EVENT_UNKNOWN_TYPE,
            Some(format!("unknown event type: {}", payload.event_type)),
            None,
        );
    };
    if event_type.is_sync() {
        return problem(
            StatusCode::UNPROCESSABLE_ENTITY,
            HRL_EVENT_NOT_ASYNC,
            Some("sync event types run inside their business flow".to_string()),
            None,
        );
    }

    // Step 2: Checkout events run the full flow; other async events go
    // straight to the queue pipeline.
    match event_type {
        EventType::CheckoutCreated | EventType::CheckoutUpdated => {
            let result = CheckoutEventUseCase::execute(
                &state.ctx,
                event_type,
                &payload.subject_id,
                payload.channel.as_deref(),
                &payload.payload,
            )
            .await;
            match result {
                Ok(outcome) => checkout_response(event_type, outcome),
                Err(CheckoutEventError::NotCheckoutEvent) => problem(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    HRL_EVENT_NOT_ASYNC,
                    None,
                    None,
                ),
                Err(_) => problem(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    HRL_INTERNAL,
                    Some("event processing failed".to_string()),
                    None,
                ),
            }
        }
        _ => {
            let result = TriggerEventUseCase::execute(
                &state.ctx,
                event_type,
                &payload.subject_id,
                payload.channel.as_deref(),
                &payload.payload,
            )
            .await;
            match result {
                Ok(outcome) => (
                    StatusCode::ACCEPTED,
                    Json(TriggerEventResponse {
                        event_type: event_type.as_str().to_string(),
                        matched: outcome.matched,
                        enqueued: outcome.enqueued,
                        skipped: outcome.skipped,
                        failed: outcome.failed,
                        deliveries: outcome
                            .delivery_ids
                            .iter()
                            .map(|id| id.to_string())
                            .collect(),
                        checkout: None,
                    }),
                )
                    .into_response(),
                Err(TriggerEventError::NotAsyncEvent) => problem(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    HRL_EVENT_NOT_ASYNC,
                    None,
                    None,
                ),
                Err(_) => problem(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    HRL_INTERNAL,
                    Some("event processing failed".to_string()),
                    None,
                ),
            }
        }
    }
}

fn checkout_response(event_type: EventType, outcome: CheckoutEventOutcome) -> Response {
    let checkout = CheckoutSyncSummary {
        shipping_methods: outcome
            .shipping_methods
            .into_iter()
            .map(|contribution| ShippingMethodsEntry {
                webhook_id: contribution.webhook_id.to_string(),
                methods: contribution
                    .methods
                    .into_iter()
                    .map(|m| ShippingMethodEntry {
                        id: m.id,
                        name: m.name,
                        amount: m.amount,
                        currency: m.currency,
                        maximum_delivery_days: m.maximum_delivery_days,
                    })
                    .collect(),
            })
            .collect(),
        excluded_methods: outcome
            .excluded_methods
            .into_iter()
            .map(|m| ExcludedMethodEntry {
                id: m.id,
                reason: m.reason,
            })
            .collect(),
        taxes: outcome.taxes.map(|taxes| TaxesEntry {
            shipping_tax_rate: taxes.shipping_tax_rate,
            lines: taxes
                .lines
                .into_iter()
                .map(|line| TaxLineEntry {
                    tax_rate: line.tax_rate,
                    total_gross_amount: line.total_gross_amount,
                    total_net_amount: line.total_net_amount,
                })
                .collect(),
        }),
        sync_failures: outcome.sync_failures,
    };

    (
        StatusCode::ACCEPTED,
        Json(TriggerEventResponse {
            event_type: event_type.as_str().to_string(),
            matched: outcome.triggered.matched,
            enqueued: outcome.triggered.enqueued,
            skipped: outcome.triggered.skipped,
            failed: outcome.triggered.failed,
            deliveries: outcome
                .triggered
                .delivery_ids
                .iter()
                .map(|id| id.to_string())
                .collect(),
            checkout: Some(checkout),
        }),
    )
        .into_response()
}
