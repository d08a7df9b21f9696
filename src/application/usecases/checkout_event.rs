// Use case: checkout_event.

use crate::application::context::AppContext;
use crate::application::usecases::build_deliveries::BuildDeliveriesUseCase;
use crate::application::usecases::call_sync_webhook::CallSyncWebhookUseCase;
use crate::application::usecases::find_webhooks::FindWebhooksUseCase;
use crate::application::usecases::trigger_event::{TriggerEventUseCase, TriggerOutcome};
use crate::domain::entities::event_delivery::EventDelivery;
use crate::domain::entities::webhook::Webhook;
use crate::domain::value_objects::ids::WebhookId;
use crate::domain::workflows::event_type::EventType;
use crate::domain::workflows::sync_response::{
    ExcludedShippingMethod, ShippingMethodDef, SyncResponse, TaxData,
};
use serde_json::Value;
use tracing::warn;

/// Runs the checkout business flow against its subscribers: the three sync
/// calls in a fixed order, each blocking on its response, then the async
/// notification through the queue.
///
/// Sync deliveries are built in memory and never persisted; the only rows
/// written here belong to the trailing async trigger.
pub struct CheckoutEventUseCase;

/// Fixed order of the sync calls in a checkout flow. Later steps may depend
/// on the earlier results inside the caller's transaction, so the order is
/// part of the contract.
const CHECKOUT_SYNC_SEQUENCE: [EventType; 3] = [
    EventType::ShippingListMethodsForCheckout,
    EventType::CheckoutFilterShippingMethods,
    EventType::CheckoutCalculateTaxes,
];

/// Shipping methods contributed by one subscriber, attributable to it.
#[derive(Debug)]
pub struct ShippingMethodContribution {
    pub webhook_id: WebhookId,
    pub methods: Vec<ShippingMethodDef>,
}

#[derive(Debug)]
pub struct CheckoutEventOutcome {
    pub shipping_methods: Vec<ShippingMethodContribution>,
    pub excluded_methods: Vec<ExcludedShippingMethod>,
    /// Tax data from the first subscriber that answered with a valid body.
    pub taxes: Option<TaxData>,
    /// Sync calls that failed or returned a malformed body. The flow
    /// continues without their contribution.
    pub sync_failures: usize,
    pub triggered: TriggerOutcome,
}

#[derive(Debug)]
pub enum CheckoutEventError {
    /// Only checkout event types drive this flow.
    NotCheckoutEvent,
    Registry(String),
    Trigger(String),
}

impl CheckoutEventUseCase {
    pub async fn execute(
        ctx: &AppContext,
        event_type: EventType,
        checkout_id: &str,
        channel: Option<&str>,
        payload: &Value,
    ) -> Result<CheckoutEventOutcome, CheckoutEventError> {
        if !matches!(
            event_type,
            EventType::CheckoutCreated | EventType::CheckoutUpdated
        ) {
            return Err(CheckoutEventError::NotCheckoutEvent);
        }

        let mut shipping_methods = Vec::new();
        let mut excluded_methods = Vec::new();
        let mut taxes: Option<TaxData> = None;
        let mut sync_failures = 0;

        // Step 1: The sync sequence, one event type at a time, one webhook
        // at a time. Each call blocks on its subscriber's answer.
        for sync_type in CHECKOUT_SYNC_SEQUENCE {
            let webhooks = FindWebhooksUseCase::execute(ctx, sync_type, channel)
                .await
                .map_err(|e| CheckoutEventError::Registry(format!("{e:?}")))?;
            if webhooks.is_empty() {
                continue;
            }

            let built =
                BuildDeliveriesUseCase::build_ephemeral(sync_type, payload, checkout_id, &webhooks);
            sync_failures += built.skipped;

            // A skipped webhook must not shift attribution for the rest, so
            // each delivery is paired with its webhook by id, not by position.
            for (webhook, delivery) in Self::pair_by_webhook(&webhooks, &built.deliveries) {
                match CallSyncWebhookUseCase::execute(ctx, webhook, delivery).await {
                    Ok(result) => match result.response {
                        SyncResponse::ShippingMethods(methods) => {
                            shipping_methods.push(ShippingMethodContribution {
                                webhook_id: result.webhook_id,
                                methods,
                            });
                        }
                        SyncResponse::ExcludedShippingMethods(methods) => {
                            excluded_methods.extend(methods);
                        }
                        SyncResponse::Taxes(data) => {
                            // First valid answer wins; later ones are ignored.
                            if taxes.is_none() {
                                taxes = Some(data);
                            }
                        }
                    },
                    Err(err) => {
                        sync_failures += 1;
                        warn!(
                            webhook_id = %webhook.id,
                            event_type = sync_type.as_str(),
                            checkout_id,
                            error = ?err,
                            "sync_call_failed"
                        );
                    }
                }
            }
        }

        // Step 2: The async notification goes through the normal pipeline.
        let triggered =
            TriggerEventUseCase::execute(ctx, event_type, checkout_id, channel, payload)
                .await
                .map_err(|e| CheckoutEventError::Trigger(format!("{e:?}")))?;

        Ok(CheckoutEventOutcome {
            shipping_methods,
            excluded_methods,
            taxes,
            sync_failures,
            triggered,
        })
    }

    /// Pair each built delivery with the webhook it was built for. Building
    /// can skip a webhook, so positions in the two slices need not line up.
    fn pair_by_webhook<'a>(
        webhooks: &'a [Webhook],
        deliveries: &'a [EventDelivery],
    ) -> Vec<(&'a Webhook, &'a EventDelivery)> {
        deliveries
            .iter()
            .filter_map(|delivery| {
                webhooks
                    .iter()
                    .find(|webhook| webhook.id == delivery.webhook_id)
                    .map(|webhook| (webhook, delivery))
            })
            .collect()
    }
}
