use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct TriggerEventRequest {
    pub event_type: String,
    pub subject_id: String,
    #[serde(default)]
    pub channel: Option<String>,
    pub payload: Value,
}

#[derive(Debug, Serialize)]
pub struct TriggerEventResponse {
    pub event_type: String,
    pub matched: usize,
    pub enqueued: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Ids of the enqueued deliveries, for later inspection.
    pub deliveries: Vec<String>,
    /// Present for checkout events, which also run the sync call sequence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout: Option<CheckoutSyncSummary>,
}

#[derive(Debug, Serialize)]
pub struct CheckoutSyncSummary {
    pub shipping_methods: Vec<ShippingMethodsEntry>,
    pub excluded_methods: Vec<ExcludedMethodEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxes: Option<TaxesEntry>,
    pub sync_failures: usize,
}

#[derive(Debug, Serialize)]
pub struct ShippingMethodsEntry {
    pub webhook_id: String,
    pub methods: Vec<ShippingMethodEntry>,
}

#[derive(Debug, Serialize)]
pub struct ShippingMethodEntry {
    pub id: String,
    pub name: String,
    pub amount: String,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_delivery_days: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ExcludedMethodEntry {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TaxesEntry {
    pub shipping_tax_rate: String,
    pub lines: Vec<TaxLineEntry>,
}

#[derive(Debug, Serialize)]
pub struct TaxLineEntry {
    pub tax_rate: String,
    pub total_gross_amount: String,
    pub total_net_amount: String,
}
