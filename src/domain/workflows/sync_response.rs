use crate::domain::workflows::event_type::EventType;
use serde::{Deserialize, Serialize};

/// Structured data a sync subscriber can contribute to the triggering
/// business transaction.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncResponse {
    ShippingMethods(Vec<ShippingMethodDef>),
    ExcludedShippingMethods(Vec<ExcludedShippingMethod>),
    Taxes(TaxData),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingMethodDef {
    pub id: String,
    pub name: String,
    pub amount: String,
    pub currency: String,
    #[serde(default)]
    pub maximum_delivery_days: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludedShippingMethod {
    pub id: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxData {
    pub shipping_tax_rate: String,
    #[serde(default)]
    pub lines: Vec<TaxLineData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxLineData {
    pub tax_rate: String,
    pub total_gross_amount: String,
    pub total_net_amount: String,
}

#[derive(Debug, Deserialize)]
struct ExcludedMethodsBody {
    excluded_methods: Vec<ExcludedShippingMethod>,
}

#[derive(Debug, PartialEq)]
pub enum ResponseParseError {
    /// Body is not valid JSON or does not match the expected shape.
    Malformed(String),
    /// Parsing was requested for an event type that has no sync response.
    NotSyncEvent,
}

impl SyncResponse {
    /// Parse a subscriber response body for the given sync event type.
    ///
    /// A malformed body means "no contribution from this subscriber"; the
    /// caller decides whether that is fatal for the business flow.
    pub fn parse(event_type: EventType, body: &str) -> Result<Self, ResponseParseError> {
        match event_type {
            EventType::ShippingListMethodsForCheckout => {
                let methods: Vec<ShippingMethodDef> = serde_json::from_str(body)
                    .map_err(|e| ResponseParseError::Malformed(e.to_string()))?;
                Ok(SyncResponse::ShippingMethods(methods))
            }
            EventType::CheckoutFilterShippingMethods => {
                let parsed: ExcludedMethodsBody = serde_json::from_str(body)
                    .map_err(|e| ResponseParseError::Malformed(e.to_string()))?;
                Ok(SyncResponse::ExcludedShippingMethods(
                    parsed.excluded_methods,
                ))
            }
            EventType::CheckoutCalculateTaxes | EventType::OrderCalculateTaxes => {
                let taxes: TaxData = serde_json::from_str(body)
                    .map_err(|e| ResponseParseError::Malformed(e.to_string()))?;
                Ok(SyncResponse::Taxes(taxes))
            }
            _ => Err(ResponseParseError::NotSyncEvent),
        }
    }
}
