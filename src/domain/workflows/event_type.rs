use serde::{Deserialize, Serialize};

/// How an event type is dispatched to its subscribers.
///
/// Async events are fire-and-forget notifications routed through the durable
/// queue. Sync events block the triggering business transaction until the
/// subscriber answers (or the timeout fires). The two sets are disjoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchKind {
    Async,
    Sync,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    // Async kinds.
    CheckoutCreated,
    CheckoutUpdated,
    OrderCreated,
    OrderUpdated,
    // Sync kinds.
    ShippingListMethodsForCheckout,
    CheckoutFilterShippingMethods,
    CheckoutCalculateTaxes,
    OrderCalculateTaxes,
}

impl EventType {
    const CODES: [(EventType, &'static str); 8] = [
        (EventType::CheckoutCreated, "checkout_created"),
        (EventType::CheckoutUpdated, "checkout_updated"),
        (EventType::OrderCreated, "order_created"),
        (EventType::OrderUpdated, "order_updated"),
        (
            EventType::ShippingListMethodsForCheckout,
            "shipping_list_methods_for_checkout",
        ),
        (
            EventType::CheckoutFilterShippingMethods,
            "checkout_filter_shipping_methods",
        ),
        (EventType::CheckoutCalculateTaxes, "checkout_calculate_taxes"),
        (EventType::OrderCalculateTaxes, "order_calculate_taxes"),
    ];

    /// Classification checked exhaustively: adding a variant forces a choice here.
    pub fn kind(&self) -> DispatchKind {
        match self {
            EventType::CheckoutCreated
            | EventType::CheckoutUpdated
            | EventType::OrderCreated
            | EventType::OrderUpdated => DispatchKind::Async,
            EventType::ShippingListMethodsForCheckout
            | EventType::CheckoutFilterShippingMethods
            | EventType::CheckoutCalculateTaxes
            | EventType::OrderCalculateTaxes => DispatchKind::Sync,
        }
    }

    pub fn is_sync(&self) -> bool {
        self.kind() == DispatchKind::Sync
    }

    /// Stable string code used in storage and on the wire.
    pub fn as_str(&self) -> &'static str {
        Self::CODES
            .iter()
            .find(|(ty, _)| ty == self)
            .map(|(_, code)| *code)
            .unwrap_or("unknown")
    }

    pub fn parse(code: &str) -> Option<Self> {
        Self::CODES
            .iter()
            .find(|(_, c)| *c == code)
            .map(|(ty, _)| *ty)
    }
}

#[cfg(test)]
mod tests {
    use super::{DispatchKind, EventType};

    #[test]
    fn given_checkout_updated_when_kind_called_should_be_async() {
        assert_eq!(EventType::CheckoutUpdated.kind(), DispatchKind::Async);
    }

    #[test]
    fn given_shipping_list_methods_when_kind_called_should_be_sync() {
        assert_eq!(
            EventType::ShippingListMethodsForCheckout.kind(),
            DispatchKind::Sync
        );
    }

    #[test]
    fn given_every_code_when_parsed_should_return_original_variant() {
        for (ty, code) in EventType::CODES {
            assert_eq!(EventType::parse(code), Some(ty));
        }
    }

    #[test]
    fn given_unknown_code_when_parsed_should_return_none() {
        assert_eq!(EventType::parse("checkout_exploded"), None);
    }

    #[test]
    fn given_as_str_when_called_should_match_code_table() {
        assert_eq!(EventType::CheckoutUpdated.as_str(), "checkout_updated");
        assert_eq!(
            EventType::CheckoutCalculateTaxes.as_str(),
            "checkout_calculate_taxes"
        );
    }
}
