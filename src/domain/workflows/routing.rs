use crate::config::Settings;
use crate::domain::workflows::event_type::{DispatchKind, EventType};
use crate::domain::workflows::retry_policy::RetryPolicy;
use std::collections::HashMap;

/// Routing decision for one async event type.
#[derive(Debug, Clone)]
pub struct Route {
    pub queue: String,
    pub retry_policy: RetryPolicy,
}

/// Explicit dispatch routing, built once at startup and passed by reference.
///
/// Async event types resolve to a queue and retry policy; sync event types
/// have no route because they never touch the queue.
#[derive(Debug, Clone)]
pub struct RoutingTable {
    routes: HashMap<EventType, Route>,
    default_queue: String,
    retry_policy: RetryPolicy,
}

impl RoutingTable {
    /// Build the routing table from settings. Checkout events go to their
    /// dedicated queue; remaining async events use the default queue.
    pub fn from_settings(settings: &Settings) -> Self {
        let retry_policy = RetryPolicy {
            max_retries: settings.delivery.max_retries,
            retry_backoff_seconds: settings.delivery.retry_backoff_seconds,
            max_delay_ms: settings.delivery.backoff_max_ms,
        };

        let mut routes = HashMap::new();
        for event_type in [EventType::CheckoutCreated, EventType::CheckoutUpdated] {
            routes.insert(
                event_type,
                Route {
                    queue: settings.queues.checkout_events.clone(),
                    retry_policy: retry_policy.clone(),
                },
            );
        }

        Self {
            routes,
            default_queue: settings.queues.default.clone(),
            retry_policy,
        }
    }

    /// All queue names this table can route to: every dedicated queue plus
    /// the default, deduplicated. Workers claim only from these queues.
    pub fn queue_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .routes
            .values()
            .map(|route| route.queue.clone())
            .collect();
        names.push(self.default_queue.clone());
        names.sort();
        names.dedup();
        names
    }

    /// Resolve the route for an async event type. Returns `None` for sync types.
    pub fn route_for(&self, event_type: EventType) -> Option<Route> {
        if event_type.kind() != DispatchKind::Async {
            return None;
        }
        Some(self.routes.get(&event_type).cloned().unwrap_or(Route {
            queue: self.default_queue.clone(),
            retry_policy: self.retry_policy.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::RoutingTable;
    use crate::domain::workflows::event_type::EventType;

    fn table() -> RoutingTable {
        RoutingTable::from_settings(&crate::config::Settings {
            server: crate::config::Server {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            db: crate::config::Db {
                url: "postgres://localhost/hookrelay_test".to_string(),
            },
            workers: crate::config::Workers {
                count: 1,
                poll_interval_ms: 250,
                batch_size: 10,
                lease_timeout_seconds: 30,
            },
            delivery: crate::config::Delivery {
                request_timeout_ms: 2_000,
                sync_timeout_ms: 20_000,
                max_retries: 5,
                retry_backoff_seconds: 10,
                backoff_max_ms: 600_000,
            },
            queues: crate::config::Queues {
                default: "webhook-events".to_string(),
                checkout_events: "checkout-webhook-events".to_string(),
            },
            observability: crate::config::Observability {
                service_name: "hook-relay".to_string(),
                enable_metrics: false,
                log_filter: "info".to_string(),
            },
        })
    }

    #[test]
    fn given_checkout_updated_when_routed_should_use_checkout_queue() {
        let route = table().route_for(EventType::CheckoutUpdated).unwrap();
        assert_eq!(route.queue, "checkout-webhook-events");
        assert_eq!(route.retry_policy.max_retries, 5);
        assert_eq!(route.retry_policy.retry_backoff_seconds, 10);
    }

    #[test]
    fn given_order_created_when_routed_should_use_default_queue() {
        let route = table().route_for(EventType::OrderCreated).unwrap();
        assert_eq!(route.queue, "webhook-events");
    }

    #[test]
    fn given_table_when_queue_names_listed_should_cover_default_and_dedicated() {
        assert_eq!(
            table().queue_names(),
            vec![
                "checkout-webhook-events".to_string(),
                "webhook-events".to_string(),
            ]
        );
    }

    #[test]
    fn given_sync_event_when_routed_should_return_none() {
        assert!(table()
            .route_for(EventType::CheckoutCalculateTaxes)
            .is_none());
    }
}
