pub mod delivery_attempt_store;
pub mod event_delivery_store;
pub mod queue_store;
pub mod webhook_store;
