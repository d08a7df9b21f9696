pub mod delivery_attempt;
pub mod event_delivery;
pub mod webhook;
