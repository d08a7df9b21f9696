pub mod delivery;
pub mod event;
pub mod health;
pub mod metrics;
pub mod ready;
pub mod webhook;
