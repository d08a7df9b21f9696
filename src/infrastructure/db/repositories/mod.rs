pub mod delivery_attempt_repository;
pub mod event_delivery_repository;
pub mod factory;
pub mod queue_repository;
pub mod webhook_repository;

pub use factory::Repositories;
