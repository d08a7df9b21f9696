pub mod database;
pub mod delivery_attempt_store_postgres;
pub mod event_delivery_store_postgres;
pub mod queue_store_postgres;
pub mod webhook_store_postgres;

pub use database::PostgresDatabase;
