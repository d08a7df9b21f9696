pub mod build_deliveries;
pub mod call_sync_webhook;
pub mod checkout_event;
pub mod delivery_stats;
pub mod enqueue_delivery;
pub mod find_webhooks;
pub mod get_delivery;
pub mod register_webhook;
pub mod run_worker_once;
pub mod send_delivery;
pub mod trigger_event;
pub mod unregister_webhook;
pub mod worker_loop;
