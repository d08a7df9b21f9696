pub mod delivery_attempt;
pub mod event_delivery;
pub mod queue_job;
pub mod webhook;

pub use delivery_attempt::DeliveryAttemptRow;
pub use event_delivery::{EventDeliveryRow, EventDeliveryStats};
pub use queue_job::QueueJobRow;
pub use webhook::WebhookRow;
