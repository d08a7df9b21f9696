pub mod envelope;
pub mod event_type;
pub mod retry_policy;
pub mod routing;
pub mod sync_response;
