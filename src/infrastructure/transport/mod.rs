pub mod http_transport;
pub mod signer;

pub use http_transport::{ReqwestTransport, TransportError, TransportResponse, WebhookTransport};
