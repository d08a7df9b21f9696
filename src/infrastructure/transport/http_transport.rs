use crate::infrastructure::transport::signer;
use async_trait::async_trait;
use std::time::{Duration, Instant};

/// Outcome of one HTTP call to a subscriber endpoint.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
    pub duration_ms: u64,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The call exceeded the allowed timeout.
    Timeout,
    /// The request failed before or during transfer.
    Request(String),
}

/// Transport seam for webhook dispatch. Both dispatch paths go through this
/// trait so tests can substitute a recording fake instead of intercepting
/// HTTP calls.
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    /// POST the signed JSON body to `target_url`, honoring `timeout`.
    async fn post_signed(
        &self,
        target_url: &str,
        secret: &str,
        body: &str,
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError>;
}

/// Production transport backed by a shared reqwest client.
///
/// The client carries no default timeout; each call sets its own so sync
/// dispatch and async worker dispatch can use different limits.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl WebhookTransport for ReqwestTransport {
    async fn post_signed(
        &self,
        target_url: &str,
        secret: &str,
        body: &str,
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError> {
        // Step 1: Sign the exact bytes that go on the wire.
        let signature = signer::sign_body(secret, body.as_bytes());
        let started = Instant::now();

        // Step 2: Send the request with the per-call timeout.
        let response = self
            .client
            .post(target_url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(signer::SIGNATURE_HEADER, signature)
            .body(body.to_string())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout
                } else {
                    TransportError::Request(e.to_string())
                }
            })?;

        // Step 3: Read the status and body for the caller to interpret.
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::Request(e.to_string())
            }
        })?;

        Ok(TransportResponse {
            status,
            body,
            duration_ms: started.elapsed().as_millis() as u64,
        })
    }
}
