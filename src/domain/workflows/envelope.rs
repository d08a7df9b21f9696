use crate::domain::value_objects::ids::WebhookId;
use crate::domain::workflows::event_type::EventType;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Versioned payload envelope sent to subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub version: u8,
    pub event_type: String,
    pub payload: Value,
    pub meta: EnvelopeMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvelopeMeta {
    pub issued_at: String,
    pub webhook_id: String,
    pub subject_id: String,
}

#[derive(Debug)]
pub enum SerializationError {
    Payload(String),
}

impl Envelope {
    pub const VERSION: u8 = 1;

    pub fn build(
        event_type: EventType,
        payload: Value,
        subject_id: &str,
        webhook_id: WebhookId,
        issued_at: OffsetDateTime,
    ) -> Self {
        Self {
            version: Self::VERSION,
            event_type: event_type.as_str().to_string(),
            payload,
            meta: EnvelopeMeta {
                issued_at: issued_at.format(&Rfc3339).unwrap_or_default(),
                webhook_id: webhook_id.to_string(),
                subject_id: subject_id.to_string(),
            },
        }
    }

    /// Serialize the envelope into the JSON body posted to the subscriber.
    pub fn to_body(&self) -> Result<String, SerializationError> {
        serde_json::to_string(self).map_err(|e| SerializationError::Payload(e.to_string()))
    }
}
