use crate::domain::value_objects::ids::{AppId, WebhookId};
use crate::domain::value_objects::timestamps::Timestamp;
use crate::domain::workflows::event_type::EventType;

/// A registered subscriber endpoint and its event subscriptions.
#[derive(Debug, Clone)]
pub struct Webhook {
    pub id: WebhookId,
    pub app_id: AppId,
    pub target_url: String,
    pub secret: String,
    pub is_active: bool,
    pub events: Vec<EventType>,
    pub channel: Option<String>,
    pub created_at: Timestamp,
}

impl Webhook {
    /// A webhook may only be matched against event types it subscribes to.
    pub fn subscribes_to(&self, event_type: EventType) -> bool {
        self.events.contains(&event_type)
    }

    /// Channel scoping: a webhook without a channel matches every channel.
    pub fn matches_channel(&self, channel: Option<&str>) -> bool {
        match (&self.channel, channel) {
            (None, _) => true,
            (Some(own), Some(requested)) => own == requested,
            (Some(_), None) => false,
        }
    }
}
