use crate::domain::entities::webhook::Webhook;
use crate::domain::value_objects::ids::{AppId, WebhookId};
use crate::domain::value_objects::timestamps::Timestamp;
use crate::domain::workflows::event_type::EventType;
use time::OffsetDateTime;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WebhookRow {
    pub id: uuid::Uuid,
    pub app_id: uuid::Uuid,
    pub target_url: String,
    pub secret: String,
    pub is_active: bool,
    pub events: Vec<String>,
    pub channel: Option<String>,
    pub created_at: OffsetDateTime,
}

impl WebhookRow {
    pub fn from_entity(webhook: &Webhook) -> Self {
        Self {
            id: webhook.id.0,
            app_id: webhook.app_id.0,
            target_url: webhook.target_url.clone(),
            secret: webhook.secret.clone(),
            is_active: webhook.is_active,
            events: webhook.events.iter().map(|e| e.as_str().to_string()).collect(),
            channel: webhook.channel.clone(),
            created_at: webhook.created_at.as_inner(),
        }
    }

    /// Map a row back to the domain entity. Unknown event codes are dropped
    /// rather than failing the whole webhook.
    pub fn into_entity(self) -> Webhook {
        Webhook {
            id: WebhookId(self.id),
            app_id: AppId(self.app_id),
            target_url: self.target_url,
            secret: self.secret,
            is_active: self.is_active,
            events: self
                .events
                .iter()
                .filter_map(|code| EventType::parse(code))
                .collect(),
            channel: self.channel,
            created_at: Timestamp::from(self.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::WebhookRow;
    use crate::domain::entities::webhook::Webhook;
    use crate::domain::value_objects::ids::{AppId, WebhookId};
    use crate::domain::value_objects::timestamps::Timestamp;
    use crate::domain::workflows::event_type::EventType;

    #[test]
    fn given_row_with_unknown_event_code_when_mapped_should_drop_it() {
        let webhook = Webhook {
            id: WebhookId::new(),
            app_id: AppId::new(),
            target_url: "https://app.example.com/hook".to_string(),
            secret: "s".to_string(),
            is_active: true,
            events: vec![EventType::CheckoutUpdated],
            channel: None,
            created_at: Timestamp::now_utc(),
        };
        let mut row = WebhookRow::from_entity(&webhook);
        row.events.push("legacy_event".to_string());

        let mapped = row.into_entity();
        assert_eq!(mapped.events, vec![EventType::CheckoutUpdated]);
    }
}
