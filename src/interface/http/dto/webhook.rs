use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct RegisterWebhookRequest {
    pub app_id: String,
    pub target_url: String,
    pub secret: String,
    pub events: Vec<String>,
    #[serde(default)]
    pub channel: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterWebhookResponse {
    pub webhook_id: String,
    pub is_active: bool,
    pub events: Vec<String>,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct UnregisterWebhookResponse {
    pub deleted: bool,
}
