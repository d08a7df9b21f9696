use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DeliveryResponse {
    pub delivery_id: String,
    pub webhook_id: String,
    pub event_type: String,
    pub status: String,
    pub attempt_count: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub attempts: Vec<AttemptResponse>,
}

#[derive(Debug, Serialize)]
pub struct AttemptResponse {
    pub attempt_number: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_status: Option<i32>,
    pub duration_ms: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct DeliveryStatsResponse {
    pub pending: i64,
    pub success: i64,
    pub failed: i64,
}
