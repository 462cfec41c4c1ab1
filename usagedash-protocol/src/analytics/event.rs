use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded usage event. Owned by the backend and never mutated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageEvent {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub company_id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub content: String,
    #[serde(default)]
    pub attribute: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_timestamp: Option<DateTime<Utc>>,
}

impl UsageEvent {
    /// Calendar date (`YYYY-MM-DD`) the event was created on.
    pub fn created_on(&self) -> String {
        self.created_at.format("%Y-%m-%d").to_string()
    }

    pub fn has_value(&self) -> bool {
        !self.value.is_empty()
    }
}
