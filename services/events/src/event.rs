use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub sequence: i64,
    pub id: String,
    pub event_type: String,
    pub region: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub payload: serde_json::Value,
}
