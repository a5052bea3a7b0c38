//! Wire shapes for the row-insert notification and the forwarded request.

use serde::{Deserialize, Serialize};

use crate::error::RelayError;

/// Role value that makes a message eligible for relaying.
pub const ASSISTANT_ROLE: &str = "assistant";

/// A row from the `messages` table as carried by the insert notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: String,
    pub conversation_id: String,
    pub role: String,
    pub content: String,
    pub created_at: String,
}

impl MessageRecord {
    pub fn is_assistant(&self) -> bool {
        self.role == ASSISTANT_ROLE
    }
}

/// Row-insert notification delivered by the database trigger.
///
/// Only `record` is validated. `type`, `table` and `schema` are kept for
/// logging and are never used to filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundNotification {
    pub record: MessageRecord,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub old_record: Option<serde_json::Value>,
}

impl InboundNotification {
    /// Parse and validate a raw request body.
    pub fn parse(body: &[u8]) -> Result<Self, RelayError> {
        serde_json::from_slice(body).map_err(|e| RelayError::InvalidPayload(e.to_string()))
    }
}

/// Body posted to the external endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayRequest {
    pub user_input: String,
    pub conversation_id: String,
}

impl RelayRequest {
    pub fn from_record(record: &MessageRecord) -> Self {
        Self {
            user_input: record.content.clone(),
            conversation_id: record.conversation_id.clone(),
        }
    }
}
