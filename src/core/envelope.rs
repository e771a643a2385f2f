//! Outbound wire envelope.

use serde::Serialize;

/// The only action the client ever sends.
pub const SEND_MESSAGE_ACTION: &str = "sendMessage";

/// `{"action":"sendMessage","message":"..."}`. Built at send time, never kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundEnvelope {
    pub action: &'static str,
    pub message: String,
}

impl OutboundEnvelope {
    pub fn send_message(message: String) -> Self {
        Self {
            action: SEND_MESSAGE_ACTION,
            message,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
