//! # Display Messages
//!
//! Inbound payloads are decoded into an [`Inbound`] tagged union before they
//! reach the store. The well-formed branch carries the server's message object;
//! the malformed branch carries whatever text could be salvaged. Either branch
//! converts into a [`DisplayMessage`], so the renderer never has to coerce
//! loosely-typed JSON.
//!
//! ```text
//! raw payload ──decode()──┬── WellFormed(DisplayMessage) ──┐
//!                         └── Malformed { salvaged }  ─────┴──► DisplayMessage
//! ```

use std::fmt;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde_json::{Map, Value};

/// A normalized chat entry, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayMessage {
    /// Message body. `None` when the server sent no string `text` field.
    pub text: Option<String>,
    /// ISO-8601 timestamp as received (or generated for fallbacks).
    pub timestamp: Option<String>,
    /// Every other field of the server's message object, kept opaquely.
    pub extra: Map<String, Value>,
}

impl DisplayMessage {
    /// Build a message from a server-side JSON object.
    /// String `text`/`timestamp` are lifted out; everything else is passthrough.
    pub fn from_object(mut object: Map<String, Value>) -> Self {
        let text = take_string(&mut object, "text");
        let timestamp = take_string(&mut object, "timestamp");
        Self {
            text,
            timestamp,
            extra: object,
        }
    }

    /// A bare-text message with no timestamp.
    pub fn from_text(text: String) -> Self {
        Self {
            text: Some(text),
            timestamp: None,
            extra: Map::new(),
        }
    }

    /// Fallback record for payloads that could not be decoded.
    /// Always carries a fresh wall-clock timestamp.
    pub fn fallback(salvaged: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            text: salvaged,
            timestamp: Some(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
            extra: Map::new(),
        }
    }

    /// Text shown in the message bubble.
    ///
    /// A non-zero numeric `text` is shown as the number. Empty or missing
    /// text falls back to the stringified record.
    pub fn display_text(&self) -> String {
        match (self.text.as_deref(), self.extra.get("text")) {
            (Some(text), _) if !text.is_empty() => text.to_string(),
            (None, Some(Value::Number(n))) if n.as_f64() != Some(0.0) => n.to_string(),
            _ => self.to_json().to_string(),
        }
    }

    /// Parsed timestamp, if present and a recognized ISO-8601 form.
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp.as_deref().and_then(parse_timestamp)
    }

    /// Human-readable local time. Absent or invalid timestamps use `now`.
    pub fn display_time(&self, time_format: &str, now: DateTime<Utc>) -> String {
        let at = self.parsed_timestamp().unwrap_or(now);
        at.with_timezone(&Local).format(time_format).to_string()
    }

    /// Reassemble the full record as a JSON object.
    pub fn to_json(&self) -> Value {
        let mut object = self.extra.clone();
        if let Some(text) = &self.text {
            object.insert("text".to_string(), Value::String(text.clone()));
        }
        if let Some(timestamp) = &self.timestamp {
            object.insert("timestamp".to_string(), Value::String(timestamp.clone()));
        }
        Value::Object(object)
    }
}

/// Accepts RFC 3339, date-times without an offset (local time) and bare
/// dates (UTC midnight).
fn parse_timestamp(ts: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Some(dt.with_timezone(&Utc));
    }
    let local = NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M"));
    if let Ok(naive) = local {
        return Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(ts, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn take_string(object: &mut Map<String, Value>, key: &str) -> Option<String> {
    if !object.get(key).is_some_and(Value::is_string) {
        return None;
    }
    match object.remove(key) {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

/// Why an inbound payload failed to decode.
#[derive(Debug)]
pub enum DecodeError {
    /// Payload is not JSON at all.
    Json(serde_json::Error),
    /// Payload is JSON but has no usable `message` field.
    MissingMessage,
    /// `message` is present but neither an object nor a string.
    UnexpectedShape(&'static str),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Json(e) => write!(f, "invalid JSON: {e}"),
            DecodeError::MissingMessage => write!(f, "payload has no `message` field"),
            DecodeError::UnexpectedShape(kind) => {
                write!(f, "`message` is {kind}, expected object or string")
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Result of decoding one inbound payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    WellFormed(DisplayMessage),
    Malformed { salvaged: Option<String> },
}

impl Inbound {
    /// Decode a raw payload. Never fails: errors become `Malformed`.
    pub fn decode(raw: &str) -> Self {
        match decode_message(raw) {
            Ok(message) => Inbound::WellFormed(message),
            Err(e) => {
                log::warn!("Error parsing message: {}", e);
                Inbound::Malformed {
                    salvaged: salvage_text(raw),
                }
            }
        }
    }

    /// Collapse into a display record. Fallbacks are stamped with `now`.
    pub fn into_display(self, now: DateTime<Utc>) -> DisplayMessage {
        match self {
            Inbound::WellFormed(message) => message,
            Inbound::Malformed { salvaged } => DisplayMessage::fallback(salvaged, now),
        }
    }
}

/// Strict decode of `{"message": {...}}` or `{"message": "..."}`.
pub fn decode_message(raw: &str) -> Result<DisplayMessage, DecodeError> {
    let value: Value = serde_json::from_str(raw).map_err(DecodeError::Json)?;
    let Value::Object(mut envelope) = value else {
        return Err(DecodeError::MissingMessage);
    };
    match envelope.remove("message") {
        Some(Value::Object(object)) => Ok(DisplayMessage::from_object(object)),
        Some(Value::String(text)) => Ok(DisplayMessage::from_text(text)),
        Some(Value::Null) | None => Err(DecodeError::MissingMessage),
        Some(Value::Bool(_)) => Err(DecodeError::UnexpectedShape("a boolean")),
        Some(Value::Number(_)) => Err(DecodeError::UnexpectedShape("a number")),
        Some(Value::Array(_)) => Err(DecodeError::UnexpectedShape("an array")),
    }
}

/// Best-effort text for a payload that failed strict decoding.
///
/// JSON with a non-null `message` yields that value's compact JSON;
/// anything else yields the raw payload when it is not blank.
fn salvage_text(raw: &str) -> Option<String> {
    if let Ok(Value::Object(envelope)) = serde_json::from_str::<Value>(raw)
        && let Some(message) = envelope.get("message")
        && !message.is_null()
    {
        return Some(message.to_string());
    }
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
