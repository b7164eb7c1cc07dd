use serde_json::{Map, Value};
use thiserror::Error;

/// Decoded event: field name -> JSON value.
pub type Event = Map<String, Value>;

/// Raw value delivered by a queue source, shape unknown until decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Structured(Value),
    Text(String),
    Binary(Vec<u8>),
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub offset: i64,
    pub payload: Payload,
}

impl Record {
    pub fn new(offset: i64, payload: Payload) -> Self {
        Self { offset, payload }
    }

    /// Short printable form for debug logs.
    pub fn preview(&self, max_chars: usize) -> String {
        let text = match &self.payload {
            Payload::Structured(v) => v.to_string(),
            Payload::Text(s) => s.clone(),
            Payload::Binary(b) => String::from_utf8_lossy(b).into_owned(),
            Payload::Empty => return "<empty>".into(),
        };
        if text.chars().count() > max_chars {
            let cut: String = text.chars().take(max_chars).collect();
            format!("{cut}…")
        } else {
            text
        }
    }
}

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("empty payload")]
    Empty,
    #[error("invalid JSON message: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a JSON object but got {0}")]
    NotAnObject(&'static str),
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn into_event(value: Value) -> Result<Event, DecodeError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(DecodeError::NotAnObject(kind_of(&other))),
    }
}

/// Turn a payload of any shape into an event mapping.
///
/// Bytes are decoded as UTF-8 with replacement characters, so invalid
/// sequences never fail here; they usually fail the JSON parse instead.
pub fn decode_payload(payload: Payload) -> Result<Event, DecodeError> {
    match payload {
        Payload::Structured(value) => into_event(value),
        Payload::Text(text) => into_event(serde_json::from_str(&text)?),
        Payload::Binary(bytes) => {
            let text = String::from_utf8_lossy(&bytes);
            into_event(serde_json::from_str(&text)?)
        }
        Payload::Empty => Err(DecodeError::Empty),
    }
}
