use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::types::{ElementType, EventType};

/// What a capture producer hands the pipeline: the event minus everything
/// the pipeline fills in itself (session, page location).
#[derive(Debug, Clone, PartialEq)]
pub struct Capture {
    pub event_type: EventType,
    pub element_id: String,
    pub element_type: ElementType,
    pub additional_data: Map<String, Value>,
}

impl Capture {
    pub fn new(event_type: EventType, element_id: impl Into<String>, element_type: ElementType) -> Self {
        Self {
            event_type,
            element_id: element_id.into(),
            element_type,
            additional_data: Map::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.additional_data.insert(key.to_string(), value.into());
        self
    }

    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.additional_data.extend(data);
        self
    }
}

/// One tracked event, ready for transmission.
///
/// Immutable once built: fields are private and there are no setters, so the
/// bytes produced by [`EventEnvelope::payload`] are the same on every attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    event_type: EventType,
    #[serde(default = "unknown_element", deserialize_with = "lenient_element_id")]
    element_id: String,
    element_type: ElementType,
    page_url: String,
    #[serde(default)]
    additional_data: Map<String, Value>,
    // Absent on entries persisted by older trackers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    session_id: Option<String>,
}

fn unknown_element() -> String {
    "unknown".to_string()
}

// Older trackers stored whatever the DOM handed them: a missing or null id,
// a number, or an SVG className object (`{"baseVal": ..., "animVal": ...}`).
fn lenient_element_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(id) => id,
        Value::Null => unknown_element(),
        Value::Object(map) => {
            let base = map.get("baseVal").and_then(Value::as_str).map(str::to_string);
            base.unwrap_or_else(|| Value::Object(map).to_string())
        }
        other => other.to_string(),
    })
}

/// The exact body POSTed to the collection endpoint.
#[derive(Serialize)]
struct WireEvent<'a> {
    event_type: EventType,
    element_id: &'a str,
    element_type: ElementType,
    page_url: &'a str,
    additional_data: &'a Map<String, Value>,
}

impl EventEnvelope {
    pub fn new(capture: Capture, session_id: String, page_url: String) -> Self {
        Self {
            event_type: capture.event_type,
            element_id: capture.element_id,
            element_type: capture.element_type,
            page_url,
            additional_data: capture.additional_data,
            session_id: Some(session_id),
        }
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn element_id(&self) -> &str {
        &self.element_id
    }

    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    pub fn page_url(&self) -> &str {
        &self.page_url
    }

    pub fn additional_data(&self) -> &Map<String, Value> {
        &self.additional_data
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// JSON body for the endpoint: `{event_type, element_id, element_type, page_url, additional_data}`.
    /// The session id is not part of the body; transports carry it out of band.
    pub fn payload(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&WireEvent {
            event_type: self.event_type,
            element_id: &self.element_id,
            element_type: self.element_type,
            page_url: &self.page_url,
            additional_data: &self.additional_data,
        })
    }
}
