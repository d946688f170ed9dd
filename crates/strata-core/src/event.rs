//! Domain event abstractions.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::AggregateType;
use crate::error::DomainError;

/// Name of something that happened to an aggregate, e.g. `"ItemAdded"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventType(String);

impl EventType {
    /// Creates an event type from a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for EventType {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl PartialEq<str> for EventType {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for EventType {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Opaque event payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventData(serde_json::Value);

impl EventData {
    /// Serializes a typed payload.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPayload` if the payload cannot be
    /// represented as JSON (e.g. a map with non-string keys).
    pub fn encode<T: Serialize>(event_type: &EventType, payload: &T) -> Result<Self, DomainError> {
        serde_json::to_value(payload)
            .map(Self)
            .map_err(|e| DomainError::InvalidPayload {
                event_type: event_type.clone(),
                reason: e.to_string(),
            })
    }

    /// Returns the raw JSON value.
    #[must_use]
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

impl From<serde_json::Value> for EventData {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// A typed event payload with a fixed event type name.
pub trait EventPayload: Serialize + DeserializeOwned {
    /// The event type this payload is stored under.
    const EVENT_TYPE: &'static str;
}

/// Metadata attached to every event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Type name for payload routing.
    pub event_type: EventType,
    /// Kind of aggregate the event belongs to.
    pub aggregate_type: AggregateType,
    /// Aggregate/stream this event belongs to.
    pub aggregate_id: Uuid,
    /// Aggregate version this event produces when applied.
    pub version: u64,
    /// Correlation ID for tracing a command through its effects.
    pub correlation_id: Uuid,
    /// Causation ID linking this event to the event/command that caused it.
    pub causation_id: Uuid,
    /// Timestamp of event creation.
    pub occurred_at: DateTime<Utc>,
}

/// An immutable record of something that happened to an aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event payload.
    pub data: EventData,
}

impl Event {
    /// Creates an event from metadata and payload.
    #[must_use]
    pub fn new(metadata: EventMetadata, data: EventData) -> Self {
        Self { metadata, data }
    }

    /// Returns the event type.
    #[must_use]
    pub fn event_type(&self) -> &EventType {
        &self.metadata.event_type
    }

    /// Returns the aggregate identifier.
    #[must_use]
    pub fn aggregate_id(&self) -> Uuid {
        self.metadata.aggregate_id
    }

    /// Returns the aggregate version this event produces.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.metadata.version
    }

    /// Returns the payload.
    #[must_use]
    pub fn data(&self) -> &EventData {
        &self.data
    }

    /// Returns `true` if the event is stored under `P`'s event type.
    #[must_use]
    pub fn is<P: EventPayload>(&self) -> bool {
        self.metadata.event_type == P::EVENT_TYPE
    }

    /// Deserializes the payload into `P`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPayload` if the payload does not match
    /// `P`'s shape.
    pub fn decode<P: DeserializeOwned>(&self) -> Result<P, DomainError> {
        P::deserialize(&self.data.0).map_err(|e| DomainError::InvalidPayload {
            event_type: self.metadata.event_type.clone(),
            reason: e.to_string(),
        })
    }
}
