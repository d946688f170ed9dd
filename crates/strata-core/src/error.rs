//! Error types.
//!
//! Two families: `RegistrationError` covers mistakes made while wiring up the
//! aggregate registry at startup and is treated as fatal, `DomainError` covers
//! everything that can go wrong at runtime and is always returned to the
//! caller.

use thiserror::Error;
use uuid::Uuid;

use crate::aggregate::AggregateType;
use crate::event::EventType;

/// Configuration error raised while registering an aggregate factory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// The factory returned no instance for the probe id.
    #[error("aggregate factory returned no instance")]
    NoAggregate,

    /// The probe instance reported an empty aggregate type.
    #[error("attempt to register empty aggregate type")]
    EmptyAggregateType,

    /// A factory is already registered under this aggregate type.
    #[error("registering duplicate types for \"{0}\"")]
    DuplicateAggregateType(AggregateType),
}

/// Runtime domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No factory is registered for the aggregate type.
    #[error("aggregate not registered: {0}")]
    AggregateNotRegistered(AggregateType),

    /// The registered factory declined to build an instance.
    #[error("aggregate factory for {0} returned no instance")]
    AggregateNotCreated(AggregateType),

    /// An aggregate was not found.
    #[error("aggregate not found: {0}")]
    AggregateNotFound(Uuid),

    /// The aggregate does not handle this command type.
    #[error("unknown command {command_type} for aggregate {aggregate_type}")]
    UnknownCommand {
        /// The aggregate that received the command.
        aggregate_type: AggregateType,
        /// The unhandled command type.
        command_type: String,
    },

    /// The aggregate does not know how to apply this event type.
    #[error("unknown event {event_type} for aggregate {aggregate_type}")]
    UnknownEventType {
        /// The aggregate the event was applied to.
        aggregate_type: AggregateType,
        /// The unrecognised event type.
        event_type: EventType,
    },

    /// The event payload could not be encoded or decoded.
    #[error("invalid payload for event {event_type}: {reason}")]
    InvalidPayload {
        /// The event whose payload was rejected.
        event_type: EventType,
        /// Why the payload was rejected.
        reason: String,
    },

    /// An event's version does not line up with the aggregate's version.
    #[error("version mismatch on aggregate {aggregate_id}: expected {expected}, found {actual}")]
    VersionMismatch {
        /// The aggregate being replayed or written to.
        aggregate_id: Uuid,
        /// The version the event or aggregate should carry.
        expected: u64,
        /// The version actually found.
        actual: u64,
    },

    /// A replayed event belongs to a different aggregate stream.
    #[error("event of {event_aggregate_type} {event_aggregate_id} replayed into {aggregate_id}")]
    ForeignEvent {
        /// Type of the aggregate being replayed.
        aggregate_type: AggregateType,
        /// Id of the aggregate being replayed.
        aggregate_id: Uuid,
        /// Type recorded on the event.
        event_aggregate_type: AggregateType,
        /// Id recorded on the event.
        event_aggregate_id: Uuid,
    },

    /// Optimistic concurrency conflict.
    #[error("concurrency conflict on aggregate {aggregate_id}: expected {expected}, found {actual}")]
    ConcurrencyConflict {
        /// The aggregate that had the conflict.
        aggregate_id: Uuid,
        /// The expected version.
        expected: u64,
        /// The actual version found.
        actual: u64,
    },

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
