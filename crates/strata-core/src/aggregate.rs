//! Aggregate abstraction.
//!
//! An aggregate is a versioned entity whose state is derived from an ordered
//! sequence of events. Orchestrators drive every kind through the object-safe
//! [`Aggregate`] trait:
//!
//! 1. replay history with [`Aggregate::load_from_history`] (each event applied
//!    advances the version by one, nothing is buffered),
//! 2. hand it a command through [`Aggregate::handle_command`], which stores
//!    zero or more new events via [`Aggregate::store_event`],
//! 3. persist [`Aggregate::uncommitted_events`] and then call
//!    [`Aggregate::clear_uncommitted_events`].
//!
//! Instances carry no internal locking. Every mutation takes `&mut self`, so
//! at most one writer per instance exists within a process; serializing
//! writers across processes is left to the event repository's optimistic
//! version check.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::command::Command;
use crate::context::Context;
use crate::error::DomainError;
use crate::event::{Event, EventData, EventMetadata, EventPayload, EventType};

/// Name distinguishing one kind of aggregate from another, e.g. `"Order"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregateType(String);

impl AggregateType {
    /// Creates an aggregate type from a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the name is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AggregateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AggregateType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for AggregateType {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl PartialEq<str> for AggregateType {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for AggregateType {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Identity, version and uncommitted events shared by every aggregate.
///
/// Concrete aggregates embed one of these and expose it through
/// [`Aggregate::base`] and [`Aggregate::base_mut`].
#[derive(Debug, Clone)]
pub struct AggregateBase {
    aggregate_type: AggregateType,
    id: Uuid,
    version: u64,
    uncommitted_events: Vec<Event>,
}

impl AggregateBase {
    /// Creates the bookkeeping for a fresh instance at version 0.
    #[must_use]
    pub fn new(aggregate_type: impl Into<AggregateType>, id: Uuid) -> Self {
        Self {
            aggregate_type: aggregate_type.into(),
            id,
            version: 0,
            uncommitted_events: Vec::new(),
        }
    }

    /// Returns the aggregate type.
    #[must_use]
    pub fn aggregate_type(&self) -> &AggregateType {
        &self.aggregate_type
    }

    /// Returns the aggregate identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the current version (number of events applied).
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Advances the version by one.
    pub fn increment_version(&mut self) {
        self.version += 1;
    }

    /// Returns the events stored since the last clear, oldest first.
    #[must_use]
    pub fn uncommitted_events(&self) -> &[Event] {
        &self.uncommitted_events
    }

    /// Appends an event to the uncommitted buffer.
    pub fn push_event(&mut self, event: Event) {
        self.uncommitted_events.push(event);
    }

    /// Empties the uncommitted buffer.
    pub fn clear_uncommitted_events(&mut self) {
        self.uncommitted_events.clear();
    }
}

/// Trait for aggregate roots that reconstitute from event history.
///
/// Only [`base`](Aggregate::base), [`base_mut`](Aggregate::base_mut),
/// [`handle_command`](Aggregate::handle_command) and
/// [`apply_event`](Aggregate::apply_event) are required; the bookkeeping
/// operations delegate to the embedded [`AggregateBase`].
pub trait Aggregate: Send + Sync + fmt::Debug {
    /// Shared bookkeeping.
    fn base(&self) -> &AggregateBase;

    /// Shared bookkeeping, mutably.
    fn base_mut(&mut self) -> &mut AggregateBase;

    /// Runs the aggregate's business logic for a command, storing the
    /// resulting events with [`store_event`](Aggregate::store_event).
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownCommand` for commands the aggregate does
    /// not handle, `DomainError::Validation` when the command is rejected,
    /// or any error raised while storing events.
    fn handle_command(&mut self, ctx: &Context, command: &dyn Command) -> Result<(), DomainError>;

    /// Mutates the aggregate's state from an event and, on success, calls
    /// [`increment_version`](Aggregate::increment_version) exactly once.
    ///
    /// Implementations must decode and validate the event before touching
    /// any field, so that a failed application leaves the aggregate
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownEventType` or
    /// `DomainError::InvalidPayload` when the event cannot be applied; the
    /// version is not incremented.
    fn apply_event(&mut self, ctx: &Context, event: &Event) -> Result<(), DomainError>;

    /// Returns the registered type name of the aggregate.
    fn aggregate_type(&self) -> &AggregateType {
        self.base().aggregate_type()
    }

    /// Returns the aggregate identifier.
    fn aggregate_id(&self) -> Uuid {
        self.base().id()
    }

    /// Returns the current version (number of events applied).
    fn version(&self) -> u64 {
        self.base().version()
    }

    /// Advances the version by one. Called once per successfully applied
    /// event.
    fn increment_version(&mut self) {
        self.base_mut().increment_version();
    }

    /// Builds a new event, applies it and appends it to the uncommitted
    /// events.
    ///
    /// The event is stamped with the next version and with the context's
    /// correlation, causation, id and clock. If application fails nothing
    /// is appended and the version is left as it was.
    ///
    /// # Errors
    ///
    /// Returns the error raised by [`apply_event`](Aggregate::apply_event),
    /// or `DomainError::VersionMismatch` if `apply_event` succeeded without
    /// advancing the version by exactly one. The event is not appended in
    /// that case.
    fn store_event(
        &mut self,
        ctx: &Context,
        event_type: EventType,
        data: EventData,
    ) -> Result<Event, DomainError> {
        let event = Event::new(
            EventMetadata {
                event_id: ctx.next_id(),
                event_type,
                aggregate_type: self.aggregate_type().clone(),
                aggregate_id: self.aggregate_id(),
                version: self.version() + 1,
                correlation_id: ctx.correlation_id(),
                causation_id: ctx.causation_id(),
                occurred_at: ctx.now(),
            },
            data,
        );

        self.apply_event(ctx, &event)?;
        if self.version() != event.version() {
            return Err(DomainError::VersionMismatch {
                aggregate_id: self.aggregate_id(),
                expected: event.version(),
                actual: self.version(),
            });
        }
        self.base_mut().push_event(event.clone());
        Ok(event)
    }

    /// Encodes a typed payload and stores it under `P::EVENT_TYPE`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPayload` if the payload cannot be
    /// encoded, or the error raised by
    /// [`apply_event`](Aggregate::apply_event).
    fn record_event<P: EventPayload>(
        &mut self,
        ctx: &Context,
        payload: &P,
    ) -> Result<Event, DomainError>
    where
        Self: Sized,
    {
        let event_type = EventType::new(P::EVENT_TYPE);
        let data = EventData::encode(&event_type, payload)?;
        self.store_event(ctx, event_type, data)
    }

    /// Returns the events stored since the last clear, oldest first.
    fn uncommitted_events(&self) -> &[Event] {
        self.base().uncommitted_events()
    }

    /// Clears uncommitted events after persistence.
    fn clear_uncommitted_events(&mut self) {
        self.base_mut().clear_uncommitted_events();
    }

    /// Replays persisted history in order. Nothing is recorded as
    /// uncommitted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ForeignEvent` if an event was recorded for
    /// another aggregate type or id, `DomainError::VersionMismatch` if an
    /// event's version is not exactly one past the aggregate's current
    /// version, or the error raised by [`apply_event`](Aggregate::apply_event).
    /// Events before the failing one stay applied.
    fn load_from_history(&mut self, ctx: &Context, events: &[Event]) -> Result<(), DomainError> {
        for event in events {
            let meta = &event.metadata;
            if meta.aggregate_id != self.aggregate_id()
                || meta.aggregate_type != *self.aggregate_type()
            {
                return Err(DomainError::ForeignEvent {
                    aggregate_type: self.aggregate_type().clone(),
                    aggregate_id: self.aggregate_id(),
                    event_aggregate_type: meta.aggregate_type.clone(),
                    event_aggregate_id: meta.aggregate_id,
                });
            }
            let expected = self.version() + 1;
            if event.version() != expected {
                return Err(DomainError::VersionMismatch {
                    aggregate_id: self.aggregate_id(),
                    expected,
                    actual: event.version(),
                });
            }
            self.apply_event(ctx, event)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::json;

    use super::*;
    use crate::context::Clock;

    #[derive(Debug)]
    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct Incremented {
        by: i64,
    }

    impl EventPayload for Incremented {
        const EVENT_TYPE: &'static str = "Incremented";
    }

    /// Counter aggregate; rejects increments that would go negative.
    #[derive(Debug)]
    struct Counter {
        base: AggregateBase,
        value: i64,
    }

    impl Counter {
        fn new(id: Uuid) -> Self {
            Self {
                base: AggregateBase::new("Counter", id),
                value: 0,
            }
        }
    }

    impl Aggregate for Counter {
        fn base(&self) -> &AggregateBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut AggregateBase {
            &mut self.base
        }

        fn handle_command(
            &mut self,
            _ctx: &Context,
            command: &dyn Command,
        ) -> Result<(), DomainError> {
            Err(DomainError::UnknownCommand {
                aggregate_type: self.aggregate_type().clone(),
                command_type: command.command_type().to_owned(),
            })
        }

        fn apply_event(&mut self, _ctx: &Context, event: &Event) -> Result<(), DomainError> {
            if !event.is::<Incremented>() {
                return Err(DomainError::UnknownEventType {
                    aggregate_type: self.aggregate_type().clone(),
                    event_type: event.event_type().clone(),
                });
            }
            let payload: Incremented = event.decode()?;
            if self.value + payload.by < 0 {
                return Err(DomainError::Validation("counter cannot go negative".into()));
            }
            self.value += payload.by;
            self.increment_version();
            Ok(())
        }
    }

    /// Accepts every event but never advances its version.
    #[derive(Debug)]
    struct StuckCounter {
        base: AggregateBase,
    }

    impl Aggregate for StuckCounter {
        fn base(&self) -> &AggregateBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut AggregateBase {
            &mut self.base
        }

        fn handle_command(
            &mut self,
            _ctx: &Context,
            command: &dyn Command,
        ) -> Result<(), DomainError> {
            Err(DomainError::UnknownCommand {
                aggregate_type: self.aggregate_type().clone(),
                command_type: command.command_type().to_owned(),
            })
        }

        fn apply_event(&mut self, _ctx: &Context, _event: &Event) -> Result<(), DomainError> {
            Ok(())
        }
    }

    fn history(id: Uuid, versions: &[u64]) -> Vec<Event> {
        versions
            .iter()
            .map(|&version| {
                Event::new(
                    EventMetadata {
                        event_id: Uuid::new_v4(),
                        event_type: EventType::new(Incremented::EVENT_TYPE),
                        aggregate_type: AggregateType::new("Counter"),
                        aggregate_id: id,
                        version,
                        correlation_id: Uuid::new_v4(),
                        causation_id: Uuid::new_v4(),
                        occurred_at: Utc::now(),
                    },
                    EventData::from(json!({ "by": 1 })),
                )
            })
            .collect()
    }

    #[test]
    fn test_new_aggregate_starts_at_version_zero_without_events() {
        // Arrange
        let id = Uuid::new_v4();

        // Act
        let counter = Counter::new(id);

        // Assert
        assert_eq!(counter.aggregate_type(), "Counter");
        assert_eq!(counter.aggregate_id(), id);
        assert_eq!(counter.version(), 0);
        assert!(counter.uncommitted_events().is_empty());
    }

    #[test]
    fn test_store_event_applies_and_appends() {
        // Arrange
        let id = Uuid::new_v4();
        let correlation_id = Uuid::new_v4();
        let fixed_now = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        let ctx = Context::new(correlation_id).with_clock(Arc::new(FixedClock(fixed_now)));
        let mut counter = Counter::new(id);

        // Act
        let first = counter
            .store_event(&ctx, "Incremented".into(), json!({ "by": 2 }).into())
            .unwrap();
        let second = counter.record_event(&ctx, &Incremented { by: 3 }).unwrap();

        // Assert
        assert_eq!(counter.value, 5);
        assert_eq!(counter.version(), 2);
        let events = counter.uncommitted_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], first);
        assert_eq!(events[1], second);

        let meta = &second.metadata;
        assert_eq!(meta.event_type, "Incremented");
        assert_eq!(meta.aggregate_type, "Counter");
        assert_eq!(meta.aggregate_id, id);
        assert_eq!(meta.version, 2);
        assert_eq!(meta.correlation_id, correlation_id);
        assert_eq!(meta.causation_id, correlation_id);
        assert_eq!(meta.occurred_at, fixed_now);
    }

    #[test]
    fn test_store_event_leaves_state_untouched_when_apply_fails() {
        // Arrange
        let ctx = Context::new(Uuid::new_v4());
        let mut counter = Counter::new(Uuid::new_v4());
        counter.record_event(&ctx, &Incremented { by: 1 }).unwrap();

        // Act
        let rejected = counter.record_event(&ctx, &Incremented { by: -5 });
        let unknown = counter.store_event(&ctx, "Reset".into(), EventData::default());

        // Assert
        assert!(matches!(rejected, Err(DomainError::Validation(_))));
        match unknown.unwrap_err() {
            DomainError::UnknownEventType { event_type, .. } => assert_eq!(event_type, "Reset"),
            other => panic!("expected UnknownEventType, got {other:?}"),
        }
        assert_eq!(counter.value, 1);
        assert_eq!(counter.version(), 1);
        assert_eq!(counter.uncommitted_events().len(), 1);
    }

    #[test]
    fn test_clear_uncommitted_events_is_idempotent_and_keeps_version() {
        // Arrange
        let ctx = Context::new(Uuid::new_v4());
        let mut counter = Counter::new(Uuid::new_v4());
        counter.record_event(&ctx, &Incremented { by: 1 }).unwrap();
        counter.record_event(&ctx, &Incremented { by: 1 }).unwrap();

        // Act
        counter.clear_uncommitted_events();
        counter.clear_uncommitted_events();

        // Assert
        assert!(counter.uncommitted_events().is_empty());
        assert_eq!(counter.version(), 2);
    }

    #[test]
    fn test_load_from_history_advances_version_without_buffering() {
        // Arrange
        let id = Uuid::new_v4();
        let ctx = Context::new(Uuid::new_v4());
        let mut counter = Counter::new(id);

        // Act
        counter.load_from_history(&ctx, &history(id, &[1, 2, 3])).unwrap();

        // Assert
        assert_eq!(counter.version(), 3);
        assert_eq!(counter.value, 3);
        assert!(counter.uncommitted_events().is_empty());
    }

    #[test]
    fn test_load_from_history_rejects_version_gap() {
        // Arrange
        let id = Uuid::new_v4();
        let ctx = Context::new(Uuid::new_v4());
        let mut counter = Counter::new(id);

        // Act
        let result = counter.load_from_history(&ctx, &history(id, &[1, 3]));

        // Assert
        match result.unwrap_err() {
            DomainError::VersionMismatch {
                aggregate_id,
                expected,
                actual,
            } => {
                assert_eq!(aggregate_id, id);
                assert_eq!(expected, 2);
                assert_eq!(actual, 3);
            }
            other => panic!("expected VersionMismatch, got {other:?}"),
        }
        assert_eq!(counter.version(), 1);
    }

    #[test]
    fn test_store_event_continues_from_replayed_version() {
        // Arrange
        let id = Uuid::new_v4();
        let ctx = Context::new(Uuid::new_v4());
        let mut counter = Counter::new(id);
        counter.load_from_history(&ctx, &history(id, &[1, 2])).unwrap();

        // Act
        let event = counter.record_event(&ctx, &Incremented { by: 1 }).unwrap();

        // Assert
        assert_eq!(event.version(), 3);
        assert_eq!(counter.version(), 3);
        assert_eq!(counter.uncommitted_events().len(), 1);
    }

    #[test]
    fn test_store_event_rejects_apply_that_skips_version_increment() {
        // Arrange
        let id = Uuid::new_v4();
        let ctx = Context::new(Uuid::new_v4());
        let mut stuck = StuckCounter {
            base: AggregateBase::new("Counter", id),
        };

        // Act
        let first = stuck.record_event(&ctx, &Incremented { by: 1 });
        let second = stuck.record_event(&ctx, &Incremented { by: 1 });

        // Assert
        for result in [first, second] {
            match result.unwrap_err() {
                DomainError::VersionMismatch {
                    aggregate_id,
                    expected,
                    actual,
                } => {
                    assert_eq!(aggregate_id, id);
                    assert_eq!(expected, 1);
                    assert_eq!(actual, 0);
                }
                other => panic!("expected VersionMismatch, got {other:?}"),
            }
        }
        assert_eq!(stuck.version(), 0);
        assert!(stuck.uncommitted_events().is_empty());
    }

    #[test]
    fn test_load_from_history_rejects_event_of_another_aggregate_id() {
        // Arrange
        let id = Uuid::new_v4();
        let other_id = Uuid::new_v4();
        let ctx = Context::new(Uuid::new_v4());
        let mut counter = Counter::new(id);

        // Act
        let result = counter.load_from_history(&ctx, &history(other_id, &[1]));

        // Assert
        match result.unwrap_err() {
            DomainError::ForeignEvent {
                aggregate_id,
                event_aggregate_id,
                ..
            } => {
                assert_eq!(aggregate_id, id);
                assert_eq!(event_aggregate_id, other_id);
            }
            other => panic!("expected ForeignEvent, got {other:?}"),
        }
        assert_eq!(counter.version(), 0);
        assert_eq!(counter.value, 0);
    }

    #[test]
    fn test_load_from_history_rejects_event_of_another_aggregate_type() {
        // Arrange
        let id = Uuid::new_v4();
        let ctx = Context::new(Uuid::new_v4());
        let mut counter = Counter::new(id);
        let mut events = history(id, &[1, 2]);
        events[1].metadata.aggregate_type = AggregateType::new("Gauge");

        // Act
        let result = counter.load_from_history(&ctx, &events);

        // Assert
        match result.unwrap_err() {
            DomainError::ForeignEvent {
                aggregate_type,
                event_aggregate_type,
                ..
            } => {
                assert_eq!(aggregate_type, "Counter");
                assert_eq!(event_aggregate_type, "Gauge");
            }
            other => panic!("expected ForeignEvent, got {other:?}"),
        }
        assert_eq!(counter.version(), 1);
    }
}
