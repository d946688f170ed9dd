//! Event repository abstraction.
//!
//! Only the interface lives here; how events are stored is up to the
//! implementation.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DomainError;
use crate::event::Event;

/// Repository trait for loading and appending events.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Load all events for a given aggregate, ordered by version.
    async fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<Event>, DomainError>;

    /// Append new events to an aggregate stream with optimistic concurrency.
    /// `expected_version` is the stream's version before these events.
    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: u64,
        events: &[Event],
    ) -> Result<(), DomainError>;
}
