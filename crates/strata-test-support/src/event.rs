//! Test events — builders for persisted history.

use chrono::{TimeZone, Utc};
use strata_core::aggregate::AggregateType;
use strata_core::event::{Event, EventData, EventMetadata, EventType};
use uuid::Uuid;

/// Builds an event as it would come back from an event repository.
///
/// Metadata not given here is filled with fresh ids and the standard test
/// timestamp (2026-01-15T10:00:00Z).
///
/// # Panics
///
/// Never in practice; the timestamp is a valid UTC instant.
#[must_use]
pub fn history_event(
    aggregate_type: &str,
    aggregate_id: Uuid,
    version: u64,
    event_type: &str,
    data: serde_json::Value,
) -> Event {
    Event::new(
        EventMetadata {
            event_id: Uuid::new_v4(),
            event_type: EventType::new(event_type),
            aggregate_type: AggregateType::new(aggregate_type),
            aggregate_id,
            version,
            correlation_id: Uuid::new_v4(),
            causation_id: Uuid::new_v4(),
            occurred_at: Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
        },
        EventData::from(data),
    )
}
