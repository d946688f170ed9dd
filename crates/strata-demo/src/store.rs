//! In-memory event repository used by the walkthrough.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use strata_core::error::DomainError;
use strata_core::event::Event;
use strata_core::repository::EventRepository;
use uuid::Uuid;

/// Event streams kept in process memory, keyed by aggregate id.
#[derive(Debug, Default)]
pub struct InMemoryEventRepository {
    streams: Mutex<HashMap<Uuid, Vec<Event>>>,
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<Event>, DomainError> {
        Ok(self
            .streams
            .lock()
            .get(&aggregate_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: u64,
        events: &[Event],
    ) -> Result<(), DomainError> {
        let mut streams = self.streams.lock();
        let stream = streams.entry(aggregate_id).or_default();
        let actual = stream.last().map_or(0, Event::version);
        if actual != expected_version {
            return Err(DomainError::ConcurrencyConflict {
                aggregate_id,
                expected: expected_version,
                actual,
            });
        }
        stream.extend_from_slice(events);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use strata_core::aggregate::Aggregate;
    use strata_core::context::Context;
    use strata_orders::domain::aggregates::Order;

    use super::*;

    fn placed_order_events(id: Uuid) -> Vec<Event> {
        let mut order = Order::new(id);
        order.place(&Context::new(Uuid::new_v4()), "ada").unwrap();
        order.uncommitted_events().to_vec()
    }

    #[tokio::test]
    async fn test_append_then_load_returns_stream_in_order() {
        // Arrange
        let repo = InMemoryEventRepository::default();
        let id = Uuid::new_v4();
        let events = placed_order_events(id);

        // Act
        repo.append_events(id, 0, &events).await.unwrap();
        let loaded = repo.load_events(id).await.unwrap();

        // Assert
        assert_eq!(loaded, events);
        assert!(repo.load_events(Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_with_stale_version_conflicts() {
        // Arrange
        let repo = InMemoryEventRepository::default();
        let id = Uuid::new_v4();
        let events = placed_order_events(id);
        repo.append_events(id, 0, &events).await.unwrap();

        // Act
        let result = repo.append_events(id, 0, &events).await;

        // Assert
        match result.unwrap_err() {
            DomainError::ConcurrencyConflict {
                expected, actual, ..
            } => {
                assert_eq!(expected, 0);
                assert_eq!(actual, 1);
            }
            other => panic!("expected ConcurrencyConflict, got {other:?}"),
        }
    }
}
