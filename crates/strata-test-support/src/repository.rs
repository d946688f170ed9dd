//! Test repositories — mock `EventRepository` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use strata_core::error::DomainError;
use strata_core::event::Event;
use strata_core::repository::EventRepository;
use uuid::Uuid;

/// One recorded `append_events` call: aggregate id, expected version and the
/// appended events.
pub type AppendCall = (Uuid, u64, Vec<Event>);

/// An event repository that records all `append_events` calls. Returns the
/// configured history from every `load_events` call and always succeeds on
/// `append_events`.
#[derive(Debug)]
pub struct RecordingEventRepository {
    history: Mutex<Vec<Event>>,
    appended: Mutex<Vec<AppendCall>>,
}

impl RecordingEventRepository {
    /// Create a new recording repository that will return `history` from
    /// every `load_events` call.
    #[must_use]
    pub fn new(history: Vec<Event>) -> Self {
        Self {
            history: Mutex::new(history),
            appended: Mutex::new(Vec::new()),
        }
    }

    /// Returns a snapshot of all append calls.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn appended_events(&self) -> Vec<AppendCall> {
        self.appended.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventRepository for RecordingEventRepository {
    async fn load_events(&self, _aggregate_id: Uuid) -> Result<Vec<Event>, DomainError> {
        Ok(self.history.lock().unwrap().clone())
    }

    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: u64,
        events: &[Event],
    ) -> Result<(), DomainError> {
        self.appended
            .lock()
            .unwrap()
            .push((aggregate_id, expected_version, events.to_vec()));
        Ok(())
    }
}

/// An event repository that always returns an empty history and silently
/// accepts appends. Useful for testing creation commands and "aggregate not
/// found" scenarios.
#[derive(Debug)]
pub struct EmptyEventRepository;

#[async_trait]
impl EventRepository for EmptyEventRepository {
    async fn load_events(&self, _aggregate_id: Uuid) -> Result<Vec<Event>, DomainError> {
        Ok(vec![])
    }

    async fn append_events(
        &self,
        _aggregate_id: Uuid,
        _expected_version: u64,
        _events: &[Event],
    ) -> Result<(), DomainError> {
        Ok(())
    }
}

/// An event repository that always returns an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingEventRepository;

#[async_trait]
impl EventRepository for FailingEventRepository {
    async fn load_events(&self, _aggregate_id: Uuid) -> Result<Vec<Event>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn append_events(
        &self,
        _aggregate_id: Uuid,
        _expected_version: u64,
        _events: &[Event],
    ) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}
