//! Per-operation context passed to command handling and event application.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::id::{IdGenerator, RandomIdGenerator};

/// Abstraction over system time, used to timestamp new events.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock that delegates to the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Collaborators and tracing identifiers for one unit of work.
///
/// A context is built by the orchestrator for each command (or replay) and
/// handed to the aggregate. Every event stored under it carries its
/// correlation and causation ids, a timestamp from its clock and an id from
/// its generator.
#[derive(Clone)]
pub struct Context {
    correlation_id: Uuid,
    causation_id: Uuid,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl Context {
    /// Creates a context backed by the system clock and random ids. The
    /// causation id defaults to the correlation id.
    #[must_use]
    pub fn new(correlation_id: Uuid) -> Self {
        Self {
            correlation_id,
            causation_id: correlation_id,
            clock: Arc::new(SystemClock),
            ids: Arc::new(RandomIdGenerator),
        }
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the identifier generator.
    #[must_use]
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Sets the id of the message that caused this unit of work.
    #[must_use]
    pub fn with_causation_id(mut self, causation_id: Uuid) -> Self {
        self.causation_id = causation_id;
        self
    }

    /// Correlation id shared by everything triggered by the same request.
    #[must_use]
    pub fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    /// Id of the command or event that caused this unit of work.
    #[must_use]
    pub fn causation_id(&self) -> Uuid {
        self.causation_id
    }

    /// Current time according to the context's clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// A fresh identifier from the context's generator.
    #[must_use]
    pub fn next_id(&self) -> Uuid {
        self.ids.next_id()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("correlation_id", &self.correlation_id)
            .field("causation_id", &self.causation_id)
            .finish_non_exhaustive()
    }
}
