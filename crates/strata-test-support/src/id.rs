//! Test id generators — deterministic `IdGenerator` implementations for tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use strata_core::id::IdGenerator;
use uuid::Uuid;

/// A generator that returns the same id on every call. Suitable for tests
/// that only care that an id is present.
#[derive(Debug, Clone, Copy)]
pub struct FixedIdGenerator(pub Uuid);

impl IdGenerator for FixedIdGenerator {
    fn next_id(&self) -> Uuid {
        self.0
    }
}

/// A generator that returns ids from a predetermined sequence. Panics if the
/// sequence is exhausted. Used in tests that assert on specific event ids.
#[derive(Debug)]
pub struct SequenceIdGenerator {
    values: Vec<Uuid>,
    index: AtomicUsize,
}

impl SequenceIdGenerator {
    /// Create a new `SequenceIdGenerator` with the given ids.
    #[must_use]
    pub fn new(values: Vec<Uuid>) -> Self {
        Self {
            values,
            index: AtomicUsize::new(0),
        }
    }

    /// Create a generator yielding `Uuid::from_u128(1)`, `Uuid::from_u128(2)`,
    /// and so on up to `count`.
    #[must_use]
    pub fn counting(count: u128) -> Self {
        Self::new((1..=count).map(Uuid::from_u128).collect())
    }
}

impl IdGenerator for SequenceIdGenerator {
    fn next_id(&self) -> Uuid {
        let index = self.index.fetch_add(1, Ordering::SeqCst);
        self.values[index]
    }
}
