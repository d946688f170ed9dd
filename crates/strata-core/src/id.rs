//! Identifier generation.
//!
//! Event ids and registry probe ids come from an injected generator so that
//! tests and replays can use a seeded or recorded sequence instead of random
//! values.

use uuid::Uuid;

/// Abstraction over identifier generation.
pub trait IdGenerator: Send + Sync {
    /// Returns a new identifier.
    fn next_id(&self) -> Uuid;
}

/// Production generator producing random (v4) UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}
