//! Shared test mocks and utilities for Strata aggregates.

mod clock;
mod event;
mod id;
mod repository;

pub use clock::FixedClock;
pub use event::history_event;
pub use id::{FixedIdGenerator, SequenceIdGenerator};
pub use repository::{
    AppendCall, EmptyEventRepository, FailingEventRepository, RecordingEventRepository,
};
