//! Shared test clocks, event repositories and fixtures for the Silent Orbit
//! workspace.

mod clock;
mod fixtures;
mod repository;

pub use clock::FixedClock;
pub use fixtures::{STARTER_NAME, starter_record};
pub use repository::{
    EmptyEventRepository, FailingEventRepository, InMemoryEventRepository,
    RecordingEventRepository, StaleReadEventRepository,
};
