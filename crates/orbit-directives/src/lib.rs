//! Silent Orbit — narrator directive pipeline.
//!
//! Narrator text may carry inline blocks such as
//! `UPDATE_START {"status.integrity": -10} UPDATE_END`. This crate strips
//! those blocks from the prose, checks every requested change against a
//! [`PathPolicy`], clamps increments against the character's absolute
//! limits, and merges everything into one [`ValidationOutcome`].
//!
//! The pipeline is pure: it performs no I/O and never fails on malformed
//! input. Applying the outcome to storage is the caller's job.

pub mod application;
pub mod domain;

pub use application::aggregator::{NarrationValidator, validate_narration};
pub use application::clamper::clamp_increments;
pub use application::extractor::{DirectiveExtractor, Extraction};
pub use application::validator::validate_one;
pub use domain::directive::{Directive, DirectiveValue};
pub use domain::errors::{ClampEdge, ClampWarning, DirectiveError};
pub use domain::outcome::{DirectiveOps, ValidationOutcome};
pub use domain::policy::{Bounds, PathPolicy, PolicyError, ValueKind};
