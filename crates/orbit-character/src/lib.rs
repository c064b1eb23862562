//! Silent Orbit — character context.
//!
//! Owns the character record as an event stream, applies narrator
//! directives to it through the `orbit-directives` pipeline, and serves the
//! read views the game screen needs.

pub mod application;
pub mod domain;
