//! Silent Orbit — directive filter.
//!
//! Reads narrator text, validates its directive blocks against a policy and
//! an optional character record, and writes the outcome as JSON.

pub mod config;
pub mod error;
pub mod filter;
