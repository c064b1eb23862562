//! Directive values, policy tables, pipeline findings and outcomes.

pub mod directive;
pub mod errors;
pub mod outcome;
pub mod policy;
