//! Silent Orbit Core — shared domain abstractions.
//!
//! This crate defines the traits and types that the directive pipeline and
//! the character context both depend on: the nested character record and
//! the mutation applied to it, event sourcing plumbing, and the domain
//! error type. It contains no infrastructure code.

pub mod aggregate;
pub mod error;
pub mod event;
pub mod mutation;
pub mod record;
pub mod repository;
