//! Command and query handlers for the character context.

pub mod command_handlers;
pub mod query_handlers;
