//! Pipeline stages: extraction, validation, clamping and aggregation.

pub mod aggregator;
pub mod clamper;
pub mod extractor;
pub mod validator;
