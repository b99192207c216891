//! Shared error types and form parsing helpers

pub mod errors;
pub mod forms;
