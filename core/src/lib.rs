//! WrapLab core
//!
//! Service orders for a wrap/PPF shop: intake, status progression, photo
//! galleries, cost tracking, public folio lookup and appointment scheduling.

pub mod common;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;
pub mod operations;

pub use common::errors::{AuthError, CoreError, FormErrors, Result};
pub use config::AppConfig;
pub use infrastructure::database::Database;
