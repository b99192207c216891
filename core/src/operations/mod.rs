//! Operations over orders, appointments and staff accounts.
//!
//! Each operation takes the database connection explicitly and validates its
//! own input, so the HTTP layer only maps results onto responses.

pub mod appointments;
pub mod auth;
pub mod costs;
pub mod dashboard;
pub mod folio;
pub mod gallery;
pub mod lookup;
pub mod orders;
pub mod progress;
