//! Persistence infrastructure

pub mod database;
