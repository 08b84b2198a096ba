//! Command implementations.

pub mod config;
pub mod stage;
pub mod types;
pub mod validate;
