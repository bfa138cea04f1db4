//! Project configuration: database pool settings and environment variables.

pub mod database;
pub mod environment;

pub use environment::*;
