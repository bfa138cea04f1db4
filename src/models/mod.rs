//! Data models
//!
//! Row types mapping the PostgreSQL schema in `migrations/`.

pub mod service;
pub mod user;
pub mod vehicle;
