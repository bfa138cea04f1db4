//! Shared utilities: errors, validation and JWT handling.

pub mod errors;
pub mod extract;
pub mod jwt;
pub mod validation;
