//! Database module
//!
//! Pool creation and migrations for PostgreSQL.

pub mod connection;

pub use connection::DatabaseConnection;
