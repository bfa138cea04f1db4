//! Services module
//!
//! Business logic that is not tied to one HTTP route: next service date
//! resolution, reminder dispatch and its daily timer, outbound email.

pub mod email_service;
pub mod next_service;
pub mod reminder_scheduler;
pub mod reminder_service;

pub use next_service::resolve_next_service_date;
