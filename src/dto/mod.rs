//! Request and response bodies of the HTTP API (camelCase JSON).

pub mod auth_dto;
pub mod reminder_dto;
pub mod service_dto;
pub mod vehicle_dto;
