pub mod auth_controller;
pub mod reminder_controller;
pub mod service_controller;
pub mod vehicle_controller;
