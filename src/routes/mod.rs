pub mod auth_routes;
pub mod reminder_routes;
pub mod service_routes;
pub mod vehicle_routes;
