//! VehicleVault backend
//!
//! REST API for vehicle owners to keep their vehicles, service history and
//! preferred workshops, plus a daily email reminder for upcoming services.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::middleware::cors::cors_layer;
use crate::state::AppState;

/// Full router with every `/api` group mounted
pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health))
        .nest("/api/auth", routes::auth_routes::create_auth_router(&state))
        .nest("/api/vehicles", routes::vehicle_routes::create_vehicle_router(&state))
        .nest("/api/services", routes::service_routes::create_service_router(&state))
        .nest("/api/reminders", routes::reminder_routes::create_reminder_router(&state))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "vehicle_vault",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
