use axum::{
    extract::State, middleware::from_fn_with_state, routing::get, Extension, Json, Router,
};

use crate::controllers::reminder_controller::ReminderController;
use crate::dto::reminder_dto::ReminderResponse;
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_reminder_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(trigger_reminders))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware))
}

async fn trigger_reminders(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ReminderResponse>, AppError> {
    let controller = ReminderController::new(state.reminders.clone());
    let response = controller.trigger(user.user_id).await?;
    Ok(Json(response))
}
