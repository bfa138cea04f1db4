use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::post,
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::service_controller::ServiceController;
use crate::dto::auth_dto::MessageResponse;
use crate::dto::service_dto::{CreateServiceRequest, ServiceResponse};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::AppJson;

/// POST and GET take a vehicle id, DELETE takes a service record id
pub fn create_service_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/:id",
            post(create_service).get(list_services).delete(delete_service),
        )
        .route_layer(from_fn_with_state(state.clone(), auth_middleware))
}

async fn create_service(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(vehicle_id): Path<Uuid>,
    AppJson(request): AppJson<CreateServiceRequest>,
) -> Result<(StatusCode, Json<ServiceResponse>), AppError> {
    let controller = ServiceController::new(state.pool.clone());
    let response = controller.create(vehicle_id, user.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_services(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(vehicle_id): Path<Uuid>,
) -> Result<Json<Vec<ServiceResponse>>, AppError> {
    let controller = ServiceController::new(state.pool.clone());
    let response = controller.list(vehicle_id, user.user_id).await?;
    Ok(Json(response))
}

async fn delete_service(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let controller = ServiceController::new(state.pool.clone());
    controller.delete(id, user.user_id).await?;
    Ok(Json(MessageResponse::new("Service record removed")))
}
