use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::reservation_dto::ApiResponse;
use crate::dto::vehicle_dto::{
    BlockedDateResponse, CreateBlockedDateRequest, DeleteBlockedDateRequest, VehicleResponse,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::services::availability_service::{month_end, month_start};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vehicles))
        .route("/:id", get(get_vehicle))
        .route("/:id/blocked-dates", post(create_blocked_date))
        .route("/:id/blocked-dates", get(list_blocked_dates))
        .route("/blocked-dates/:id", delete(delete_blocked_date))
}

#[derive(Debug, Deserialize)]
struct BlockedDatesQuery {
    year: i32,
    month: u32,
}

async fn list_vehicles(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(state);
    let response = controller.list_by_owner(&actor).await?;
    Ok(Json(response))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<VehicleResponse>, AppError> {
    let controller = VehicleController::new(state);
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn create_blocked_date(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<CreateBlockedDateRequest>,
) -> Result<Json<ApiResponse<BlockedDateResponse>>, AppError> {
    let controller = VehicleController::new(state);
    let response = controller.create_blocked_date(&actor, id, request).await?;
    Ok(Json(response))
}

async fn list_blocked_dates(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<BlockedDatesQuery>,
) -> Result<Json<Vec<BlockedDateResponse>>, AppError> {
    let from = month_start(query.year, query.month)
        .ok_or_else(|| AppError::BadRequest("Mes inválido".to_string()))?;
    let to = month_end(query.year, query.month)
        .ok_or_else(|| AppError::BadRequest("Mes inválido".to_string()))?;

    let controller = VehicleController::new(state);
    let response = controller.list_blocked_dates(id, from, to).await?;
    Ok(Json(response))
}

async fn delete_blocked_date(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<DeleteBlockedDateRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = VehicleController::new(state);
    let response = controller.delete_blocked_date(&actor, id, request.confirm).await?;
    Ok(Json(response))
}
