use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::inspection_controller::InspectionController;
use crate::dto::inspection_dto::{InspectionResponse, SubmitInspectionRequest, ValidateInspectionRequest};
use crate::dto::reservation_dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::inspection::InspectionSide;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_inspection_router() -> Router<AppState> {
    Router::new()
        .route("/:reservation_id", get(list_inspections))
        .route("/:reservation_id/checkin", post(submit_checkin))
        .route("/:reservation_id/checkin/validate", post(validate_checkin))
        .route("/:reservation_id/checkout", post(submit_checkout))
        .route("/:reservation_id/checkout/validate", post(validate_checkout))
}

async fn list_inspections(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(reservation_id): Path<Uuid>,
) -> Result<Json<Vec<InspectionResponse>>, AppError> {
    let controller = InspectionController::new(state);
    let response = controller.list(&actor, reservation_id).await?;
    Ok(Json(response))
}

async fn submit_checkin(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(reservation_id): Path<Uuid>,
    Json(request): Json<SubmitInspectionRequest>,
) -> Result<Json<ApiResponse<InspectionResponse>>, AppError> {
    let controller = InspectionController::new(state);
    let response = controller
        .submit(&actor, reservation_id, InspectionSide::Checkin, request)
        .await?;
    Ok(Json(response))
}

async fn validate_checkin(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(reservation_id): Path<Uuid>,
    Json(request): Json<ValidateInspectionRequest>,
) -> Result<Json<ApiResponse<InspectionResponse>>, AppError> {
    let controller = InspectionController::new(state);
    let response = controller
        .validate(&actor, reservation_id, InspectionSide::Checkin, request)
        .await?;
    Ok(Json(response))
}

async fn submit_checkout(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(reservation_id): Path<Uuid>,
    Json(request): Json<SubmitInspectionRequest>,
) -> Result<Json<ApiResponse<InspectionResponse>>, AppError> {
    let controller = InspectionController::new(state);
    let response = controller
        .submit(&actor, reservation_id, InspectionSide::Checkout, request)
        .await?;
    Ok(Json(response))
}

async fn validate_checkout(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(reservation_id): Path<Uuid>,
    Json(request): Json<ValidateInspectionRequest>,
) -> Result<Json<ApiResponse<InspectionResponse>>, AppError> {
    let controller = InspectionController::new(state);
    let response = controller
        .validate(&actor, reservation_id, InspectionSide::Checkout, request)
        .await?;
    Ok(Json(response))
}
