use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::reservation_controller::ReservationController;
use crate::dto::reservation_dto::{
    ApiResponse, CreateReservationRequest, ReservationDetailResponse, ReservationListQuery,
    ReservationResponse,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_reservation_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_reservation))
        .route("/", get(list_reservations))
        .route("/:id", get(get_reservation))
        .route("/:id/confirm", post(confirm_reservation))
        .route("/:id/cancel", post(cancel_reservation))
}

async fn create_reservation(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Json(request): Json<CreateReservationRequest>,
) -> Result<Json<ApiResponse<ReservationResponse>>, AppError> {
    let controller = ReservationController::new(state);
    let response = controller.create(&actor, request).await?;
    Ok(Json(response))
}

async fn list_reservations(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Query(query): Query<ReservationListQuery>,
) -> Result<Json<Vec<ReservationResponse>>, AppError> {
    let controller = ReservationController::new(state);
    let response = controller.list(&actor, query.role).await?;
    Ok(Json(response))
}

async fn get_reservation(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReservationDetailResponse>, AppError> {
    let controller = ReservationController::new(state);
    let response = controller.get_detail(&actor, id).await?;
    Ok(Json(response))
}

async fn confirm_reservation(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReservationResponse>>, AppError> {
    let controller = ReservationController::new(state);
    let response = controller.confirm(&actor, id).await?;
    Ok(Json(response))
}

async fn cancel_reservation(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReservationResponse>>, AppError> {
    let controller = ReservationController::new(state);
    let response = controller.cancel(&actor, id).await?;
    Ok(Json(response))
}
