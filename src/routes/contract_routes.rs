use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::contract_controller::ContractController;
use crate::dto::contract_dto::{ContractResponse, SignContractRequest};
use crate::dto::reservation_dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_contract_router() -> Router<AppState> {
    Router::new()
        .route("/:reservation_id", get(get_contract))
        .route("/:reservation_id/sign", post(sign_contract))
}

async fn get_contract(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(reservation_id): Path<Uuid>,
) -> Result<Json<ContractResponse>, AppError> {
    let controller = ContractController::new(state);
    let response = controller.get(&actor, reservation_id).await?;
    Ok(Json(response))
}

async fn sign_contract(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(reservation_id): Path<Uuid>,
    Json(request): Json<SignContractRequest>,
) -> Result<Json<ApiResponse<ContractResponse>>, AppError> {
    let controller = ContractController::new(state);
    let response = controller.sign(&actor, reservation_id, request).await?;
    Ok(Json(response))
}
