use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::controllers::availability_controller::AvailabilityController;
use crate::services::availability_service::{CalendarDay, MonthCalendar};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_availability_router() -> Router<AppState> {
    Router::new()
        .route("/:vehicle_id/day/:date", get(get_day))
        .route("/:vehicle_id/calendar", get(get_calendar))
}

#[derive(Debug, Deserialize)]
struct CalendarQuery {
    year: i32,
    month: u32,
}

async fn get_day(
    State(state): State<AppState>,
    Path((vehicle_id, date)): Path<(Uuid, NaiveDate)>,
) -> Result<Json<CalendarDay>, AppError> {
    let controller = AvailabilityController::new(state);
    let response = controller.day(vehicle_id, date).await?;
    Ok(Json(response))
}

async fn get_calendar(
    State(state): State<AppState>,
    Path(vehicle_id): Path<Uuid>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<MonthCalendar>, AppError> {
    let controller = AvailabilityController::new(state);
    let response = controller.calendar(vehicle_id, query.year, query.month).await?;
    Ok(Json(response))
}
