//! Controller de disponibilidad
//!
//! Proyección de solo lectura del calendario de un vehículo, derivada de
//! las reservas activas y los bloqueos manuales. El calendario mensual se
//! cachea en Redis con TTL corto; los writes que cambian disponibilidad
//! invalidan las claves del vehículo.

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::cache::CacheOperations;
use crate::repositories::blocked_date_repository::BlockedDateRepository;
use crate::repositories::reservation_repository::ReservationRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::availability_service::{
    build_month_calendar, classify_day, CalendarDay, DayAvailability, MonthCalendar,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub struct AvailabilityController {
    reservations: ReservationRepository,
    blocked: BlockedDateRepository,
    vehicles: VehicleRepository,
    state: AppState,
}

impl AvailabilityController {
    pub fn new(state: AppState) -> Self {
        Self {
            reservations: ReservationRepository::new(state.pool.clone()),
            blocked: BlockedDateRepository::new(state.pool.clone()),
            vehicles: VehicleRepository::new(state.pool.clone()),
            state,
        }
    }

    /// Clasificar un día puntual: free | reserved | blocked | past
    pub async fn day(&self, vehicle_id: Uuid, date: NaiveDate) -> Result<CalendarDay, AppError> {
        self.ensure_vehicle(vehicle_id).await?;

        let reservations = self.reservations.find_active_in_range(vehicle_id, date, date).await?;
        let blocked = self.blocked.find_in_range(vehicle_id, date, date).await?;

        let status: DayAvailability =
            classify_day(date, Utc::now().date_naive(), &reservations, &blocked);

        Ok(CalendarDay { date, status })
    }

    /// Calendario mensual con read-through sobre Redis
    pub async fn calendar(
        &self,
        vehicle_id: Uuid,
        year: i32,
        month: u32,
    ) -> Result<MonthCalendar, AppError> {
        self.ensure_vehicle(vehicle_id).await?;

        let key = self.state.redis.calendar_key(vehicle_id, year, month);
        if let Ok(Some(cached)) = self.state.redis.get::<MonthCalendar>(&key).await {
            return Ok(cached);
        }

        let from = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| AppError::BadRequest("Mes inválido".to_string()))?;
        let to = crate::services::availability_service::month_end(year, month)
            .ok_or_else(|| AppError::BadRequest("Mes inválido".to_string()))?;

        let reservations = self.reservations.find_active_in_range(vehicle_id, from, to).await?;
        let blocked = self.blocked.find_in_range(vehicle_id, from, to).await?;

        let calendar =
            build_month_calendar(year, month, Utc::now().date_naive(), &reservations, &blocked)
                .ok_or_else(|| AppError::BadRequest("Mes inválido".to_string()))?;

        let ttl = self.state.redis.config.default_ttl;
        let _ = self.state.redis.set(&key, &calendar, ttl).await;

        Ok(calendar)
    }

    async fn ensure_vehicle(&self, vehicle_id: Uuid) -> Result<(), AppError> {
        self.vehicles
            .find_by_id(vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;
        Ok(())
    }
}
