//! Controller de vehículos y bloqueos manuales
//!
//! El vehículo es de solo lectura para este núcleo; la única mutación que
//! pasa por acá es la gestión de bloqueos manuales de fechas por parte
//! del propietario.

use chrono::NaiveDate;
use uuid::Uuid;
use validator::Validate;

use crate::dto::reservation_dto::ApiResponse;
use crate::dto::vehicle_dto::{BlockedDateResponse, CreateBlockedDateRequest, VehicleResponse};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::user::UserRole;
use crate::models::vehicle::Vehicle;
use crate::repositories::blocked_date_repository::BlockedDateRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub struct VehicleController {
    vehicles: VehicleRepository,
    blocked: BlockedDateRepository,
    state: AppState,
}

impl VehicleController {
    pub fn new(state: AppState) -> Self {
        Self {
            vehicles: VehicleRepository::new(state.pool.clone()),
            blocked: BlockedDateRepository::new(state.pool.clone()),
            state,
        }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<VehicleResponse, AppError> {
        let vehicle = self.fetch(id).await?;
        Ok(vehicle.into())
    }

    pub async fn list_by_owner(&self, actor: &AuthenticatedUser) -> Result<Vec<VehicleResponse>, AppError> {
        let vehicles = self.vehicles.find_by_owner(actor.user_id).await?;
        Ok(vehicles.into_iter().map(Into::into).collect())
    }

    /// Bloquear manualmente un día del calendario del vehículo
    pub async fn create_blocked_date(
        &self,
        actor: &AuthenticatedUser,
        vehicle_id: Uuid,
        request: CreateBlockedDateRequest,
    ) -> Result<ApiResponse<BlockedDateResponse>, AppError> {
        request.validate()?;

        let vehicle = self.fetch(vehicle_id).await?;
        self.ensure_owner(actor, &vehicle)?;

        let blocked = self
            .blocked
            .create(vehicle_id, request.date, request.reason, request.notes, actor.user_id)
            .await?;

        self.invalidate_calendar(vehicle_id).await;

        Ok(ApiResponse::success_with_message(
            blocked.into(),
            "Día bloqueado".to_string(),
        ))
    }

    /// Bloqueos del vehículo dentro de un rango
    pub async fn list_blocked_dates(
        &self,
        vehicle_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<BlockedDateResponse>, AppError> {
        self.fetch(vehicle_id).await?;

        let blocked = self.blocked.find_in_range(vehicle_id, from, to).await?;
        Ok(blocked.into_iter().map(Into::into).collect())
    }

    /// Eliminar un bloqueo. Acción destructiva: requiere la confirmación
    /// explícita en el payload.
    pub async fn delete_blocked_date(
        &self,
        actor: &AuthenticatedUser,
        blocked_id: Uuid,
        confirm: bool,
    ) -> Result<ApiResponse<()>, AppError> {
        if !confirm {
            return Err(AppError::Precondition(
                "La eliminación del bloqueo requiere confirmación explícita".to_string(),
            ));
        }

        let blocked = self
            .blocked
            .find_by_id(blocked_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Bloqueo no encontrado".to_string()))?;

        let vehicle = self.fetch(blocked.vehicle_id).await?;
        self.ensure_owner(actor, &vehicle)?;

        self.blocked.delete(blocked_id).await?;
        self.invalidate_calendar(vehicle.id).await;

        Ok(ApiResponse::success_with_message((), "Bloqueo eliminado".to_string()))
    }

    async fn fetch(&self, id: Uuid) -> Result<Vehicle, AppError> {
        self.vehicles
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))
    }

    fn ensure_owner(&self, actor: &AuthenticatedUser, vehicle: &Vehicle) -> Result<(), AppError> {
        if vehicle.owner_id == actor.user_id || actor.role == UserRole::Admin {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Solo el propietario puede gestionar los bloqueos de este vehículo".to_string(),
            ))
        }
    }

    async fn invalidate_calendar(&self, vehicle_id: Uuid) {
        let pattern = self.state.redis.calendar_pattern(vehicle_id);
        let _ = self.state.redis.delete_pattern(&pattern).await;
    }
}
