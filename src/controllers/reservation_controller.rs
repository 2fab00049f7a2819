//! Controller de reservas
//!
//! Reglas de negocio del motor de reservas: creación con detección de
//! conflictos, confirmación del propietario y cancelación de cualquiera
//! de las partes. Las notificaciones son best-effort y nunca revierten
//! la transición de estado.

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

use crate::dto::reservation_dto::{
    ApiResponse, CreateReservationRequest, ReservationDetailResponse, ReservationResponse,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::reservation::{rental_day_count, compute_total_price, Reservation, ReservationStatus};
use crate::repositories::inspection_repository::InspectionRepository;
use crate::repositories::reservation_repository::ReservationRepository;
use crate::repositories::user_repository::UserRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::notification_service::NotificationService;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub struct ReservationController {
    reservations: ReservationRepository,
    inspections: InspectionRepository,
    vehicles: VehicleRepository,
    users: UserRepository,
    notifications: NotificationService,
    state: AppState,
}

impl ReservationController {
    pub fn new(state: AppState) -> Self {
        Self {
            reservations: ReservationRepository::new(state.pool.clone()),
            inspections: InspectionRepository::new(state.pool.clone()),
            vehicles: VehicleRepository::new(state.pool.clone()),
            users: UserRepository::new(state.pool.clone()),
            notifications: NotificationService::new(state.http_client.clone(), &state.config),
            state,
        }
    }

    /// Crear una reserva. El chequeo de conflicto y el insert son una
    /// unidad atómica en el repositorio.
    pub async fn create(
        &self,
        actor: &AuthenticatedUser,
        request: CreateReservationRequest,
    ) -> Result<ApiResponse<ReservationResponse>, AppError> {
        request.validate()?;

        if request.start_date > request.end_date {
            return Err(AppError::BadRequest(
                "La fecha de fin no puede ser anterior a la de inicio".to_string(),
            ));
        }

        let today = Utc::now().date_naive();
        if request.start_date < today {
            return Err(AppError::BadRequest(
                "La fecha de inicio no puede estar en el pasado".to_string(),
            ));
        }

        let vehicle = self
            .vehicles
            .find_by_id(request.vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        if vehicle.owner_id == actor.user_id {
            return Err(AppError::BadRequest(
                "No podés reservar tu propio vehículo".to_string(),
            ));
        }

        let day_count = rental_day_count(request.start_date, request.end_date);
        let total_price = match request.total_price {
            Some(price) => {
                if price < Decimal::ZERO {
                    return Err(AppError::BadRequest(
                        "El precio total no puede ser negativo".to_string(),
                    ));
                }
                price
            }
            None => compute_total_price(day_count, vehicle.daily_rate),
        };

        let reservation = self
            .reservations
            .create_booked(
                vehicle.id,
                vehicle.owner_id,
                actor.user_id,
                request.start_date,
                request.end_date,
                day_count as i32,
                total_price,
            )
            .await?;

        self.invalidate_calendar(vehicle.id).await;

        // Notificar a ambas partes; un fallo de email no afecta la reserva
        if let Ok(Some(owner)) = self.users.find_by_id(vehicle.owner_id).await {
            self.notifications
                .notify_booking_created(&owner.email, &request.renter_name, &vehicle.name);
        }
        self.notifications
            .notify_booking_received(&request.renter_email, &vehicle.name);

        Ok(ApiResponse::success_with_message(
            reservation.into(),
            "Reserva creada exitosamente".to_string(),
        ))
    }

    /// Confirmación del propietario: pending → confirmed
    pub async fn confirm(
        &self,
        actor: &AuthenticatedUser,
        reservation_id: Uuid,
    ) -> Result<ApiResponse<ReservationResponse>, AppError> {
        let reservation = self.fetch(reservation_id).await?;

        if reservation.owner_id != actor.user_id {
            return Err(AppError::Forbidden(
                "Solo el propietario puede confirmar la reserva".to_string(),
            ));
        }

        if !reservation.status.can_transition_to(ReservationStatus::Confirmed) {
            return Err(AppError::Precondition(format!(
                "No se puede confirmar una reserva en estado '{}'",
                reservation.status.as_str()
            )));
        }

        let updated = self
            .reservations
            .transition_status(reservation_id, ReservationStatus::Pending, ReservationStatus::Confirmed)
            .await?
            .ok_or_else(|| {
                AppError::Precondition("La reserva cambió de estado concurrentemente".to_string())
            })?;

        if let Ok(Some(renter)) = self.users.find_by_id(updated.renter_id).await {
            if let Ok(Some(vehicle)) = self.vehicles.find_by_id(updated.vehicle_id).await {
                self.notifications.notify_booking_confirmed(&renter.email, &vehicle.name);
            }
        }

        Ok(ApiResponse::success_with_message(
            updated.into(),
            "Reserva confirmada".to_string(),
        ))
    }

    /// Cancelación por el propietario o el arrendatario.
    ///
    /// Cancelar una reserva ya cancelada es un error determinístico, nunca
    /// un segundo ciclo de notificaciones. La cancelación de una reserva
    /// confirmada solo notifica a la otra parte; la política de penalidades
    /// queda fuera de este motor.
    pub async fn cancel(
        &self,
        actor: &AuthenticatedUser,
        reservation_id: Uuid,
    ) -> Result<ApiResponse<ReservationResponse>, AppError> {
        let reservation = self.fetch(reservation_id).await?;

        let is_owner = reservation.owner_id == actor.user_id;
        let is_renter = reservation.renter_id == actor.user_id;
        if !is_owner && !is_renter {
            return Err(AppError::Forbidden(
                "Solo las partes de la reserva pueden cancelarla".to_string(),
            ));
        }

        if !reservation.status.can_transition_to(ReservationStatus::Cancelled) {
            return Err(AppError::Precondition(format!(
                "No se puede cancelar una reserva en estado '{}'",
                reservation.status.as_str()
            )));
        }

        let updated = self
            .reservations
            .transition_status(reservation_id, reservation.status, ReservationStatus::Cancelled)
            .await?
            .ok_or_else(|| {
                AppError::Precondition("La reserva cambió de estado concurrentemente".to_string())
            })?;

        self.invalidate_calendar(updated.vehicle_id).await;

        // Notificar a la otra parte, una sola vez
        let other_party = if is_owner { updated.renter_id } else { updated.owner_id };
        if let Ok(Some(user)) = self.users.find_by_id(other_party).await {
            if let Ok(Some(vehicle)) = self.vehicles.find_by_id(updated.vehicle_id).await {
                self.notifications.notify_booking_cancelled(&user.email, &vehicle.name);
            }
        }

        Ok(ApiResponse::success_with_message(
            updated.into(),
            "Reserva cancelada".to_string(),
        ))
    }

    /// Listado de reservas del actor según su rol en ellas
    pub async fn list(
        &self,
        actor: &AuthenticatedUser,
        role: Option<String>,
    ) -> Result<Vec<ReservationResponse>, AppError> {
        let reservations = match role.as_deref() {
            Some("owner") => self.reservations.list_by_owner(actor.user_id).await?,
            _ => self.reservations.list_by_renter(actor.user_id).await?,
        };

        Ok(reservations.into_iter().map(ReservationResponse::from).collect())
    }

    /// Detalle con las inspecciones embebidas
    pub async fn get_detail(
        &self,
        actor: &AuthenticatedUser,
        reservation_id: Uuid,
    ) -> Result<ReservationDetailResponse, AppError> {
        let reservation = self.fetch(reservation_id).await?;
        self.ensure_party(actor, &reservation)?;

        let inspections = self.inspections.find_by_reservation(reservation_id).await?;

        Ok(ReservationDetailResponse {
            reservation: reservation.into(),
            inspections: inspections.into_iter().map(Into::into).collect(),
        })
    }

    async fn fetch(&self, reservation_id: Uuid) -> Result<Reservation, AppError> {
        self.reservations
            .find_by_id(reservation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reserva no encontrada".to_string()))
    }

    fn ensure_party(&self, actor: &AuthenticatedUser, reservation: &Reservation) -> Result<(), AppError> {
        use crate::models::user::UserRole;

        if reservation.owner_id == actor.user_id
            || reservation.renter_id == actor.user_id
            || actor.role == UserRole::Admin
        {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "No tenés permiso para acceder a esta reserva".to_string(),
            ))
        }
    }

    /// El calendario cacheado del vehículo queda obsoleto tras cualquier
    /// write que cambie su disponibilidad
    async fn invalidate_calendar(&self, vehicle_id: Uuid) {
        let pattern = self.state.redis.calendar_pattern(vehicle_id);
        let _ = self.state.redis.delete_pattern(&pattern).await;
    }
}
