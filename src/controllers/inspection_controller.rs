//! Controller de inspecciones (états des lieux)
//!
//! Maneja los dos lados del traspaso de custodia: el arrendatario entrega
//! la evidencia y firma; el propietario valida agregando su firma. La
//! validación es la única operación que dispara trabajo pesado (render y
//! subida del PDF), siempre en background: la respuesta al usuario nunca
//! espera al renderizador.

use base64::Engine;
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::dto::inspection_dto::{InspectionResponse, SubmitInspectionRequest, ValidateInspectionRequest};
use crate::dto::reservation_dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::inspection::{
    missing_required_categories, InspectionSide, PhotoEvidence,
};
use crate::models::reservation::{CheckStatus, Reservation, ReservationStatus};
use crate::repositories::inspection_repository::InspectionRepository;
use crate::repositories::reservation_repository::ReservationRepository;
use crate::services::document_service::DocumentService;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub struct InspectionController {
    reservations: ReservationRepository,
    inspections: InspectionRepository,
    documents: DocumentService,
    state: AppState,
}

impl InspectionController {
    pub fn new(state: AppState) -> Self {
        Self {
            reservations: ReservationRepository::new(state.pool.clone()),
            inspections: InspectionRepository::new(state.pool.clone()),
            documents: DocumentService::new(state.http_client.clone(), &state.config),
            state,
        }
    }

    /// Entrega de evidencia por el arrendatario.
    ///
    /// Una entrega parcial (faltan categorías de fotos, odómetro inválido)
    /// se rechaza de forma síncrona; no se persiste ningún borrador.
    pub async fn submit(
        &self,
        actor: &AuthenticatedUser,
        reservation_id: Uuid,
        side: InspectionSide,
        request: SubmitInspectionRequest,
    ) -> Result<ApiResponse<InspectionResponse>, AppError> {
        request.validate()?;

        let reservation = self.fetch(reservation_id).await?;

        if reservation.renter_id != actor.user_id {
            return Err(AppError::Forbidden(
                "Solo el arrendatario puede entregar la inspección".to_string(),
            ));
        }

        // Guards de entrada de la máquina de inspección
        let (expected_check, next_check) = match side {
            InspectionSide::Checkin => {
                if reservation.status != ReservationStatus::Confirmed {
                    return Err(AppError::Precondition(format!(
                        "El check-in requiere una reserva confirmada (estado actual: '{}')",
                        reservation.status.as_str()
                    )));
                }
                (CheckStatus::NotStarted, CheckStatus::CheckinSubmitted)
            }
            InspectionSide::Checkout => {
                if reservation.check_status != CheckStatus::CheckinValidated {
                    return Err(AppError::Precondition(
                        "El check-out requiere el check-in validado".to_string(),
                    ));
                }
                (CheckStatus::CheckinValidated, CheckStatus::CheckoutSubmitted)
            }
        };

        decode_signature(&request.signature)?;

        let photos: Vec<PhotoEvidence> = request
            .photos
            .iter()
            .map(|p| PhotoEvidence {
                category: p.category,
                url: p.url.clone(),
                uploaded_at: Utc::now(),
                uploaded_by: actor.user_id,
            })
            .collect();

        let missing = missing_required_categories(&photos);
        if !missing.is_empty() {
            return Err(AppError::Precondition(format!(
                "Faltan categorías de fotos requeridas: {:?}",
                missing
            )));
        }

        let record = self
            .inspections
            .submit_evidence(
                reservation_id,
                side,
                expected_check,
                next_check,
                photos,
                request.odometer_km,
                request.fuel_level,
                request.notes,
                request.signature,
                actor.user_id,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            record.into(),
            "Evidencia de inspección registrada".to_string(),
        ))
    }

    /// Validación del propietario.
    ///
    /// Escribe la firma y los campos de validación y responde de
    /// inmediato; el PDF se genera en un job con reintentos. En el
    /// check-out puede adjuntarse un litige atómicamente con la
    /// validación, lo que lleva la reserva al estado terminal disputed.
    pub async fn validate(
        &self,
        actor: &AuthenticatedUser,
        reservation_id: Uuid,
        side: InspectionSide,
        request: ValidateInspectionRequest,
    ) -> Result<ApiResponse<InspectionResponse>, AppError> {
        request.validate()?;

        let reservation = self.fetch(reservation_id).await?;

        if reservation.owner_id != actor.user_id {
            return Err(AppError::Forbidden(
                "Solo el propietario puede validar la inspección".to_string(),
            ));
        }

        if side == InspectionSide::Checkin && request.dispute.is_some() {
            return Err(AppError::BadRequest(
                "El litige solo puede declararse en el check-out".to_string(),
            ));
        }

        decode_signature(&request.signature)?;

        let record = self
            .inspections
            .find_by_reservation_and_side(reservation_id, side)
            .await?
            .ok_or_else(|| {
                AppError::Precondition("La evidencia de inspección aún no fue entregada".to_string())
            })?;

        if record.is_validated() {
            return Err(AppError::Precondition(
                "La inspección ya fue validada".to_string(),
            ));
        }

        let (dispute_reason, dispute_amount) = match &request.dispute {
            Some(dispute) => {
                if dispute.reason.trim().is_empty() {
                    return Err(AppError::BadRequest(
                        "El motivo del litige es requerido".to_string(),
                    ));
                }
                let amount = dispute.claimed_amount.unwrap_or(Decimal::ZERO);
                if amount < Decimal::ZERO {
                    return Err(AppError::BadRequest(
                        "El monto reclamado no puede ser negativo".to_string(),
                    ));
                }
                (Some(dispute.reason.clone()), Some(amount))
            }
            None => (None, None),
        };

        // Transición de la reserva acoplada a la validación
        let (expected_status, next_status, expected_check, next_check) = match side {
            InspectionSide::Checkin => (
                ReservationStatus::Confirmed,
                ReservationStatus::InProgress,
                CheckStatus::CheckinSubmitted,
                CheckStatus::CheckinValidated,
            ),
            InspectionSide::Checkout => {
                let (next_status, next_check) = if dispute_reason.is_some() {
                    (ReservationStatus::Disputed, CheckStatus::Disputed)
                } else {
                    (ReservationStatus::Completed, CheckStatus::Completed)
                };
                (
                    ReservationStatus::InProgress,
                    next_status,
                    CheckStatus::CheckoutSubmitted,
                    next_check,
                )
            }
        };

        let (record, reservation) = self
            .inspections
            .validate_record(
                record.id,
                reservation_id,
                request.signature,
                actor.user_id,
                dispute_reason,
                dispute_amount,
                expected_status,
                next_status,
                expected_check,
                next_check,
            )
            .await?;

        if side == InspectionSide::Checkout {
            self.invalidate_calendar(reservation.vehicle_id).await;
        }

        // Trabajo lento fuera de la respuesta: render y subida del PDF
        let facts = inspection_facts(&reservation, &record.id, side);
        self.documents
            .spawn_inspection_pdf_job(self.state.pool.clone(), reservation_id, side, facts);

        Ok(ApiResponse::success_with_message(
            record.into(),
            "Inspección validada".to_string(),
        ))
    }

    /// Inspecciones de una reserva, visibles para sus partes
    pub async fn list(
        &self,
        actor: &AuthenticatedUser,
        reservation_id: Uuid,
    ) -> Result<Vec<InspectionResponse>, AppError> {
        use crate::models::user::UserRole;

        let reservation = self.fetch(reservation_id).await?;
        if reservation.owner_id != actor.user_id
            && reservation.renter_id != actor.user_id
            && actor.role != UserRole::Admin
        {
            return Err(AppError::Forbidden(
                "No tenés permiso para acceder a esta reserva".to_string(),
            ));
        }

        let records = self.inspections.find_by_reservation(reservation_id).await?;
        Ok(records.into_iter().map(Into::into).collect())
    }

    async fn fetch(&self, reservation_id: Uuid) -> Result<Reservation, AppError> {
        self.reservations
            .find_by_id(reservation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reserva no encontrada".to_string()))
    }

    async fn invalidate_calendar(&self, vehicle_id: Uuid) {
        let pattern = self.state.redis.calendar_pattern(vehicle_id);
        let _ = self.state.redis.delete_pattern(&pattern).await;
    }
}

/// Las firmas viajan como PNG en base64; una firma indecodificable se
/// rechaza antes de tocar la base
fn decode_signature(signature: &str) -> Result<(), AppError> {
    base64::engine::general_purpose::STANDARD
        .decode(signature)
        .map(|_| ())
        .map_err(|_| AppError::BadRequest("La firma debe ser PNG codificado en base64".to_string()))
}

/// Hechos que consume el renderizador para el PDF del état des lieux
fn inspection_facts(reservation: &Reservation, record_id: &Uuid, side: InspectionSide) -> serde_json::Value {
    json!({
        "document": "inspection_report",
        "side": side.as_str(),
        "record_id": record_id,
        "reservation": {
            "id": reservation.id,
            "vehicle_id": reservation.vehicle_id,
            "start_date": reservation.start_date,
            "end_date": reservation.end_date,
            "day_count": reservation.day_count,
            "total_price": reservation.total_price,
        },
    })
}
