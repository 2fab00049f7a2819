//! Controller del contrato co-firmado
//!
//! Cada evento de firma re-renderiza el contrato con los hechos vigentes
//! (términos de la reserva, partes, firmas acumuladas) y reemplaza el
//! artefacto. Con ambas firmas el contrato queda finalizado e inmutable:
//! firmar de nuevo es un error explícito.

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::dto::contract_dto::{ContractResponse, SignContractRequest};
use crate::dto::reservation_dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::reservation::{Reservation, ReservationStatus};
use crate::repositories::reservation_repository::ReservationRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::document_service::DocumentService;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub struct ContractController {
    reservations: ReservationRepository,
    users: UserRepository,
    documents: DocumentService,
}

impl ContractController {
    pub fn new(state: AppState) -> Self {
        Self {
            reservations: ReservationRepository::new(state.pool.clone()),
            users: UserRepository::new(state.pool.clone()),
            documents: DocumentService::new(state.http_client.clone(), &state.config),
        }
    }

    /// Firmar el contrato como propietario o arrendatario.
    ///
    /// El render es parte de la acción primaria (la URL resultante es la
    /// respuesta), así que un fallo del renderizador sí se propaga.
    pub async fn sign(
        &self,
        actor: &AuthenticatedUser,
        reservation_id: Uuid,
        request: SignContractRequest,
    ) -> Result<ApiResponse<ContractResponse>, AppError> {
        request.validate()?;

        let reservation = self.fetch(reservation_id).await?;

        let is_owner = reservation.owner_id == actor.user_id;
        let is_renter = reservation.renter_id == actor.user_id;
        if !is_owner && !is_renter {
            return Err(AppError::Forbidden(
                "Solo las partes de la reserva pueden firmar el contrato".to_string(),
            ));
        }

        if reservation.status == ReservationStatus::Cancelled {
            return Err(AppError::Precondition(
                "No se puede firmar el contrato de una reserva cancelada".to_string(),
            ));
        }

        if reservation.contract_finalized() {
            return Err(AppError::Conflict(
                "El contrato ya fue firmado por ambas partes".to_string(),
            ));
        }

        let signed_by_owner = reservation.contract_signed_by_owner || is_owner;
        let signed_by_renter = reservation.contract_signed_by_renter || is_renter;
        let signature_count = u32::from(signed_by_owner) + u32::from(signed_by_renter);
        let fully_signed_at = (signed_by_owner && signed_by_renter).then(Utc::now);

        let facts = self
            .contract_facts(&reservation, signed_by_owner, signed_by_renter)
            .await?;
        let key = DocumentService::contract_key(reservation_id, signature_count);
        let url = self.documents.render_and_store(&facts, &key).await?;

        // El guard del UPDATE rechaza la firma si otra request finalizó
        // el contrato entre la lectura y el write
        let updated = self
            .reservations
            .update_contract(reservation_id, &url, signed_by_owner, signed_by_renter, fully_signed_at)
            .await?
            .ok_or_else(|| {
                AppError::Conflict("El contrato ya fue firmado por ambas partes".to_string())
            })?;

        Ok(ApiResponse::success_with_message(
            ContractResponse::from(&updated),
            "Contrato firmado".to_string(),
        ))
    }

    /// Estado actual del contrato
    pub async fn get(
        &self,
        actor: &AuthenticatedUser,
        reservation_id: Uuid,
    ) -> Result<ContractResponse, AppError> {
        use crate::models::user::UserRole;

        let reservation = self.fetch(reservation_id).await?;
        if reservation.owner_id != actor.user_id
            && reservation.renter_id != actor.user_id
            && actor.role != UserRole::Admin
        {
            return Err(AppError::Forbidden(
                "No tenés permiso para acceder a este contrato".to_string(),
            ));
        }

        Ok(ContractResponse::from(&reservation))
    }

    async fn fetch(&self, reservation_id: Uuid) -> Result<Reservation, AppError> {
        self.reservations
            .find_by_id(reservation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reserva no encontrada".to_string()))
    }

    /// Hechos vigentes del contrato para el renderizador
    async fn contract_facts(
        &self,
        reservation: &Reservation,
        signed_by_owner: bool,
        signed_by_renter: bool,
    ) -> Result<serde_json::Value, AppError> {
        let owner = self.users.find_by_id(reservation.owner_id).await?;
        let renter = self.users.find_by_id(reservation.renter_id).await?;

        Ok(json!({
            "document": "rental_contract",
            "reservation": {
                "id": reservation.id,
                "vehicle_id": reservation.vehicle_id,
                "start_date": reservation.start_date,
                "end_date": reservation.end_date,
                "day_count": reservation.day_count,
                "total_price": reservation.total_price,
            },
            "owner": owner.map(|u| json!({ "id": u.id, "name": u.full_name })),
            "renter": renter.map(|u| json!({ "id": u.id, "name": u.full_name })),
            "signatures": {
                "owner": signed_by_owner,
                "renter": signed_by_renter,
            },
        }))
    }
}
