//! DTOs del contrato de alquiler co-firmado

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::reservation::Reservation;

/// Request para firmar el contrato de una reserva
#[derive(Debug, Deserialize, Validate)]
pub struct SignContractRequest {
    /// Firma de la parte, PNG codificado en base64
    #[validate(length(min = 1))]
    pub signature: String,
}

/// Response del estado del contrato
#[derive(Debug, Serialize)]
pub struct ContractResponse {
    pub url: Option<String>,
    pub signed_by_owner: bool,
    pub signed_by_renter: bool,
    pub fully_signed_at: Option<DateTime<Utc>>,
}

impl From<&Reservation> for ContractResponse {
    fn from(reservation: &Reservation) -> Self {
        Self {
            url: reservation.contract_url.clone(),
            signed_by_owner: reservation.contract_signed_by_owner,
            signed_by_renter: reservation.contract_signed_by_renter,
            fully_signed_at: reservation.contract_fully_signed_at,
        }
    }
}
