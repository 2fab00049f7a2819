//! DTOs de reservas
//!
//! Requests y responses de la API de reservas, separados de los modelos
//! de persistencia.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::reservation::{CheckStatus, Reservation, ReservationStatus};

// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}

/// Request para crear una reserva
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReservationRequest {
    pub vehicle_id: Uuid,

    /// Fecha de inicio, formato YYYY-MM-DD
    pub start_date: NaiveDate,

    /// Fecha de fin (inclusiva), formato YYYY-MM-DD
    pub end_date: NaiveDate,

    /// Precio total acordado; si se omite se deriva de la tarifa diaria
    pub total_price: Option<Decimal>,

    // Datos de contacto del arrendatario para las notificaciones
    #[validate(length(min = 2, max = 100))]
    pub renter_name: String,

    #[validate(email)]
    pub renter_email: String,

    #[validate(length(min = 6, max = 20))]
    pub renter_phone: String,
}

/// Response de reserva para la API
#[derive(Debug, Serialize)]
pub struct ReservationResponse {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub owner_id: Uuid,
    pub renter_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub day_count: i32,
    pub total_price: Decimal,
    pub status: ReservationStatus,
    pub check_status: CheckStatus,
    pub contract_url: Option<String>,
    pub contract_signed_by_owner: bool,
    pub contract_signed_by_renter: bool,
    pub contract_fully_signed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationResponse {
    fn from(reservation: Reservation) -> Self {
        Self {
            id: reservation.id,
            vehicle_id: reservation.vehicle_id,
            owner_id: reservation.owner_id,
            renter_id: reservation.renter_id,
            start_date: reservation.start_date,
            end_date: reservation.end_date,
            day_count: reservation.day_count,
            total_price: reservation.total_price,
            status: reservation.status,
            check_status: reservation.check_status,
            contract_url: reservation.contract_url,
            contract_signed_by_owner: reservation.contract_signed_by_owner,
            contract_signed_by_renter: reservation.contract_signed_by_renter,
            contract_fully_signed_at: reservation.contract_fully_signed_at,
            created_at: reservation.created_at,
        }
    }
}

/// Filtro de listado de reservas del actor autenticado
#[derive(Debug, Deserialize)]
pub struct ReservationListQuery {
    /// "owner" para las reservas de mis vehículos, "renter" para mis alquileres
    pub role: Option<String>,
}

/// Detalle de reserva con sus inspecciones embebidas
#[derive(Debug, Serialize)]
pub struct ReservationDetailResponse {
    #[serde(flatten)]
    pub reservation: ReservationResponse,
    pub inspections: Vec<crate::dto::inspection_dto::InspectionResponse>,
}
