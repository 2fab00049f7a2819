//! DTOs de vehículos y bloqueos manuales de fechas

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::blocked_date::BlockedDate;
use crate::models::vehicle::Vehicle;

/// Response de vehículo para la API
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub license_plate: String,
    pub daily_rate: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            owner_id: vehicle.owner_id,
            name: vehicle.name,
            license_plate: vehicle.license_plate,
            daily_rate: vehicle.daily_rate,
            created_at: vehicle.created_at,
        }
    }
}

/// Request para bloquear manualmente un día del calendario
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBlockedDateRequest {
    pub date: NaiveDate,

    #[validate(length(min = 1, max = 100))]
    pub reason: String,

    pub notes: Option<String>,
}

/// Request para eliminar un bloqueo. La confirmación viaja explícita en el
/// payload en lugar de depender de un diálogo de la capa de presentación.
#[derive(Debug, Deserialize)]
pub struct DeleteBlockedDateRequest {
    pub confirm: bool,
}

/// Response de bloqueo de fecha
#[derive(Debug, Serialize)]
pub struct BlockedDateResponse {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub date: NaiveDate,
    pub reason: String,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<BlockedDate> for BlockedDateResponse {
    fn from(blocked: BlockedDate) -> Self {
        Self {
            id: blocked.id,
            vehicle_id: blocked.vehicle_id,
            date: blocked.date,
            reason: blocked.reason,
            notes: blocked.notes,
            created_by: blocked.created_by,
            created_at: blocked.created_at,
        }
    }
}
