//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle del motor de reservas.
//! El vehículo es inmutable para este núcleo salvo por los bloqueos
//! manuales de fechas del propietario.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub license_plate: String,
    pub daily_rate: Decimal,
    pub created_at: DateTime<Utc>,
}
