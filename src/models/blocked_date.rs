//! Modelo de BlockedDate
//!
//! Bloqueo manual de un día de calendario por parte del propietario.
//! Un registro por día bloqueado; un día cubierto por una reserva activa
//! no puede bloquearse.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// BlockedDate principal - mapea exactamente a la tabla blocked_dates
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BlockedDate {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub date: NaiveDate,
    pub reason: String,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}
