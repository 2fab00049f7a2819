//! Repositorio de vehículos
//!
//! El vehículo es de solo lectura para este núcleo; su mutación vive en
//! el CRUD de flota, fuera de alcance.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::vehicle::Vehicle;
use crate::utils::errors::AppError;

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }
}
