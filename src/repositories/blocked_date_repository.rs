//! Repositorio de bloqueos manuales de fechas
//!
//! Acceso a la tabla blocked_dates. La creación comparte la misma
//! serialización por vehículo que las reservas: el chequeo contra reservas
//! activas y el INSERT ocurren bajo el lock de la fila del vehículo.

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::blocked_date::BlockedDate;
use crate::utils::errors::AppError;

pub struct BlockedDateRepository {
    pool: PgPool,
}

impl BlockedDateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Bloquear un día. Rechaza con Conflict si el día está cubierto por
    /// una reserva activa o si ya existe un bloqueo para ese día.
    pub async fn create(
        &self,
        vehicle_id: Uuid,
        date: NaiveDate,
        reason: String,
        notes: Option<String>,
        created_by: Uuid,
    ) -> Result<BlockedDate, AppError> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM vehicles WHERE id = $1 FOR UPDATE")
                .bind(vehicle_id)
                .fetch_optional(&mut *tx)
                .await?;

        if locked.is_none() {
            return Err(AppError::NotFound("Vehículo no encontrado".to_string()));
        }

        let covering: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT id FROM reservations
            WHERE vehicle_id = $1
              AND status IN ('pending', 'confirmed', 'in_progress')
              AND start_date <= $2
              AND end_date >= $2
            LIMIT 1
            "#,
        )
        .bind(vehicle_id)
        .bind(date)
        .fetch_optional(&mut *tx)
        .await?;

        if covering.is_some() {
            return Err(AppError::Conflict(
                "El día está cubierto por una reserva activa".to_string(),
            ));
        }

        let blocked = sqlx::query_as::<_, BlockedDate>(
            r#"
            INSERT INTO blocked_dates (id, vehicle_id, date, reason, notes, created_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(vehicle_id)
        .bind(date)
        .bind(reason)
        .bind(notes)
        .bind(created_by)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("El día ya está bloqueado".to_string())
            }
            _ => AppError::Database(e),
        })?;

        tx.commit().await?;

        Ok(blocked)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<BlockedDate>, AppError> {
        let blocked = sqlx::query_as::<_, BlockedDate>("SELECT * FROM blocked_dates WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(blocked)
    }

    /// Bloqueos de un vehículo dentro del rango [from, to]
    pub async fn find_in_range(
        &self,
        vehicle_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<BlockedDate>, AppError> {
        let blocked = sqlx::query_as::<_, BlockedDate>(
            r#"
            SELECT * FROM blocked_dates
            WHERE vehicle_id = $1 AND date BETWEEN $2 AND $3
            ORDER BY date
            "#,
        )
        .bind(vehicle_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(blocked)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM blocked_dates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
