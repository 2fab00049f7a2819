//! Repositorio de inspecciones (états des lieux)
//!
//! Acceso a la tabla inspection_records. Existe a lo sumo un registro por
//! reserva y lado. La entrega de evidencia y la validación actualizan el
//! registro y el check_status de la reserva en una misma transacción: la
//! transición es todo-o-nada respecto del write primario.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::models::inspection::{InspectionRecord, InspectionSide, PhotoEvidence};
use crate::models::reservation::{CheckStatus, Reservation, ReservationStatus};
use crate::utils::errors::AppError;

pub struct InspectionRepository {
    pool: PgPool,
}

impl InspectionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Registrar la evidencia entregada por el arrendatario.
    ///
    /// El UPDATE condicional del check_status actúa como guard: si la
    /// reserva ya no está en el estado esperado (otra entrega concurrente,
    /// cancelación), toda la operación se revierte. La restricción UNIQUE
    /// (reservation_id, side) rechaza una segunda entrega del mismo lado.
    #[allow(clippy::too_many_arguments)]
    pub async fn submit_evidence(
        &self,
        reservation_id: Uuid,
        side: InspectionSide,
        expected_check: CheckStatus,
        next_check: CheckStatus,
        photos: Vec<PhotoEvidence>,
        odometer_km: i32,
        fuel_level: i32,
        notes: Option<String>,
        renter_signature: String,
        created_by: Uuid,
    ) -> Result<InspectionRecord, AppError> {
        let mut tx = self.pool.begin().await?;

        let reservation: Option<(Uuid,)> = sqlx::query_as(
            "UPDATE reservations SET check_status = $3 WHERE id = $1 AND check_status = $2 RETURNING id",
        )
        .bind(reservation_id)
        .bind(expected_check)
        .bind(next_check)
        .fetch_optional(&mut *tx)
        .await?;

        if reservation.is_none() {
            return Err(AppError::Precondition(
                "La reserva no está en el estado esperado para entregar la inspección".to_string(),
            ));
        }

        let record = sqlx::query_as::<_, InspectionRecord>(
            r#"
            INSERT INTO inspection_records
                (id, reservation_id, side, photos, odometer_km, fuel_level,
                 notes, renter_signature, created_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(reservation_id)
        .bind(side)
        .bind(Json(photos))
        .bind(odometer_km)
        .bind(fuel_level)
        .bind(notes)
        .bind(renter_signature)
        .bind(created_by)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("La inspección de este lado ya fue entregada".to_string())
            }
            _ => AppError::Database(e),
        })?;

        tx.commit().await?;

        Ok(record)
    }

    /// Validación del propietario: firma, campos de validación y eventual
    /// litige sobre el registro, más la transición de la reserva, en una
    /// única transacción.
    ///
    /// El guard `validated_at IS NULL` hace la validación aplicable una
    /// sola vez; el guard de estado de la reserva mantiene ambas máquinas
    /// en fase.
    #[allow(clippy::too_many_arguments)]
    pub async fn validate_record(
        &self,
        record_id: Uuid,
        reservation_id: Uuid,
        owner_signature: String,
        validated_by: Uuid,
        dispute_reason: Option<String>,
        dispute_amount: Option<Decimal>,
        expected_status: ReservationStatus,
        next_status: ReservationStatus,
        expected_check: CheckStatus,
        next_check: CheckStatus,
    ) -> Result<(InspectionRecord, Reservation), AppError> {
        let mut tx = self.pool.begin().await?;

        let declared_by = dispute_reason.as_ref().map(|_| validated_by);
        let declared_at = dispute_reason.as_ref().map(|_| Utc::now());

        let record = sqlx::query_as::<_, InspectionRecord>(
            r#"
            UPDATE inspection_records
            SET owner_signature = $2,
                validated_by = $3,
                validated_at = $4,
                dispute_reason = $5,
                dispute_amount = $6,
                dispute_declared_at = $7,
                dispute_declared_by = $8
            WHERE id = $1 AND validated_at IS NULL
            RETURNING *
            "#,
        )
        .bind(record_id)
        .bind(owner_signature)
        .bind(validated_by)
        .bind(Utc::now())
        .bind(dispute_reason)
        .bind(dispute_amount)
        .bind(declared_at)
        .bind(declared_by)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::Precondition("La inspección ya fue validada".to_string())
        })?;

        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            UPDATE reservations SET status = $4, check_status = $5
            WHERE id = $1 AND status = $2 AND check_status = $3
            RETURNING *
            "#,
        )
        .bind(reservation_id)
        .bind(expected_status)
        .bind(expected_check)
        .bind(next_status)
        .bind(next_check)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::Precondition(
                "La reserva no está en el estado esperado para validar la inspección".to_string(),
            )
        })?;

        tx.commit().await?;

        Ok((record, reservation))
    }

    pub async fn find_by_reservation_and_side(
        &self,
        reservation_id: Uuid,
        side: InspectionSide,
    ) -> Result<Option<InspectionRecord>, AppError> {
        let record = sqlx::query_as::<_, InspectionRecord>(
            "SELECT * FROM inspection_records WHERE reservation_id = $1 AND side = $2",
        )
        .bind(reservation_id)
        .bind(side)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn find_by_reservation(
        &self,
        reservation_id: Uuid,
    ) -> Result<Vec<InspectionRecord>, AppError> {
        let records = sqlx::query_as::<_, InspectionRecord>(
            "SELECT * FROM inspection_records WHERE reservation_id = $1 ORDER BY created_at",
        )
        .bind(reservation_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Adjuntar el PDF generado en background. Reemplazo idempotente:
    /// reintentar el job deja siempre una única URL por registro.
    pub async fn set_pdf_url(
        &self,
        reservation_id: Uuid,
        side: InspectionSide,
        pdf_url: &str,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE inspection_records SET pdf_url = $3 WHERE reservation_id = $1 AND side = $2",
        )
        .bind(reservation_id)
        .bind(side)
        .bind(pdf_url)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
