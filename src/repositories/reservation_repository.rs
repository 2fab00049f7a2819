//! Repositorio de reservas
//!
//! Acceso a la tabla reservations. La creación ejecuta la detección de
//! conflictos y el insert dentro de una misma transacción, serializada
//! por vehículo, para que dos solicitudes concurrentes con fechas
//! solapadas nunca puedan confirmarse ambas.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::reservation::{CheckStatus, Reservation, ReservationStatus};
use crate::models::vehicle::Vehicle;
use crate::utils::errors::AppError;

pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Crear una reserva con chequeo de conflicto atómico.
    ///
    /// El lock FOR UPDATE sobre la fila del vehículo serializa las
    /// solicitudes concurrentes para el mismo vehículo: el chequeo de
    /// solapamiento y el INSERT se vuelven una unidad indivisible.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_booked(
        &self,
        vehicle_id: Uuid,
        owner_id: Uuid,
        renter_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
        day_count: i32,
        total_price: Decimal,
    ) -> Result<Reservation, AppError> {
        let mut tx = self.pool.begin().await?;

        let _vehicle: Vehicle =
            sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1 FOR UPDATE")
                .bind(vehicle_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        // Detector de conflictos: solapamiento de días inclusivos contra
        // toda reserva activa del vehículo
        let conflicting: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT id FROM reservations
            WHERE vehicle_id = $1
              AND status IN ('pending', 'confirmed', 'in_progress')
              AND start_date <= $3
              AND end_date >= $2
            LIMIT 1
            "#,
        )
        .bind(vehicle_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some((existing_id,)) = conflicting {
            return Err(AppError::BookingConflict {
                existing_reservation_id: existing_id,
            });
        }

        // Un día bloqueado manualmente tampoco es reservable
        let blocked: Option<(Uuid,)> = sqlx::query_as(
            "SELECT id FROM blocked_dates WHERE vehicle_id = $1 AND date BETWEEN $2 AND $3 LIMIT 1",
        )
        .bind(vehicle_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_optional(&mut *tx)
        .await?;

        if blocked.is_some() {
            return Err(AppError::Conflict(
                "El rango solicitado incluye días bloqueados por el propietario".to_string(),
            ));
        }

        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations
                (id, vehicle_id, owner_id, renter_id, start_date, end_date,
                 day_count, total_price, status, check_status,
                 contract_signed_by_owner, contract_signed_by_renter, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'pending', 'not_started', false, false, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(vehicle_id)
        .bind(owner_id)
        .bind(renter_id)
        .bind(start_date)
        .bind(end_date)
        .bind(day_count)
        .bind(total_price)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(reservation)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Reservation>, AppError> {
        let reservation =
            sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(reservation)
    }

    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Reservation>, AppError> {
        let reservations = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reservations)
    }

    pub async fn list_by_renter(&self, renter_id: Uuid) -> Result<Vec<Reservation>, AppError> {
        let reservations = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE renter_id = $1 ORDER BY created_at DESC",
        )
        .bind(renter_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reservations)
    }

    /// Reservas activas de un vehículo que tocan el rango [from, to]
    pub async fn find_active_in_range(
        &self,
        vehicle_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Reservation>, AppError> {
        let reservations = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT * FROM reservations
            WHERE vehicle_id = $1
              AND status IN ('pending', 'confirmed', 'in_progress')
              AND start_date <= $3
              AND end_date >= $2
            ORDER BY start_date
            "#,
        )
        .bind(vehicle_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(reservations)
    }

    /// Transición de estado guardada: el UPDATE solo aplica si la reserva
    /// sigue en el estado esperado, de modo que dos mutaciones concurrentes
    /// no puedan pisarse
    pub async fn transition_status(
        &self,
        id: Uuid,
        expected: ReservationStatus,
        next: ReservationStatus,
    ) -> Result<Option<Reservation>, AppError> {
        let reservation = sqlx::query_as::<_, Reservation>(
            "UPDATE reservations SET status = $3 WHERE id = $1 AND status = $2 RETURNING *",
        )
        .bind(id)
        .bind(expected)
        .bind(next)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reservation)
    }

    /// Transición conjunta de status y check_status en un solo write
    pub async fn transition_status_and_check(
        &self,
        id: Uuid,
        expected_status: ReservationStatus,
        next_status: ReservationStatus,
        next_check: CheckStatus,
    ) -> Result<Option<Reservation>, AppError> {
        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            UPDATE reservations SET status = $3, check_status = $4
            WHERE id = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(expected_status)
        .bind(next_status)
        .bind(next_check)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reservation)
    }

    pub async fn set_check_status(
        &self,
        id: Uuid,
        expected: CheckStatus,
        next: CheckStatus,
    ) -> Result<Option<Reservation>, AppError> {
        let reservation = sqlx::query_as::<_, Reservation>(
            "UPDATE reservations SET check_status = $3 WHERE id = $1 AND check_status = $2 RETURNING *",
        )
        .bind(id)
        .bind(expected)
        .bind(next)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reservation)
    }

    /// Actualizar el artefacto del contrato y las banderas de firma.
    /// El guard sobre las banderas vuelve inmutable al contrato finalizado.
    pub async fn update_contract(
        &self,
        id: Uuid,
        url: &str,
        signed_by_owner: bool,
        signed_by_renter: bool,
        fully_signed_at: Option<DateTime<Utc>>,
    ) -> Result<Option<Reservation>, AppError> {
        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            UPDATE reservations
            SET contract_url = $2,
                contract_signed_by_owner = $3,
                contract_signed_by_renter = $4,
                contract_fully_signed_at = $5
            WHERE id = $1
              AND NOT (contract_signed_by_owner AND contract_signed_by_renter)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(url)
        .bind(signed_by_owner)
        .bind(signed_by_renter)
        .bind(fully_signed_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reservation)
    }
}
