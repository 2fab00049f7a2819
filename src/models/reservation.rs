//! Modelo de Reservation
//!
//! Este módulo contiene el struct Reservation, sus enums de estado y las
//! reglas puras del motor de reservas: transiciones, solapamiento de fechas
//! y cálculo de precio. Mapea exactamente a la tabla reservations.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado principal de la reserva - mapea al ENUM reservation_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "reservation_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    Disputed,
}

impl ReservationStatus {
    /// Una reserva activa ocupa sus fechas frente a nuevas solicitudes.
    /// `disputed` queda excluida: el vehículo ya fue devuelto aunque el
    /// litige siga abierto.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Pending | ReservationStatus::Confirmed | ReservationStatus::InProgress
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Completed | ReservationStatus::Cancelled | ReservationStatus::Disputed
        )
    }

    /// Tabla de transiciones del motor de reservas
    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Cancelled)
                | (Confirmed, InProgress)
                | (InProgress, Completed)
                | (InProgress, Disputed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::InProgress => "in_progress",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::Disputed => "disputed",
        }
    }
}

/// Estado del proceso de états des lieux (check-in / check-out) de la reserva
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "check_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    NotStarted,
    CheckinSubmitted,
    CheckinValidated,
    CheckoutSubmitted,
    Completed,
    Disputed,
}

impl CheckStatus {
    pub fn can_transition_to(&self, next: CheckStatus) -> bool {
        use CheckStatus::*;
        matches!(
            (self, next),
            (NotStarted, CheckinSubmitted)
                | (CheckinSubmitted, CheckinValidated)
                | (CheckinValidated, CheckoutSubmitted)
                | (CheckoutSubmitted, Completed)
                | (CheckoutSubmitted, Disputed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::NotStarted => "not_started",
            CheckStatus::CheckinSubmitted => "checkin_submitted",
            CheckStatus::CheckinValidated => "checkin_validated",
            CheckStatus::CheckoutSubmitted => "checkout_submitted",
            CheckStatus::Completed => "completed",
            CheckStatus::Disputed => "disputed",
        }
    }
}

/// Reservation principal - mapea exactamente a la tabla reservations
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reservation {
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

impl Reservation {
    /// El contrato queda inmutable una vez firmado por ambas partes
    pub fn contract_finalized(&self) -> bool {
        self.contract_signed_by_owner && self.contract_signed_by_renter
    }

    pub fn covers_date(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Cantidad de días de alquiler para un rango inclusivo de fechas
pub fn rental_day_count(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Test de solapamiento con semántica de días inclusivos:
/// dos rangos chocan si comparten al menos un día de calendario
pub fn ranges_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start <= b_end && a_end >= b_start
}

/// Precio total derivado de la tarifa diaria del vehículo
pub fn compute_total_price(day_count: i64, daily_rate: Decimal) -> Decimal {
    Decimal::from(day_count) * daily_rate
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_status_transitions() {
        use ReservationStatus::*;

        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Completed));
        assert!(InProgress.can_transition_to(Disputed));

        // Estados terminales no admiten salida
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(!Completed.can_transition_to(InProgress));
        assert!(!Disputed.can_transition_to(Completed));

        // Saltos no permitidos
        assert!(!Pending.can_transition_to(InProgress));
        assert!(!InProgress.can_transition_to(Cancelled));
    }

    #[test]
    fn test_active_statuses() {
        use ReservationStatus::*;

        assert!(Pending.is_active());
        assert!(Confirmed.is_active());
        assert!(InProgress.is_active());
        assert!(!Completed.is_active());
        assert!(!Cancelled.is_active());
        // Una reserva en litige ya devolvió el vehículo: no bloquea fechas
        assert!(!Disputed.is_active());
    }

    #[test]
    fn test_check_status_transitions() {
        use CheckStatus::*;

        assert!(NotStarted.can_transition_to(CheckinSubmitted));
        assert!(CheckinSubmitted.can_transition_to(CheckinValidated));
        assert!(CheckinValidated.can_transition_to(CheckoutSubmitted));
        assert!(CheckoutSubmitted.can_transition_to(Completed));
        assert!(CheckoutSubmitted.can_transition_to(Disputed));

        // El check-out nunca es alcanzable sin check-in validado
        assert!(!NotStarted.can_transition_to(CheckoutSubmitted));
        assert!(!CheckinSubmitted.can_transition_to(CheckoutSubmitted));
    }

    #[test]
    fn test_rental_day_count() {
        // Rango inclusivo: mismo día = 1 día de alquiler
        assert_eq!(rental_day_count(date(2025, 11, 10), date(2025, 11, 10)), 1);
        assert_eq!(rental_day_count(date(2025, 11, 10), date(2025, 11, 12)), 3);
    }

    #[test]
    fn test_compute_total_price() {
        // Escenario: 3 días a 500/día
        let total = compute_total_price(3, Decimal::from(500));
        assert_eq!(total, Decimal::from(1500));
    }

    #[test]
    fn test_ranges_overlap() {
        let existing = (date(2025, 11, 10), date(2025, 11, 15));

        // Solapamiento parcial por el final
        assert!(ranges_overlap(date(2025, 11, 14), date(2025, 11, 18), existing.0, existing.1));
        // Contenido dentro del rango existente
        assert!(ranges_overlap(date(2025, 11, 11), date(2025, 11, 12), existing.0, existing.1));
        // Compartir solo el día límite también es conflicto
        assert!(ranges_overlap(date(2025, 11, 15), date(2025, 11, 20), existing.0, existing.1));

        // Rangos disjuntos
        assert!(!ranges_overlap(date(2025, 11, 16), date(2025, 11, 20), existing.0, existing.1));
        assert!(!ranges_overlap(date(2025, 11, 1), date(2025, 11, 9), existing.0, existing.1));
    }
}
