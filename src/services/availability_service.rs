//! Servicio de disponibilidad
//!
//! Derivación pura del estado de un día de calendario para un vehículo a
//! partir de los dos conjuntos fuente: reservas activas y bloqueos
//! manuales. Sin efectos secundarios.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::blocked_date::BlockedDate;
use crate::models::reservation::Reservation;

/// Estado de un día del calendario de un vehículo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DayAvailability {
    Free,
    Reserved,
    Blocked,
    Past,
}

/// Día clasificado dentro de un calendario mensual
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub status: DayAvailability,
}

/// Calendario mensual de disponibilidad de un vehículo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthCalendar {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDay>,
}

/// Clasificar un día: past < reserved < blocked < free.
/// Las reservas activas tienen precedencia sobre los bloqueos manuales
/// (un bloqueo nunca debería coexistir con una reserva, pero el orden de
/// evaluación fija la semántica ante datos heredados).
pub fn classify_day(
    date: NaiveDate,
    today: NaiveDate,
    reservations: &[Reservation],
    blocked: &[BlockedDate],
) -> DayAvailability {
    if date < today {
        return DayAvailability::Past;
    }

    if reservations
        .iter()
        .any(|r| r.status.is_active() && r.covers_date(date))
    {
        return DayAvailability::Reserved;
    }

    if blocked.iter().any(|b| b.date == date) {
        return DayAvailability::Blocked;
    }

    DayAvailability::Free
}

/// Primer día del mes
pub fn month_start(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Último día del mes
pub fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1).and_then(|d| d.pred_opt())
}

/// Expandir el mes completo clasificando cada día
pub fn build_month_calendar(
    year: i32,
    month: u32,
    today: NaiveDate,
    reservations: &[Reservation],
    blocked: &[BlockedDate],
) -> Option<MonthCalendar> {
    let start = month_start(year, month)?;
    let end = month_end(year, month)?;

    let mut days = Vec::with_capacity(31);
    let mut current = start;
    while current <= end {
        days.push(CalendarDay {
            date: current,
            status: classify_day(current, today, reservations, blocked),
        });
        current = current.succ_opt()?;
    }

    Some(MonthCalendar {
        year: start.year(),
        month: start.month(),
        days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::reservation::{CheckStatus, ReservationStatus};
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn reservation(start: NaiveDate, end: NaiveDate, status: ReservationStatus) -> Reservation {
        Reservation {
            id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            renter_id: Uuid::new_v4(),
            start_date: start,
            end_date: end,
            day_count: ((end - start).num_days() + 1) as i32,
            total_price: Decimal::from(100),
            status,
            check_status: CheckStatus::NotStarted,
            contract_url: None,
            contract_signed_by_owner: false,
            contract_signed_by_renter: false,
            contract_fully_signed_at: None,
            created_at: Utc::now(),
        }
    }

    fn blocked_day(day: NaiveDate) -> BlockedDate {
        BlockedDate {
            id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            date: day,
            reason: "mantenimiento".to_string(),
            notes: None,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_classify_past_day() {
        let today = date(2025, 11, 10);
        let status = classify_day(date(2025, 11, 9), today, &[], &[]);
        assert_eq!(status, DayAvailability::Past);
    }

    #[test]
    fn test_classify_reserved_day() {
        let today = date(2025, 11, 1);
        let reservations = vec![reservation(
            date(2025, 11, 10),
            date(2025, 11, 15),
            ReservationStatus::Confirmed,
        )];

        assert_eq!(
            classify_day(date(2025, 11, 12), today, &reservations, &[]),
            DayAvailability::Reserved
        );
        assert_eq!(
            classify_day(date(2025, 11, 16), today, &reservations, &[]),
            DayAvailability::Free
        );
    }

    #[test]
    fn test_cancelled_reservation_frees_the_day() {
        let today = date(2025, 11, 1);
        let reservations = vec![reservation(
            date(2025, 11, 10),
            date(2025, 11, 15),
            ReservationStatus::Cancelled,
        )];

        assert_eq!(
            classify_day(date(2025, 11, 12), today, &reservations, &[]),
            DayAvailability::Free
        );
    }

    #[test]
    fn test_classify_blocked_day() {
        let today = date(2025, 11, 1);
        let blocked = vec![blocked_day(date(2025, 11, 20))];

        assert_eq!(
            classify_day(date(2025, 11, 20), today, &[], &blocked),
            DayAvailability::Blocked
        );
    }

    #[test]
    fn test_reserved_takes_precedence_over_blocked() {
        let today = date(2025, 11, 1);
        let reservations = vec![reservation(
            date(2025, 11, 20),
            date(2025, 11, 22),
            ReservationStatus::Pending,
        )];
        let blocked = vec![blocked_day(date(2025, 11, 20))];

        assert_eq!(
            classify_day(date(2025, 11, 20), today, &reservations, &blocked),
            DayAvailability::Reserved
        );
    }

    #[test]
    fn test_month_calendar_expansion() {
        let today = date(2025, 11, 1);
        let calendar = build_month_calendar(2025, 11, today, &[], &[]).unwrap();

        assert_eq!(calendar.days.len(), 30);
        assert_eq!(calendar.days[0].date, date(2025, 11, 1));
        assert_eq!(calendar.days[29].date, date(2025, 11, 30));
        assert!(calendar.days.iter().all(|d| d.status == DayAvailability::Free));
    }

    #[test]
    fn test_month_end_handles_december() {
        assert_eq!(month_end(2025, 12).unwrap(), date(2025, 12, 31));
        assert_eq!(month_end(2024, 2).unwrap(), date(2024, 2, 29));
    }
}
