//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos.

use chrono::NaiveDate;
use uuid::Uuid;
use validator::ValidationError;

/// Validar y convertir string a UUID
pub fn validate_uuid(value: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(value).map_err(|_| {
        let mut error = ValidationError::new("uuid");
        error.add_param("value".into(), &value.to_string());
        error
    })
}

/// Validar y convertir string a fecha
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Validar que un rango de fechas sea coherente (inicio <= fin)
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), ValidationError> {
    if start > end {
        let mut error = ValidationError::new("date_range");
        error.add_param("start".into(), &start.to_string());
        error.add_param("end".into(), &end.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor esté en un rango específico
pub fn validate_range<T: PartialOrd + std::fmt::Display + serde::Serialize>(
    value: T,
    min: T,
    max: T,
) -> Result<(), ValidationError> {
    if value < min || value > max {
        let mut error = ValidationError::new("range");
        error.add_param("min".into(), &min);
        error.add_param("max".into(), &max);
        error.add_param("actual".into(), &value);
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2025-11-10").is_ok());
        assert!(validate_date("10/11/2025").is_err());
        assert!(validate_date("").is_err());
    }

    #[test]
    fn test_validate_date_range() {
        let d1 = NaiveDate::from_ymd_opt(2025, 11, 10).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2025, 11, 15).unwrap();
        assert!(validate_date_range(d1, d2).is_ok());
        assert!(validate_date_range(d1, d1).is_ok());
        assert!(validate_date_range(d2, d1).is_err());
    }

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("ok").is_ok());
        assert!(validate_not_empty("   ").is_err());
    }
}
