//! Modelo de InspectionRecord (état des lieux)
//!
//! Este módulo contiene el registro de inspección de entrega y devolución
//! del vehículo: evidencia fotográfica, firmas de ambas partes y el
//! eventual litige declarado en la validación del check-out.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, Type};
use uuid::Uuid;

/// Lado de la inspección - mapea al ENUM inspection_side
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "inspection_side", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InspectionSide {
    Checkin,
    Checkout,
}

impl InspectionSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            InspectionSide::Checkin => "checkin",
            InspectionSide::Checkout => "checkout",
        }
    }
}

/// Estado derivado del registro de inspección
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InspectionStatus {
    NotStarted,
    EvidenceSubmitted,
    Validated,
}

/// Categoría de evidencia fotográfica
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PhotoCategory {
    Front,
    Rear,
    Left,
    Right,
    Interior,
    Odometer,
    Fuel,
    Defects,
}

lazy_static::lazy_static! {
    /// Las 7 categorías mínimas que exige una inspección completa.
    /// `defects` es evidencia adicional opcional.
    pub static ref REQUIRED_PHOTO_CATEGORIES: Vec<PhotoCategory> = vec![
        PhotoCategory::Front,
        PhotoCategory::Rear,
        PhotoCategory::Left,
        PhotoCategory::Right,
        PhotoCategory::Interior,
        PhotoCategory::Odometer,
        PhotoCategory::Fuel,
    ];
}

/// Evidencia fotográfica individual - se persiste como JSONB dentro del registro
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhotoEvidence {
    pub category: PhotoCategory,
    pub url: String,
    pub uploaded_at: DateTime<Utc>,
    pub uploaded_by: Uuid,
}

/// Categorías requeridas que faltan en un conjunto de evidencia
pub fn missing_required_categories(photos: &[PhotoEvidence]) -> Vec<PhotoCategory> {
    REQUIRED_PHOTO_CATEGORIES
        .iter()
        .filter(|required| !photos.iter().any(|p| p.category == **required))
        .copied()
        .collect()
}

/// Litige declarado por el propietario al validar el check-out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dispute {
    pub reason: String,
    pub claimed_amount: Decimal,
    pub declared_at: DateTime<Utc>,
    pub declared_by: Uuid,
}

/// InspectionRecord principal - mapea exactamente a la tabla inspection_records.
/// Existe a lo sumo un registro por reserva y por lado.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InspectionRecord {
    pub id: Uuid,
    pub reservation_id: Uuid,
    pub side: InspectionSide,
    pub photos: Json<Vec<PhotoEvidence>>,
    pub odometer_km: i32,
    pub fuel_level: i32,
    pub notes: Option<String>,
    pub renter_signature: String,
    pub owner_signature: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub validated_by: Option<Uuid>,
    pub validated_at: Option<DateTime<Utc>>,
    pub pdf_url: Option<String>,
    pub dispute_reason: Option<String>,
    pub dispute_amount: Option<Decimal>,
    pub dispute_declared_at: Option<DateTime<Utc>>,
    pub dispute_declared_by: Option<Uuid>,
}

impl InspectionRecord {
    /// El registro solo existe a partir de la entrega de evidencia,
    /// por lo que su estado se deriva de los campos de validación
    pub fn status(&self) -> InspectionStatus {
        if self.validated_at.is_some() {
            InspectionStatus::Validated
        } else {
            InspectionStatus::EvidenceSubmitted
        }
    }

    pub fn is_validated(&self) -> bool {
        self.validated_at.is_some()
    }

    /// Litige adjunto, si fue declarado en la validación
    pub fn dispute(&self) -> Option<Dispute> {
        match (&self.dispute_reason, self.dispute_declared_at, self.dispute_declared_by) {
            (Some(reason), Some(declared_at), Some(declared_by)) => Some(Dispute {
                reason: reason.clone(),
                claimed_amount: self.dispute_amount.unwrap_or_default(),
                declared_at,
                declared_by,
            }),
            _ => None,
        }
    }

    /// Invariante de firmas: validado ⇒ firma del propietario ⇒ firma del arrendatario.
    /// La firma del arrendatario llega con la entrega de evidencia y la del
    /// propietario con la validación, en ese orden estricto.
    pub fn signature_order_holds(&self) -> bool {
        if self.validated_at.is_some() && self.owner_signature.is_none() {
            return false;
        }
        if self.owner_signature.is_some() && self.renter_signature.is_empty() {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(category: PhotoCategory) -> PhotoEvidence {
        PhotoEvidence {
            category,
            url: format!("https://blobs.test/{:?}.jpg", category),
            uploaded_at: Utc::now(),
            uploaded_by: Uuid::new_v4(),
        }
    }

    fn record_with(photos: Vec<PhotoEvidence>) -> InspectionRecord {
        InspectionRecord {
            id: Uuid::new_v4(),
            reservation_id: Uuid::new_v4(),
            side: InspectionSide::Checkin,
            photos: Json(photos),
            odometer_km: 42_000,
            fuel_level: 75,
            notes: None,
            renter_signature: "iVBORw0KGgo=".to_string(),
            owner_signature: None,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            validated_by: None,
            validated_at: None,
            pdf_url: None,
            dispute_reason: None,
            dispute_amount: None,
            dispute_declared_at: None,
            dispute_declared_by: None,
        }
    }

    #[test]
    fn test_missing_required_categories() {
        // Solo 5 de las 7 categorías requeridas
        let photos = vec![
            photo(PhotoCategory::Front),
            photo(PhotoCategory::Rear),
            photo(PhotoCategory::Left),
            photo(PhotoCategory::Right),
            photo(PhotoCategory::Interior),
        ];
        let missing = missing_required_categories(&photos);
        assert_eq!(missing, vec![PhotoCategory::Odometer, PhotoCategory::Fuel]);
    }

    #[test]
    fn test_all_required_categories_present() {
        let photos: Vec<PhotoEvidence> = REQUIRED_PHOTO_CATEGORIES.iter().map(|c| photo(*c)).collect();
        assert!(missing_required_categories(&photos).is_empty());

        // defects extra no cambia el resultado
        let mut with_defects = photos;
        with_defects.push(photo(PhotoCategory::Defects));
        assert!(missing_required_categories(&with_defects).is_empty());
    }

    #[test]
    fn test_status_derivation() {
        let mut record = record_with(vec![]);
        assert_eq!(record.status(), InspectionStatus::EvidenceSubmitted);

        record.owner_signature = Some("sig".to_string());
        record.validated_by = Some(Uuid::new_v4());
        record.validated_at = Some(Utc::now());
        assert_eq!(record.status(), InspectionStatus::Validated);
    }

    #[test]
    fn test_signature_order_invariant() {
        let mut record = record_with(vec![]);
        assert!(record.signature_order_holds());

        // Validación sin firma del propietario viola el invariante
        record.validated_at = Some(Utc::now());
        assert!(!record.signature_order_holds());

        record.owner_signature = Some("sig".to_string());
        assert!(record.signature_order_holds());
    }

    #[test]
    fn test_dispute_accessor() {
        let mut record = record_with(vec![]);
        assert!(record.dispute().is_none());

        record.dispute_reason = Some("Rayones en la puerta izquierda".to_string());
        record.dispute_amount = Some(Decimal::from(300));
        record.dispute_declared_at = Some(Utc::now());
        record.dispute_declared_by = Some(Uuid::new_v4());

        let dispute = record.dispute().unwrap();
        assert_eq!(dispute.claimed_amount, Decimal::from(300));
        assert_eq!(dispute.reason, "Rayones en la puerta izquierda");
    }
}
