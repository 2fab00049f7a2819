//! DTOs de inspecciones (états des lieux)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::inspection::{InspectionRecord, InspectionSide, InspectionStatus, PhotoCategory};

/// Foto aportada en la entrega de evidencia
#[derive(Debug, Clone, Deserialize)]
pub struct PhotoEvidenceRequest {
    pub category: PhotoCategory,
    pub url: String,
}

/// Request del arrendatario para entregar la evidencia de una inspección
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitInspectionRequest {
    pub photos: Vec<PhotoEvidenceRequest>,

    #[validate(range(min = 1))]
    pub odometer_km: i32,

    /// Nivel de combustible en porcentaje
    #[validate(range(min = 0, max = 100))]
    pub fuel_level: i32,

    pub notes: Option<String>,

    /// Firma del arrendatario, PNG codificado en base64
    #[validate(length(min = 1))]
    pub signature: String,
}

/// Litige declarado junto con la validación del check-out
#[derive(Debug, Deserialize, Validate)]
pub struct DisputeRequest {
    #[validate(length(min = 1, max = 2000))]
    pub reason: String,

    /// Monto reclamado; por defecto 0
    pub claimed_amount: Option<Decimal>,
}

/// Request del propietario para validar una inspección
#[derive(Debug, Deserialize, Validate)]
pub struct ValidateInspectionRequest {
    /// Firma del propietario, PNG codificado en base64
    #[validate(length(min = 1))]
    pub signature: String,

    /// Solo admitido en el check-out: valida y declara litige atómicamente
    #[validate]
    pub dispute: Option<DisputeRequest>,
}

/// Response de inspección para la API
#[derive(Debug, Serialize)]
pub struct InspectionResponse {
    pub id: Uuid,
    pub reservation_id: Uuid,
    pub side: InspectionSide,
    pub status: InspectionStatus,
    pub photo_count: usize,
    pub odometer_km: i32,
    pub fuel_level: i32,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub validated_by: Option<Uuid>,
    pub validated_at: Option<DateTime<Utc>>,
    pub pdf_url: Option<String>,
    pub dispute_reason: Option<String>,
    pub dispute_amount: Option<Decimal>,
}

impl From<InspectionRecord> for InspectionResponse {
    fn from(record: InspectionRecord) -> Self {
        Self {
            id: record.id,
            reservation_id: record.reservation_id,
            side: record.side,
            status: record.status(),
            photo_count: record.photos.0.len(),
            odometer_km: record.odometer_km,
            fuel_level: record.fuel_level,
            notes: record.notes,
            created_by: record.created_by,
            created_at: record.created_at,
            validated_by: record.validated_by,
            validated_at: record.validated_at,
            pdf_url: record.pdf_url,
            dispute_reason: record.dispute_reason,
            dispute_amount: record.dispute_amount,
        }
    }
}
