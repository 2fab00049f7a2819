//! Servicio de documentos
//!
//! Cliente del renderizador de documentos externo (hechos JSON → bytes PDF)
//! y del object store (PUT por clave → URL pública). La generación del PDF
//! de inspección corre como job en background con reintentos: la clave del
//! artefacto es determinística por reserva y lado, así un reintento
//! reemplaza el artefacto en lugar de duplicarlo.

use serde_json::Value;
use sqlx::PgPool;
use std::time::Duration;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::environment::EnvironmentConfig;
use crate::models::inspection::InspectionSide;
use crate::repositories::inspection_repository::InspectionRepository;
use crate::utils::errors::AppError;

/// Intentos del job de generación de PDF antes de abandonar
const PDF_JOB_MAX_ATTEMPTS: u32 = 3;
/// Espera entre reintentos del job
const PDF_JOB_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Servicio de renderizado y almacenamiento de documentos
#[derive(Clone)]
pub struct DocumentService {
    client: reqwest::Client,
    render_url: String,
    store_url: String,
}

impl DocumentService {
    pub fn new(client: reqwest::Client, config: &EnvironmentConfig) -> Self {
        Self {
            client,
            render_url: config.document_render_url.clone(),
            store_url: config.object_store_url.clone(),
        }
    }

    /// Renderizar un documento PDF a partir de sus hechos
    pub async fn render_pdf(&self, facts: &Value) -> Result<Vec<u8>, AppError> {
        let response = self
            .client
            .post(format!("{}/render", self.render_url))
            .json(facts)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Error renderizando PDF: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "Renderizador respondió {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::ExternalService(format!("Error leyendo PDF: {}", e)))?;

        Ok(bytes.to_vec())
    }

    /// Subir un artefacto al object store y devolver su URL pública.
    /// El PUT sobre la misma clave reemplaza el artefacto anterior.
    pub async fn upload_artifact(&self, key: &str, bytes: Vec<u8>) -> Result<String, AppError> {
        let url = format!("{}/{}", self.store_url, key);

        let response = self
            .client
            .put(&url)
            .header("content-type", "application/pdf")
            .body(bytes)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Error subiendo artefacto: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "Object store respondió {}",
                response.status()
            )));
        }

        Ok(url)
    }

    /// Renderizar y almacenar en un solo paso
    pub async fn render_and_store(&self, facts: &Value, key: &str) -> Result<String, AppError> {
        let bytes = self.render_pdf(facts).await?;
        self.upload_artifact(key, bytes).await
    }

    /// Clave determinística del PDF de una inspección
    pub fn inspection_pdf_key(reservation_id: Uuid, side: InspectionSide) -> String {
        format!("inspections/{}/{}.pdf", reservation_id, side.as_str())
    }

    /// Clave determinística del contrato según cuántas firmas acumula.
    /// Cada evento de firma produce un artefacto nuevo (URL nueva) sin que
    /// un reintento pueda duplicarlo.
    pub fn contract_key(reservation_id: Uuid, signature_count: u32) -> String {
        format!("contracts/{}/contract-v{}.pdf", reservation_id, signature_count)
    }

    /// Lanzar en background la generación del PDF de una inspección
    /// validada. At-least-once con reintentos acotados; el fallo definitivo
    /// solo se loguea: la validación ya está persistida y no se revierte.
    pub fn spawn_inspection_pdf_job(
        &self,
        pool: PgPool,
        reservation_id: Uuid,
        side: InspectionSide,
        facts: Value,
    ) {
        let service = self.clone();
        tokio::spawn(async move {
            let key = DocumentService::inspection_pdf_key(reservation_id, side);
            let repository = InspectionRepository::new(pool);

            for attempt in 1..=PDF_JOB_MAX_ATTEMPTS {
                match service.render_and_store(&facts, &key).await {
                    Ok(url) => {
                        match repository.set_pdf_url(reservation_id, side, &url).await {
                            Ok(()) => {
                                info!(
                                    "📄 PDF de inspección {} listo para reserva {} (intento {})",
                                    side.as_str(),
                                    reservation_id,
                                    attempt
                                );
                                return;
                            }
                            Err(e) => {
                                warn!(
                                    "⚠️ PDF generado pero no adjuntado para reserva {}: {}",
                                    reservation_id, e
                                );
                            }
                        }
                    }
                    Err(e) => {
                        warn!(
                            "⚠️ Intento {}/{} de PDF {} para reserva {} falló: {}",
                            attempt,
                            PDF_JOB_MAX_ATTEMPTS,
                            side.as_str(),
                            reservation_id,
                            e
                        );
                    }
                }

                if attempt < PDF_JOB_MAX_ATTEMPTS {
                    tokio::time::sleep(PDF_JOB_RETRY_DELAY).await;
                }
            }

            error!(
                "❌ Generación de PDF {} abandonada para reserva {} tras {} intentos",
                side.as_str(),
                reservation_id,
                PDF_JOB_MAX_ATTEMPTS
            );
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspection_pdf_key_is_deterministic() {
        let id = Uuid::new_v4();
        let k1 = DocumentService::inspection_pdf_key(id, InspectionSide::Checkin);
        let k2 = DocumentService::inspection_pdf_key(id, InspectionSide::Checkin);
        assert_eq!(k1, k2);
        assert!(k1.ends_with("checkin.pdf"));

        let k3 = DocumentService::inspection_pdf_key(id, InspectionSide::Checkout);
        assert_ne!(k1, k3);
    }

    #[test]
    fn test_contract_key_changes_per_signature_event() {
        let id = Uuid::new_v4();
        let first = DocumentService::contract_key(id, 1);
        let second = DocumentService::contract_key(id, 2);
        assert_ne!(first, second);
    }
}
