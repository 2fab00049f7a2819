//! Servicio de notificaciones por email
//!
//! Cliente del despachador de emails externo. Todas las notificaciones son
//! best-effort: se despachan en background y un fallo se registra en el log
//! sin afectar jamás la transición de estado que las originó.

use reqwest::Client;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::environment::EnvironmentConfig;
use crate::utils::errors::AppError;

/// Mensaje de email hacia el despachador externo
#[derive(Debug, Clone, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Servicio de notificaciones
#[derive(Clone)]
pub struct NotificationService {
    client: Client,
    email_service_url: String,
}

impl NotificationService {
    pub fn new(client: Client, config: &EnvironmentConfig) -> Self {
        Self {
            client,
            email_service_url: config.email_service_url.clone(),
        }
    }

    /// Enviar un email de forma síncrona (con timeout acotado del cliente)
    pub async fn send_email(&self, message: &EmailMessage) -> Result<(), AppError> {
        let response = self
            .client
            .post(format!("{}/send", self.email_service_url))
            .json(message)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Error despachando email: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "Despachador de email respondió {}",
                response.status()
            )));
        }

        info!("📧 Email despachado a {} ({})", message.to, message.subject);
        Ok(())
    }

    /// Despachar fire-and-forget: el fallo se loguea y se descarta
    pub fn dispatch(&self, message: EmailMessage) {
        let service = self.clone();
        tokio::spawn(async move {
            if let Err(e) = service.send_email(&message).await {
                warn!("⚠️ Notificación no enviada a {}: {}", message.to, e);
            }
        });
    }

    pub fn notify_booking_created(&self, owner_email: &str, renter_name: &str, vehicle_name: &str) {
        self.dispatch(EmailMessage {
            to: owner_email.to_string(),
            subject: "Nueva solicitud de reserva".to_string(),
            body: format!(
                "{} solicitó reservar tu vehículo {}. Entrá para confirmar o rechazar.",
                renter_name, vehicle_name
            ),
        });
    }

    pub fn notify_booking_received(&self, renter_email: &str, vehicle_name: &str) {
        self.dispatch(EmailMessage {
            to: renter_email.to_string(),
            subject: "Solicitud de reserva registrada".to_string(),
            body: format!(
                "Tu solicitud para {} quedó registrada y está pendiente de confirmación.",
                vehicle_name
            ),
        });
    }

    pub fn notify_booking_confirmed(&self, renter_email: &str, vehicle_name: &str) {
        self.dispatch(EmailMessage {
            to: renter_email.to_string(),
            subject: "Reserva confirmada".to_string(),
            body: format!("El propietario confirmó tu reserva de {}.", vehicle_name),
        });
    }

    pub fn notify_booking_cancelled(&self, other_party_email: &str, vehicle_name: &str) {
        self.dispatch(EmailMessage {
            to: other_party_email.to_string(),
            subject: "Reserva cancelada".to_string(),
            body: format!("La reserva de {} fue cancelada.", vehicle_name),
        });
    }
}
