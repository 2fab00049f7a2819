//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    // Servicios externos: email, renderizado de documentos y object store
    pub email_service_url: String,
    pub document_render_url: String,
    pub object_store_url: String,
    pub external_timeout_secs: u64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").expect("ENVIRONMENT must be set"),
            port: env::var("PORT")
                .expect("PORT must be set")
                .parse()
                .expect("PORT must be a valid number"),
            host: env::var("HOST").expect("HOST must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            jwt_expiration: env::var("JWT_EXPIRATION")
                .expect("JWT_EXPIRATION must be set")
                .parse()
                .expect("JWT_EXPIRATION must be a valid number"),
            cors_origins: env::var("CORS_ORIGINS")
                .expect("CORS_ORIGINS must be set")
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            email_service_url: env::var("EMAIL_SERVICE_URL")
                .expect("EMAIL_SERVICE_URL must be set"),
            document_render_url: env::var("DOCUMENT_RENDER_URL")
                .expect("DOCUMENT_RENDER_URL must be set"),
            object_store_url: env::var("OBJECT_STORE_URL")
                .expect("OBJECT_STORE_URL must be set"),
            external_timeout_secs: env::var("EXTERNAL_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .expect("EXTERNAL_TIMEOUT_SECS must be a valid number"),
        }
    }
}

impl EnvironmentConfig {
    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
