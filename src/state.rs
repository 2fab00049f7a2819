//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use reqwest::Client;
use sqlx::PgPool;
use std::time::Duration;

use crate::cache::redis_client::RedisClient;
use crate::config::environment::EnvironmentConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub redis: RedisClient,
    pub http_client: Client,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig, redis: RedisClient) -> Self {
        // Timeout acotado para todos los servicios externos: un fallo de
        // email o de renderizado nunca debe colgar una request
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.external_timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            pool,
            config,
            redis,
            http_client,
        }
    }
}
