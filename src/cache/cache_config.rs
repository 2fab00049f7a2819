//! Configuración de cache
//!
//! Este módulo contiene la configuración para el sistema de cache.

use anyhow::Result;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Configuración del cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub redis_url: String,
    pub default_ttl: u64,
    pub max_connections: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://localhost:6379".to_string(),
            default_ttl: 60, // el calendario de disponibilidad caduca rápido
            max_connections: 10,
        }
    }
}

/// Operaciones de cache
#[async_trait::async_trait]
pub trait CacheOperations {
    async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>>;
    async fn set<T: Serialize + Send + Sync>(&self, key: &str, value: &T, ttl: u64) -> Result<()>;
    async fn delete(&self, key: &str) -> Result<()>;
    async fn exists(&self, key: &str) -> Result<bool>;
}
