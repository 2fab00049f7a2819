//! Modelo de User Simplificado
//!
//! El CRUD de perfiles y el KYC viven fuera de este núcleo; aquí solo se
//! necesita la forma mínima que verifica el middleware de autenticación.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Rol del usuario - mapea al ENUM user_role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Owner,
    Renter,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Owner => "owner",
            UserRole::Renter => "renter",
            UserRole::Admin => "admin",
        }
    }
}

/// User simplificado - mapea exactamente a la tabla users
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}
