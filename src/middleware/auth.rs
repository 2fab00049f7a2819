//! Middleware de autenticación JWT
//!
//! Este módulo maneja la autenticación JWT, extracción de tokens
//! y verificación de usuarios autenticados. La identidad del actor se
//! resuelve una sola vez aquí y viaja como parámetro explícito hacia
//! los controllers; no existe un "usuario actual" ambiente.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    models::user::UserRole,
    state::AppState,
    utils::errors::AppError,
    utils::jwt::{verify_token, JwtConfig},
};

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub role: UserRole,
}

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extraer token del header Authorization
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_str| auth_str.to_str().ok())
        .and_then(|auth_str| auth_str.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

    // Decodificar y validar JWT
    let jwt_config = JwtConfig::from(&state.config);
    let claims = verify_token(auth_header, &jwt_config)?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("ID de usuario inválido".to_string()))?;

    // Verificar que el usuario existe en la base de datos
    let row: Option<(Uuid, UserRole)> =
        sqlx::query_as("SELECT id, role FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&state.pool)
            .await
            .map_err(AppError::Database)?;

    let (user_id, role) =
        row.ok_or_else(|| AppError::Unauthorized("Usuario no encontrado".to_string()))?;

    // Inyectar usuario autenticado en las extensions
    let authenticated_user = AuthenticatedUser { user_id, role };
    request.extensions_mut().insert(authenticated_user);

    Ok(next.run(request).await)
}
