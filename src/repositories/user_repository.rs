//! Repositorio de usuarios
//!
//! Solo lectura: el CRUD de perfiles vive fuera de este núcleo. Se usa
//! para resolver identidad y datos de contacto de las partes.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::User;
use crate::utils::errors::AppError;

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }
}
