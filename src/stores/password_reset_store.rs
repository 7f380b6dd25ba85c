use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::types::db::password_reset_token;

/// Stores hashed password-reset tokens. The raw secret never touches the
/// database; consuming a token wipes every outstanding token for the user.
pub struct PasswordResetStore {
    db: DatabaseConnection,
}

impl PasswordResetStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn insert(
        &self,
        usuario_id: &str,
        token_hash: String,
        expires_at: i64,
    ) -> Result<(), InternalError> {
        password_reset_token::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            usuario_id: Set(usuario_id.to_string()),
            token_hash: Set(token_hash),
            expires_at: Set(expires_at),
            created_at: Set(Utc::now().timestamp()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| InternalError::database("insert_reset_token", e))?;
        Ok(())
    }

    /// Non-expired token lookup by hash
    pub async fn find_valid(
        &self,
        token_hash: &str,
    ) -> Result<Option<password_reset_token::Model>, InternalError> {
        password_reset_token::Entity::find()
            .filter(password_reset_token::Column::TokenHash.eq(token_hash))
            .filter(password_reset_token::Column::ExpiresAt.gt(Utc::now().timestamp()))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_valid_reset_token", e))
    }

    /// Single-active-reset policy: consuming one token invalidates all of
    /// the user's outstanding tokens.
    pub async fn delete_all_for_user(&self, usuario_id: &str) -> Result<(), InternalError> {
        password_reset_token::Entity::delete_many()
            .filter(password_reset_token::Column::UsuarioId.eq(usuario_id))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_reset_tokens", e))?;
        Ok(())
    }
}
