use poem_openapi::auth::Bearer;
use poem_openapi::types::multipart::Upload;

use crate::errors::AuthError;
use crate::services::{CsrfStore, TokenService};
use crate::stores::UserStore;
use crate::types::enums::UserStatus;
use crate::types::internal::Actor;

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Validate the bearer token and load the live account. The account state in
/// the database wins over the token: a deactivated user is rejected even
/// with a token issued while still active. `None` means the Authorization
/// header was absent, which gets its own 401 message.
pub async fn authenticate(
    tokens: &TokenService,
    users: &UserStore,
    bearer: Option<&Bearer>,
) -> Result<Actor, AuthError> {
    let bearer = bearer.ok_or_else(AuthError::missing_token)?;
    let claims = tokens.validate(&bearer.token)?;
    let user = users
        .find_by_id(&claims.sub)
        .await?
        .ok_or_else(AuthError::invalid_token)?;

    if user.status != UserStatus::Ativo {
        return Err(AuthError::inactive_account());
    }

    Ok(Actor::new(user.id, user.tipo, user.is_super_admin))
}

/// Mutating endpoints additionally require a CSRF token bound to the session
/// owner.
pub async fn require_csrf(
    store: &dyn CsrfStore,
    header: Option<&str>,
    actor: &Actor,
) -> Result<(), AuthError> {
    match header {
        Some(token) if store.validate(token, &actor.id).await => Ok(()),
        _ => Err(AuthError::csrf()),
    }
}

/// Read one multipart image into memory, enforcing type and size limits.
/// The error is a user-facing validation message.
pub async fn read_image(upload: Upload) -> Result<(Vec<u8>, String), String> {
    let content_type = upload.content_type().unwrap_or_default().to_string();
    if !content_type.starts_with("image/") {
        return Err("Apenas arquivos de imagem são aceitos".to_string());
    }

    let data = upload
        .into_vec()
        .await
        .map_err(|_| "Falha ao ler o arquivo enviado".to_string())?;
    if data.len() > MAX_IMAGE_BYTES {
        return Err("Cada imagem deve ter no máximo 5MB".to_string());
    }

    Ok((data, content_type))
}
