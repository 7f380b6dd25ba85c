use serde::{Deserialize, Serialize};

use crate::types::enums::UserTipo;

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// Papel do usuário no momento da emissão
    pub tipo: UserTipo,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Identidade autenticada de uma requisição, carregada do banco após a
/// validação do token. O status já foi verificado: só contas ATIVO chegam aqui.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: String,
    pub tipo: UserTipo,
    pub is_super_admin: bool,
}

impl Actor {
    pub fn new(id: impl Into<String>, tipo: UserTipo, is_super_admin: bool) -> Self {
        Self {
            id: id.into(),
            tipo,
            is_super_admin,
        }
    }
}
