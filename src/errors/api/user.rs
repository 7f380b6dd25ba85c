use poem_openapi::{payload::Json, ApiResponse};
use std::fmt;

use super::auth::{AuthError, ErrorResponse};

/// Errors surfaced by the user-management (super-admin) endpoints
#[derive(ApiResponse, Debug)]
pub enum UserError {
    /// Business-rule conflicts: self-target, wrong current status, owned incidents
    #[oai(status = 400)]
    Conflict(Json<ErrorResponse>),

    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),

    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl UserError {
    pub fn conflict(error: &str, message: impl Into<String>) -> Self {
        UserError::Conflict(Json(ErrorResponse::new(error, message, 400)))
    }

    pub fn not_pending() -> Self {
        Self::conflict("not_pending", "Usuário não está pendente de aprovação")
    }

    pub fn not_inactive() -> Self {
        Self::conflict("not_inactive", "Usuário não está inativo")
    }

    pub fn self_deactivate() -> Self {
        Self::conflict("self_action", "Você não pode desativar sua própria conta")
    }

    pub fn self_delete() -> Self {
        Self::conflict("self_action", "Você não pode deletar sua própria conta")
    }

    pub fn self_change_tipo() -> Self {
        Self::conflict(
            "self_action",
            "Você não pode alterar o tipo da sua própria conta",
        )
    }

    pub fn has_ocorrencias(count: u64) -> Self {
        Self::conflict(
            "has_ocorrencias",
            format!("Usuário possui {count} ocorrências. Desative a conta ao invés de deletar."),
        )
    }

    pub fn super_admin_required() -> Self {
        UserError::Forbidden(Json(ErrorResponse::new(
            "super_admin_required",
            "Acesso negado. Apenas super administrador.",
            403,
        )))
    }

    pub fn csrf() -> Self {
        UserError::Forbidden(Json(ErrorResponse::new(
            "csrf",
            "Token CSRF inválido ou expirado",
            403,
        )))
    }

    pub fn not_found() -> Self {
        UserError::NotFound(Json(ErrorResponse::new(
            "not_found",
            "Usuário não encontrado",
            404,
        )))
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        UserError::InternalError(Json(ErrorResponse::new("internal_error", message, 500)))
    }

    pub fn message(&self) -> &str {
        match self {
            UserError::Conflict(json)
            | UserError::Unauthorized(json)
            | UserError::Forbidden(json)
            | UserError::NotFound(json)
            | UserError::InternalError(json) => &json.0.message,
        }
    }
}

impl fmt::Display for UserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl From<crate::errors::InternalError> for UserError {
    fn from(e: crate::errors::InternalError) -> Self {
        tracing::error!("internal error: {e}");
        UserError::internal_error("Erro interno do servidor")
    }
}

impl From<AuthError> for UserError {
    fn from(e: AuthError) -> Self {
        let payload = ErrorResponse::new("auth", e.message(), e.status_code());
        match e.status_code() {
            401 => UserError::Unauthorized(Json(payload)),
            403 => UserError::Forbidden(Json(payload)),
            404 => UserError::NotFound(Json(payload)),
            _ => UserError::InternalError(Json(payload)),
        }
    }
}
