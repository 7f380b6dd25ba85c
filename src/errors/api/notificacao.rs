use poem_openapi::{payload::Json, ApiResponse};
use std::fmt;

use super::auth::{AuthError, ErrorResponse};

#[derive(ApiResponse, Debug)]
pub enum NotificacaoError {
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),

    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl NotificacaoError {
    pub fn access_denied() -> Self {
        NotificacaoError::Forbidden(Json(ErrorResponse::new("forbidden", "Acesso negado", 403)))
    }

    pub fn csrf() -> Self {
        NotificacaoError::Forbidden(Json(ErrorResponse::new(
            "csrf",
            "Token CSRF inválido ou expirado",
            403,
        )))
    }

    pub fn not_found() -> Self {
        NotificacaoError::NotFound(Json(ErrorResponse::new(
            "not_found",
            "Notificação não encontrada",
            404,
        )))
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        NotificacaoError::InternalError(Json(ErrorResponse::new("internal_error", message, 500)))
    }

    pub fn message(&self) -> &str {
        match self {
            NotificacaoError::Unauthorized(json)
            | NotificacaoError::Forbidden(json)
            | NotificacaoError::NotFound(json)
            | NotificacaoError::InternalError(json) => &json.0.message,
        }
    }
}

impl fmt::Display for NotificacaoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl From<crate::errors::InternalError> for NotificacaoError {
    fn from(e: crate::errors::InternalError) -> Self {
        tracing::error!("internal error: {e}");
        NotificacaoError::internal_error("Erro interno do servidor")
    }
}

impl From<AuthError> for NotificacaoError {
    fn from(e: AuthError) -> Self {
        let payload = ErrorResponse::new("auth", e.message(), e.status_code());
        match e.status_code() {
            401 => NotificacaoError::Unauthorized(Json(payload)),
            403 => NotificacaoError::Forbidden(Json(payload)),
            404 => NotificacaoError::NotFound(Json(payload)),
            _ => NotificacaoError::InternalError(Json(payload)),
        }
    }
}
