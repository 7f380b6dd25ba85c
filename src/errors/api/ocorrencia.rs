use poem_openapi::{payload::Json, ApiResponse};
use std::fmt;

use super::auth::{AuthError, ErrorResponse};

/// Errors surfaced by the incident endpoints
#[derive(ApiResponse, Debug)]
pub enum OcorrenciaError {
    #[oai(status = 400)]
    Validation(Json<ErrorResponse>),

    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),

    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl OcorrenciaError {
    pub fn validation(message: impl Into<String>) -> Self {
        OcorrenciaError::Validation(Json(ErrorResponse::new("validation", message, 400)))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        OcorrenciaError::Forbidden(Json(ErrorResponse::new("forbidden", message, 403)))
    }

    pub fn only_vereador() -> Self {
        Self::forbidden("Apenas vereadores podem criar ocorrências")
    }

    pub fn access_denied() -> Self {
        Self::forbidden("Acesso negado")
    }

    pub fn only_pendente_deletable() -> Self {
        Self::forbidden("Apenas ocorrências pendentes podem ser deletadas")
    }

    pub fn csrf() -> Self {
        Self::forbidden("Token CSRF inválido ou expirado")
    }

    pub fn not_found() -> Self {
        OcorrenciaError::NotFound(Json(ErrorResponse::new(
            "not_found",
            "Ocorrência não encontrada",
            404,
        )))
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        OcorrenciaError::InternalError(Json(ErrorResponse::new("internal_error", message, 500)))
    }

    pub fn message(&self) -> &str {
        match self {
            OcorrenciaError::Validation(json)
            | OcorrenciaError::Unauthorized(json)
            | OcorrenciaError::Forbidden(json)
            | OcorrenciaError::NotFound(json)
            | OcorrenciaError::InternalError(json) => &json.0.message,
        }
    }
}

impl fmt::Display for OcorrenciaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl From<crate::errors::InternalError> for OcorrenciaError {
    fn from(e: crate::errors::InternalError) -> Self {
        tracing::error!("internal error: {e}");
        OcorrenciaError::internal_error("Erro interno do servidor")
    }
}

/// Session failures detected before the endpoint's own logic runs
impl From<AuthError> for OcorrenciaError {
    fn from(e: AuthError) -> Self {
        let payload = ErrorResponse::new("auth", e.message(), e.status_code());
        match e.status_code() {
            401 => OcorrenciaError::Unauthorized(Json(payload)),
            403 => OcorrenciaError::Forbidden(Json(payload)),
            404 => OcorrenciaError::NotFound(Json(payload)),
            _ => OcorrenciaError::InternalError(Json(payload)),
        }
    }
}
