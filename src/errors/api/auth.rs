use poem_openapi::{payload::Json, ApiResponse, Object};
use std::fmt;

/// Standardized error response payload
#[derive(Object, Debug)]
pub struct ErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

impl ErrorResponse {
    pub fn new(error: &str, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            status_code,
        }
    }
}

/// Authentication and self-service account errors
#[derive(ApiResponse, Debug)]
pub enum AuthError {
    /// Malformed or missing input
    #[oai(status = 400)]
    Validation(Json<ErrorResponse>),

    /// Email ou CPF já cadastrado
    #[oai(status = 400)]
    Duplicate(Json<ErrorResponse>),

    /// Credenciais inválidas (mensagem genérica, nunca revela existência)
    #[oai(status = 401)]
    InvalidCredentials(Json<ErrorResponse>),

    /// Token ausente, malformado ou expirado
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),

    /// Conta pendente de aprovação ou desativada
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl AuthError {
    pub fn validation(message: impl Into<String>) -> Self {
        AuthError::Validation(Json(ErrorResponse::new("validation", message, 400)))
    }

    pub fn duplicate() -> Self {
        AuthError::Duplicate(Json(ErrorResponse::new(
            "duplicate",
            "CPF ou email já cadastrado",
            400,
        )))
    }

    pub fn email_in_use() -> Self {
        AuthError::Duplicate(Json(ErrorResponse::new(
            "duplicate",
            "Email já está em uso",
            400,
        )))
    }

    pub fn invalid_credentials() -> Self {
        AuthError::InvalidCredentials(Json(ErrorResponse::new(
            "invalid_credentials",
            "Credenciais inválidas",
            401,
        )))
    }

    pub fn missing_token() -> Self {
        AuthError::Unauthorized(Json(ErrorResponse::new(
            "missing_token",
            "Token não fornecido",
            401,
        )))
    }

    pub fn invalid_token() -> Self {
        AuthError::Unauthorized(Json(ErrorResponse::new(
            "invalid_token",
            "Token inválido",
            401,
        )))
    }

    pub fn expired_token() -> Self {
        AuthError::Unauthorized(Json(ErrorResponse::new(
            "expired_token",
            "Token expirado",
            401,
        )))
    }

    pub fn awaiting_approval() -> Self {
        AuthError::Forbidden(Json(ErrorResponse::new(
            "awaiting_approval",
            "Conta aguardando aprovação do administrador",
            403,
        )))
    }

    pub fn account_disabled() -> Self {
        AuthError::Forbidden(Json(ErrorResponse::new(
            "account_disabled",
            "Conta desativada. Entre em contato com o administrador",
            403,
        )))
    }

    pub fn inactive_account() -> Self {
        AuthError::Forbidden(Json(ErrorResponse::new(
            "inactive_account",
            "Conta inativa ou pendente de aprovação",
            403,
        )))
    }

    pub fn invalid_reset_token() -> Self {
        AuthError::Validation(Json(ErrorResponse::new(
            "invalid_reset_token",
            "Token inválido ou expirado",
            400,
        )))
    }

    pub fn wrong_current_password() -> Self {
        AuthError::InvalidCredentials(Json(ErrorResponse::new(
            "invalid_credentials",
            "Senha atual incorreta",
            401,
        )))
    }

    pub fn csrf() -> Self {
        AuthError::Forbidden(Json(ErrorResponse::new(
            "csrf",
            "Token CSRF inválido ou expirado",
            403,
        )))
    }

    pub fn not_found() -> Self {
        AuthError::NotFound(Json(ErrorResponse::new(
            "not_found",
            "Usuário não encontrado",
            404,
        )))
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        AuthError::InternalError(Json(ErrorResponse::new("internal_error", message, 500)))
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> &str {
        match self {
            AuthError::Validation(json)
            | AuthError::Duplicate(json)
            | AuthError::InvalidCredentials(json)
            | AuthError::Unauthorized(json)
            | AuthError::Forbidden(json)
            | AuthError::NotFound(json)
            | AuthError::InternalError(json) => &json.0.message,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::Validation(json)
            | AuthError::Duplicate(json)
            | AuthError::InvalidCredentials(json)
            | AuthError::Unauthorized(json)
            | AuthError::Forbidden(json)
            | AuthError::NotFound(json)
            | AuthError::InternalError(json) => json.0.status_code,
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl From<crate::errors::InternalError> for AuthError {
    fn from(e: crate::errors::InternalError) -> Self {
        tracing::error!("internal error: {e}");
        AuthError::internal_error("Erro interno do servidor")
    }
}
