// Services layer - Business logic over the stores
pub mod access_control;
pub mod csrf;
pub mod notificacao_service;
pub mod ocorrencia_service;
pub mod password_service;
pub mod token_service;
pub mod user_service;

pub use csrf::{generate_token as generate_csrf_token, CsrfStore, MemoryCsrfStore, CSRF_TTL};
pub use notificacao_service::NotificacaoService;
pub use ocorrencia_service::{CreateOcorrenciaInput, OcorrenciaService, PhotoPayload};
pub use password_service::PasswordService;
pub use token_service::TokenService;
pub use user_service::UserService;
