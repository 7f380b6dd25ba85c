pub mod auth;
pub mod notificacao;
pub mod ocorrencia;
pub mod user;

pub use auth::{AuthError, ErrorResponse};
pub use notificacao::NotificacaoError;
pub use ocorrencia::OcorrenciaError;
pub use user::UserError;
