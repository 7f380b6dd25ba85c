// API layer - HTTP endpoints
pub mod auth;
pub mod health;
pub mod helpers;
pub mod notificacoes;
pub mod ocorrencias;
pub mod users;

pub use auth::{AuthApi, BearerAuth};
pub use health::HealthApi;
pub use notificacoes::NotificacaoApi;
pub use ocorrencias::OcorrenciaApi;
pub use users::UserApi;
