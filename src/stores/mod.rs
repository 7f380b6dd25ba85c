// Stores layer - Data access and repository pattern
pub mod notificacao_store;
pub mod ocorrencia_store;
pub mod password_reset_store;
pub mod user_store;

pub use notificacao_store::NotificacaoStore;
pub use ocorrencia_store::{NewOcorrencia, OcorrenciaFilters, OcorrenciaStats, OcorrenciaStore};
pub use password_reset_store::PasswordResetStore;
pub use user_store::{NewUser, UserStats, UserStore};
