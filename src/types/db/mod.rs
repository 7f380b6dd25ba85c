// Database entities - SeaORM models
pub mod foto;
pub mod historico;
pub mod notificacao;
pub mod ocorrencia;
pub mod password_reset_token;
pub mod user;
