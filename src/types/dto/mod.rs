// DTO layer - request/response types for the OpenAPI surface
pub mod auth;
pub mod common;
pub mod notificacao;
pub mod ocorrencia;
pub mod user;
