use poem_openapi::Object;

use crate::types::enums::{UserStatus, UserTipo};

use super::auth::UserSummary;
use super::common::PaginationMeta;

#[derive(Object, Debug)]
pub struct UserListResponse {
    pub users: Vec<UserSummary>,
    pub pagination: PaginationMeta,
}

/// Detalhe de usuário visto pelo administrador, com contagens de posse
#[derive(Object, Debug)]
pub struct UserDetailResponse {
    pub user: UserSummary,
    pub ocorrencias_count: u64,
    pub notificacoes_count: u64,
}

#[derive(Object, Debug)]
pub struct ApproveUserRequest {
    /// Papel a atribuir na aprovação; mantém VEREADOR quando ausente
    pub tipo: Option<UserTipo>,
}

#[derive(Object, Debug)]
pub struct DeactivateUserRequest {
    pub motivo: Option<String>,
}

#[derive(Object, Debug)]
pub struct ChangeTipoRequest {
    pub tipo: UserTipo,
}

#[derive(Object, Debug)]
pub struct UserActionResponse {
    pub message: String,
    pub user: UserSummary,
}

#[derive(Object, Debug)]
pub struct TipoCount {
    pub tipo: UserTipo,
    pub count: u64,
}

#[derive(Object, Debug)]
pub struct UserStatsResponse {
    pub total: u64,
    pub ativos: u64,
    pub pendentes: u64,
    pub inativos: u64,
    pub por_tipo: Vec<TipoCount>,
}

/// Filtros de listagem de usuários
#[derive(Debug, Default, Clone)]
pub struct UserListFilters {
    pub tipo: Option<UserTipo>,
    pub status: Option<UserStatus>,
}
