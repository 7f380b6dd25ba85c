use std::sync::Arc;

use poem_openapi::param::{Header, Path, Query};
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::api::auth::BearerAuth;
use crate::api::helpers::{authenticate, require_csrf};
use crate::errors::UserError;
use crate::services::{CsrfStore, TokenService, UserService};
use crate::stores::UserStore;
use crate::types::dto::auth::UserSummary;
use crate::types::dto::common::{MessageResponse, PageParams};
use crate::types::dto::user::{
    ApproveUserRequest, ChangeTipoRequest, DeactivateUserRequest, UserActionResponse,
    UserDetailResponse, UserListFilters, UserListResponse, UserStatsResponse,
};
use crate::types::enums::{UserStatus, UserTipo};
use crate::types::internal::Actor;

const DEFAULT_PAGE_SIZE: u64 = 20;

#[derive(Tags)]
enum UserTags {
    /// Gestão de usuários (somente super administrador)
    Usuarios,
}

/// User-management endpoints. Every operation here sits behind the
/// super-admin flag; the ADMIN role alone is not enough.
pub struct UserApi {
    users: Arc<UserService>,
    user_store: Arc<UserStore>,
    tokens: Arc<TokenService>,
    csrf: Arc<dyn CsrfStore>,
}

impl UserApi {
    pub fn new(
        users: Arc<UserService>,
        user_store: Arc<UserStore>,
        tokens: Arc<TokenService>,
        csrf: Arc<dyn CsrfStore>,
    ) -> Self {
        Self {
            users,
            user_store,
            tokens,
            csrf,
        }
    }

    async fn actor(&self, auth: &BearerAuth) -> Result<Actor, UserError> {
        Ok(authenticate(&self.tokens, &self.user_store, auth.bearer()).await?)
    }
}

#[OpenApi(prefix_path = "/users")]
impl UserApi {
    /// Lista paginada de usuários, com filtros por tipo e status
    #[oai(path = "/", method = "get", tag = "UserTags::Usuarios")]
    async fn list(
        &self,
        auth: BearerAuth,
        tipo: Query<Option<UserTipo>>,
        status: Query<Option<UserStatus>>,
        page: Query<Option<u64>>,
        limit: Query<Option<u64>>,
    ) -> Result<Json<UserListResponse>, UserError> {
        let actor = self.actor(&auth).await?;

        let filters = UserListFilters {
            tipo: tipo.0,
            status: status.0,
        };
        let page = PageParams::clamp(page.0, limit.0, DEFAULT_PAGE_SIZE);

        let response = self.users.list(&actor, filters, page).await?;
        Ok(Json(response))
    }

    /// Fila de aprovação: contas pendentes, mais antigas primeiro
    #[oai(path = "/pendentes", method = "get", tag = "UserTags::Usuarios")]
    async fn list_pending(
        &self,
        auth: BearerAuth,
    ) -> Result<Json<Vec<UserSummary>>, UserError> {
        let actor = self.actor(&auth).await?;
        let response = self.users.list_pending(&actor).await?;
        Ok(Json(response))
    }

    /// Totais de usuários por status e tipo
    #[oai(path = "/stats", method = "get", tag = "UserTags::Usuarios")]
    async fn stats(&self, auth: BearerAuth) -> Result<Json<UserStatsResponse>, UserError> {
        let actor = self.actor(&auth).await?;
        let response = self.users.stats(&actor).await?;
        Ok(Json(response))
    }

    /// Detalhe de um usuário, com contagens de ocorrências e notificações
    #[oai(path = "/:id", method = "get", tag = "UserTags::Usuarios")]
    async fn get(
        &self,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<UserDetailResponse>, UserError> {
        let actor = self.actor(&auth).await?;
        let response = self.users.get_by_id(&actor, &id.0).await?;
        Ok(Json(response))
    }

    /// Aprova uma conta pendente, opcionalmente definindo o tipo
    #[oai(path = "/:id/aprovar", method = "post", tag = "UserTags::Usuarios")]
    async fn approve(
        &self,
        auth: BearerAuth,
        #[oai(name = "X-CSRF-Token")] csrf: Header<Option<String>>,
        id: Path<String>,
        body: Json<ApproveUserRequest>,
    ) -> Result<Json<UserActionResponse>, UserError> {
        let actor = self.actor(&auth).await?;
        require_csrf(self.csrf.as_ref(), csrf.0.as_deref(), &actor).await?;

        let response = self.users.approve(&actor, &id.0, body.0.tipo).await?;
        Ok(Json(response))
    }

    /// Desativa uma conta (não a própria)
    #[oai(path = "/:id/desativar", method = "post", tag = "UserTags::Usuarios")]
    async fn deactivate(
        &self,
        auth: BearerAuth,
        #[oai(name = "X-CSRF-Token")] csrf: Header<Option<String>>,
        id: Path<String>,
        body: Json<DeactivateUserRequest>,
    ) -> Result<Json<UserActionResponse>, UserError> {
        let actor = self.actor(&auth).await?;
        require_csrf(self.csrf.as_ref(), csrf.0.as_deref(), &actor).await?;

        let response = self.users.deactivate(&actor, &id.0, body.0.motivo).await?;
        Ok(Json(response))
    }

    /// Reativa uma conta inativa
    #[oai(path = "/:id/reativar", method = "post", tag = "UserTags::Usuarios")]
    async fn reactivate(
        &self,
        auth: BearerAuth,
        #[oai(name = "X-CSRF-Token")] csrf: Header<Option<String>>,
        id: Path<String>,
    ) -> Result<Json<UserActionResponse>, UserError> {
        let actor = self.actor(&auth).await?;
        require_csrf(self.csrf.as_ref(), csrf.0.as_deref(), &actor).await?;

        let response = self.users.reactivate(&actor, &id.0).await?;
        Ok(Json(response))
    }

    /// Altera o tipo de uma conta (não a própria)
    #[oai(path = "/:id/tipo", method = "patch", tag = "UserTags::Usuarios")]
    async fn change_tipo(
        &self,
        auth: BearerAuth,
        #[oai(name = "X-CSRF-Token")] csrf: Header<Option<String>>,
        id: Path<String>,
        body: Json<ChangeTipoRequest>,
    ) -> Result<Json<UserActionResponse>, UserError> {
        let actor = self.actor(&auth).await?;
        require_csrf(self.csrf.as_ref(), csrf.0.as_deref(), &actor).await?;

        let response = self.users.change_tipo(&actor, &id.0, body.0.tipo).await?;
        Ok(Json(response))
    }

    /// Deleta uma conta sem ocorrências (não a própria)
    #[oai(path = "/:id", method = "delete", tag = "UserTags::Usuarios")]
    async fn delete(
        &self,
        auth: BearerAuth,
        #[oai(name = "X-CSRF-Token")] csrf: Header<Option<String>>,
        id: Path<String>,
    ) -> Result<Json<MessageResponse>, UserError> {
        let actor = self.actor(&auth).await?;
        require_csrf(self.csrf.as_ref(), csrf.0.as_deref(), &actor).await?;

        let response = self.users.delete(&actor, &id.0).await?;
        Ok(Json(response))
    }
}
