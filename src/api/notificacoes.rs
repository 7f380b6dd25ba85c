use std::sync::Arc;

use poem_openapi::param::{Header, Path, Query};
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::api::auth::BearerAuth;
use crate::api::helpers::{authenticate, require_csrf};
use crate::errors::NotificacaoError;
use crate::services::{CsrfStore, NotificacaoService, TokenService};
use crate::stores::UserStore;
use crate::types::dto::common::{MessageResponse, PageParams};
use crate::types::dto::notificacao::{
    NotificacaoListResponse, NotificacaoResponse, UnreadCountResponse,
};
use crate::types::enums::NotificacaoTipo;
use crate::types::internal::Actor;

const DEFAULT_PAGE_SIZE: u64 = 50;

#[derive(Tags)]
enum NotificacaoTags {
    /// Caixa de notificações do usuário autenticado
    Notificacoes,
}

pub struct NotificacaoApi {
    notificacoes: Arc<NotificacaoService>,
    user_store: Arc<UserStore>,
    tokens: Arc<TokenService>,
    csrf: Arc<dyn CsrfStore>,
}

impl NotificacaoApi {
    pub fn new(
        notificacoes: Arc<NotificacaoService>,
        user_store: Arc<UserStore>,
        tokens: Arc<TokenService>,
        csrf: Arc<dyn CsrfStore>,
    ) -> Self {
        Self {
            notificacoes,
            user_store,
            tokens,
            csrf,
        }
    }

    async fn actor(&self, auth: &BearerAuth) -> Result<Actor, NotificacaoError> {
        Ok(authenticate(&self.tokens, &self.user_store, auth.bearer()).await?)
    }
}

#[OpenApi(prefix_path = "/notificacoes")]
impl NotificacaoApi {
    /// Notificações do usuário, mais recentes primeiro
    #[oai(path = "/", method = "get", tag = "NotificacaoTags::Notificacoes")]
    async fn list(
        &self,
        auth: BearerAuth,
        lida: Query<Option<bool>>,
        tipo: Query<Option<NotificacaoTipo>>,
        page: Query<Option<u64>>,
        limit: Query<Option<u64>>,
    ) -> Result<Json<NotificacaoListResponse>, NotificacaoError> {
        let actor = self.actor(&auth).await?;
        let page = PageParams::clamp(page.0, limit.0, DEFAULT_PAGE_SIZE);

        let response = self.notificacoes.list(&actor, lida.0, tipo.0, page).await?;
        Ok(Json(response))
    }

    /// Contagem de não lidas, para o indicador da interface
    #[oai(path = "/nao-lidas/count", method = "get", tag = "NotificacaoTags::Notificacoes")]
    async fn unread_count(
        &self,
        auth: BearerAuth,
    ) -> Result<Json<UnreadCountResponse>, NotificacaoError> {
        let actor = self.actor(&auth).await?;
        let response = self.notificacoes.unread_count(&actor).await?;
        Ok(Json(response))
    }

    /// Uma notificação específica do usuário
    #[oai(path = "/:id", method = "get", tag = "NotificacaoTags::Notificacoes")]
    async fn get_by_id(
        &self,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<NotificacaoResponse>, NotificacaoError> {
        let actor = self.actor(&auth).await?;
        let response = self.notificacoes.get_by_id(&actor, &id.0).await?;
        Ok(Json(response))
    }

    /// Marca uma notificação como lida
    #[oai(path = "/:id/lida", method = "patch", tag = "NotificacaoTags::Notificacoes")]
    async fn mark_read(
        &self,
        auth: BearerAuth,
        #[oai(name = "X-CSRF-Token")] csrf: Header<Option<String>>,
        id: Path<String>,
    ) -> Result<Json<NotificacaoResponse>, NotificacaoError> {
        let actor = self.actor(&auth).await?;
        require_csrf(self.csrf.as_ref(), csrf.0.as_deref(), &actor).await?;

        let response = self.notificacoes.mark_read(&actor, &id.0).await?;
        Ok(Json(response))
    }

    /// Marca todas as notificações do usuário como lidas
    #[oai(path = "/lidas", method = "patch", tag = "NotificacaoTags::Notificacoes")]
    async fn mark_all_read(
        &self,
        auth: BearerAuth,
        #[oai(name = "X-CSRF-Token")] csrf: Header<Option<String>>,
    ) -> Result<Json<MessageResponse>, NotificacaoError> {
        let actor = self.actor(&auth).await?;
        require_csrf(self.csrf.as_ref(), csrf.0.as_deref(), &actor).await?;

        let response = self.notificacoes.mark_all_read(&actor).await?;
        Ok(Json(response))
    }

    /// Remove uma notificação
    #[oai(path = "/:id", method = "delete", tag = "NotificacaoTags::Notificacoes")]
    async fn delete(
        &self,
        auth: BearerAuth,
        #[oai(name = "X-CSRF-Token")] csrf: Header<Option<String>>,
        id: Path<String>,
    ) -> Result<Json<MessageResponse>, NotificacaoError> {
        let actor = self.actor(&auth).await?;
        require_csrf(self.csrf.as_ref(), csrf.0.as_deref(), &actor).await?;

        let response = self.notificacoes.delete(&actor, &id.0).await?;
        Ok(Json(response))
    }
}
