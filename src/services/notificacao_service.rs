use std::sync::Arc;

use crate::errors::NotificacaoError;
use crate::stores::NotificacaoStore;
use crate::types::dto::common::{MessageResponse, PageParams, PaginationMeta};
use crate::types::dto::notificacao::{
    NotificacaoListResponse, NotificacaoResponse, UnreadCountResponse,
};
use crate::types::enums::NotificacaoTipo;
use crate::types::internal::Actor;

/// In-app notification inbox. Every operation is scoped to the caller:
/// listing filters by owner, single-item actions check ownership after the
/// existence check.
pub struct NotificacaoService {
    notificacoes: Arc<NotificacaoStore>,
}

impl NotificacaoService {
    pub fn new(notificacoes: Arc<NotificacaoStore>) -> Self {
        Self { notificacoes }
    }

    pub async fn list(
        &self,
        actor: &Actor,
        lida: Option<bool>,
        tipo: Option<NotificacaoTipo>,
        page: PageParams,
    ) -> Result<NotificacaoListResponse, NotificacaoError> {
        let (models, total) = self.notificacoes.list(&actor.id, lida, tipo, page).await?;
        Ok(NotificacaoListResponse {
            notificacoes: models.into_iter().map(NotificacaoResponse::from).collect(),
            pagination: PaginationMeta::new(page.page, page.limit, total),
        })
    }

    pub async fn unread_count(&self, actor: &Actor) -> Result<UnreadCountResponse, NotificacaoError> {
        let unread = self.notificacoes.unread_count(&actor.id).await?;
        Ok(UnreadCountResponse { unread })
    }

    pub async fn get_by_id(
        &self,
        actor: &Actor,
        id: &str,
    ) -> Result<NotificacaoResponse, NotificacaoError> {
        let model = self
            .notificacoes
            .find_by_id(id)
            .await?
            .ok_or_else(NotificacaoError::not_found)?;
        if model.usuario_id != actor.id {
            return Err(NotificacaoError::access_denied());
        }
        Ok(model.into())
    }

    pub async fn mark_read(
        &self,
        actor: &Actor,
        id: &str,
    ) -> Result<NotificacaoResponse, NotificacaoError> {
        let model = self
            .notificacoes
            .find_by_id(id)
            .await?
            .ok_or_else(NotificacaoError::not_found)?;
        if model.usuario_id != actor.id {
            return Err(NotificacaoError::access_denied());
        }

        let updated = self.notificacoes.mark_read(model).await?;
        Ok(updated.into())
    }

    pub async fn mark_all_read(&self, actor: &Actor) -> Result<MessageResponse, NotificacaoError> {
        let marked = self.notificacoes.mark_all_read(&actor.id).await?;
        Ok(MessageResponse::new(format!(
            "{marked} notificações marcadas como lidas"
        )))
    }

    pub async fn delete(&self, actor: &Actor, id: &str) -> Result<MessageResponse, NotificacaoError> {
        let model = self
            .notificacoes
            .find_by_id(id)
            .await?
            .ok_or_else(NotificacaoError::not_found)?;
        if model.usuario_id != actor.id {
            return Err(NotificacaoError::access_denied());
        }

        self.notificacoes.delete(&model.id).await?;
        Ok(MessageResponse::new("Notificação removida"))
    }
}
