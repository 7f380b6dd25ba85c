use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::types::db::notificacao;
use crate::types::dto::common::PageParams;
use crate::types::enums::NotificacaoTipo;

/// In-app notifications, always scoped to their owning user.
pub struct NotificacaoStore {
    db: DatabaseConnection,
}

impl NotificacaoStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn insert(
        &self,
        usuario_id: &str,
        tipo: NotificacaoTipo,
        titulo: &str,
        mensagem: &str,
    ) -> Result<notificacao::Model, InternalError> {
        notificacao::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            usuario_id: Set(usuario_id.to_string()),
            tipo: Set(tipo),
            titulo: Set(titulo.to_string()),
            mensagem: Set(mensagem.to_string()),
            lida: Set(false),
            created_at: Set(Utc::now().timestamp()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| InternalError::database("insert_notificacao", e))
    }

    pub async fn list(
        &self,
        usuario_id: &str,
        lida: Option<bool>,
        tipo: Option<NotificacaoTipo>,
        page: PageParams,
    ) -> Result<(Vec<notificacao::Model>, u64), InternalError> {
        let mut query =
            notificacao::Entity::find().filter(notificacao::Column::UsuarioId.eq(usuario_id));
        if let Some(lida) = lida {
            query = query.filter(notificacao::Column::Lida.eq(lida));
        }
        if let Some(tipo) = tipo {
            query = query.filter(notificacao::Column::Tipo.eq(tipo));
        }

        let total = query
            .clone()
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("list_notificacoes_count", e))?;

        let notificacoes = query
            .order_by_desc(notificacao::Column::CreatedAt)
            .offset(page.skip())
            .limit(page.limit)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_notificacoes", e))?;

        Ok((notificacoes, total))
    }

    pub async fn find_by_id(
        &self,
        id: &str,
    ) -> Result<Option<notificacao::Model>, InternalError> {
        notificacao::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_notificacao", e))
    }

    pub async fn mark_read(
        &self,
        target: notificacao::Model,
    ) -> Result<notificacao::Model, InternalError> {
        let mut active: notificacao::ActiveModel = target.into();
        active.lida = Set(true);
        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("mark_read", e))
    }

    pub async fn mark_all_read(&self, usuario_id: &str) -> Result<u64, InternalError> {
        let result = notificacao::Entity::update_many()
            .col_expr(notificacao::Column::Lida, sea_orm::prelude::Expr::value(true))
            .filter(notificacao::Column::UsuarioId.eq(usuario_id))
            .filter(notificacao::Column::Lida.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("mark_all_read", e))?;
        Ok(result.rows_affected)
    }

    pub async fn delete(&self, id: &str) -> Result<(), InternalError> {
        notificacao::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_notificacao", e))?;
        Ok(())
    }

    pub async fn unread_count(&self, usuario_id: &str) -> Result<u64, InternalError> {
        notificacao::Entity::find()
            .filter(notificacao::Column::UsuarioId.eq(usuario_id))
            .filter(notificacao::Column::Lida.eq(false))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("unread_count", e))
    }
}
