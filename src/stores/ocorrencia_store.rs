use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::providers::StoredImage;
use crate::types::db::{foto, historico, notificacao, ocorrencia, user};
use crate::types::dto::common::PageParams;
use crate::types::enums::{
    NotificacaoTipo, OcorrenciaCategoria, OcorrenciaPrioridade, OcorrenciaStatus,
};

pub struct NewOcorrencia {
    pub titulo: String,
    pub descricao: String,
    pub categoria: OcorrenciaCategoria,
    pub endereco: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub prioridade: OcorrenciaPrioridade,
    pub vereador_id: String,
}

#[derive(Debug, Default, Clone)]
pub struct OcorrenciaFilters {
    pub status: Option<OcorrenciaStatus>,
    pub categoria: Option<OcorrenciaCategoria>,
    /// Forced to the caller's own id for vereadores before reaching the store
    pub vereador_id: Option<String>,
}

#[derive(Debug)]
pub struct OcorrenciaStats {
    pub total: u64,
    pub pendentes: u64,
    pub em_analise: u64,
    pub resolvidas: u64,
    pub rejeitadas: u64,
    pub por_categoria: Vec<(OcorrenciaCategoria, u64)>,
}

/// Data access for incidents and their owned photo/audit rows.
///
/// The multi-row write groups (create, status change) run inside a single
/// transaction so an incident is never visible without its CRIADA audit
/// entry or with half its photos.
pub struct OcorrenciaStore {
    db: DatabaseConnection,
}

impl OcorrenciaStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create the incident, its photo rows (input order preserved as `ordem`)
    /// and the CRIADA audit entry atomically. Blob uploads happened before
    /// this call; the caller compensates storage on failure.
    pub async fn create(
        &self,
        new: NewOcorrencia,
        fotos: &[StoredImage],
    ) -> Result<ocorrencia::Model, InternalError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InternalError::database("create_ocorrencia_begin", e))?;

        let now = Utc::now().timestamp();
        let ocorrencia_id = Uuid::new_v4().to_string();
        let vereador_id = new.vereador_id.clone();

        let created = ocorrencia::ActiveModel {
            id: Set(ocorrencia_id.clone()),
            titulo: Set(new.titulo),
            descricao: Set(new.descricao),
            categoria: Set(new.categoria),
            endereco: Set(new.endereco),
            latitude: Set(new.latitude),
            longitude: Set(new.longitude),
            prioridade: Set(new.prioridade),
            status: Set(OcorrenciaStatus::Pendente),
            vereador_id: Set(new.vereador_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| InternalError::database("create_ocorrencia", e))?;

        if !fotos.is_empty() {
            let rows = fotos.iter().enumerate().map(|(ordem, f)| foto::ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                ocorrencia_id: Set(ocorrencia_id.clone()),
                url_foto: Set(f.url.clone()),
                thumbnail_url: Set(f.thumbnail_url.clone()),
                storage_id: Set(f.storage_id.clone()),
                ordem: Set(ordem as i32),
                created_at: Set(now),
            });
            foto::Entity::insert_many(rows)
                .exec(&txn)
                .await
                .map_err(|e| InternalError::database("create_fotos", e))?;
        }

        historico::ActiveModel {
            ocorrencia_id: Set(ocorrencia_id),
            usuario_id: Set(vereador_id),
            acao: Set("CRIADA".to_string()),
            comentario: Set(Some("Ocorrência criada".to_string())),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| InternalError::database("create_historico", e))?;

        txn.commit()
            .await
            .map_err(|e| InternalError::database("create_ocorrencia_commit", e))?;

        Ok(created)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<ocorrencia::Model>, InternalError> {
        ocorrencia::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_ocorrencia", e))
    }

    pub async fn list(
        &self,
        filters: &OcorrenciaFilters,
        page: PageParams,
    ) -> Result<(Vec<ocorrencia::Model>, u64), InternalError> {
        let mut query = ocorrencia::Entity::find();
        if let Some(status) = filters.status {
            query = query.filter(ocorrencia::Column::Status.eq(status));
        }
        if let Some(categoria) = filters.categoria {
            query = query.filter(ocorrencia::Column::Categoria.eq(categoria));
        }
        if let Some(vereador_id) = &filters.vereador_id {
            query = query.filter(ocorrencia::Column::VereadorId.eq(vereador_id));
        }

        let total = query
            .clone()
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("list_ocorrencias_count", e))?;

        let ocorrencias = query
            .order_by_desc(ocorrencia::Column::CreatedAt)
            .offset(page.skip())
            .limit(page.limit)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_ocorrencias", e))?;

        Ok((ocorrencias, total))
    }

    /// Photos of one incident, input order preserved
    pub async fn fotos_of(&self, ocorrencia_id: &str) -> Result<Vec<foto::Model>, InternalError> {
        foto::Entity::find()
            .filter(foto::Column::OcorrenciaId.eq(ocorrencia_id))
            .order_by_asc(foto::Column::Ordem)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("fotos_of", e))
    }

    /// Batched photo lookup for a listing page, grouped by incident
    pub async fn fotos_for(
        &self,
        ocorrencia_ids: &[String],
    ) -> Result<HashMap<String, Vec<foto::Model>>, InternalError> {
        if ocorrencia_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let fotos = foto::Entity::find()
            .filter(foto::Column::OcorrenciaId.is_in(ocorrencia_ids.iter().cloned()))
            .order_by_asc(foto::Column::Ordem)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("fotos_for", e))?;

        let mut grouped: HashMap<String, Vec<foto::Model>> = HashMap::new();
        for f in fotos {
            grouped.entry(f.ocorrencia_id.clone()).or_default().push(f);
        }
        Ok(grouped)
    }

    /// Reporter (nome, email) pairs for a set of user ids
    pub async fn reporters_for(
        &self,
        user_ids: &[String],
    ) -> Result<HashMap<String, (String, String)>, InternalError> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let users = user::Entity::find()
            .filter(user::Column::Id.is_in(user_ids.iter().cloned()))
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("reporters_for", e))?;

        Ok(users
            .into_iter()
            .map(|u| (u.id, (u.nome, u.email)))
            .collect())
    }

    /// Audit trail of one incident, most recent first, with actor summaries.
    /// Ordered by the auto-increment id: created_at has second resolution
    /// and ties whenever two entries land in the same second.
    pub async fn historicos_of(
        &self,
        ocorrencia_id: &str,
    ) -> Result<Vec<(historico::Model, Option<user::Model>)>, InternalError> {
        let historicos = historico::Entity::find()
            .filter(historico::Column::OcorrenciaId.eq(ocorrencia_id))
            .order_by_desc(historico::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("historicos_of", e))?;

        let usuario_ids: Vec<String> = historicos.iter().map(|h| h.usuario_id.clone()).collect();
        let usuarios: HashMap<String, user::Model> = if usuario_ids.is_empty() {
            HashMap::new()
        } else {
            user::Entity::find()
                .filter(user::Column::Id.is_in(usuario_ids))
                .all(&self.db)
                .await
                .map_err(|e| InternalError::database("historicos_usuarios", e))?
                .into_iter()
                .map(|u| (u.id.clone(), u))
                .collect()
        };

        Ok(historicos
            .into_iter()
            .map(|h| {
                let usuario = usuarios.get(&h.usuario_id).cloned();
                (h, usuario)
            })
            .collect())
    }

    /// Status change, STATUS_ALTERADO_<S> audit entry and reporter
    /// notification in one transaction.
    pub async fn update_status(
        &self,
        target: ocorrencia::Model,
        new_status: OcorrenciaStatus,
        comentario: Option<String>,
        actor_id: &str,
    ) -> Result<ocorrencia::Model, InternalError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InternalError::database("update_status_begin", e))?;

        let now = Utc::now().timestamp();
        let ocorrencia_id = target.id.clone();
        let vereador_id = target.vereador_id.clone();
        let titulo = target.titulo.clone();

        let mut active: ocorrencia::ActiveModel = target.into();
        active.status = Set(new_status);
        active.updated_at = Set(now);
        let updated = active
            .update(&txn)
            .await
            .map_err(|e| InternalError::database("update_status", e))?;

        historico::ActiveModel {
            ocorrencia_id: Set(ocorrencia_id),
            usuario_id: Set(actor_id.to_string()),
            acao: Set(format!("STATUS_ALTERADO_{}", new_status.as_str())),
            comentario: Set(Some(comentario.unwrap_or_else(|| {
                format!("Status alterado para {}", new_status.as_str())
            }))),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| InternalError::database("update_status_historico", e))?;

        notificacao::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            usuario_id: Set(vereador_id),
            tipo: Set(NotificacaoTipo::StatusAlterado),
            titulo: Set("Status da Ocorrência Atualizado".to_string()),
            mensagem: Set(format!(
                "Sua ocorrência \"{}\" teve o status alterado para {}",
                titulo,
                new_status.as_str()
            )),
            lida: Set(false),
            created_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| InternalError::database("update_status_notificacao", e))?;

        txn.commit()
            .await
            .map_err(|e| InternalError::database("update_status_commit", e))?;

        Ok(updated)
    }

    /// Row delete only; foto/historico rows cascade, blobs are the caller's
    /// responsibility.
    pub async fn delete(&self, id: &str) -> Result<(), InternalError> {
        ocorrencia::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_ocorrencia", e))?;
        Ok(())
    }

    pub async fn stats(&self) -> Result<OcorrenciaStats, InternalError> {
        let count_status = |status: OcorrenciaStatus| {
            ocorrencia::Entity::find()
                .filter(ocorrencia::Column::Status.eq(status))
                .count(&self.db)
        };

        let total = ocorrencia::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("stats_total", e))?;
        let pendentes = count_status(OcorrenciaStatus::Pendente)
            .await
            .map_err(|e| InternalError::database("stats_pendentes", e))?;
        let em_analise = count_status(OcorrenciaStatus::EmAnalise)
            .await
            .map_err(|e| InternalError::database("stats_em_analise", e))?;
        let resolvidas = count_status(OcorrenciaStatus::Resolvido)
            .await
            .map_err(|e| InternalError::database("stats_resolvidas", e))?;
        let rejeitadas = count_status(OcorrenciaStatus::Rejeitado)
            .await
            .map_err(|e| InternalError::database("stats_rejeitadas", e))?;

        let por_categoria: Vec<(OcorrenciaCategoria, i64)> = ocorrencia::Entity::find()
            .select_only()
            .column(ocorrencia::Column::Categoria)
            .column_as(ocorrencia::Column::Id.count(), "count")
            .group_by(ocorrencia::Column::Categoria)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("stats_por_categoria", e))?;

        Ok(OcorrenciaStats {
            total,
            pendentes,
            em_analise,
            resolvidas,
            rejeitadas,
            por_categoria: por_categoria
                .into_iter()
                .map(|(c, n)| (c, n as u64))
                .collect(),
        })
    }
}
