use std::sync::Arc;

use futures::future::join_all;

use crate::errors::OcorrenciaError;
use crate::providers::{send_best_effort, Mailer, ObjectStorage, StoredImage};
use crate::services::access_control::{allowed, Action};
use crate::stores::{NewOcorrencia, OcorrenciaFilters, OcorrenciaStore, UserStore};
use crate::types::dto::common::PageParams;
use crate::types::dto::ocorrencia::{
    CategoriaCount, HistoricoResponse, OcorrenciaDetalheResponse, OcorrenciaListResponse,
    OcorrenciaResponse, OcorrenciaStatsResponse, ReporterSummary, UpdateStatusRequest,
};
use crate::types::enums::{OcorrenciaCategoria, OcorrenciaPrioridade, OcorrenciaStatus, UserTipo};
use crate::types::internal::Actor;

/// Decoded multipart image, ready for the blob store
pub struct PhotoPayload {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Incident fields as accepted from the create form
pub struct CreateOcorrenciaInput {
    pub titulo: String,
    pub descricao: String,
    pub categoria: Option<OcorrenciaCategoria>,
    pub endereco: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub prioridade: Option<OcorrenciaPrioridade>,
}

/// Incident lifecycle: creation with photos, listing under ownership rules,
/// triage status changes and deletion.
///
/// Photo blobs are uploaded before the database transaction; when the
/// transaction fails the already-stored blobs are deleted best-effort so the
/// store does not accumulate orphans.
pub struct OcorrenciaService {
    ocorrencias: Arc<OcorrenciaStore>,
    users: Arc<UserStore>,
    storage: Arc<dyn ObjectStorage>,
    mailer: Arc<dyn Mailer>,
}

impl OcorrenciaService {
    pub fn new(
        ocorrencias: Arc<OcorrenciaStore>,
        users: Arc<UserStore>,
        storage: Arc<dyn ObjectStorage>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            ocorrencias,
            users,
            storage,
            mailer,
        }
    }

    pub async fn create(
        &self,
        actor: &Actor,
        input: CreateOcorrenciaInput,
        fotos: Vec<PhotoPayload>,
    ) -> Result<OcorrenciaResponse, OcorrenciaError> {
        if !allowed(actor, &Action::CreateOcorrencia) {
            return Err(OcorrenciaError::only_vereador());
        }

        let titulo = input.titulo.trim().to_string();
        let descricao = input.descricao.trim().to_string();
        let endereco = input.endereco.trim().to_string();
        if titulo.is_empty() || descricao.is_empty() || endereco.is_empty() {
            return Err(OcorrenciaError::validation(
                "Título, descrição e endereço são obrigatórios",
            ));
        }
        if let Some(lat) = input.latitude {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(OcorrenciaError::validation(
                    "Latitude deve estar entre -90 e 90",
                ));
            }
        }
        if let Some(lon) = input.longitude {
            if !(-180.0..=180.0).contains(&lon) {
                return Err(OcorrenciaError::validation(
                    "Longitude deve estar entre -180 e 180",
                ));
            }
        }

        let stored = self.upload_all(fotos).await?;

        let new = NewOcorrencia {
            titulo,
            descricao,
            categoria: input.categoria.unwrap_or(OcorrenciaCategoria::Outros),
            endereco,
            latitude: input.latitude,
            longitude: input.longitude,
            prioridade: input.prioridade.unwrap_or(OcorrenciaPrioridade::Media),
            vereador_id: actor.id.clone(),
        };

        let created = match self.ocorrencias.create(new, &stored).await {
            Ok(created) => created,
            Err(e) => {
                self.compensate_uploads(&stored).await;
                return Err(e.into());
            }
        };

        self.notify_juridico(&created.titulo, &created.endereco)
            .await;

        let fotos = self.ocorrencias.fotos_of(&created.id).await?;
        let vereador = self
            .users
            .find_by_id(&actor.id)
            .await?
            .map(|u| ReporterSummary {
                nome: u.nome,
                email: u.email,
            });

        Ok(OcorrenciaResponse::from_model(created, fotos, vereador))
    }

    /// Upload every image concurrently. On any failure the successful
    /// uploads are rolled back before the error propagates.
    async fn upload_all(
        &self,
        fotos: Vec<PhotoPayload>,
    ) -> Result<Vec<StoredImage>, OcorrenciaError> {
        let uploads = fotos
            .into_iter()
            .map(|f| async move { self.storage.upload_image(f.data, &f.content_type).await });
        let results = join_all(uploads).await;

        let mut stored = Vec::with_capacity(results.len());
        let mut failure = None;
        for result in results {
            match result {
                Ok(image) => stored.push(image),
                Err(e) => failure = Some(e),
            }
        }

        if let Some(e) = failure {
            self.compensate_uploads(&stored).await;
            return Err(e.into());
        }
        Ok(stored)
    }

    /// Best-effort blob cleanup after a failed create
    async fn compensate_uploads(&self, stored: &[StoredImage]) {
        let deletes = stored.iter().map(|s| {
            let storage_id = s.storage_id.clone();
            async move {
                if let Err(e) = self.storage.delete_image(&storage_id).await {
                    tracing::warn!(storage_id, "orphan blob cleanup failed: {e}");
                }
            }
        });
        join_all(deletes).await;
    }

    /// New-incident notice to every active jurídico reviewer, best effort
    async fn notify_juridico(&self, titulo: &str, endereco: &str) {
        let emails = match self.users.active_juridico_emails().await {
            Ok(emails) => emails,
            Err(e) => {
                tracing::warn!("could not load jurídico recipients: {e}");
                return;
            }
        };

        let body = format!(
            "Uma nova ocorrência foi registrada e aguarda análise.\n\n\
             Título: {titulo}\nEndereço: {endereco}"
        );
        let sends = emails
            .iter()
            .map(|to| send_best_effort(self.mailer.as_ref(), to, "Nova Ocorrência Registrada", &body));
        join_all(sends).await;
    }

    /// Page of incidents. Vereadores are pinned to their own records no
    /// matter what filter they send.
    pub async fn list(
        &self,
        actor: &Actor,
        mut filters: OcorrenciaFilters,
        page: PageParams,
    ) -> Result<OcorrenciaListResponse, OcorrenciaError> {
        if actor.tipo == UserTipo::Vereador {
            filters.vereador_id = Some(actor.id.clone());
        }

        let (models, total) = self.ocorrencias.list(&filters, page).await?;

        let ids: Vec<String> = models.iter().map(|o| o.id.clone()).collect();
        let vereador_ids: Vec<String> = models.iter().map(|o| o.vereador_id.clone()).collect();
        let mut fotos_by_id = self.ocorrencias.fotos_for(&ids).await?;
        let reporters = self.ocorrencias.reporters_for(&vereador_ids).await?;

        let ocorrencias = models
            .into_iter()
            .map(|o| {
                let fotos = fotos_by_id.remove(&o.id).unwrap_or_default();
                let vereador = reporters.get(&o.vereador_id).map(|(nome, email)| {
                    ReporterSummary {
                        nome: nome.clone(),
                        email: email.clone(),
                    }
                });
                OcorrenciaResponse::from_model(o, fotos, vereador)
            })
            .collect();

        Ok(OcorrenciaListResponse {
            ocorrencias,
            pagination: crate::types::dto::common::PaginationMeta::new(
                page.page, page.limit, total,
            ),
        })
    }

    /// Full detail with photos and audit trail. Existence is checked before
    /// ownership, so a vereador probing someone else's id gets 403, not 404.
    pub async fn get_by_id(
        &self,
        actor: &Actor,
        id: &str,
    ) -> Result<OcorrenciaDetalheResponse, OcorrenciaError> {
        let model = self
            .ocorrencias
            .find_by_id(id)
            .await?
            .ok_or_else(OcorrenciaError::not_found)?;

        if !allowed(
            actor,
            &Action::ViewOcorrencia {
                owner_id: &model.vereador_id,
            },
        ) {
            return Err(OcorrenciaError::access_denied());
        }

        let fotos = self.ocorrencias.fotos_of(&model.id).await?;
        let vereador = self
            .users
            .find_by_id(&model.vereador_id)
            .await?
            .map(|u| ReporterSummary {
                nome: u.nome,
                email: u.email,
            });

        let historicos = self
            .ocorrencias
            .historicos_of(&model.id)
            .await?
            .into_iter()
            .map(|(h, usuario)| {
                let (nome, tipo) = usuario
                    .map(|u| (u.nome, u.tipo))
                    .unwrap_or_else(|| ("Usuário removido".to_string(), UserTipo::Vereador));
                HistoricoResponse::from_model(h, nome, tipo)
            })
            .collect();

        Ok(OcorrenciaDetalheResponse {
            ocorrencia: OcorrenciaResponse::from_model(model, fotos, vereador),
            historicos,
        })
    }

    /// Triage status change. Records the audit entry and notifies the
    /// reporting vereador in the same transaction as the write.
    pub async fn update_status(
        &self,
        actor: &Actor,
        id: &str,
        req: UpdateStatusRequest,
    ) -> Result<OcorrenciaResponse, OcorrenciaError> {
        let model = self
            .ocorrencias
            .find_by_id(id)
            .await?
            .ok_or_else(OcorrenciaError::not_found)?;

        if !allowed(actor, &Action::UpdateOcorrenciaStatus) {
            return Err(OcorrenciaError::access_denied());
        }

        // PENDENTE is the birth state; triage never moves an incident back
        if req.status == OcorrenciaStatus::Pendente {
            return Err(OcorrenciaError::validation("Status inválido"));
        }

        let updated = self
            .ocorrencias
            .update_status(model, req.status, req.comentario, &actor.id)
            .await?;

        let fotos = self.ocorrencias.fotos_of(&updated.id).await?;
        let vereador = self
            .users
            .find_by_id(&updated.vereador_id)
            .await?
            .map(|u| ReporterSummary {
                nome: u.nome,
                email: u.email,
            });

        Ok(OcorrenciaResponse::from_model(updated, fotos, vereador))
    }

    /// Delete the incident row (photo and audit rows cascade) and then the
    /// photo blobs, best effort.
    pub async fn delete(&self, actor: &Actor, id: &str) -> Result<(), OcorrenciaError> {
        let model = self
            .ocorrencias
            .find_by_id(id)
            .await?
            .ok_or_else(OcorrenciaError::not_found)?;

        if !allowed(
            actor,
            &Action::DeleteOcorrencia {
                owner_id: &model.vereador_id,
                status: model.status,
            },
        ) {
            // Owners hitting the status rule get the specific message
            if actor.tipo == UserTipo::Vereador && actor.id == model.vereador_id {
                return Err(OcorrenciaError::only_pendente_deletable());
            }
            return Err(OcorrenciaError::access_denied());
        }

        let fotos = self.ocorrencias.fotos_of(&model.id).await?;
        self.ocorrencias.delete(&model.id).await?;

        let deletes = fotos.iter().map(|f| {
            let storage_id = f.storage_id.clone();
            async move {
                if let Err(e) = self.storage.delete_image(&storage_id).await {
                    tracing::warn!(storage_id, "blob delete failed after row delete: {e}");
                }
            }
        });
        join_all(deletes).await;

        Ok(())
    }

    pub async fn stats(&self, actor: &Actor) -> Result<OcorrenciaStatsResponse, OcorrenciaError> {
        if !allowed(actor, &Action::ViewStats) {
            return Err(OcorrenciaError::access_denied());
        }

        let stats = self.ocorrencias.stats().await?;
        Ok(OcorrenciaStatsResponse {
            total: stats.total,
            pendentes: stats.pendentes,
            em_analise: stats.em_analise,
            resolvidas: stats.resolvidas,
            rejeitadas: stats.rejeitadas,
            por_categoria: stats
                .por_categoria
                .into_iter()
                .map(|(categoria, count)| CategoriaCount { categoria, count })
                .collect(),
        })
    }
}
