use std::sync::Arc;

use poem_openapi::param::{Header, Path, Query};
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::api::auth::BearerAuth;
use crate::api::helpers::{authenticate, read_image, require_csrf};
use crate::errors::OcorrenciaError;
use crate::services::{
    CreateOcorrenciaInput, CsrfStore, OcorrenciaService, PhotoPayload, TokenService,
};
use crate::stores::{OcorrenciaFilters, UserStore};
use crate::types::dto::common::{MessageResponse, PageParams};
use crate::types::dto::ocorrencia::{
    CreateOcorrenciaForm, OcorrenciaDetalheResponse, OcorrenciaListResponse, OcorrenciaResponse,
    OcorrenciaStatsResponse, UpdateStatusRequest,
};
use crate::types::enums::{OcorrenciaCategoria, OcorrenciaStatus};
use crate::types::internal::Actor;

const MAX_FOTOS: usize = 5;
const DEFAULT_PAGE_SIZE: u64 = 20;

#[derive(Tags)]
enum OcorrenciaTags {
    /// Registro e triagem de ocorrências
    Ocorrencias,
}

/// Incident endpoints: creation with photos by vereadores, listing and
/// detail under ownership rules, triage by jurídico/admin.
pub struct OcorrenciaApi {
    ocorrencias: Arc<OcorrenciaService>,
    user_store: Arc<UserStore>,
    tokens: Arc<TokenService>,
    csrf: Arc<dyn CsrfStore>,
}

impl OcorrenciaApi {
    pub fn new(
        ocorrencias: Arc<OcorrenciaService>,
        user_store: Arc<UserStore>,
        tokens: Arc<TokenService>,
        csrf: Arc<dyn CsrfStore>,
    ) -> Self {
        Self {
            ocorrencias,
            user_store,
            tokens,
            csrf,
        }
    }

    async fn actor(&self, auth: &BearerAuth) -> Result<Actor, OcorrenciaError> {
        Ok(authenticate(&self.tokens, &self.user_store, auth.bearer()).await?)
    }
}

#[OpenApi(prefix_path = "/ocorrencias")]
impl OcorrenciaApi {
    /// Registra uma ocorrência com até 5 fotos (multipart)
    #[oai(path = "/", method = "post", tag = "OcorrenciaTags::Ocorrencias")]
    async fn create(
        &self,
        auth: BearerAuth,
        #[oai(name = "X-CSRF-Token")] csrf: Header<Option<String>>,
        form: CreateOcorrenciaForm,
    ) -> Result<Json<OcorrenciaResponse>, OcorrenciaError> {
        let actor = self.actor(&auth).await?;
        require_csrf(self.csrf.as_ref(), csrf.0.as_deref(), &actor).await?;

        if form.fotos.len() > MAX_FOTOS {
            return Err(OcorrenciaError::validation("Máximo de 5 fotos por ocorrência"));
        }

        let mut fotos = Vec::with_capacity(form.fotos.len());
        for upload in form.fotos {
            let (data, content_type) = read_image(upload)
                .await
                .map_err(OcorrenciaError::validation)?;
            fotos.push(PhotoPayload { data, content_type });
        }

        let input = CreateOcorrenciaInput {
            titulo: form.titulo,
            descricao: form.descricao,
            categoria: form.categoria,
            endereco: form.endereco,
            latitude: form.latitude,
            longitude: form.longitude,
            prioridade: form.prioridade,
        };

        let created = self.ocorrencias.create(&actor, input, fotos).await?;
        Ok(Json(created))
    }

    /// Lista paginada. Vereadores veem somente as próprias ocorrências.
    #[oai(path = "/", method = "get", tag = "OcorrenciaTags::Ocorrencias")]
    #[allow(clippy::too_many_arguments)]
    async fn list(
        &self,
        auth: BearerAuth,
        status: Query<Option<OcorrenciaStatus>>,
        categoria: Query<Option<OcorrenciaCategoria>>,
        vereador_id: Query<Option<String>>,
        page: Query<Option<u64>>,
        limit: Query<Option<u64>>,
    ) -> Result<Json<OcorrenciaListResponse>, OcorrenciaError> {
        let actor = self.actor(&auth).await?;

        let filters = OcorrenciaFilters {
            status: status.0,
            categoria: categoria.0,
            vereador_id: vereador_id.0,
        };
        let page = PageParams::clamp(page.0, limit.0, DEFAULT_PAGE_SIZE);

        let response = self.ocorrencias.list(&actor, filters, page).await?;
        Ok(Json(response))
    }

    /// Totais por status e categoria (jurídico e admin)
    #[oai(path = "/stats", method = "get", tag = "OcorrenciaTags::Ocorrencias")]
    async fn stats(
        &self,
        auth: BearerAuth,
    ) -> Result<Json<OcorrenciaStatsResponse>, OcorrenciaError> {
        let actor = self.actor(&auth).await?;
        let response = self.ocorrencias.stats(&actor).await?;
        Ok(Json(response))
    }

    /// Detalhe com fotos e histórico
    #[oai(path = "/:id", method = "get", tag = "OcorrenciaTags::Ocorrencias")]
    async fn get(
        &self,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<OcorrenciaDetalheResponse>, OcorrenciaError> {
        let actor = self.actor(&auth).await?;
        let response = self.ocorrencias.get_by_id(&actor, &id.0).await?;
        Ok(Json(response))
    }

    /// Altera o status (jurídico e admin), registrando histórico e
    /// notificando o vereador
    #[oai(path = "/:id/status", method = "patch", tag = "OcorrenciaTags::Ocorrencias")]
    async fn update_status(
        &self,
        auth: BearerAuth,
        #[oai(name = "X-CSRF-Token")] csrf: Header<Option<String>>,
        id: Path<String>,
        body: Json<UpdateStatusRequest>,
    ) -> Result<Json<OcorrenciaResponse>, OcorrenciaError> {
        let actor = self.actor(&auth).await?;
        require_csrf(self.csrf.as_ref(), csrf.0.as_deref(), &actor).await?;

        let response = self.ocorrencias.update_status(&actor, &id.0, body.0).await?;
        Ok(Json(response))
    }

    /// Remove a ocorrência e suas fotos
    #[oai(path = "/:id", method = "delete", tag = "OcorrenciaTags::Ocorrencias")]
    async fn delete(
        &self,
        auth: BearerAuth,
        #[oai(name = "X-CSRF-Token")] csrf: Header<Option<String>>,
        id: Path<String>,
    ) -> Result<Json<MessageResponse>, OcorrenciaError> {
        let actor = self.actor(&auth).await?;
        require_csrf(self.csrf.as_ref(), csrf.0.as_deref(), &actor).await?;

        self.ocorrencias.delete(&actor, &id.0).await?;
        Ok(Json(MessageResponse::new("Ocorrência deletada com sucesso")))
    }
}
