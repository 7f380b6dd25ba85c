use poem_openapi::types::multipart::Upload;
use poem_openapi::{Multipart, Object};

use crate::types::db::{foto, historico, ocorrencia};
use crate::types::enums::{
    OcorrenciaCategoria, OcorrenciaPrioridade, OcorrenciaStatus, UserTipo,
};

use super::common::PaginationMeta;

/// Formulário multipart de criação de ocorrência: campos + até 5 imagens
#[derive(Multipart, Debug)]
pub struct CreateOcorrenciaForm {
    pub titulo: String,
    pub descricao: String,
    pub categoria: Option<OcorrenciaCategoria>,
    pub endereco: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub prioridade: Option<OcorrenciaPrioridade>,
    pub fotos: Vec<Upload>,
}

#[derive(Object, Debug)]
pub struct FotoResponse {
    pub id: String,
    pub url_foto: String,
    pub thumbnail_url: String,
    pub ordem: i32,
}

impl From<foto::Model> for FotoResponse {
    fn from(f: foto::Model) -> Self {
        Self {
            id: f.id,
            url_foto: f.url_foto,
            thumbnail_url: f.thumbnail_url,
            ordem: f.ordem,
        }
    }
}

/// Resumo do vereador embutido nas respostas de ocorrência
#[derive(Object, Debug, Clone)]
pub struct ReporterSummary {
    pub nome: String,
    pub email: String,
}

#[derive(Object, Debug)]
pub struct HistoricoResponse {
    pub id: i64,
    pub acao: String,
    pub comentario: Option<String>,
    pub usuario_nome: String,
    pub usuario_tipo: UserTipo,
    pub created_at: i64,
}

impl HistoricoResponse {
    pub fn from_model(h: historico::Model, usuario_nome: String, usuario_tipo: UserTipo) -> Self {
        Self {
            id: h.id,
            acao: h.acao,
            comentario: h.comentario,
            usuario_nome,
            usuario_tipo,
            created_at: h.created_at,
        }
    }
}

#[derive(Object, Debug)]
pub struct OcorrenciaResponse {
    pub id: String,
    pub titulo: String,
    pub descricao: String,
    pub categoria: OcorrenciaCategoria,
    pub endereco: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub prioridade: OcorrenciaPrioridade,
    pub status: OcorrenciaStatus,
    pub vereador_id: String,
    pub vereador: Option<ReporterSummary>,
    pub fotos: Vec<FotoResponse>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl OcorrenciaResponse {
    pub fn from_model(
        o: ocorrencia::Model,
        fotos: Vec<foto::Model>,
        vereador: Option<ReporterSummary>,
    ) -> Self {
        Self {
            id: o.id,
            titulo: o.titulo,
            descricao: o.descricao,
            categoria: o.categoria,
            endereco: o.endereco,
            latitude: o.latitude,
            longitude: o.longitude,
            prioridade: o.prioridade,
            status: o.status,
            vereador_id: o.vereador_id,
            vereador,
            fotos: fotos.into_iter().map(FotoResponse::from).collect(),
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}

/// Detalhe completo: ocorrência + fotos ordenadas + histórico (mais recente primeiro)
#[derive(Object, Debug)]
pub struct OcorrenciaDetalheResponse {
    pub ocorrencia: OcorrenciaResponse,
    pub historicos: Vec<HistoricoResponse>,
}

#[derive(Object, Debug)]
pub struct OcorrenciaListResponse {
    pub ocorrencias: Vec<OcorrenciaResponse>,
    pub pagination: PaginationMeta,
}

#[derive(Object, Debug)]
pub struct UpdateStatusRequest {
    pub status: OcorrenciaStatus,
    pub comentario: Option<String>,
}

#[derive(Object, Debug)]
pub struct CategoriaCount {
    pub categoria: OcorrenciaCategoria,
    pub count: u64,
}

#[derive(Object, Debug)]
pub struct OcorrenciaStatsResponse {
    pub total: u64,
    pub pendentes: u64,
    pub em_analise: u64,
    pub resolvidas: u64,
    pub rejeitadas: u64,
    pub por_categoria: Vec<CategoriaCount>,
}
