use poem_openapi::Object;

use crate::types::db::notificacao;
use crate::types::enums::NotificacaoTipo;

use super::common::PaginationMeta;

#[derive(Object, Debug)]
pub struct NotificacaoResponse {
    pub id: String,
    pub tipo: NotificacaoTipo,
    pub titulo: String,
    pub mensagem: String,
    pub lida: bool,
    pub created_at: i64,
}

impl From<notificacao::Model> for NotificacaoResponse {
    fn from(n: notificacao::Model) -> Self {
        Self {
            id: n.id,
            tipo: n.tipo,
            titulo: n.titulo,
            mensagem: n.mensagem,
            lida: n.lida,
            created_at: n.created_at,
        }
    }
}

#[derive(Object, Debug)]
pub struct NotificacaoListResponse {
    pub notificacoes: Vec<NotificacaoResponse>,
    pub pagination: PaginationMeta,
}

#[derive(Object, Debug)]
pub struct UnreadCountResponse {
    pub unread: u64,
}
