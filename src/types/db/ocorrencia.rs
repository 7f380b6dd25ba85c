use sea_orm::entity::prelude::*;

use crate::types::enums::{OcorrenciaCategoria, OcorrenciaPrioridade, OcorrenciaStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ocorrencias")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub titulo: String,
    pub descricao: String,
    pub categoria: OcorrenciaCategoria,
    pub endereco: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub prioridade: OcorrenciaPrioridade,
    pub status: OcorrenciaStatus,
    // Immutable after creation; only the owning vereador ever appears here
    #[sea_orm(indexed)]
    pub vereador_id: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::VereadorId",
        to = "super::user::Column::Id",
        on_delete = "Restrict"
    )]
    Vereador,
    #[sea_orm(has_many = "super::foto::Entity")]
    Fotos,
    #[sea_orm(has_many = "super::historico::Entity")]
    Historicos,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vereador.def()
    }
}

impl Related<super::foto::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fotos.def()
    }
}

impl Related<super::historico::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Historicos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
