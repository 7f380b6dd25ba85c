use sea_orm::entity::prelude::*;

/// Trilha de auditoria de uma ocorrência. Append-only: nunca atualizado nem
/// deletado individualmente, apenas em cascata com a ocorrência. O id
/// auto-incremental é a ordem de inserção.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "historicos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(indexed)]
    pub ocorrencia_id: String,
    pub usuario_id: String,
    pub acao: String,
    pub comentario: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ocorrencia::Entity",
        from = "Column::OcorrenciaId",
        to = "super::ocorrencia::Column::Id",
        on_delete = "Cascade"
    )]
    Ocorrencia,
}

impl Related<super::ocorrencia::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ocorrencia.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
