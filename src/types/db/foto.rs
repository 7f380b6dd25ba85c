use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fotos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(indexed)]
    pub ocorrencia_id: String,
    pub url_foto: String,
    pub thumbnail_url: String,
    // Opaque identifier the object storage needs for deletion
    pub storage_id: String,
    pub ordem: i32,
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
