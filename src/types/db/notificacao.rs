use sea_orm::entity::prelude::*;

use crate::types::enums::NotificacaoTipo;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "notificacoes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(indexed)]
    pub usuario_id: String,
    pub tipo: NotificacaoTipo,
    pub titulo: String,
    pub mensagem: String,
    pub lida: bool,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UsuarioId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Usuario,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Usuario.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
