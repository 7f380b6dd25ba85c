use sea_orm::entity::prelude::*;

use crate::types::enums::{UserStatus, UserTipo};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub nome: String,
    #[sea_orm(unique)]
    pub cpf: String,
    #[sea_orm(unique)]
    pub email: String,
    pub senha_hash: String,
    pub telefone: Option<String>,
    pub tipo: UserTipo,
    pub status: UserStatus,
    pub is_super_admin: bool,
    pub foto_perfil: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::ocorrencia::Entity")]
    Ocorrencias,
    #[sea_orm(has_many = "super::notificacao::Entity")]
    Notificacoes,
    #[sea_orm(has_many = "super::password_reset_token::Entity")]
    PasswordResetTokens,
}

impl Related<super::ocorrencia::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ocorrencias.def()
    }
}

impl Related<super::notificacao::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notificacoes.def()
    }
}

impl Related<super::password_reset_token::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PasswordResetTokens.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
