use poem_openapi::Enum;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Papel do usuário no sistema
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Enum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[oai(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserTipo {
    #[sea_orm(string_value = "ADMIN")]
    Admin,
    #[sea_orm(string_value = "VEREADOR")]
    Vereador,
    #[sea_orm(string_value = "JURIDICO")]
    Juridico,
}

/// Situação da conta: criada como PENDENTE, ativada pelo administrador
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Enum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[oai(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    #[sea_orm(string_value = "PENDENTE")]
    Pendente,
    #[sea_orm(string_value = "ATIVO")]
    Ativo,
    #[sea_orm(string_value = "INATIVO")]
    Inativo,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Enum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[oai(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OcorrenciaStatus {
    #[sea_orm(string_value = "PENDENTE")]
    Pendente,
    #[sea_orm(string_value = "EM_ANALISE")]
    EmAnalise,
    #[sea_orm(string_value = "RESOLVIDO")]
    Resolvido,
    #[sea_orm(string_value = "REJEITADO")]
    Rejeitado,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Enum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[oai(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OcorrenciaCategoria {
    #[sea_orm(string_value = "INFRAESTRUTURA")]
    Infraestrutura,
    #[sea_orm(string_value = "ILUMINACAO")]
    Iluminacao,
    #[sea_orm(string_value = "LIMPEZA")]
    Limpeza,
    #[sea_orm(string_value = "SEGURANCA")]
    Seguranca,
    #[sea_orm(string_value = "SAUDE")]
    Saude,
    #[sea_orm(string_value = "OUTROS")]
    Outros,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Enum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[oai(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OcorrenciaPrioridade {
    #[sea_orm(string_value = "BAIXA")]
    Baixa,
    #[sea_orm(string_value = "MEDIA")]
    Media,
    #[sea_orm(string_value = "ALTA")]
    Alta,
}

/// Categoria de uma notificação in-app
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Enum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[oai(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificacaoTipo {
    #[sea_orm(string_value = "APROVACAO")]
    Aprovacao,
    #[sea_orm(string_value = "DESATIVACAO")]
    Desativacao,
    #[sea_orm(string_value = "REATIVACAO")]
    Reativacao,
    #[sea_orm(string_value = "ALTERACAO_TIPO")]
    AlteracaoTipo,
    #[sea_orm(string_value = "STATUS_ALTERADO")]
    StatusAlterado,
}

impl OcorrenciaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OcorrenciaStatus::Pendente => "PENDENTE",
            OcorrenciaStatus::EmAnalise => "EM_ANALISE",
            OcorrenciaStatus::Resolvido => "RESOLVIDO",
            OcorrenciaStatus::Rejeitado => "REJEITADO",
        }
    }
}

impl UserTipo {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserTipo::Admin => "ADMIN",
            UserTipo::Vereador => "VEREADOR",
            UserTipo::Juridico => "JURIDICO",
        }
    }
}
