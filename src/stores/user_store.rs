use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::types::db::{notificacao, ocorrencia, user};
use crate::types::dto::common::PageParams;
use crate::types::dto::user::UserListFilters;
use crate::types::enums::{UserStatus, UserTipo};

/// UserStore owns all user-table access: lookups, approval-state writes and
/// the aggregate counts the admin screens need.
pub struct UserStore {
    db: DatabaseConnection,
}

pub struct NewUser {
    pub nome: String,
    pub cpf: String,
    pub email: String,
    pub senha_hash: String,
    pub telefone: Option<String>,
}

#[derive(Debug)]
pub struct UserStats {
    pub total: u64,
    pub ativos: u64,
    pub pendentes: u64,
    pub inativos: u64,
    pub por_tipo: Vec<(UserTipo, u64)>,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Single either-match existence query used by registration
    pub async fn find_by_email_or_cpf(
        &self,
        email: &str,
        cpf: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Email.eq(email))
                    .add(user::Column::Cpf.eq(cpf)),
            )
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_by_email_or_cpf", e))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_by_email", e))
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_by_id", e))
    }

    /// Insert a self-registered user: status PENDENTE, tipo VEREADOR.
    /// Neither is caller-selectable at registration.
    pub async fn insert_registration(&self, new: NewUser) -> Result<user::Model, InternalError> {
        let now = Utc::now().timestamp();
        let model = user::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            nome: Set(new.nome),
            cpf: Set(new.cpf),
            email: Set(new.email),
            senha_hash: Set(new.senha_hash),
            telefone: Set(new.telefone),
            tipo: Set(UserTipo::Vereador),
            status: Set(UserStatus::Pendente),
            is_super_admin: Set(false),
            foto_perfil: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        model
            .insert(&self.db)
            .await
            .map_err(|e| InternalError::database("insert_registration", e))
    }

    pub async fn list(
        &self,
        filters: &UserListFilters,
        page: PageParams,
    ) -> Result<(Vec<user::Model>, u64), InternalError> {
        let mut query = user::Entity::find();
        if let Some(tipo) = filters.tipo {
            query = query.filter(user::Column::Tipo.eq(tipo));
        }
        if let Some(status) = filters.status {
            query = query.filter(user::Column::Status.eq(status));
        }

        let total = query
            .clone()
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("list_users_count", e))?;

        let users = query
            .order_by_desc(user::Column::CreatedAt)
            .offset(page.skip())
            .limit(page.limit)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_users", e))?;

        Ok((users, total))
    }

    /// Oldest registrations first, so the approval queue is FIFO
    pub async fn list_pending(&self) -> Result<Vec<user::Model>, InternalError> {
        user::Entity::find()
            .filter(user::Column::Status.eq(UserStatus::Pendente))
            .order_by_asc(user::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_pending", e))
    }

    pub async fn set_status(
        &self,
        target: user::Model,
        status: UserStatus,
        tipo: Option<UserTipo>,
    ) -> Result<user::Model, InternalError> {
        let mut active: user::ActiveModel = target.into();
        active.status = Set(status);
        if let Some(tipo) = tipo {
            active.tipo = Set(tipo);
        }
        active.updated_at = Set(Utc::now().timestamp());
        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("set_status", e))
    }

    pub async fn set_tipo(
        &self,
        target: user::Model,
        tipo: UserTipo,
    ) -> Result<user::Model, InternalError> {
        let mut active: user::ActiveModel = target.into();
        active.tipo = Set(tipo);
        active.updated_at = Set(Utc::now().timestamp());
        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("set_tipo", e))
    }

    pub async fn set_senha_hash(
        &self,
        target: user::Model,
        senha_hash: String,
    ) -> Result<user::Model, InternalError> {
        let mut active: user::ActiveModel = target.into();
        active.senha_hash = Set(senha_hash);
        active.updated_at = Set(Utc::now().timestamp());
        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("set_senha_hash", e))
    }

    pub async fn set_foto_perfil(
        &self,
        target: user::Model,
        foto_perfil: String,
    ) -> Result<user::Model, InternalError> {
        let mut active: user::ActiveModel = target.into();
        active.foto_perfil = Set(Some(foto_perfil));
        active.updated_at = Set(Utc::now().timestamp());
        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("set_foto_perfil", e))
    }

    pub async fn update_profile(
        &self,
        target: user::Model,
        nome: Option<String>,
        telefone: Option<String>,
        email: Option<String>,
    ) -> Result<user::Model, InternalError> {
        let mut active: user::ActiveModel = target.into();
        if let Some(nome) = nome {
            active.nome = Set(nome);
        }
        if let Some(telefone) = telefone {
            active.telefone = Set(Some(telefone));
        }
        if let Some(email) = email {
            active.email = Set(email);
        }
        active.updated_at = Set(Utc::now().timestamp());
        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("update_profile", e))
    }

    pub async fn email_in_use_by_other(
        &self,
        email: &str,
        user_id: &str,
    ) -> Result<bool, InternalError> {
        let count = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .filter(user::Column::Id.ne(user_id))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("email_in_use_by_other", e))?;
        Ok(count > 0)
    }

    pub async fn count_ocorrencias(&self, user_id: &str) -> Result<u64, InternalError> {
        ocorrencia::Entity::find()
            .filter(ocorrencia::Column::VereadorId.eq(user_id))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_ocorrencias", e))
    }

    pub async fn count_notificacoes(&self, user_id: &str) -> Result<u64, InternalError> {
        notificacao::Entity::find()
            .filter(notificacao::Column::UsuarioId.eq(user_id))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_notificacoes", e))
    }

    /// Emails of every ACTIVE admin, for new-registration notices
    pub async fn active_admin_emails(&self) -> Result<Vec<String>, InternalError> {
        let users = user::Entity::find()
            .filter(user::Column::Tipo.eq(UserTipo::Admin))
            .filter(user::Column::Status.eq(UserStatus::Ativo))
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("active_admin_emails", e))?;
        Ok(users.into_iter().map(|u| u.email).collect())
    }

    /// Emails of every ACTIVE jurídico reviewer, for new-incident notices
    pub async fn active_juridico_emails(&self) -> Result<Vec<String>, InternalError> {
        let users = user::Entity::find()
            .filter(user::Column::Tipo.eq(UserTipo::Juridico))
            .filter(user::Column::Status.eq(UserStatus::Ativo))
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("active_juridico_emails", e))?;
        Ok(users.into_iter().map(|u| u.email).collect())
    }

    pub async fn delete(&self, id: &str) -> Result<(), InternalError> {
        user::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_user", e))?;
        Ok(())
    }

    pub async fn stats(&self) -> Result<UserStats, InternalError> {
        let count_status = |status: UserStatus| {
            user::Entity::find()
                .filter(user::Column::Status.eq(status))
                .count(&self.db)
        };

        let total = user::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("user_stats_total", e))?;
        let ativos = count_status(UserStatus::Ativo)
            .await
            .map_err(|e| InternalError::database("user_stats_ativos", e))?;
        let pendentes = count_status(UserStatus::Pendente)
            .await
            .map_err(|e| InternalError::database("user_stats_pendentes", e))?;
        let inativos = count_status(UserStatus::Inativo)
            .await
            .map_err(|e| InternalError::database("user_stats_inativos", e))?;

        let por_tipo: Vec<(UserTipo, i64)> = user::Entity::find()
            .select_only()
            .column(user::Column::Tipo)
            .column_as(user::Column::Id.count(), "count")
            .group_by(user::Column::Tipo)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("user_stats_por_tipo", e))?;

        Ok(UserStats {
            total,
            ativos,
            pendentes,
            inativos,
            por_tipo: por_tipo
                .into_iter()
                .map(|(tipo, count)| (tipo, count as u64))
                .collect(),
        })
    }
}
