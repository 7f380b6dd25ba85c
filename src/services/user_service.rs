use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::errors::{AuthError, UserError};
use crate::providers::{send_best_effort, Mailer, ObjectStorage};
use crate::services::access_control::{allowed, is_self_action, Action};
use crate::services::password_service::PasswordService;
use crate::services::token_service::TokenService;
use crate::stores::{NewUser, NotificacaoStore, PasswordResetStore, UserStore};
use crate::types::dto::auth::{
    ChangePasswordRequest, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
    UpdateProfileRequest, UserSummary,
};
use crate::types::dto::common::{MessageResponse, PageParams, PaginationMeta};
use crate::types::dto::user::{
    TipoCount, UserActionResponse, UserDetailResponse, UserListFilters, UserListResponse,
    UserStatsResponse,
};
use crate::types::enums::{NotificacaoTipo, UserStatus, UserTipo};
use crate::types::internal::Actor;

const MIN_SENHA_LEN: usize = 6;
const RESET_TOKEN_TTL_SECS: i64 = 60 * 60;

/// Account lifecycle in two tiers: self-service (registration, login,
/// profile, password recovery) and super-admin management (approval queue,
/// activation state, role changes, deletion).
pub struct UserService {
    users: Arc<UserStore>,
    notificacoes: Arc<NotificacaoStore>,
    reset_tokens: Arc<PasswordResetStore>,
    passwords: PasswordService,
    tokens: TokenService,
    mailer: Arc<dyn Mailer>,
    storage: Arc<dyn ObjectStorage>,
}

impl UserService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: Arc<UserStore>,
        notificacoes: Arc<NotificacaoStore>,
        reset_tokens: Arc<PasswordResetStore>,
        passwords: PasswordService,
        tokens: TokenService,
        mailer: Arc<dyn Mailer>,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        Self {
            users,
            notificacoes,
            reset_tokens,
            passwords,
            tokens,
            mailer,
            storage,
        }
    }

    /// Self-registration. New accounts are always VEREADOR/PENDENTE and only
    /// become usable after admin approval.
    pub async fn register(&self, req: RegisterRequest) -> Result<RegisterResponse, AuthError> {
        let nome = req.nome.trim().to_string();
        let cpf = req.cpf.trim().to_string();
        let email = req.email.trim().to_lowercase();

        if nome.is_empty() || cpf.is_empty() || email.is_empty() {
            return Err(AuthError::validation(
                "Nome, CPF e email são obrigatórios",
            ));
        }
        if !email.contains('@') {
            return Err(AuthError::validation("Email inválido"));
        }
        validate_senha(&req.senha)?;

        if self.users.find_by_email_or_cpf(&email, &cpf).await?.is_some() {
            return Err(AuthError::duplicate());
        }

        let senha_hash = self.passwords.hash(&req.senha)?;
        let created = self
            .users
            .insert_registration(NewUser {
                nome,
                cpf,
                email,
                senha_hash,
                telefone: req.telefone,
            })
            .await?;

        tracing::info!(user_id = %created.id, "new registration awaiting approval");
        self.notify_admins_new_registration(&created.nome, &created.email)
            .await;

        Ok(RegisterResponse {
            message: "Cadastro realizado com sucesso. Aguarde a aprovação do administrador."
                .to_string(),
            user: created.into(),
        })
    }

    /// New-registration notice to every active admin, best effort
    async fn notify_admins_new_registration(&self, nome: &str, email: &str) {
        let emails = match self.users.active_admin_emails().await {
            Ok(emails) => emails,
            Err(e) => {
                tracing::warn!("could not load admin recipients: {e}");
                return;
            }
        };

        let body = format!(
            "Um novo cadastro aguarda aprovação.\n\nNome: {nome}\nEmail: {email}"
        );
        let sends = emails.iter().map(|to| {
            send_best_effort(
                self.mailer.as_ref(),
                to,
                "Novo Cadastro Aguardando Aprovação",
                &body,
            )
        });
        join_all(sends).await;
    }

    /// Login. Unknown email and wrong password produce the same generic
    /// rejection; approval state is only revealed after the password checks
    /// out.
    pub async fn authenticate(&self, req: LoginRequest) -> Result<LoginResponse, AuthError> {
        let email = req.email.trim().to_lowercase();

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(AuthError::invalid_credentials)?;

        if !self.passwords.verify(&req.senha, &user.senha_hash)? {
            return Err(AuthError::invalid_credentials());
        }

        match user.status {
            UserStatus::Pendente => return Err(AuthError::awaiting_approval()),
            UserStatus::Inativo => return Err(AuthError::account_disabled()),
            UserStatus::Ativo => {}
        }

        let token = self.tokens.generate(&user.id, user.tipo)?;
        Ok(LoginResponse {
            token,
            user: user.into(),
        })
    }

    pub async fn me(&self, actor: &Actor) -> Result<UserSummary, AuthError> {
        let user = self
            .users
            .find_by_id(&actor.id)
            .await?
            .ok_or_else(AuthError::not_found)?;
        Ok(user.into())
    }

    pub async fn update_profile(
        &self,
        actor: &Actor,
        req: UpdateProfileRequest,
    ) -> Result<UserSummary, AuthError> {
        let user = self
            .users
            .find_by_id(&actor.id)
            .await?
            .ok_or_else(AuthError::not_found)?;

        let email = match req.email {
            Some(email) => {
                let email = email.trim().to_lowercase();
                if !email.contains('@') {
                    return Err(AuthError::validation("Email inválido"));
                }
                if self.users.email_in_use_by_other(&email, &actor.id).await? {
                    return Err(AuthError::email_in_use());
                }
                Some(email)
            }
            None => None,
        };

        let updated = self
            .users
            .update_profile(user, req.nome, req.telefone, email)
            .await?;
        Ok(updated.into())
    }

    pub async fn change_password(
        &self,
        actor: &Actor,
        req: ChangePasswordRequest,
    ) -> Result<MessageResponse, AuthError> {
        validate_senha(&req.nova_senha)?;

        let user = self
            .users
            .find_by_id(&actor.id)
            .await?
            .ok_or_else(AuthError::not_found)?;

        if !self.passwords.verify(&req.senha_atual, &user.senha_hash)? {
            return Err(AuthError::wrong_current_password());
        }

        let senha_hash = self.passwords.hash(&req.nova_senha)?;
        self.users.set_senha_hash(user, senha_hash).await?;

        Ok(MessageResponse::new("Senha alterada com sucesso"))
    }

    /// Replace the profile picture, deleting the previous blob best effort.
    pub async fn upload_profile_picture(
        &self,
        actor: &Actor,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<UserSummary, AuthError> {
        let user = self
            .users
            .find_by_id(&actor.id)
            .await?
            .ok_or_else(AuthError::not_found)?;

        let stored = self.storage.upload_image(data, content_type).await?;
        let old = user.foto_perfil.clone();
        let updated = self.users.set_foto_perfil(user, stored.url).await?;

        if let Some(old_url) = old {
            if let Some(storage_id) = storage_id_from_url(&old_url) {
                if let Err(e) = self.storage.delete_image(&storage_id).await {
                    tracing::warn!(storage_id, "old profile picture cleanup failed: {e}");
                }
            }
        }

        Ok(updated.into())
    }

    /// Password recovery request. The response never reveals whether the
    /// email is registered; for real accounts a single-use token (stored
    /// only as its SHA-256 hash) is emailed, valid for one hour.
    pub async fn request_password_reset(&self, email: &str) -> Result<MessageResponse, AuthError> {
        let email = email.trim().to_lowercase();

        if let Some(user) = self.users.find_by_email(&email).await? {
            let token = generate_reset_token();
            let expires_at = Utc::now().timestamp() + RESET_TOKEN_TTL_SECS;
            self.reset_tokens
                .insert(&user.id, hash_reset_token(&token), expires_at)
                .await?;

            let body = format!(
                "Olá, {}.\n\nRecebemos um pedido de recuperação de senha.\n\
                 Use o token abaixo para definir uma nova senha. Ele expira em 1 hora.\n\n\
                 Token: {token}\n\nSe você não fez este pedido, ignore este email.",
                user.nome
            );
            send_best_effort(
                self.mailer.as_ref(),
                &user.email,
                "Recuperação de Senha",
                &body,
            )
            .await;
        }

        Ok(MessageResponse::new(
            "Se o email estiver cadastrado, você receberá as instruções de recuperação",
        ))
    }

    /// Consume a reset token. On success every outstanding token for the
    /// user is invalidated.
    pub async fn reset_password(
        &self,
        token: &str,
        nova_senha: &str,
    ) -> Result<MessageResponse, AuthError> {
        validate_senha(nova_senha)?;

        let record = self
            .reset_tokens
            .find_valid(&hash_reset_token(token))
            .await?
            .ok_or_else(AuthError::invalid_reset_token)?;

        let user = self
            .users
            .find_by_id(&record.usuario_id)
            .await?
            .ok_or_else(AuthError::invalid_reset_token)?;

        let senha_hash = self.passwords.hash(nova_senha)?;
        self.users.set_senha_hash(user, senha_hash).await?;
        self.reset_tokens
            .delete_all_for_user(&record.usuario_id)
            .await?;

        Ok(MessageResponse::new("Senha redefinida com sucesso"))
    }

    // ---- super-admin management ----

    fn require_super_admin(actor: &Actor) -> Result<(), UserError> {
        if !allowed(actor, &Action::ManageUsers) {
            return Err(UserError::super_admin_required());
        }
        Ok(())
    }

    pub async fn list(
        &self,
        actor: &Actor,
        filters: UserListFilters,
        page: PageParams,
    ) -> Result<UserListResponse, UserError> {
        Self::require_super_admin(actor)?;

        let (users, total) = self.users.list(&filters, page).await?;
        Ok(UserListResponse {
            users: users.into_iter().map(UserSummary::from).collect(),
            pagination: PaginationMeta::new(page.page, page.limit, total),
        })
    }

    /// Approval queue, oldest registration first
    pub async fn list_pending(&self, actor: &Actor) -> Result<Vec<UserSummary>, UserError> {
        Self::require_super_admin(actor)?;

        let pending = self.users.list_pending().await?;
        Ok(pending.into_iter().map(UserSummary::from).collect())
    }

    pub async fn get_by_id(
        &self,
        actor: &Actor,
        id: &str,
    ) -> Result<UserDetailResponse, UserError> {
        Self::require_super_admin(actor)?;

        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(UserError::not_found)?;
        let ocorrencias_count = self.users.count_ocorrencias(&user.id).await?;
        let notificacoes_count = self.users.count_notificacoes(&user.id).await?;

        Ok(UserDetailResponse {
            user: user.into(),
            ocorrencias_count,
            notificacoes_count,
        })
    }

    pub async fn stats(&self, actor: &Actor) -> Result<UserStatsResponse, UserError> {
        Self::require_super_admin(actor)?;

        let stats = self.users.stats().await?;
        Ok(UserStatsResponse {
            total: stats.total,
            ativos: stats.ativos,
            pendentes: stats.pendentes,
            inativos: stats.inativos,
            por_tipo: stats
                .por_tipo
                .into_iter()
                .map(|(tipo, count)| TipoCount { tipo, count })
                .collect(),
        })
    }

    /// Approve a PENDENTE account, optionally assigning a role other than
    /// the registration default.
    pub async fn approve(
        &self,
        actor: &Actor,
        id: &str,
        tipo: Option<UserTipo>,
    ) -> Result<UserActionResponse, UserError> {
        Self::require_super_admin(actor)?;

        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(UserError::not_found)?;
        if user.status != UserStatus::Pendente {
            return Err(UserError::not_pending());
        }

        let updated = self.users.set_status(user, UserStatus::Ativo, tipo).await?;

        self.notificacoes
            .insert(
                &updated.id,
                NotificacaoTipo::Aprovacao,
                "Conta Aprovada",
                "Sua conta foi aprovada! Você já pode acessar o sistema.",
            )
            .await?;
        send_best_effort(
            self.mailer.as_ref(),
            &updated.email,
            "Conta Aprovada",
            &format!(
                "Olá, {}. Sua conta foi aprovada e você já pode acessar o sistema.",
                updated.nome
            ),
        )
        .await;

        Ok(UserActionResponse {
            message: "Usuário aprovado com sucesso".to_string(),
            user: updated.into(),
        })
    }

    /// Deactivate an account. Works from any status; blocked for the
    /// actor's own account.
    pub async fn deactivate(
        &self,
        actor: &Actor,
        id: &str,
        motivo: Option<String>,
    ) -> Result<UserActionResponse, UserError> {
        Self::require_super_admin(actor)?;

        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(UserError::not_found)?;
        if is_self_action(actor, &user.id) {
            return Err(UserError::self_deactivate());
        }

        let updated = self
            .users
            .set_status(user, UserStatus::Inativo, None)
            .await?;

        let mensagem = match &motivo {
            Some(motivo) => format!("Sua conta foi desativada. Motivo: {motivo}"),
            None => "Sua conta foi desativada. Entre em contato com o administrador.".to_string(),
        };
        self.notificacoes
            .insert(
                &updated.id,
                NotificacaoTipo::Desativacao,
                "Conta Desativada",
                &mensagem,
            )
            .await?;
        send_best_effort(self.mailer.as_ref(), &updated.email, "Conta Desativada", &mensagem)
            .await;

        Ok(UserActionResponse {
            message: "Usuário desativado com sucesso".to_string(),
            user: updated.into(),
        })
    }

    pub async fn reactivate(
        &self,
        actor: &Actor,
        id: &str,
    ) -> Result<UserActionResponse, UserError> {
        Self::require_super_admin(actor)?;

        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(UserError::not_found)?;
        if user.status != UserStatus::Inativo {
            return Err(UserError::not_inactive());
        }

        let updated = self.users.set_status(user, UserStatus::Ativo, None).await?;

        let mensagem = "Sua conta foi reativada. Você já pode acessar o sistema novamente.";
        self.notificacoes
            .insert(
                &updated.id,
                NotificacaoTipo::Reativacao,
                "Conta Reativada",
                mensagem,
            )
            .await?;
        send_best_effort(self.mailer.as_ref(), &updated.email, "Conta Reativada", mensagem)
            .await;

        Ok(UserActionResponse {
            message: "Usuário reativado com sucesso".to_string(),
            user: updated.into(),
        })
    }

    pub async fn change_tipo(
        &self,
        actor: &Actor,
        id: &str,
        tipo: UserTipo,
    ) -> Result<UserActionResponse, UserError> {
        Self::require_super_admin(actor)?;

        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(UserError::not_found)?;
        if is_self_action(actor, &user.id) {
            return Err(UserError::self_change_tipo());
        }

        let updated = self.users.set_tipo(user, tipo).await?;

        self.notificacoes
            .insert(
                &updated.id,
                NotificacaoTipo::AlteracaoTipo,
                "Tipo de Conta Alterado",
                &format!("Seu tipo de conta foi alterado para {}", tipo.as_str()),
            )
            .await?;

        Ok(UserActionResponse {
            message: "Tipo de usuário alterado com sucesso".to_string(),
            user: updated.into(),
        })
    }

    /// Hard delete. Refused while the user still owns incidents; the
    /// incident history must survive, so deactivation is the alternative.
    pub async fn delete(&self, actor: &Actor, id: &str) -> Result<MessageResponse, UserError> {
        Self::require_super_admin(actor)?;

        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(UserError::not_found)?;
        if is_self_action(actor, &user.id) {
            return Err(UserError::self_delete());
        }

        let count = self.users.count_ocorrencias(&user.id).await?;
        if count > 0 {
            return Err(UserError::has_ocorrencias(count));
        }

        self.users.delete(&user.id).await?;
        Ok(MessageResponse::new("Usuário deletado com sucesso"))
    }
}

fn validate_senha(senha: &str) -> Result<(), AuthError> {
    if senha.len() < MIN_SENHA_LEN {
        return Err(AuthError::validation(
            "A senha deve ter no mínimo 6 caracteres",
        ));
    }
    Ok(())
}

/// 32 random bytes, hex-encoded. Only the SHA-256 of this value is stored.
fn generate_reset_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn hash_reset_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// The storage id is the last path segment of the public URL, without any
/// transform query string.
fn storage_id_from_url(url: &str) -> Option<String> {
    let path = url.split('?').next()?;
    let segment = path.rsplit('/').next()?;
    if segment.is_empty() {
        None
    } else {
        Some(segment.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_senha_minimum_length() {
        assert!(validate_senha("12345").is_err());
        assert!(validate_senha("123456").is_ok());
    }

    #[test]
    fn test_reset_token_hash_is_stable_and_hex() {
        let h1 = hash_reset_token("abc");
        let h2 = hash_reset_token("abc");
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
        assert_ne!(h1, hash_reset_token("abd"));
    }

    #[test]
    fn test_storage_id_from_url_strips_query() {
        assert_eq!(
            storage_id_from_url("http://host/media/abc.jpg?size=thumbnail"),
            Some("abc.jpg".to_string())
        );
        assert_eq!(
            storage_id_from_url("http://host/media/abc.jpg"),
            Some("abc.jpg".to_string())
        );
        assert_eq!(storage_id_from_url("http://host/media/"), None);
    }
}
