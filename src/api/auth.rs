use std::sync::Arc;

use poem_openapi::auth::Bearer;
use poem_openapi::param::Header;
use poem_openapi::{payload::Json, OpenApi, SecurityScheme, Tags};

use crate::api::helpers::{authenticate, read_image, require_csrf};
use crate::errors::AuthError;
use crate::services::{generate_csrf_token, CsrfStore, TokenService, UserService, CSRF_TTL};
use crate::stores::UserStore;
use crate::types::dto::auth::{
    ChangePasswordRequest, CsrfTokenResponse, ForgotPasswordRequest, LoginRequest, LoginResponse,
    ProfilePictureForm, RegisterRequest, RegisterResponse, ResetPasswordRequest,
    UpdateProfileRequest, UserSummary,
};
use crate::types::dto::common::MessageResponse;

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(
    rename = "BearerAuth",
    ty = "bearer",
    key_name = "Authorization",
    key_in = "header",
    bearer_format = "JWT"
)]
pub struct JwtBearer(pub Bearer);

/// Bearer scheme with a fallback so a missing Authorization header reaches
/// the handler instead of short-circuiting with poem's generic 401.
#[derive(SecurityScheme)]
pub enum BearerAuth {
    Bearer(JwtBearer),
    #[oai(fallback)]
    Missing,
}

impl BearerAuth {
    pub fn bearer(&self) -> Option<&Bearer> {
        match self {
            BearerAuth::Bearer(JwtBearer(bearer)) => Some(bearer),
            BearerAuth::Missing => None,
        }
    }
}

#[derive(Tags)]
enum AuthTags {
    /// Cadastro, sessão e conta do próprio usuário
    Auth,
}

/// Self-service account endpoints: registration, login, password recovery
/// and the authenticated user's own profile.
pub struct AuthApi {
    users: Arc<UserService>,
    user_store: Arc<UserStore>,
    tokens: Arc<TokenService>,
    csrf: Arc<dyn CsrfStore>,
}

impl AuthApi {
    pub fn new(
        users: Arc<UserService>,
        user_store: Arc<UserStore>,
        tokens: Arc<TokenService>,
        csrf: Arc<dyn CsrfStore>,
    ) -> Self {
        Self {
            users,
            user_store,
            tokens,
            csrf,
        }
    }
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Cadastro de vereador; a conta fica pendente até aprovação
    #[oai(path = "/register", method = "post", tag = "AuthTags::Auth")]
    async fn register(
        &self,
        body: Json<RegisterRequest>,
    ) -> Result<Json<RegisterResponse>, AuthError> {
        let response = self.users.register(body.0).await?;
        Ok(Json(response))
    }

    /// Login com email e senha
    #[oai(path = "/login", method = "post", tag = "AuthTags::Auth")]
    async fn login(&self, body: Json<LoginRequest>) -> Result<Json<LoginResponse>, AuthError> {
        let response = self.users.authenticate(body.0).await?;
        Ok(Json(response))
    }

    /// Solicita recuperação de senha. A resposta é a mesma com ou sem conta.
    #[oai(path = "/forgot-password", method = "post", tag = "AuthTags::Auth")]
    async fn forgot_password(
        &self,
        body: Json<ForgotPasswordRequest>,
    ) -> Result<Json<MessageResponse>, AuthError> {
        let response = self.users.request_password_reset(&body.email).await?;
        Ok(Json(response))
    }

    /// Redefine a senha com o token enviado por email
    #[oai(path = "/reset-password", method = "post", tag = "AuthTags::Auth")]
    async fn reset_password(
        &self,
        body: Json<ResetPasswordRequest>,
    ) -> Result<Json<MessageResponse>, AuthError> {
        let response = self
            .users
            .reset_password(&body.token, &body.nova_senha)
            .await?;
        Ok(Json(response))
    }

    /// Dados do usuário autenticado
    #[oai(path = "/me", method = "get", tag = "AuthTags::Auth")]
    async fn me(&self, auth: BearerAuth) -> Result<Json<UserSummary>, AuthError> {
        let actor =
            authenticate(&self.tokens, &self.user_store, auth.bearer()).await?;
        let user = self.users.me(&actor).await?;
        Ok(Json(user))
    }

    /// Token CSRF para as operações de escrita, vinculado à sessão
    #[oai(path = "/csrf-token", method = "get", tag = "AuthTags::Auth")]
    async fn csrf_token(
        &self,
        auth: BearerAuth,
    ) -> Result<Json<CsrfTokenResponse>, AuthError> {
        let actor =
            authenticate(&self.tokens, &self.user_store, auth.bearer()).await?;

        let token = generate_csrf_token();
        self.csrf
            .put(token.clone(), actor.id.clone(), CSRF_TTL)
            .await;

        Ok(Json(CsrfTokenResponse { csrf_token: token }))
    }

    /// Atualiza nome, telefone ou email do próprio usuário
    #[oai(path = "/profile", method = "put", tag = "AuthTags::Auth")]
    async fn update_profile(
        &self,
        auth: BearerAuth,
        #[oai(name = "X-CSRF-Token")] csrf: Header<Option<String>>,
        body: Json<UpdateProfileRequest>,
    ) -> Result<Json<UserSummary>, AuthError> {
        let actor =
            authenticate(&self.tokens, &self.user_store, auth.bearer()).await?;
        require_csrf(self.csrf.as_ref(), csrf.0.as_deref(), &actor).await?;

        let user = self.users.update_profile(&actor, body.0).await?;
        Ok(Json(user))
    }

    /// Troca a senha do próprio usuário, exigindo a senha atual
    #[oai(path = "/change-password", method = "put", tag = "AuthTags::Auth")]
    async fn change_password(
        &self,
        auth: BearerAuth,
        #[oai(name = "X-CSRF-Token")] csrf: Header<Option<String>>,
        body: Json<ChangePasswordRequest>,
    ) -> Result<Json<MessageResponse>, AuthError> {
        let actor =
            authenticate(&self.tokens, &self.user_store, auth.bearer()).await?;
        require_csrf(self.csrf.as_ref(), csrf.0.as_deref(), &actor).await?;

        let response = self.users.change_password(&actor, body.0).await?;
        Ok(Json(response))
    }

    /// Substitui a foto de perfil do próprio usuário
    #[oai(path = "/profile-picture", method = "post", tag = "AuthTags::Auth")]
    async fn profile_picture(
        &self,
        auth: BearerAuth,
        #[oai(name = "X-CSRF-Token")] csrf: Header<Option<String>>,
        form: ProfilePictureForm,
    ) -> Result<Json<UserSummary>, AuthError> {
        let actor =
            authenticate(&self.tokens, &self.user_store, auth.bearer()).await?;
        require_csrf(self.csrf.as_ref(), csrf.0.as_deref(), &actor).await?;

        let (data, content_type) = read_image(form.foto)
            .await
            .map_err(AuthError::validation)?;
        let user = self
            .users
            .upload_profile_picture(&actor, data, &content_type)
            .await?;
        Ok(Json(user))
    }
}
