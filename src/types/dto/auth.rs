use poem_openapi::types::multipart::Upload;
use poem_openapi::{Multipart, Object};

use crate::types::db::user;
use crate::types::enums::{UserStatus, UserTipo};

/// Cadastro de novo vereador (aguarda aprovação do administrador)
#[derive(Object, Debug)]
pub struct RegisterRequest {
    pub nome: String,
    pub cpf: String,
    pub email: String,
    pub senha: String,
    pub telefone: Option<String>,
}

#[derive(Object, Debug)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserSummary,
}

#[derive(Object, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub senha: String,
}

#[derive(Object, Debug)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserSummary,
}

/// Resumo do usuário retornado pela API. Nunca inclui o hash da senha.
#[derive(Object, Debug)]
pub struct UserSummary {
    pub id: String,
    pub nome: String,
    pub email: String,
    pub cpf: String,
    pub telefone: Option<String>,
    pub tipo: UserTipo,
    pub status: UserStatus,
    pub is_super_admin: bool,
    pub foto_perfil: Option<String>,
    pub created_at: i64,
}

impl From<user::Model> for UserSummary {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            nome: u.nome,
            email: u.email,
            cpf: u.cpf,
            telefone: u.telefone,
            tipo: u.tipo,
            status: u.status,
            is_super_admin: u.is_super_admin,
            foto_perfil: u.foto_perfil,
            created_at: u.created_at,
        }
    }
}

#[derive(Object, Debug)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Object, Debug)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub nova_senha: String,
}

#[derive(Object, Debug)]
pub struct UpdateProfileRequest {
    pub nome: Option<String>,
    pub telefone: Option<String>,
    pub email: Option<String>,
}

#[derive(Object, Debug)]
pub struct ChangePasswordRequest {
    pub senha_atual: String,
    pub nova_senha: String,
}

#[derive(Object, Debug)]
pub struct CsrfTokenResponse {
    pub csrf_token: String,
}

#[derive(Multipart, Debug)]
pub struct ProfilePictureForm {
    pub foto: Upload,
}
