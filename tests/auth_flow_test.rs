// Registration, login gating and password recovery flows.

mod common;

use common::spawn_app;
use ocorrencias_backend::errors::AuthError;
use ocorrencias_backend::types::dto::auth::{LoginRequest, RegisterRequest};
use ocorrencias_backend::types::enums::{UserStatus, UserTipo};

fn register_request(nome: &str, cpf: &str, email: &str) -> RegisterRequest {
    RegisterRequest {
        nome: nome.to_string(),
        cpf: cpf.to_string(),
        email: email.to_string(),
        senha: "senha-segura".to_string(),
        telefone: Some("11 99999-0000".to_string()),
    }
}

fn login(email: &str, senha: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        senha: senha.to_string(),
    }
}

#[tokio::test]
async fn test_registration_starts_pending_as_vereador() {
    let app = spawn_app().await;

    let response = app
        .data
        .user_service
        .register(register_request("Ana", "11122233344", "ana@camara.gov.br"))
        .await
        .expect("register");

    assert_eq!(response.user.status, UserStatus::Pendente);
    assert_eq!(response.user.tipo, UserTipo::Vereador);
    assert!(!response.user.is_super_admin);
}

#[tokio::test]
async fn test_registration_rejects_duplicate_email_or_cpf() {
    let app = spawn_app().await;
    app.data
        .user_service
        .register(register_request("Ana", "11122233344", "ana@camara.gov.br"))
        .await
        .expect("first register");

    // Same email, different CPF
    let result = app
        .data
        .user_service
        .register(register_request("Bia", "55566677788", "ana@camara.gov.br"))
        .await;
    assert!(matches!(result, Err(AuthError::Duplicate(_))));

    // Same CPF, different email
    let result = app
        .data
        .user_service
        .register(register_request("Bia", "11122233344", "bia@camara.gov.br"))
        .await;
    assert!(matches!(result, Err(AuthError::Duplicate(_))));
}

#[tokio::test]
async fn test_registration_notifies_active_admins_by_email() {
    let app = spawn_app().await;
    app.seed_super_admin("sa@camara.gov.br", "11122233344").await;

    app.data
        .user_service
        .register(register_request("Ana", "55566677788", "ana@camara.gov.br"))
        .await
        .expect("register");

    let emails = app.mailer.sent_to("sa@camara.gov.br");
    assert_eq!(emails.len(), 1);
    assert!(emails[0].1.contains("ana@camara.gov.br"));
}

#[tokio::test]
async fn test_login_blocked_until_approved() {
    let app = spawn_app().await;
    app.data
        .user_service
        .register(register_request("Ana", "11122233344", "ana@camara.gov.br"))
        .await
        .expect("register");

    let result = app
        .data
        .user_service
        .authenticate(login("ana@camara.gov.br", "senha-segura"))
        .await;
    assert!(matches!(result, Err(AuthError::Forbidden(_))));
}

#[tokio::test]
async fn test_login_succeeds_for_active_account() {
    let app = spawn_app().await;
    app.seed_vereador("ana@camara.gov.br", "11122233344").await;

    let response = app
        .data
        .user_service
        .authenticate(login("ana@camara.gov.br", "senha-segura"))
        .await
        .expect("login");

    assert!(!response.token.is_empty());
    assert_eq!(response.user.email, "ana@camara.gov.br");
}

#[tokio::test]
async fn test_login_blocked_for_deactivated_account() {
    let app = spawn_app().await;
    app.seed_user(
        "Ana",
        "ana@camara.gov.br",
        "11122233344",
        "senha-segura",
        UserTipo::Vereador,
        UserStatus::Inativo,
        false,
    )
    .await;

    let result = app
        .data
        .user_service
        .authenticate(login("ana@camara.gov.br", "senha-segura"))
        .await;
    assert!(matches!(result, Err(AuthError::Forbidden(_))));
}

#[tokio::test]
async fn test_login_does_not_reveal_account_existence() {
    let app = spawn_app().await;
    app.seed_vereador("ana@camara.gov.br", "11122233344").await;

    let unknown = app
        .data
        .user_service
        .authenticate(login("ninguem@camara.gov.br", "qualquer"))
        .await
        .expect_err("unknown email");
    let wrong_password = app
        .data
        .user_service
        .authenticate(login("ana@camara.gov.br", "senha-errada"))
        .await
        .expect_err("wrong password");

    // Both failures look identical to the caller
    assert_eq!(unknown.message(), wrong_password.message());
    assert_eq!(unknown.status_code(), 401);
}

#[tokio::test]
async fn test_forgot_password_response_is_generic_for_unknown_email() {
    let app = spawn_app().await;

    let response = app
        .data
        .user_service
        .request_password_reset("ninguem@camara.gov.br")
        .await
        .expect("request");

    assert!(response.message.contains("Se o email estiver cadastrado"));
    assert!(app.mailer.sent.lock().unwrap().is_empty());
}

fn token_from_email_body(body: &str) -> String {
    body.lines()
        .find_map(|line| line.strip_prefix("Token: "))
        .expect("token line in email")
        .trim()
        .to_string()
}

#[tokio::test]
async fn test_password_reset_flow() {
    let app = spawn_app().await;
    app.seed_vereador("ana@camara.gov.br", "11122233344").await;

    app.data
        .user_service
        .request_password_reset("ana@camara.gov.br")
        .await
        .expect("request reset");

    let emails = app.mailer.sent_to("ana@camara.gov.br");
    assert_eq!(emails.len(), 1);
    let token = token_from_email_body(&emails[0].1);

    app.data
        .user_service
        .reset_password(&token, "nova-senha-forte")
        .await
        .expect("reset password");

    // Old password no longer works, new one does
    let old = app
        .data
        .user_service
        .authenticate(login("ana@camara.gov.br", "senha-segura"))
        .await;
    assert!(old.is_err());

    app.data
        .user_service
        .authenticate(login("ana@camara.gov.br", "nova-senha-forte"))
        .await
        .expect("login with new password");

    // The token was consumed
    let reuse = app
        .data
        .user_service
        .reset_password(&token, "outra-senha")
        .await;
    assert!(matches!(reuse, Err(AuthError::Validation(_))));
}

#[tokio::test]
async fn test_reset_rejects_unknown_token() {
    let app = spawn_app().await;

    let result = app
        .data
        .user_service
        .reset_password("token-inventado", "nova-senha-forte")
        .await;
    assert!(matches!(result, Err(AuthError::Validation(_))));
}
