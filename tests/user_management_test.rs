// Super-admin user management: approval queue, activation state, role
// changes, deletion and the self-action guards.

mod common;

use common::{ocorrencia_input, spawn_app};
use ocorrencias_backend::errors::UserError;
use ocorrencias_backend::types::dto::auth::RegisterRequest;
use ocorrencias_backend::types::dto::common::PageParams;
use ocorrencias_backend::types::dto::user::UserListFilters;
use ocorrencias_backend::types::enums::{NotificacaoTipo, UserStatus, UserTipo};
use ocorrencias_backend::types::internal::Actor;

async fn register_pending(app: &common::TestApp, email: &str, cpf: &str) -> String {
    app.data
        .user_service
        .register(RegisterRequest {
            nome: "Pendente Teste".to_string(),
            cpf: cpf.to_string(),
            email: email.to_string(),
            senha: "senha-segura".to_string(),
            telefone: None,
        })
        .await
        .expect("register")
        .user
        .id
}

#[tokio::test]
async fn test_management_requires_super_admin_flag() {
    let app = spawn_app().await;
    // ADMIN role without the flag is not enough
    let admin = app
        .seed_user(
            "Admin Comum",
            "admin@camara.gov.br",
            "11122233344",
            "senha-segura",
            UserTipo::Admin,
            UserStatus::Ativo,
            false,
        )
        .await;

    let result = app
        .data
        .user_service
        .list(&admin, UserListFilters::default(), PageParams::clamp(None, None, 20))
        .await;
    assert!(matches!(result, Err(UserError::Forbidden(_))));
}

#[tokio::test]
async fn test_approve_activates_and_notifies() {
    let app = spawn_app().await;
    let admin = app.seed_super_admin("sa@camara.gov.br", "11122233344").await;
    let pending_id = register_pending(&app, "novo@camara.gov.br", "55566677788").await;

    let response = app
        .data
        .user_service
        .approve(&admin, &pending_id, None)
        .await
        .expect("approve");

    assert_eq!(response.user.status, UserStatus::Ativo);
    assert_eq!(response.user.tipo, UserTipo::Vereador);

    let (notificacoes, _) = app
        .data
        .notificacao_store
        .list(&pending_id, None, None, PageParams::clamp(None, None, 20))
        .await
        .expect("notificacoes");
    assert_eq!(notificacoes.len(), 1);
    assert_eq!(notificacoes[0].tipo, NotificacaoTipo::Aprovacao);

    assert_eq!(app.mailer.sent_to("novo@camara.gov.br").len(), 1);
}

#[tokio::test]
async fn test_approve_can_assign_role() {
    let app = spawn_app().await;
    let admin = app.seed_super_admin("sa@camara.gov.br", "11122233344").await;
    let pending_id = register_pending(&app, "novo@camara.gov.br", "55566677788").await;

    let response = app
        .data
        .user_service
        .approve(&admin, &pending_id, Some(UserTipo::Juridico))
        .await
        .expect("approve");
    assert_eq!(response.user.tipo, UserTipo::Juridico);
}

#[tokio::test]
async fn test_approve_is_rejected_when_not_pending() {
    let app = spawn_app().await;
    let admin = app.seed_super_admin("sa@camara.gov.br", "11122233344").await;
    let pending_id = register_pending(&app, "novo@camara.gov.br", "55566677788").await;

    app.data
        .user_service
        .approve(&admin, &pending_id, None)
        .await
        .expect("first approve");

    let second = app.data.user_service.approve(&admin, &pending_id, None).await;
    assert!(matches!(second, Err(UserError::Conflict(_))));
}

#[tokio::test]
async fn test_deactivate_reactivate_cycle() {
    let app = spawn_app().await;
    let admin = app.seed_super_admin("sa@camara.gov.br", "11122233344").await;
    let vereador = app.seed_vereador("v@camara.gov.br", "55566677788").await;

    let deactivated = app
        .data
        .user_service
        .deactivate(&admin, &vereador.id, Some("Fim do mandato".to_string()))
        .await
        .expect("deactivate");
    assert_eq!(deactivated.user.status, UserStatus::Inativo);

    let (notificacoes, _) = app
        .data
        .notificacao_store
        .list(&vereador.id, None, None, PageParams::clamp(None, None, 20))
        .await
        .expect("notificacoes");
    assert!(notificacoes
        .iter()
        .any(|n| n.tipo == NotificacaoTipo::Desativacao && n.mensagem.contains("Fim do mandato")));

    let reactivated = app
        .data
        .user_service
        .reactivate(&admin, &vereador.id)
        .await
        .expect("reactivate");
    assert_eq!(reactivated.user.status, UserStatus::Ativo);

    // Reactivating an already-active account is a conflict
    let again = app.data.user_service.reactivate(&admin, &vereador.id).await;
    assert!(matches!(again, Err(UserError::Conflict(_))));
}

#[tokio::test]
async fn test_self_action_guards() {
    let app = spawn_app().await;
    let admin = app.seed_super_admin("sa@camara.gov.br", "11122233344").await;

    let deactivate = app
        .data
        .user_service
        .deactivate(&admin, &admin.id, None)
        .await;
    assert!(matches!(deactivate, Err(UserError::Conflict(_))));

    let delete = app.data.user_service.delete(&admin, &admin.id).await;
    assert!(matches!(delete, Err(UserError::Conflict(_))));

    let change = app
        .data
        .user_service
        .change_tipo(&admin, &admin.id, UserTipo::Vereador)
        .await;
    assert!(matches!(change, Err(UserError::Conflict(_))));
}

#[tokio::test]
async fn test_unknown_target_is_not_found_before_self_guard() {
    let app = spawn_app().await;
    let admin = app.seed_super_admin("sa@camara.gov.br", "11122233344").await;

    let result = app
        .data
        .user_service
        .deactivate(&admin, "id-inexistente", None)
        .await;
    assert!(matches!(result, Err(UserError::NotFound(_))));
}

#[tokio::test]
async fn test_delete_blocked_while_user_owns_incidents() {
    let app = spawn_app().await;
    let admin = app.seed_super_admin("sa@camara.gov.br", "11122233344").await;
    let vereador = app.seed_vereador("v@camara.gov.br", "55566677788").await;

    app.data
        .ocorrencia_service
        .create(&vereador, ocorrencia_input("Minha ocorrência"), vec![])
        .await
        .expect("create");

    let blocked = app
        .data
        .user_service
        .delete(&admin, &vereador.id)
        .await
        .expect_err("delete with incidents");
    assert!(blocked.message().contains("1 ocorrências"));

    // Deleting the incident unblocks the account removal
    let (rows, _) = app
        .data
        .ocorrencia_store
        .list(&Default::default(), PageParams::clamp(None, None, 20))
        .await
        .expect("list");
    app.data
        .ocorrencia_service
        .delete(&admin, &rows[0].id)
        .await
        .expect("delete incident");

    app.data
        .user_service
        .delete(&admin, &vereador.id)
        .await
        .expect("delete user");
}

#[tokio::test]
async fn test_pending_queue_lists_oldest_first() {
    let app = spawn_app().await;
    let admin = app.seed_super_admin("sa@camara.gov.br", "11122233344").await;
    let first = register_pending(&app, "primeiro@camara.gov.br", "22233344455").await;
    let second = register_pending(&app, "segundo@camara.gov.br", "33344455566").await;

    let queue = app
        .data
        .user_service
        .list_pending(&admin)
        .await
        .expect("queue");
    let ids: Vec<&str> = queue.iter().map(|u| u.id.as_str()).collect();

    let first_pos = ids.iter().position(|id| *id == first).expect("first");
    let second_pos = ids.iter().position(|id| *id == second).expect("second");
    assert!(first_pos < second_pos);
}

#[tokio::test]
async fn test_change_tipo_notifies_target() {
    let app = spawn_app().await;
    let admin = app.seed_super_admin("sa@camara.gov.br", "11122233344").await;
    let vereador = app.seed_vereador("v@camara.gov.br", "55566677788").await;

    let response = app
        .data
        .user_service
        .change_tipo(&admin, &vereador.id, UserTipo::Juridico)
        .await
        .expect("change tipo");
    assert_eq!(response.user.tipo, UserTipo::Juridico);

    let (notificacoes, _) = app
        .data
        .notificacao_store
        .list(&vereador.id, None, None, PageParams::clamp(None, None, 20))
        .await
        .expect("notificacoes");
    assert!(notificacoes
        .iter()
        .any(|n| n.tipo == NotificacaoTipo::AlteracaoTipo && n.mensagem.contains("JURIDICO")));
}

#[tokio::test]
async fn test_stats_and_detail_counts() {
    let app = spawn_app().await;
    let admin = app.seed_super_admin("sa@camara.gov.br", "11122233344").await;
    let vereador = app.seed_vereador("v@camara.gov.br", "55566677788").await;
    register_pending(&app, "novo@camara.gov.br", "99988877766").await;

    app.data
        .ocorrencia_service
        .create(&vereador, ocorrencia_input("Uma"), vec![])
        .await
        .expect("create");

    let stats = app.data.user_service.stats(&admin).await.expect("stats");
    assert_eq!(stats.total, 3);
    assert_eq!(stats.ativos, 2);
    assert_eq!(stats.pendentes, 1);

    let detail = app
        .data
        .user_service
        .get_by_id(&admin, &vereador.id)
        .await
        .expect("detail");
    assert_eq!(detail.ocorrencias_count, 1);
}

#[tokio::test]
async fn test_vereador_cannot_manage_users() {
    let app = spawn_app().await;
    let vereador = app.seed_vereador("v@camara.gov.br", "11122233344").await;
    let other = Actor::new("qualquer", UserTipo::Vereador, false);

    let result = app
        .data
        .user_service
        .deactivate(&vereador, &other.id, None)
        .await;
    assert!(matches!(result, Err(UserError::Forbidden(_))));
}
