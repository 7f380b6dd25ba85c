// Notification inbox: scoping, read state and removal.

mod common;

use common::spawn_app;
use ocorrencias_backend::errors::NotificacaoError;
use ocorrencias_backend::types::dto::common::PageParams;
use ocorrencias_backend::types::enums::NotificacaoTipo;

fn default_page() -> PageParams {
    PageParams::clamp(None, None, 50)
}

#[tokio::test]
async fn test_inbox_is_scoped_to_owner() {
    let app = spawn_app().await;
    let v1 = app.seed_vereador("v1@camara.gov.br", "11122233344").await;
    let v2 = app.seed_vereador("v2@camara.gov.br", "55566677788").await;

    app.data
        .notificacao_store
        .insert(&v1.id, NotificacaoTipo::Aprovacao, "Para v1", "mensagem")
        .await
        .expect("insert");

    let own = app
        .data
        .notificacao_service
        .list(&v1, None, None, default_page())
        .await
        .expect("own list");
    assert_eq!(own.pagination.total, 1);

    let foreign = app
        .data
        .notificacao_service
        .list(&v2, None, None, default_page())
        .await
        .expect("foreign list");
    assert_eq!(foreign.pagination.total, 0);
}

#[tokio::test]
async fn test_mark_read_updates_unread_count() {
    let app = spawn_app().await;
    let v1 = app.seed_vereador("v1@camara.gov.br", "11122233344").await;

    let first = app
        .data
        .notificacao_store
        .insert(&v1.id, NotificacaoTipo::Aprovacao, "Uma", "mensagem")
        .await
        .expect("insert");
    app.data
        .notificacao_store
        .insert(&v1.id, NotificacaoTipo::StatusAlterado, "Outra", "mensagem")
        .await
        .expect("insert");

    let before = app
        .data
        .notificacao_service
        .unread_count(&v1)
        .await
        .expect("count");
    assert_eq!(before.unread, 2);

    let marked = app
        .data
        .notificacao_service
        .mark_read(&v1, &first.id)
        .await
        .expect("mark read");
    assert!(marked.lida);

    let after = app
        .data
        .notificacao_service
        .unread_count(&v1)
        .await
        .expect("count");
    assert_eq!(after.unread, 1);
}

#[tokio::test]
async fn test_mark_all_read() {
    let app = spawn_app().await;
    let v1 = app.seed_vereador("v1@camara.gov.br", "11122233344").await;

    for i in 0..3 {
        app.data
            .notificacao_store
            .insert(
                &v1.id,
                NotificacaoTipo::StatusAlterado,
                &format!("Notificação {i}"),
                "mensagem",
            )
            .await
            .expect("insert");
    }

    app.data
        .notificacao_service
        .mark_all_read(&v1)
        .await
        .expect("mark all");

    let count = app
        .data
        .notificacao_service
        .unread_count(&v1)
        .await
        .expect("count");
    assert_eq!(count.unread, 0);
}

#[tokio::test]
async fn test_foreign_notification_is_forbidden_not_missing() {
    let app = spawn_app().await;
    let v1 = app.seed_vereador("v1@camara.gov.br", "11122233344").await;
    let v2 = app.seed_vereador("v2@camara.gov.br", "55566677788").await;

    let n = app
        .data
        .notificacao_store
        .insert(&v1.id, NotificacaoTipo::Aprovacao, "Para v1", "mensagem")
        .await
        .expect("insert");

    let fetch = app.data.notificacao_service.get_by_id(&v2, &n.id).await;
    assert!(matches!(fetch, Err(NotificacaoError::Forbidden(_))));

    let read = app.data.notificacao_service.mark_read(&v2, &n.id).await;
    assert!(matches!(read, Err(NotificacaoError::Forbidden(_))));

    let delete = app.data.notificacao_service.delete(&v2, &n.id).await;
    assert!(matches!(delete, Err(NotificacaoError::Forbidden(_))));

    let missing = app
        .data
        .notificacao_service
        .mark_read(&v1, "id-inexistente")
        .await;
    assert!(matches!(missing, Err(NotificacaoError::NotFound(_))));
}

#[tokio::test]
async fn test_delete_removes_notification() {
    let app = spawn_app().await;
    let v1 = app.seed_vereador("v1@camara.gov.br", "11122233344").await;

    let n = app
        .data
        .notificacao_store
        .insert(&v1.id, NotificacaoTipo::Aprovacao, "Para v1", "mensagem")
        .await
        .expect("insert");

    app.data
        .notificacao_service
        .delete(&v1, &n.id)
        .await
        .expect("delete");

    let list = app
        .data
        .notificacao_service
        .list(&v1, None, None, default_page())
        .await
        .expect("list");
    assert_eq!(list.pagination.total, 0);
}
