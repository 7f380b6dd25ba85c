// Incident lifecycle: creation with photos, ownership isolation, triage and
// deletion, including blob compensation when the create fails midway.

mod common;

use common::{ocorrencia_input, photo, spawn_app};
use ocorrencias_backend::errors::OcorrenciaError;
use ocorrencias_backend::stores::OcorrenciaFilters;
use ocorrencias_backend::types::dto::common::PageParams;
use ocorrencias_backend::types::dto::ocorrencia::UpdateStatusRequest;
use ocorrencias_backend::types::enums::{
    NotificacaoTipo, OcorrenciaCategoria, OcorrenciaPrioridade, OcorrenciaStatus,
};

fn default_page() -> PageParams {
    PageParams::clamp(None, None, 20)
}

#[tokio::test]
async fn test_create_with_photos_applies_defaults_and_audit_entry() {
    let app = spawn_app().await;
    let vereador = app.seed_vereador("v1@camara.gov.br", "11122233344").await;

    let created = app
        .data
        .ocorrencia_service
        .create(&vereador, ocorrencia_input("Buraco na rua"), vec![photo(), photo()])
        .await
        .expect("create");

    assert_eq!(created.status, OcorrenciaStatus::Pendente);
    assert_eq!(created.categoria, OcorrenciaCategoria::Outros);
    assert_eq!(created.prioridade, OcorrenciaPrioridade::Media);
    assert_eq!(created.fotos.len(), 2);
    assert_eq!(created.fotos[0].ordem, 0);
    assert_eq!(created.fotos[1].ordem, 1);

    let detalhe = app
        .data
        .ocorrencia_service
        .get_by_id(&vereador, &created.id)
        .await
        .expect("detail");
    assert_eq!(detalhe.historicos.len(), 1);
    assert_eq!(detalhe.historicos[0].acao, "CRIADA");
}

#[tokio::test]
async fn test_create_rejects_out_of_range_coordinates() {
    let app = spawn_app().await;
    let vereador = app.seed_vereador("v1@camara.gov.br", "11122233344").await;

    let mut input = ocorrencia_input("Coordenadas erradas");
    input.latitude = Some(200.0);
    input.longitude = Some(-500.0);

    let result = app
        .data
        .ocorrencia_service
        .create(&vereador, input, vec![])
        .await;
    assert!(matches!(result, Err(OcorrenciaError::Validation(_))));

    // Boundary values are valid
    let mut limite = ocorrencia_input("Nos limites");
    limite.latitude = Some(-90.0);
    limite.longitude = Some(180.0);
    app.data
        .ocorrencia_service
        .create(&vereador, limite, vec![])
        .await
        .expect("boundary coordinates");
}

#[tokio::test]
async fn test_create_notifies_active_juridico_by_email() {
    let app = spawn_app().await;
    let vereador = app.seed_vereador("v1@camara.gov.br", "11122233344").await;
    app.seed_juridico("juridico@camara.gov.br", "55566677788")
        .await;

    app.data
        .ocorrencia_service
        .create(&vereador, ocorrencia_input("Poste apagado"), vec![])
        .await
        .expect("create");

    let emails = app.mailer.sent_to("juridico@camara.gov.br");
    assert_eq!(emails.len(), 1);
    assert!(emails[0].1.contains("Poste apagado"));
}

#[tokio::test]
async fn test_create_succeeds_even_when_email_fails() {
    let app = spawn_app().await;
    let vereador = app.seed_vereador("v1@camara.gov.br", "11122233344").await;
    app.seed_juridico("juridico@camara.gov.br", "55566677788")
        .await;
    app.mailer
        .fail
        .store(true, std::sync::atomic::Ordering::SeqCst);

    let result = app
        .data
        .ocorrencia_service
        .create(&vereador, ocorrencia_input("Poste apagado"), vec![photo()])
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_failed_upload_rolls_back_stored_blobs() {
    let app = spawn_app().await;
    let vereador = app.seed_vereador("v1@camara.gov.br", "11122233344").await;
    app.storage.fail_upload_number(1);

    let result = app
        .data
        .ocorrencia_service
        .create(
            &vereador,
            ocorrencia_input("Falha no upload"),
            vec![photo(), photo(), photo()],
        )
        .await;

    assert!(matches!(result, Err(OcorrenciaError::InternalError(_))));

    // Every blob that made it to storage was compensated
    let uploaded = app.storage.uploaded_ids();
    let deleted = app.storage.deleted_ids();
    assert!(!uploaded.is_empty());
    for id in &uploaded {
        assert!(deleted.contains(id), "blob {id} was not cleaned up");
    }

    // And no incident row exists
    let (rows, total) = app
        .data
        .ocorrencia_store
        .list(&OcorrenciaFilters::default(), default_page())
        .await
        .expect("list");
    assert!(rows.is_empty());
    assert_eq!(total, 0);
}

#[tokio::test]
async fn test_only_vereador_creates() {
    let app = spawn_app().await;
    let juridico = app.seed_juridico("j@camara.gov.br", "55566677788").await;

    let result = app
        .data
        .ocorrencia_service
        .create(&juridico, ocorrencia_input("Indevida"), vec![])
        .await;
    assert!(matches!(result, Err(OcorrenciaError::Forbidden(_))));
}

#[tokio::test]
async fn test_vereador_list_is_pinned_to_own_records() {
    let app = spawn_app().await;
    let v1 = app.seed_vereador("v1@camara.gov.br", "11122233344").await;
    let v2 = app.seed_vereador("v2@camara.gov.br", "55566677788").await;

    app.data
        .ocorrencia_service
        .create(&v1, ocorrencia_input("Do vereador 1"), vec![])
        .await
        .expect("create v1");
    app.data
        .ocorrencia_service
        .create(&v2, ocorrencia_input("Do vereador 2"), vec![])
        .await
        .expect("create v2");

    // Even asking explicitly for v2's records, v1 sees only their own
    let filters = OcorrenciaFilters {
        vereador_id: Some(v2.id.clone()),
        ..Default::default()
    };
    let page = app
        .data
        .ocorrencia_service
        .list(&v1, filters, default_page())
        .await
        .expect("list");

    assert_eq!(page.pagination.total, 1);
    assert_eq!(page.ocorrencias[0].titulo, "Do vereador 1");
}

#[tokio::test]
async fn test_reviewers_see_everything() {
    let app = spawn_app().await;
    let v1 = app.seed_vereador("v1@camara.gov.br", "11122233344").await;
    let v2 = app.seed_vereador("v2@camara.gov.br", "55566677788").await;
    let juridico = app.seed_juridico("j@camara.gov.br", "99988877766").await;

    app.data
        .ocorrencia_service
        .create(&v1, ocorrencia_input("Um"), vec![])
        .await
        .expect("create");
    app.data
        .ocorrencia_service
        .create(&v2, ocorrencia_input("Dois"), vec![])
        .await
        .expect("create");

    let page = app
        .data
        .ocorrencia_service
        .list(&juridico, OcorrenciaFilters::default(), default_page())
        .await
        .expect("list");
    assert_eq!(page.pagination.total, 2);
}

#[tokio::test]
async fn test_detail_of_foreign_incident_is_forbidden_not_missing() {
    let app = spawn_app().await;
    let v1 = app.seed_vereador("v1@camara.gov.br", "11122233344").await;
    let v2 = app.seed_vereador("v2@camara.gov.br", "55566677788").await;

    let created = app
        .data
        .ocorrencia_service
        .create(&v1, ocorrencia_input("Do vereador 1"), vec![])
        .await
        .expect("create");

    let result = app.data.ocorrencia_service.get_by_id(&v2, &created.id).await;
    assert!(matches!(result, Err(OcorrenciaError::Forbidden(_))));

    let missing = app
        .data
        .ocorrencia_service
        .get_by_id(&v1, "id-inexistente")
        .await;
    assert!(matches!(missing, Err(OcorrenciaError::NotFound(_))));
}

#[tokio::test]
async fn test_status_update_records_history_and_notifies_reporter() {
    let app = spawn_app().await;
    let vereador = app.seed_vereador("v1@camara.gov.br", "11122233344").await;
    let juridico = app.seed_juridico("j@camara.gov.br", "55566677788").await;

    let created = app
        .data
        .ocorrencia_service
        .create(&vereador, ocorrencia_input("Buraco na rua"), vec![])
        .await
        .expect("create");

    let updated = app
        .data
        .ocorrencia_service
        .update_status(
            &juridico,
            &created.id,
            UpdateStatusRequest {
                status: OcorrenciaStatus::EmAnalise,
                comentario: Some("Encaminhado à secretaria".to_string()),
            },
        )
        .await
        .expect("update status");
    assert_eq!(updated.status, OcorrenciaStatus::EmAnalise);

    let detalhe = app
        .data
        .ocorrencia_service
        .get_by_id(&juridico, &created.id)
        .await
        .expect("detail");
    assert_eq!(detalhe.historicos.len(), 2);
    assert_eq!(detalhe.historicos[0].acao, "STATUS_ALTERADO_EM_ANALISE");
    assert_eq!(
        detalhe.historicos[0].comentario.as_deref(),
        Some("Encaminhado à secretaria")
    );

    let (notificacoes, _) = app
        .data
        .notificacao_store
        .list(&vereador.id, None, None, default_page())
        .await
        .expect("notificacoes");
    assert_eq!(notificacoes.len(), 1);
    assert_eq!(notificacoes[0].tipo, NotificacaoTipo::StatusAlterado);
    assert!(notificacoes[0].mensagem.contains("Buraco na rua"));
}

#[tokio::test]
async fn test_history_lists_most_recent_change_first() {
    let app = spawn_app().await;
    let vereador = app.seed_vereador("v1@camara.gov.br", "11122233344").await;
    let juridico = app.seed_juridico("j@camara.gov.br", "55566677788").await;

    let created = app
        .data
        .ocorrencia_service
        .create(&vereador, ocorrencia_input("Encadeada"), vec![])
        .await
        .expect("create");

    // Back-to-back transitions land within the same second; the order must
    // still come back newest first
    for status in [OcorrenciaStatus::EmAnalise, OcorrenciaStatus::Resolvido] {
        app.data
            .ocorrencia_service
            .update_status(
                &juridico,
                &created.id,
                UpdateStatusRequest {
                    status,
                    comentario: None,
                },
            )
            .await
            .expect("update status");
    }

    let detalhe = app
        .data
        .ocorrencia_service
        .get_by_id(&juridico, &created.id)
        .await
        .expect("detail");
    let acoes: Vec<&str> = detalhe.historicos.iter().map(|h| h.acao.as_str()).collect();
    assert_eq!(
        acoes,
        [
            "STATUS_ALTERADO_RESOLVIDO",
            "STATUS_ALTERADO_EM_ANALISE",
            "CRIADA"
        ]
    );
}

#[tokio::test]
async fn test_vereador_cannot_change_status() {
    let app = spawn_app().await;
    let vereador = app.seed_vereador("v1@camara.gov.br", "11122233344").await;

    let created = app
        .data
        .ocorrencia_service
        .create(&vereador, ocorrencia_input("Minha própria"), vec![])
        .await
        .expect("create");

    let result = app
        .data
        .ocorrencia_service
        .update_status(
            &vereador,
            &created.id,
            UpdateStatusRequest {
                status: OcorrenciaStatus::Resolvido,
                comentario: None,
            },
        )
        .await;
    assert!(matches!(result, Err(OcorrenciaError::Forbidden(_))));
}

#[tokio::test]
async fn test_vereador_deletes_only_own_pending() {
    let app = spawn_app().await;
    let vereador = app.seed_vereador("v1@camara.gov.br", "11122233344").await;
    let juridico = app.seed_juridico("j@camara.gov.br", "55566677788").await;

    let created = app
        .data
        .ocorrencia_service
        .create(&vereador, ocorrencia_input("A deletar"), vec![photo()])
        .await
        .expect("create");

    // Once triage starts the owner can no longer delete
    app.data
        .ocorrencia_service
        .update_status(
            &juridico,
            &created.id,
            UpdateStatusRequest {
                status: OcorrenciaStatus::EmAnalise,
                comentario: None,
            },
        )
        .await
        .expect("triage");

    let blocked = app
        .data
        .ocorrencia_service
        .delete(&vereador, &created.id)
        .await
        .expect_err("delete after triage");
    assert!(blocked.message().contains("pendentes"));

    // A fresh pending incident deletes fine, blobs included
    let fresh = app
        .data
        .ocorrencia_service
        .create(&vereador, ocorrencia_input("Pendente"), vec![photo()])
        .await
        .expect("create fresh");
    app.data
        .ocorrencia_service
        .delete(&vereador, &fresh.id)
        .await
        .expect("delete pending");

    let deleted = app.storage.deleted_ids();
    assert!(!deleted.is_empty());
}

#[tokio::test]
async fn test_admin_deletes_any_status() {
    let app = spawn_app().await;
    let vereador = app.seed_vereador("v1@camara.gov.br", "11122233344").await;
    let admin = app.seed_super_admin("a@camara.gov.br", "55566677788").await;

    let created = app
        .data
        .ocorrencia_service
        .create(&vereador, ocorrencia_input("Qualquer"), vec![])
        .await
        .expect("create");
    app.data
        .ocorrencia_service
        .update_status(
            &admin,
            &created.id,
            UpdateStatusRequest {
                status: OcorrenciaStatus::Resolvido,
                comentario: None,
            },
        )
        .await
        .expect("resolve");

    app.data
        .ocorrencia_service
        .delete(&admin, &created.id)
        .await
        .expect("admin delete");
}

#[tokio::test]
async fn test_stats_gated_to_reviewers() {
    let app = spawn_app().await;
    let vereador = app.seed_vereador("v1@camara.gov.br", "11122233344").await;
    let juridico = app.seed_juridico("j@camara.gov.br", "55566677788").await;

    app.data
        .ocorrencia_service
        .create(&vereador, ocorrencia_input("Uma"), vec![])
        .await
        .expect("create");

    let stats = app
        .data
        .ocorrencia_service
        .stats(&juridico)
        .await
        .expect("stats");
    assert_eq!(stats.total, 1);
    assert_eq!(stats.pendentes, 1);

    let denied = app.data.ocorrencia_service.stats(&vereador).await;
    assert!(matches!(denied, Err(OcorrenciaError::Forbidden(_))));
}
