use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppSettings;
use crate::providers::{LocalDiskStorage, LogMailer, Mailer, ObjectStorage};
use crate::services::{
    MemoryCsrfStore, NotificacaoService, OcorrenciaService, PasswordService, TokenService,
    UserService,
};
use crate::stores::{NotificacaoStore, OcorrenciaStore, PasswordResetStore, UserStore};

/// Centralized application data following the main-owned stores pattern.
///
/// Everything is created once in main and shared by the API structs. Tests
/// build the same graph over an in-memory database, swapping the storage
/// and mailer providers for doubles.
pub struct AppData {
    pub db: DatabaseConnection,
    pub user_store: Arc<UserStore>,
    pub ocorrencia_store: Arc<OcorrenciaStore>,
    pub notificacao_store: Arc<NotificacaoStore>,
    pub token_service: Arc<TokenService>,
    pub csrf_store: Arc<MemoryCsrfStore>,
    pub user_service: Arc<UserService>,
    pub ocorrencia_service: Arc<OcorrenciaService>,
    pub notificacao_service: Arc<NotificacaoService>,
}

impl AppData {
    /// Wire the stores, providers and services over an already-migrated
    /// connection.
    pub fn init(db: DatabaseConnection, settings: &AppSettings) -> Self {
        let storage: Arc<dyn ObjectStorage> = Arc::new(LocalDiskStorage::new(
            settings.media_root.clone(),
            settings.public_base_url.clone(),
        ));
        let mailer: Arc<dyn Mailer> = Arc::new(LogMailer);

        Self::with_providers(db, settings, storage, mailer)
    }

    pub fn with_providers(
        db: DatabaseConnection,
        settings: &AppSettings,
        storage: Arc<dyn ObjectStorage>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let user_store = Arc::new(UserStore::new(db.clone()));
        let ocorrencia_store = Arc::new(OcorrenciaStore::new(db.clone()));
        let notificacao_store = Arc::new(NotificacaoStore::new(db.clone()));
        let reset_store = Arc::new(PasswordResetStore::new(db.clone()));

        let token_service = Arc::new(TokenService::new(settings.jwt_secret.clone()));
        let csrf_store = Arc::new(MemoryCsrfStore::new());

        let user_service = Arc::new(UserService::new(
            user_store.clone(),
            notificacao_store.clone(),
            reset_store,
            PasswordService::new(),
            TokenService::new(settings.jwt_secret.clone()),
            mailer.clone(),
            storage.clone(),
        ));
        let ocorrencia_service = Arc::new(OcorrenciaService::new(
            ocorrencia_store.clone(),
            user_store.clone(),
            storage,
            mailer,
        ));
        let notificacao_service = Arc::new(NotificacaoService::new(notificacao_store.clone()));

        Self {
            db,
            user_store,
            ocorrencia_store,
            notificacao_store,
            token_service,
            csrf_store,
            user_service,
            ocorrencia_service,
            notificacao_service,
        }
    }
}
