// Shared test harness: in-memory database plus recording provider doubles.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, Database, Set};

use ocorrencias_backend::app_data::AppData;
use ocorrencias_backend::config::AppSettings;
use ocorrencias_backend::errors::InternalError;
use ocorrencias_backend::providers::{Mailer, ObjectStorage, StoredImage};
use ocorrencias_backend::services::{CreateOcorrenciaInput, PhotoPayload};
use ocorrencias_backend::types::db::user;
use ocorrencias_backend::types::dto::auth::RegisterRequest;
use ocorrencias_backend::types::enums::{UserStatus, UserTipo};
use ocorrencias_backend::types::internal::Actor;

/// In-memory blob store double. Records every upload and delete, and can be
/// told to fail the Nth upload to exercise the compensation path.
#[derive(Default)]
pub struct MemoryStorage {
    counter: AtomicUsize,
    fail_on_upload: Mutex<Option<usize>>,
    pub uploaded: Mutex<Vec<String>>,
    pub deleted: Mutex<Vec<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the upload with the given zero-based index
    pub fn fail_upload_number(&self, n: usize) {
        *self.fail_on_upload.lock().unwrap() = Some(n);
    }

    pub fn uploaded_ids(&self) -> Vec<String> {
        self.uploaded.lock().unwrap().clone()
    }

    pub fn deleted_ids(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn upload_image(
        &self,
        _data: Vec<u8>,
        _content_type: &str,
    ) -> Result<StoredImage, InternalError> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        if *self.fail_on_upload.lock().unwrap() == Some(n) {
            return Err(InternalError::Storage("injected upload failure".to_string()));
        }

        let storage_id = format!("blob-{n}.jpg");
        self.uploaded.lock().unwrap().push(storage_id.clone());
        Ok(StoredImage {
            url: format!("http://test/media/{storage_id}"),
            thumbnail_url: format!("http://test/media/{storage_id}?size=thumbnail"),
            storage_id,
        })
    }

    async fn delete_image(&self, storage_id: &str) -> Result<(), InternalError> {
        self.deleted.lock().unwrap().push(storage_id.to_string());
        Ok(())
    }
}

/// Mailer double that records every send; can be switched to failing mode to
/// verify email is best effort.
#[derive(Default)]
pub struct RecordingMailer {
    pub fail: AtomicBool,
    pub sent: Mutex<Vec<(String, String, String)>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent_to(&self, to: &str) -> Vec<(String, String)> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _, _)| t == to)
            .map(|(_, subject, body)| (subject.clone(), body.clone()))
            .collect()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), InternalError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(InternalError::Mail("injected mail failure".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string(), body.to_string()));
        Ok(())
    }
}

pub struct TestApp {
    pub data: AppData,
    pub storage: Arc<MemoryStorage>,
    pub mailer: Arc<RecordingMailer>,
}

pub async fn spawn_app() -> TestApp {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("connect test db");
    Migrator::up(&db, None).await.expect("migrate");

    let settings = AppSettings {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test-secret-key-minimum-32-characters-long".to_string(),
        bind_address: "127.0.0.1:0".to_string(),
        public_base_url: "http://test".to_string(),
        media_root: "media".to_string(),
    };

    let storage = Arc::new(MemoryStorage::new());
    let mailer = Arc::new(RecordingMailer::new());
    let data = AppData::with_providers(db, &settings, storage.clone(), mailer.clone());

    TestApp {
        data,
        storage,
        mailer,
    }
}

impl TestApp {
    /// Register through the real flow, then force the account into the given
    /// role/status directly in the database.
    pub async fn seed_user(
        &self,
        nome: &str,
        email: &str,
        cpf: &str,
        senha: &str,
        tipo: UserTipo,
        status: UserStatus,
        is_super_admin: bool,
    ) -> Actor {
        let response = self
            .data
            .user_service
            .register(RegisterRequest {
                nome: nome.to_string(),
                cpf: cpf.to_string(),
                email: email.to_string(),
                senha: senha.to_string(),
                telefone: None,
            })
            .await
            .expect("register seed user");

        let id = response.user.id.clone();
        let active = user::ActiveModel {
            id: Set(id.clone()),
            tipo: Set(tipo),
            status: Set(status),
            is_super_admin: Set(is_super_admin),
            ..Default::default()
        };
        active
            .update(&self.data.db)
            .await
            .expect("promote seed user");

        Actor::new(id, tipo, is_super_admin)
    }

    pub async fn seed_vereador(&self, email: &str, cpf: &str) -> Actor {
        self.seed_user(
            "Vereador Teste",
            email,
            cpf,
            "senha-segura",
            UserTipo::Vereador,
            UserStatus::Ativo,
            false,
        )
        .await
    }

    pub async fn seed_juridico(&self, email: &str, cpf: &str) -> Actor {
        self.seed_user(
            "Jurídico Teste",
            email,
            cpf,
            "senha-segura",
            UserTipo::Juridico,
            UserStatus::Ativo,
            false,
        )
        .await
    }

    pub async fn seed_super_admin(&self, email: &str, cpf: &str) -> Actor {
        self.seed_user(
            "Admin Teste",
            email,
            cpf,
            "senha-segura",
            UserTipo::Admin,
            UserStatus::Ativo,
            true,
        )
        .await
    }
}

pub fn ocorrencia_input(titulo: &str) -> CreateOcorrenciaInput {
    CreateOcorrenciaInput {
        titulo: titulo.to_string(),
        descricao: "Buraco na via principal".to_string(),
        categoria: None,
        endereco: "Rua das Flores, 123".to_string(),
        latitude: Some(-23.55),
        longitude: Some(-46.63),
        prioridade: None,
    }
}

pub fn photo() -> PhotoPayload {
    PhotoPayload {
        data: b"fake-jpeg-bytes".to_vec(),
        content_type: "image/jpeg".to_string(),
    }
}
