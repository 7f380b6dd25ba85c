use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::InternalError;

/// Result of a successful image upload
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub url: String,
    pub thumbnail_url: String,
    /// Opaque identifier required to delete the blob later
    pub storage_id: String,
}

/// Gateway to the blob store holding incident and profile photos.
///
/// Injected into services so tests can substitute an in-memory double,
/// including one that fails on demand to exercise the compensation path.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn upload_image(
        &self,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredImage, InternalError>;

    async fn delete_image(&self, storage_id: &str) -> Result<(), InternalError>;
}

/// Default implementation backed by the local filesystem, served back under
/// `{public_base_url}/media/`. Production deployments substitute a cloud
/// store behind the same trait.
pub struct LocalDiskStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalDiskStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    fn extension_for(content_type: &str) -> &'static str {
        match content_type {
            "image/png" => "png",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "jpg",
        }
    }
}

#[async_trait]
impl ObjectStorage for LocalDiskStorage {
    async fn upload_image(
        &self,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredImage, InternalError> {
        let storage_id = format!(
            "{}.{}",
            Uuid::new_v4(),
            Self::extension_for(content_type)
        );
        let path = self.root.join(&storage_id);

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| InternalError::Storage(format!("create media dir: {e}")))?;
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| InternalError::Storage(format!("write {storage_id}: {e}")))?;

        let url = format!("{}/media/{}", self.public_base_url, storage_id);
        // Scaling is delegated to the media proxy; the thumbnail is a
        // transform URL over the same blob.
        let thumbnail_url = format!("{url}?size=thumbnail");

        Ok(StoredImage {
            url,
            thumbnail_url,
            storage_id,
        })
    }

    async fn delete_image(&self, storage_id: &str) -> Result<(), InternalError> {
        let path = self.root.join(storage_id);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            // Already gone: deletion is idempotent
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(InternalError::Storage(format!(
                "delete {storage_id}: {e}"
            ))),
        }
    }
}
