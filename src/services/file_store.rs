use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    config::Config,
    constants::ALLOWED_UPLOAD_EXTENSIONS,
    errors::{AppError, AppResult},
    models::domain::StoredFile,
};

/// A binary upload as received from the transport.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// File storage collaborator. The returned `file_url` is opaque to callers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn store(&self, upload: FileUpload) -> AppResult<StoredFile>;
    async fn remove(&self, file_url: &str) -> AppResult<()>;
}

/// Stores uploads on local disk under `upload_dir` and serves them from
/// `public_prefix`.
pub struct LocalFileStore {
    upload_dir: PathBuf,
    public_prefix: String,
    max_bytes: u64,
}

fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

impl LocalFileStore {
    pub fn new(upload_dir: impl Into<PathBuf>, public_prefix: &str, max_bytes: u64) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            public_prefix: public_prefix.trim_end_matches('/').to_string(),
            max_bytes,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.upload_dir,
            &config.upload_public_prefix,
            config.max_upload_bytes,
        )
    }

    pub fn validate(&self, upload: &FileUpload) -> AppResult<String> {
        if upload.bytes.is_empty() {
            return Err(AppError::ValidationError("Uploaded file is empty".to_string()));
        }

        if upload.bytes.len() as u64 > self.max_bytes {
            return Err(AppError::ValidationError(format!(
                "Uploaded file exceeds the {} byte limit",
                self.max_bytes
            )));
        }

        match extension_of(&upload.file_name) {
            Some(ext) if ALLOWED_UPLOAD_EXTENSIONS.contains(&ext.as_str()) => Ok(ext),
            _ => Err(AppError::ValidationError(format!(
                "File type of '{}' is not allowed",
                upload.file_name
            ))),
        }
    }

    /// Maps a public URL produced by `store` back to its path on disk.
    fn path_for(&self, file_url: &str) -> Option<PathBuf> {
        let stored_name = file_url
            .strip_prefix(&self.public_prefix)?
            .trim_start_matches('/');

        if stored_name.is_empty() || stored_name.contains('/') || stored_name.contains("..") {
            return None;
        }
        Some(self.upload_dir.join(stored_name))
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn store(&self, upload: FileUpload) -> AppResult<StoredFile> {
        let ext = self.validate(&upload)?;

        tokio::fs::create_dir_all(&self.upload_dir).await?;

        let stored_name = format!("{}.{}", Uuid::new_v4(), ext);
        let path = self.upload_dir.join(&stored_name);
        tokio::fs::write(&path, &upload.bytes).await?;

        log::info!(
            "Stored upload '{}' ({} bytes) at {}",
            upload.file_name,
            upload.bytes.len(),
            path.display()
        );

        Ok(StoredFile {
            file_url: format!("{}/{}", self.public_prefix, stored_name),
            file_name: upload.file_name,
            file_size: upload.bytes.len() as i64,
        })
    }

    async fn remove(&self, file_url: &str) -> AppResult<()> {
        let Some(path) = self.path_for(file_url) else {
            log::warn!("Not removing file outside the upload directory: {}", file_url);
            return Ok(());
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
