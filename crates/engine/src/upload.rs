//! Upload gateway for wallet icons, avatars and receipts.
//!
//! The engine only needs `upload(file, folder) -> url`; where the bytes end
//! up is the gateway's business. [`OpendalUploadGateway`] stores them through
//! an Apache OpenDAL operator.

use async_trait::async_trait;
use opendal::{Operator, services};
use thiserror::Error;
use uuid::Uuid;

/// Folder for wallet icons.
pub const WALLETS_FOLDER: &str = "wallets";
/// Folder for transaction receipts.
pub const TRANSACTIONS_FOLDER: &str = "transactions";
/// Folder for user avatars.
pub const USERS_FOLDER: &str = "users";

/// A file to upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// An image attached to a wallet, a transaction or a profile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageInput {
    /// Already hosted somewhere, stored as-is.
    Url(String),
    /// Needs to go through the upload gateway first.
    File(FileUpload),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("Cannot upload an empty file")]
    EmptyFile,
    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),
    #[error("Upload storage is misconfigured: {0}")]
    Configuration(String),
    #[error("Failed to upload image: {0}")]
    Operation(String),
}

impl From<opendal::Error> for UploadError {
    fn from(err: opendal::Error) -> Self {
        Self::Operation(err.to_string())
    }
}

/// Stores files and hands back the URL they can be fetched from.
///
/// Calls are all-or-nothing and never retried.
#[async_trait]
pub trait UploadGateway: Send + Sync {
    async fn upload(&self, file: &FileUpload, folder: &str) -> Result<String, UploadError>;
}

/// Upload gateway writing through an OpenDAL operator.
#[derive(Clone, Debug)]
pub struct OpendalUploadGateway {
    operator: Operator,
    public_base_url: String,
}

impl OpendalUploadGateway {
    pub fn new(operator: Operator, public_base_url: &str) -> Self {
        Self {
            operator,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Gateway backed by a local directory.
    pub fn filesystem(root: &str, public_base_url: &str) -> Result<Self, UploadError> {
        let builder = services::Fs::default().root(root);
        let operator = Operator::new(builder)
            .map_err(|e| UploadError::Configuration(e.to_string()))?
            .finish();
        Ok(Self::new(operator, public_base_url))
    }

    fn storage_key(file: &FileUpload, folder: &str) -> String {
        format!(
            "{}/{}-{}",
            folder.trim_matches('/'),
            Uuid::new_v4(),
            sanitize_file_name(&file.file_name)
        )
    }
}

#[async_trait]
impl UploadGateway for OpendalUploadGateway {
    async fn upload(&self, file: &FileUpload, folder: &str) -> Result<String, UploadError> {
        if file.bytes.is_empty() {
            return Err(UploadError::EmptyFile);
        }

        validate_content_type(file.content_type.as_deref())?;

        let key = Self::storage_key(file, folder);
        let mut write = self.operator.write_with(&key, file.bytes.clone());
        if let Some(content_type) = &file.content_type
            && self.operator.info().full_capability().write_with_content_type
        {
            write = write.content_type(content_type);
        }
        write.await?;
        tracing::debug!(key = %key, size = file.bytes.len(), "image uploaded");

        Ok(format!("{}/{key}", self.public_base_url))
    }
}

/// Only images are stored; a missing content type is left to the backend.
fn validate_content_type(content_type: Option<&str>) -> Result<(), UploadError> {
    match content_type {
        Some(value) if !value.trim().to_ascii_lowercase().starts_with("image/") => {
            Err(UploadError::UnsupportedType(value.to_string()))
        }
        _ => Ok(()),
    }
}

fn sanitize_file_name(file_name: &str) -> String {
    let sanitized: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if sanitized.is_empty() {
        "file".to_string()
    } else {
        sanitized
    }
}
