pub mod cloudinary;

use async_trait::async_trait;

use crate::models::Document;

pub use cloudinary::CloudinaryStore;

/// How the provider should treat an upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOptions {
    pub folder: String,
    pub resource_type: ResourceType,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResourceType {
    /// Let the provider detect the content type.
    Auto,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Auto => "auto",
        }
    }
}

impl UploadOptions {
    pub fn auto(folder: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            resource_type: ResourceType::Auto,
        }
    }
}

/// A document the provider accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub secure_url: String,
    pub public_id: Option<String>,
}

#[derive(Debug)]
pub enum UploadError {
    Request(String),
    Rejected { status: u16, message: String },
    InvalidResponse(String),
}

impl std::fmt::Display for UploadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadError::Request(msg) => write!(f, "request failed: {msg}"),
            UploadError::Rejected { status, message } => {
                write!(f, "rejected with status {status}: {message}")
            }
            UploadError::InvalidResponse(msg) => write!(f, "invalid response: {msg}"),
        }
    }
}

impl std::error::Error for UploadError {}

/// External object store holding submitted documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn upload(
        &self,
        document: &Document,
        options: &UploadOptions,
    ) -> Result<StoredDocument, UploadError>;
}
