use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};

use super::{DocumentStore, StoredDocument, UploadError, UploadOptions};
use crate::config::{CloudinaryConfig, SignatureAlgorithm};
use crate::models::Document;

/// Signed uploads to the Cloudinary upload API.
pub struct CloudinaryStore {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl CloudinaryStore {
    pub fn new(config: CloudinaryConfig) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {e}"))?;

        Ok(Self { client, config })
    }

    fn upload_url(&self, options: &UploadOptions) -> String {
        format!(
            "{}/v1_1/{}/{}/upload",
            self.config.api_base,
            self.config.cloud_name,
            options.resource_type.as_str()
        )
    }
}

/// Sign upload parameters: sorted `key=value` pairs joined by `&`, then the
/// secret appended, hex digest.
pub fn sign(
    params: &BTreeMap<&str, String>,
    api_secret: &str,
    algorithm: SignatureAlgorithm,
) -> String {
    let to_sign = params
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    let payload = format!("{to_sign}{api_secret}");

    match algorithm {
        SignatureAlgorithm::Sha1 => hex::encode(Sha1::digest(payload.as_bytes())),
        SignatureAlgorithm::Sha256 => hex::encode(Sha256::digest(payload.as_bytes())),
    }
}

#[async_trait]
impl DocumentStore for CloudinaryStore {
    async fn upload(
        &self,
        document: &Document,
        options: &UploadOptions,
    ) -> Result<StoredDocument, UploadError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();

        let mut params: BTreeMap<&'static str, String> = BTreeMap::new();
        params.insert("folder", options.folder.clone());
        params.insert("timestamp", timestamp);

        let signature = sign(
            &params,
            &self.config.api_secret,
            self.config.signature_algorithm,
        );

        let mut file = Part::stream_with_length(
            reqwest::Body::from(document.bytes.clone()),
            document.len() as u64,
        )
        .file_name(
            document
                .file_name
                .clone()
                .unwrap_or_else(|| "document".to_string()),
        );
        file = file
            .mime_str(&document.content_type)
            .map_err(|e| UploadError::Request(format!("Invalid content type: {e}")))?;

        let mut form = Form::new()
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature);
        for (key, value) in params {
            form = form.text(key, value);
        }
        let form = form.part("file", file);

        let resp = self
            .client
            .post(self.upload_url(options))
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Request(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| UploadError::Request(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).chars().take(1024).collect());
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: UploadResponse = serde_json::from_slice(&body)
            .map_err(|e| UploadError::InvalidResponse(e.to_string()))?;

        tracing::debug!(
            public_id = parsed.public_id.as_deref().unwrap_or(""),
            "Document stored"
        );

        Ok(StoredDocument {
            secure_url: parsed.secure_url,
            public_id: parsed.public_id,
        })
    }
}
