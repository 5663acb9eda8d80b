//! Media Store Abstraction
//!
//! Receipt photos can be handed to an external media service instead of being
//! kept in the database. The service receives the image and answers with a
//! public URL plus an opaque reference id.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use obra_core::config::MediaConfig;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::photo::ValidatedPhoto;

/// Media store errors
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Media service error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("Unexpected media service response: {0}")]
    InvalidResponse(String),
    #[error("Media store unavailable: {0}")]
    Unavailable(String),
}

pub type MediaResult<T> = Result<T, MediaError>;

/// Where an uploaded photo ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMedia {
    /// Public URL the photo is served from
    pub url: String,
    /// Provider-side id of the asset
    pub reference: String,
}

/// Media store trait
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Upload a photo under the given key
    async fn upload(&self, key: &str, photo: &ValidatedPhoto) -> MediaResult<StoredMedia>;

    /// Store name for logging
    fn name(&self) -> &str;
}

/// Generate the storage key for an expense photo: `expenses/YYYY/MM/DD/<uuid>`
pub fn generate_photo_key(spent_on: NaiveDate) -> String {
    format!(
        "expenses/{:04}/{:02}/{:02}/{}",
        spent_on.year(),
        spent_on.month(),
        spent_on.day(),
        Uuid::new_v4()
    )
}

/// Cloudinary-compatible hosted media store.
///
/// Uploads are signed: the sorted upload parameters are joined as
/// `k=v&k=v`, the API secret is appended and the whole string is hashed with
/// SHA-256.
pub struct HostedMediaStore {
    client: reqwest::Client,
    config: MediaConfig,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    url: Option<String>,
    public_id: Option<String>,
}

impl HostedMediaStore {
    pub fn new(config: MediaConfig) -> MediaResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        info!(endpoint = %config.upload_url, "Hosted media store initialized");
        Ok(Self { client, config })
    }

    /// Reuse an existing client (connection pooling)
    pub fn with_client(client: reqwest::Client, config: MediaConfig) -> Self {
        Self { client, config }
    }

    /// Signed parameters for one upload, sorted by name
    fn signed_params(&self, key: &str, timestamp: i64) -> Vec<(&'static str, String)> {
        let mut params = vec![("public_id", key.to_string()), ("timestamp", timestamp.to_string())];
        if let Some(folder) = &self.config.folder {
            params.push(("folder", folder.clone()));
        }
        params.sort_by(|a, b| a.0.cmp(b.0));
        params
    }

    fn sign(&self, params: &[(&'static str, String)]) -> String {
        sign_params(params, &self.config.api_secret)
    }
}

/// SHA-256 signature over `k=v&k=v<secret>`; `params` must already be sorted
pub fn sign_params(params: &[(&str, String)], secret: &str) -> String {
    let to_sign = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl MediaStore for HostedMediaStore {
    #[instrument(skip(self, photo), fields(store = "hosted", size = photo.size()))]
    async fn upload(&self, key: &str, photo: &ValidatedPhoto) -> MediaResult<StoredMedia> {
        let params = self.signed_params(key, Utc::now().timestamp());
        let signature = self.sign(&params);

        let file = reqwest::multipart::Part::bytes(photo.data.to_vec())
            .file_name(photo.filename.clone())
            .mime_str(&photo.mime)?;

        let mut form = reqwest::multipart::Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        for (name, value) in params {
            form = form.text(name, value);
        }

        let response = self
            .client
            .post(&self.config.upload_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {e}>"));
            return Err(MediaError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body: UploadResponse = response.json().await?;
        let url = body
            .secure_url
            .or(body.url)
            .ok_or_else(|| MediaError::InvalidResponse("missing secure_url".into()))?;
        let reference = body
            .public_id
            .ok_or_else(|| MediaError::InvalidResponse("missing public_id".into()))?;

        debug!(url = %url, reference = %reference, "Photo uploaded");
        Ok(StoredMedia { url, reference })
    }

    fn name(&self) -> &str {
        "hosted"
    }
}

/// In-memory media store for testing
pub struct MemoryMediaStore {
    base_url: String,
    files: RwLock<HashMap<String, ValidatedPhoto>>,
    available: AtomicBool,
}

impl Default for MemoryMediaStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryMediaStore {
    pub fn new() -> Self {
        Self {
            base_url: "https://media.invalid".to_string(),
            files: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// A store whose uploads always fail
    pub fn unavailable() -> Self {
        let store = Self::new();
        store.set_available(false);
        store
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub async fn get(&self, key: &str) -> Option<ValidatedPhoto> {
        self.files.read().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.files.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl MediaStore for MemoryMediaStore {
    async fn upload(&self, key: &str, photo: &ValidatedPhoto) -> MediaResult<StoredMedia> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(MediaError::Unavailable("memory store switched off".into()));
        }

        let mut files = self.files.write().await;
        files.insert(key.to_string(), photo.clone());

        Ok(StoredMedia {
            url: format!("{}/{}", self.base_url, key),
            reference: key.to_string(),
        })
    }

    fn name(&self) -> &str {
        "memory"
    }
}
