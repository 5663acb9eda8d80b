//! Receipt photo policy
//!
//! Decides whether an uploaded file is acceptable as a receipt photo: it must
//! be an image, not empty, and within the configured size limit.

use bytes::Bytes;
use obra_core::config::{PhotoConfig, DEFAULT_MAX_PHOTO_BYTES};
use thiserror::Error;

/// Longest file name kept with a photo
pub const MAX_FILENAME_CHARS: usize = 200;

/// Photo rejections. Messages read as a continuation of "Photo ..."
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhotoError {
    #[error("must be an image (JPG, PNG, HEIC, ...)")]
    NotAnImage { content_type: String },
    #[error("is empty")]
    Empty,
    #[error("is too large (maximum is {limit})")]
    TooLarge { size: usize, limit: String },
}

/// A file as received from the multipart form
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub filename: String,
    /// Declared content type, if the client sent one
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// A photo that passed the policy
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPhoto {
    pub filename: String,
    /// Lowercased MIME essence, e.g. "image/jpeg"
    pub mime: String,
    pub data: Bytes,
}

impl ValidatedPhoto {
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PhotoPolicy {
    max_bytes: usize,
}

impl Default for PhotoPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PHOTO_BYTES)
    }
}

impl From<&PhotoConfig> for PhotoPolicy {
    fn from(config: &PhotoConfig) -> Self {
        Self::new(config.max_photo_bytes)
    }
}

impl PhotoPolicy {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    /// Check an upload. A file input left empty yields `Ok(None)`.
    pub fn check(&self, upload: PhotoUpload) -> Result<Option<ValidatedPhoto>, PhotoError> {
        let filename = upload.filename.trim();
        if filename.is_empty() {
            return Ok(None);
        }

        let content_type = resolve_content_type(upload.content_type.as_deref(), filename);
        if content_type.type_() != mime::IMAGE {
            return Err(PhotoError::NotAnImage {
                content_type: content_type.essence_str().to_string(),
            });
        }

        if upload.data.is_empty() {
            return Err(PhotoError::Empty);
        }
        if upload.data.len() > self.max_bytes {
            return Err(PhotoError::TooLarge {
                size: upload.data.len(),
                limit: human_size(self.max_bytes),
            });
        }

        Ok(Some(ValidatedPhoto {
            filename: filename.chars().take(MAX_FILENAME_CHARS).collect(),
            mime: content_type.essence_str().to_ascii_lowercase(),
            data: upload.data,
        }))
    }
}

/// Declared content type, or a guess from the file name when the client sent
/// none or a generic one
fn resolve_content_type(declared: Option<&str>, filename: &str) -> mime::Mime {
    let declared = declared
        .and_then(|ct| ct.trim().parse::<mime::Mime>().ok())
        .filter(|m| *m != mime::APPLICATION_OCTET_STREAM);

    declared.unwrap_or_else(|| mime_guess::from_path(filename).first_or_octet_stream())
}

/// 3145728 -> "3 MB"
pub fn human_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;
    if bytes >= MB && bytes % MB == 0 {
        format!("{} MB", bytes / MB)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{} KB", bytes / KB)
    } else {
        format!("{} bytes", bytes)
    }
}
