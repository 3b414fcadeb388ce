//! Image payload loading: existence, size limit and magic-byte checks.

use std::path::Path;

use base64::Engine;

use crate::error::{PipelineError, PipelineResult};

/// An image read from disk, ready to embed in a chat message.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    /// Raw file bytes
    pub bytes: Vec<u8>,
    /// MIME type detected from the file header (e.g., "image/png")
    pub media_type: &'static str,
}

impl ImagePayload {
    /// Read and validate an image file.
    ///
    /// Checks:
    /// - File exists
    /// - File size is within `max_file_size_mb`
    /// - File has valid image magic bytes
    pub async fn load(path: &Path, max_file_size_mb: u64) -> PipelineResult<Self> {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PipelineError::FileNotFound(path.to_path_buf()));
            }
            Err(source) => {
                return Err(PipelineError::ImageRead {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let max_bytes = max_file_size_mb.saturating_mul(1024 * 1024);
        if metadata.len() > max_bytes {
            return Err(PipelineError::FileTooLarge {
                path: path.to_path_buf(),
                size_mb: metadata.len() / (1024 * 1024),
                max_mb: max_file_size_mb,
            });
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| PipelineError::ImageRead {
                path: path.to_path_buf(),
                source,
            })?;

        Self::from_bytes(bytes, path)
    }

    /// Wrap bytes already in memory; `origin` is only used in error messages.
    pub fn from_bytes(bytes: Vec<u8>, origin: &Path) -> PipelineResult<Self> {
        let media_type = sniff_media_type(&bytes).ok_or_else(|| {
            let message = if bytes.len() < 4 {
                "File too small to be a valid image".to_string()
            } else {
                "Unrecognized image format (invalid magic bytes)".to_string()
            };
            PipelineError::UnsupportedFormat {
                path: origin.to_path_buf(),
                message,
            }
        })?;

        tracing::debug!("Loaded {} ({}, {} bytes)", origin.display(), media_type, bytes.len());
        Ok(Self { bytes, media_type })
    }

    /// Base64 of the raw bytes.
    pub fn base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }

    /// Return a `data:` URL suitable for OpenAI-style APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.base64())
    }
}

/// Detect the MIME type from the file header.
fn sniff_media_type(header: &[u8]) -> Option<&'static str> {
    match header {
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [0x89, b'P', b'N', b'G', ..] => Some("image/png"),
        [b'G', b'I', b'F', b'8', ..] => Some("image/gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("image/webp"),
        [b'B', b'M', ..] => Some("image/bmp"),
        _ => None,
    }
}
