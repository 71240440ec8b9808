//! Media upload
//!
//! Inline image payloads are uploaded to a bucket endpoint and replaced by
//! their public URL before anything reaches the store. The uploader is
//! fallible and slow; callers await it and surface failures as 500s.

use async_trait::async_trait;
use uuid::Uuid;

use scrapbook_core::MediaConfig;

use crate::models::InlinePayload;

/// Media upload error type
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("media upload failed: {0}")]
    Upload(#[from] reqwest::Error),

    #[error("media storage misconfigured: {0}")]
    Config(&'static str),
}

/// Resolves a decoded inline payload to a publicly dereferenceable URL
#[async_trait]
pub trait MediaUploader: Send + Sync {
    async fn upload(&self, payload: &InlinePayload) -> Result<String, MediaError>;
}

/// Uploader backed by an S3-compatible bucket endpoint.
///
/// Objects are keyed `<prefix>/<uuid>.<ext>`; the returned URL joins the
/// configured public base with the key.
pub struct HttpMediaUploader {
    http: reqwest::Client,
    config: MediaConfig,
}

impl HttpMediaUploader {
    pub fn new(config: MediaConfig) -> Result<Self, MediaError> {
        if config.api_token.trim().is_empty() {
            return Err(MediaError::Config("media api token is empty"));
        }

        let http = reqwest::Client::builder().build()?;
        Ok(Self { http, config })
    }

    fn object_key(&self, extension: &str) -> String {
        format!("{}/{}.{}", self.config.key_prefix, Uuid::new_v4(), extension)
    }
}

#[async_trait]
impl MediaUploader for HttpMediaUploader {
    async fn upload(&self, payload: &InlinePayload) -> Result<String, MediaError> {
        let key = self.object_key(payload.extension);
        let target = format!(
            "{}/{}/{}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.bucket,
            key
        );

        tracing::debug!(key = %key, bytes = payload.bytes.len(), "uploading image");

        self.http
            .put(&target)
            .bearer_auth(&self.config.api_token)
            .header(reqwest::header::CONTENT_TYPE, &payload.content_type)
            .body(payload.bytes.clone())
            .send()
            .await?
            .error_for_status()?;

        Ok(self.config.object_url(&key))
    }
}
