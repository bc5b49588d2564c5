//! Upload endpoints: local files and YouTube URLs

use super::types::{ContentTypeTag, UploadAck};
use super::ApiClient;
use crate::error::{AppError, Result};
use reqwest::multipart::{Form, Part};
use std::path::Path;
use tracing::info;

impl ApiClient {
    /// Send a local file as `multipart/form-data` to `POST /upload/`.
    ///
    /// The backend acknowledges immediately with `status: "processing"` and
    /// ingests in the background; completion is observed later through the
    /// file registry's `processed` flag.
    pub async fn upload_file(&self, path: &Path, tag: ContentTypeTag) -> Result<UploadAck> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| AppError::Validation("File has no usable name".to_string()))?
            .to_string();

        info!("ApiClient::upload_file - {} ({})", name, tag.as_str());

        let data = tokio::fs::read(path).await?;
        let form = Form::new()
            .part("file", Part::bytes(data).file_name(name))
            .text("file_type", tag.as_str());

        let response = self
            .client
            .post(format!("{}/upload/", self.base))
            .multipart(form)
            .send()
            .await?;

        let mut ack: UploadAck = Self::decode(response).await?;
        if let Some(error) = ack.error.take() {
            return Err(AppError::Backend(error));
        }
        Ok(ack)
    }

    /// Register a YouTube URL for background download and ingestion
    pub async fn upload_youtube(&self, url: &str, tag: ContentTypeTag) -> Result<UploadAck> {
        info!("ApiClient::upload_youtube - {} ({})", url, tag.as_str());

        let response = self
            .client
            .post(format!("{}/upload-youtube/", self.base))
            .form(&[("url", url), ("file_type", tag.as_str())])
            .send()
            .await?;

        let mut ack: UploadAck = Self::decode(response).await?;
        if let Some(error) = ack.error.take() {
            return Err(AppError::Backend(error));
        }
        Ok(ack)
    }
}

/// True when the string looks like a YouTube link the backend can fetch.
///
/// Mirrors the backend's own check so invalid links are rejected before a
/// request is made.
pub fn is_youtube_url(url: &str) -> bool {
    url.contains("youtube.com") || url.contains("youtu.be")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn youtube_url_detection() {
        assert!(is_youtube_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(is_youtube_url("https://youtu.be/dQw4w9WgXcQ"));
        assert!(!is_youtube_url("https://vimeo.com/12345"));
        assert!(!is_youtube_url("notes.pdf"));
    }
}
