//! File registry endpoints

use super::types::{DeleteResponse, FileEntry, FilesResponse};
use super::ApiClient;
use crate::error::{AppError, Result};
use std::path::Path;
use tracing::info;

impl ApiClient {
    /// Fetch the current file registry.
    ///
    /// A backend-side listing failure still returns a 200 with an `error`
    /// field next to an empty list; that surfaces here as `Err` so the view
    /// keeps its previous contents instead of clearing them.
    pub async fn list_files(&self) -> Result<Vec<FileEntry>> {
        let response = self
            .client
            .get(format!("{}/files/", self.base))
            .send()
            .await?;

        let listing: FilesResponse = Self::decode(response).await?;
        if let Some(error) = listing.error {
            return Err(AppError::Backend(error));
        }
        Ok(listing.files)
    }

    /// Delete an uploaded file and its processed artifacts
    pub async fn delete_file(&self, filename: &str) -> Result<String> {
        info!("ApiClient::delete_file - {}", filename);

        let response = self
            .client
            .delete(format!(
                "{}/files/{}",
                self.base,
                urlencoding::encode(filename)
            ))
            .send()
            .await?;

        let ack: DeleteResponse = Self::decode(response).await?;
        if let Some(error) = ack.error {
            return Err(AppError::Backend(error));
        }
        Ok(ack
            .message
            .unwrap_or_else(|| format!("{} deleted", filename)))
    }

    /// Download an uploaded file's raw bytes to a local path
    pub async fn download_file(&self, filename: &str, dest: &Path) -> Result<u64> {
        info!("ApiClient::download_file - {}", filename);

        let response = self
            .client
            .get(format!(
                "{}/files/{}",
                self.base,
                urlencoding::encode(filename)
            ))
            .send()
            .await?;

        let bytes = Self::binary(response).await?;
        let len = bytes.len() as u64;
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(dest, bytes).await?;
        Ok(len)
    }
}
