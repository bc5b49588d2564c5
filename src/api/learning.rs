//! Learning summary endpoints

use super::types::LearningStats;
use super::ApiClient;
use crate::error::Result;
use std::path::Path;

/// Chart renders the backend can produce as PNG images
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Concepts,
    Timeline,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Concepts => "concepts",
            ChartKind::Timeline => "timeline",
        }
    }
}

impl ApiClient {
    /// Fetch accumulated learning statistics.
    ///
    /// A fresh backend returns all-zero counters and empty maps, which the
    /// caller detects with [`LearningStats::is_empty`].
    pub async fn learning_stats(&self) -> Result<LearningStats> {
        let response = self
            .client
            .get(format!("{}/learning/stats/", self.base))
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Fetch a rendered chart as PNG bytes.
    ///
    /// Returns `AppError::NotFound` when the backend has no data to plot yet.
    pub async fn learning_chart(&self, kind: ChartKind) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(format!("{}/learning/charts/{}/", self.base, kind.as_str()))
            .send()
            .await?;
        Self::binary(response).await
    }

    /// Fetch a chart and save it under `dest`, returning the byte count
    pub async fn save_learning_chart(&self, kind: ChartKind, dest: &Path) -> Result<u64> {
        let bytes = self.learning_chart(kind).await?;
        let len = bytes.len() as u64;
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(dest, bytes).await?;
        Ok(len)
    }
}
