//! Question answering endpoints

use super::types::{AnalyticsResponse, QueryAnalytics, QueryAnswer};
use super::ApiClient;
use crate::error::{AppError, Result};
use serde::Serialize;
use tracing::info;

impl ApiClient {
    /// Ask the knowledge base a question
    pub async fn ask(&self, question: &str) -> Result<QueryAnswer> {
        #[derive(Serialize)]
        struct QueryRequest<'a> {
            question: &'a str,
        }

        info!("ApiClient::ask - {} chars", question.len());

        let response = self
            .client
            .post(format!("{}/query/", self.base))
            .json(&QueryRequest { question })
            .send()
            .await?;

        let mut answer: QueryAnswer = Self::decode(response).await?;
        if let Some(error) = answer.error.take() {
            return Err(AppError::Backend(error));
        }
        Ok(answer)
    }

    /// Fetch backend-side query analytics (topic counts, daily volumes)
    pub async fn query_analytics(&self) -> Result<QueryAnalytics> {
        let response = self
            .client
            .get(format!("{}/query/analytics/", self.base))
            .send()
            .await?;

        let payload: AnalyticsResponse = Self::decode(response).await?;
        if let Some(error) = payload.error {
            return Err(AppError::Backend(error));
        }
        payload
            .analytics
            .ok_or_else(|| AppError::Backend("analytics payload missing".to_string()))
    }
}
