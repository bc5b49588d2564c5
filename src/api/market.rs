//! Market data and prediction endpoints

use super::types::{
    Candle, HistoryResponse, LiveDataResponse, LiveQuote, MarketStatus, PredictResponse,
    TrainResponse,
};
use super::ApiClient;
use crate::error::{AppError, Result};
use tracing::info;

impl ApiClient {
    /// Fetch the current quote for `symbol`
    pub async fn live_quote(&self, symbol: &str) -> Result<LiveQuote> {
        let response = self
            .client
            .get(format!("{}/market/live", self.base))
            .query(&[("symbol", symbol)])
            .send()
            .await?;

        let mut payload: LiveDataResponse = Self::decode(response).await?;
        if let Some(error) = payload.error.take() {
            return Err(AppError::Backend(error));
        }
        payload
            .into_quote(symbol)
            .ok_or_else(|| AppError::Backend("live quote payload missing".to_string()))
    }

    /// Fetch market service health and prediction engine readiness
    pub async fn market_status(&self) -> Result<MarketStatus> {
        let response = self
            .client
            .get(format!("{}/market/status", self.base))
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Fetch historical candles, e.g. `("XAUUSD", "1mo", "1h")`
    pub async fn market_history(
        &self,
        symbol: &str,
        period: &str,
        interval: &str,
    ) -> Result<Vec<Candle>> {
        let response = self
            .client
            .get(format!("{}/market/history", self.base))
            .query(&[("symbol", symbol), ("period", period), ("interval", interval)])
            .send()
            .await?;

        let payload: HistoryResponse = Self::decode(response).await?;
        if let Some(error) = payload.error {
            return Err(AppError::Backend(error));
        }
        Ok(payload.data)
    }

    /// Ask the prediction engine for the next `count` candles (backend caps at 24)
    pub async fn predict(&self, symbol: &str, count: u8) -> Result<PredictResponse> {
        info!("ApiClient::predict - {} candles for {}", count, symbol);

        let count = count.to_string();
        let response = self
            .client
            .get(format!("{}/market/predict", self.base))
            .query(&[("symbol", symbol), ("num_predictions", count.as_str())])
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Kick off model training on recent history.
    ///
    /// Training runs synchronously on the backend and can take a while, so
    /// callers should treat this as a long request, not a poll target.
    pub async fn train_model(&self) -> Result<TrainResponse> {
        info!("ApiClient::train_model");

        let response = self
            .client
            .post(format!("{}/market/train", self.base))
            .send()
            .await?;
        Self::decode(response).await
    }
}
