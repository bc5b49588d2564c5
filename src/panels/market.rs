//! Market panel
//!
//! Live quote and service status are fetched together and applied as one
//! snapshot, so the view never mixes fields from different polls. Polls are
//! single-flight: a scheduled tick or manual refresh that fires while one is
//! pending is skipped rather than queued, and a generation counter discards
//! completions that no longer match the current poll.

use super::Banner;
use crate::api::types::{
    Candle, LiveQuote, MarketStatus, PredictResponse, PredictedCandle, TrainResponse,
};
use crate::error::Result;
use chrono::{DateTime, Utc};

/// Last good status+quote pair, applied atomically
#[derive(Debug, Clone)]
pub struct MarketSnapshot {
    pub quote: LiveQuote,
    pub status: MarketStatus,
    pub as_of: DateTime<Utc>,
}

pub struct MarketPanel {
    pub snapshot: Option<MarketSnapshot>,
    pub history: Vec<Candle>,
    pub predictions: Vec<PredictedCandle>,
    pub model_trained: Option<bool>,
    pub banner: Option<Banner>,
    pub training: bool,
    in_flight: bool,
    generation: u64,
}

impl MarketPanel {
    pub fn new() -> Self {
        Self {
            snapshot: None,
            history: Vec::new(),
            predictions: Vec::new(),
            model_trained: None,
            banner: None,
            training: false,
            in_flight: false,
            generation: 0,
        }
    }

    /// Begin a poll. `None` means one is already in flight and this attempt
    /// (scheduled tick or manual refresh) must be skipped; `Some(generation)`
    /// tags the request so a stale completion can be recognised.
    pub fn begin_poll(&mut self) -> Option<u64> {
        if self.in_flight {
            return None;
        }
        self.in_flight = true;
        self.generation += 1;
        Some(self.generation)
    }

    pub fn refresh_pending(&self) -> bool {
        self.in_flight
    }

    /// Apply a poll outcome. Stale generations are ignored. On failure the
    /// previous snapshot stays on screen next to the error banner.
    pub fn apply_update(
        &mut self,
        generation: u64,
        result: Result<(MarketStatus, LiveQuote)>,
    ) {
        if generation != self.generation {
            return;
        }
        self.in_flight = false;
        match result {
            Ok((status, quote)) => {
                self.snapshot = Some(MarketSnapshot {
                    quote,
                    status,
                    as_of: Utc::now(),
                });
                self.banner = None;
            }
            Err(e) => {
                self.banner = Some(Banner::error(e.user_message()));
            }
        }
    }

    pub fn apply_history(&mut self, result: Result<Vec<Candle>>) {
        match result {
            Ok(candles) => self.history = candles,
            Err(e) => {
                self.banner = Some(Banner::error(e.user_message()));
            }
        }
    }

    pub fn apply_predictions(&mut self, result: Result<PredictResponse>) {
        match result {
            Ok(payload) => {
                self.predictions = payload.predictions;
                self.model_trained = Some(payload.model_trained);
            }
            Err(e) => {
                self.banner = Some(Banner::error(e.user_message()));
            }
        }
    }

    /// Begin a training run. Only one at a time.
    pub fn begin_train(&mut self) -> bool {
        if self.training {
            return false;
        }
        self.training = true;
        self.banner = Some(Banner::info("Training model..."));
        true
    }

    pub fn apply_training(&mut self, result: Result<TrainResponse>) {
        self.training = false;
        match result {
            Ok(_) => {
                self.model_trained = Some(true);
                self.banner = Some(Banner::info("Model trained"));
            }
            Err(e) => {
                self.banner = Some(Banner::error(e.user_message()));
            }
        }
    }

    /// Close prices, oldest first, for the trend sparkline
    pub fn closes(&self) -> Vec<f64> {
        self.history.iter().map(|c| c.close).collect()
    }
}

impl Default for MarketPanel {
    fn default() -> Self {
        Self::new()
    }
}
