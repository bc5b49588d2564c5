//! Panel state machines
//!
//! Each panel owns its view state and mutates it synchronously; network work
//! is spawned by the app loop, which posts the outcome back as a [`PanelMsg`].
//! Keeping the panels free of async makes every transition unit-testable.

pub mod files;
pub mod learning;
pub mod market;
pub mod query;
pub mod upload;

use crate::api::learning::ChartKind;
use crate::api::types::{
    Candle, FileEntry, LearningStats, LiveQuote, MarketStatus, PredictResponse, QueryAnalytics,
    QueryAnswer, TrainResponse, UploadAck,
};
use crate::error::Result;
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Outcome of a spawned task, delivered to the app loop
#[derive(Debug)]
pub enum PanelMsg {
    BackendProbed(Result<String>),
    UploadFinished(Result<UploadAck>),
    FilesRefreshed(Result<Vec<FileEntry>>),
    FileDeleted(Result<String>),
    FileDownloaded {
        filename: String,
        result: Result<PathBuf>,
    },
    AnswerArrived {
        question: String,
        result: Result<QueryAnswer>,
    },
    AnalyticsArrived(Result<QueryAnalytics>),
    /// Scheduled market poll fired
    MarketTick,
    MarketUpdated {
        generation: u64,
        result: Result<(MarketStatus, LiveQuote)>,
    },
    HistoryArrived(Result<Vec<Candle>>),
    PredictionsArrived(Result<PredictResponse>),
    TrainingFinished(Result<TrainResponse>),
    StatsArrived(Result<LearningStats>),
    ChartSaved {
        kind: ChartKind,
        result: Result<PathBuf>,
    },
}

pub type UiSender = mpsc::UnboundedSender<PanelMsg>;
pub type UiReceiver = mpsc::UnboundedReceiver<PanelMsg>;

pub fn channel() -> (UiSender, UiReceiver) {
    mpsc::unbounded_channel()
}

/// Transient one-line status shown at the bottom of a panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub text: String,
    pub kind: BannerKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Info,
    Error,
}

impl Banner {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: BannerKind::Info,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: BannerKind::Error,
        }
    }
}
