//! Wire types for the assistant backend
//!
//! Field sets follow what the backend actually emits. Responses are decoded
//! leniently: unknown fields are ignored and optional fields default, so the
//! client keeps working across backend builds that differ in detail.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// User-declared category attached to an upload.
///
/// The backend uses the tag to pick a processing pipeline; the client only
/// selects and transmits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentTypeTag {
    Document,
    Image,
    Data,
    Video,
    Audio,
}

impl ContentTypeTag {
    pub const ALL: [ContentTypeTag; 5] = [
        ContentTypeTag::Document,
        ContentTypeTag::Image,
        ContentTypeTag::Data,
        ContentTypeTag::Video,
        ContentTypeTag::Audio,
    ];

    /// Wire name sent as the `file_type` form field
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentTypeTag::Document => "document",
            ContentTypeTag::Image => "image",
            ContentTypeTag::Data => "data",
            ContentTypeTag::Video => "video",
            ContentTypeTag::Audio => "audio",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            ContentTypeTag::Document => "Document",
            ContentTypeTag::Image => "Image",
            ContentTypeTag::Data => "Data / Spreadsheet",
            ContentTypeTag::Video => "Video",
            ContentTypeTag::Audio => "Audio",
        }
    }

    /// Next tag in selection order, wrapping around
    pub fn next(&self) -> ContentTypeTag {
        let idx = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous tag in selection order, wrapping around
    pub fn prev(&self) -> ContentTypeTag {
        let idx = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Acknowledgment returned by both upload endpoints.
///
/// `filename` is set for file uploads, `url` for YouTube registrations; a
/// backend-side failure arrives as `error` inside an otherwise-200 body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadAck {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl UploadAck {
    /// Best identifier for status lines: filename, else URL
    pub fn label(&self) -> &str {
        self.filename
            .as_deref()
            .or(self.url.as_deref())
            .unwrap_or("upload")
    }
}

/// One entry in the backend file registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    pub filename: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub processed: bool,
    /// Seconds since the epoch, as reported by the backend
    #[serde(default)]
    pub date_modified: f64,
}

impl FileEntry {
    /// Modification time as a chrono instant, when the epoch value is sane
    pub fn modified(&self) -> Option<DateTime<Utc>> {
        let secs = self.date_modified.trunc() as i64;
        Utc.timestamp_opt(secs, 0).single()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilesResponse {
    #[serde(default)]
    pub files: Vec<FileEntry>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Source citation attached to an answer.
///
/// Older backend builds return bare strings, newer ones
/// `{filename, relevance}` objects; both are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceRef {
    Text(String),
    Document {
        filename: String,
        #[serde(default)]
        relevance: f64,
    },
}

impl SourceRef {
    pub fn name(&self) -> &str {
        match self {
            SourceRef::Text(s) => s,
            SourceRef::Document { filename, .. } => filename,
        }
    }
}

/// Answer payload from `POST /query/`
#[derive(Debug, Clone, Deserialize)]
pub struct QueryAnswer {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<SourceRef>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl QueryAnswer {
    /// Sources normalised to display text, original order preserved
    pub fn source_names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.name().to_string()).collect()
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RecentQuery {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer_length: u64,
    #[serde(default)]
    pub sources_count: u64,
}

/// Aggregate counters from `GET /query/analytics/`
#[derive(Debug, Clone, Deserialize, Default)]
pub struct QueryAnalytics {
    #[serde(default)]
    pub total_queries: u64,
    #[serde(default)]
    pub recent_queries_count: u64,
    #[serde(default)]
    pub top_topics: HashMap<String, u64>,
    #[serde(default)]
    pub daily_stats: HashMap<String, u64>,
    #[serde(default)]
    pub recent_queries: Vec<RecentQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub analytics: Option<QueryAnalytics>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TimelineEntry {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub file: String,
    #[serde(rename = "type", default)]
    pub content_type: String,
}

/// Learning summary from `GET /learning/stats/`
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LearningStats {
    #[serde(default)]
    pub total_files_processed: u64,
    #[serde(default)]
    pub concepts_by_frequency: HashMap<String, u64>,
    #[serde(default)]
    pub patterns_by_frequency: HashMap<String, u64>,
    #[serde(default)]
    pub indicators_by_frequency: HashMap<String, u64>,
    #[serde(default)]
    pub learning_timeline: Vec<TimelineEntry>,
    #[serde(default)]
    pub content_types: HashMap<String, u64>,
}

impl LearningStats {
    /// True when nothing has been learned yet (drives the empty-state render)
    pub fn is_empty(&self) -> bool {
        self.total_files_processed == 0
            && self.concepts_by_frequency.is_empty()
            && self.patterns_by_frequency.is_empty()
            && self.indicators_by_frequency.is_empty()
            && self.learning_timeline.is_empty()
    }
}

/// Live quote payload inside the `/market/live` envelope
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LiveQuote {
    #[serde(default)]
    pub symbol: String,
    pub price: f64,
    #[serde(default)]
    pub open: f64,
    #[serde(default)]
    pub high: f64,
    #[serde(default)]
    pub low: f64,
    #[serde(default)]
    pub volume: i64,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub change: f64,
    #[serde(default)]
    pub change_percent: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LiveDataResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub data: Option<LiveQuote>,
    /// Flat price some backend builds return instead of the full payload
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub last_update: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl LiveDataResponse {
    /// Pull the quote out of the envelope, building one from the flat
    /// `current_price` when the full payload is absent.
    pub fn into_quote(self, symbol: &str) -> Option<LiveQuote> {
        if self.data.is_some() {
            return self.data;
        }
        let price = self.current_price?;
        Some(LiveQuote {
            symbol: symbol.to_string(),
            price,
            open: 0.0,
            high: 0.0,
            low: 0.0,
            volume: 0,
            timestamp: self.last_update.unwrap_or_default(),
            change: 0.0,
            change_percent: 0.0,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct PredictionEngineStatus {
    #[serde(default)]
    pub trained: bool,
    #[serde(default)]
    pub features_count: u64,
}

/// Market service status from `GET /market/status`.
///
/// Field availability varies by backend build; everything is optional and the
/// panel renders only what is present.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct MarketStatus {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub market_open: Option<bool>,
    #[serde(default)]
    pub market_service: Option<String>,
    #[serde(default)]
    pub last_update: Option<String>,
    #[serde(default)]
    pub prediction_engine: Option<PredictionEngineStatus>,
    #[serde(default)]
    pub error: Option<String>,
}

/// OHLCV candle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    #[serde(default)]
    pub timestamp: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub data: Vec<Candle>,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub error: Option<String>,
}

/// Forecast candle with decreasing confidence per step
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictedCandle {
    #[serde(default)]
    pub timestamp: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub confidence: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub predictions: Vec<PredictedCandle>,
    #[serde(default)]
    pub model_trained: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrainResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub training_result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Welcome payload from `GET /`, used as a connectivity probe
#[derive(Debug, Clone, Deserialize)]
pub struct WelcomeResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_tags_round_trip_wire_names() {
        for tag in ContentTypeTag::ALL {
            let json = serde_json::to_string(&tag).unwrap();
            assert_eq!(json, format!("\"{}\"", tag.as_str()));
        }
    }

    #[test]
    fn tag_cycling_wraps() {
        assert_eq!(ContentTypeTag::Audio.next(), ContentTypeTag::Document);
        assert_eq!(ContentTypeTag::Document.prev(), ContentTypeTag::Audio);
    }

    #[test]
    fn sources_decode_both_shapes() {
        let plain: QueryAnswer =
            serde_json::from_str(r#"{"answer":"a","sources":["babypips.com"]}"#).unwrap();
        assert_eq!(plain.source_names(), vec!["babypips.com"]);

        let keyed: QueryAnswer = serde_json::from_str(
            r#"{"answer":"a","sources":[{"filename":"notes.pdf","relevance":0.91}]}"#,
        )
        .unwrap();
        assert_eq!(keyed.source_names(), vec!["notes.pdf"]);
    }

    #[test]
    fn missing_sources_default_to_empty() {
        let answer: QueryAnswer = serde_json::from_str(r#"{"answer":"a"}"#).unwrap();
        assert!(answer.sources.is_empty());
    }

    #[test]
    fn file_entry_epoch_conversion() {
        let entry = FileEntry {
            filename: "chart1.png".to_string(),
            size: 1024,
            processed: false,
            date_modified: 1_700_000_000.25,
        };
        let ts = entry.modified().unwrap();
        assert_eq!(ts.timestamp(), 1_700_000_000);
    }

    #[test]
    fn learning_stats_empty_detection() {
        let empty = LearningStats::default();
        assert!(empty.is_empty());

        let populated: LearningStats = serde_json::from_str(
            r#"{"total_files_processed":1,"concepts_by_frequency":{"support":3}}"#,
        )
        .unwrap();
        assert!(!populated.is_empty());
    }

    #[test]
    fn market_status_tolerates_both_builds() {
        // Build that reports market_open.
        let normalized: MarketStatus =
            serde_json::from_str(r#"{"status":"success","market_open":true}"#).unwrap();
        assert_eq!(normalized.market_open, Some(true));

        // Build that reports service/engine details only.
        let legacy: MarketStatus = serde_json::from_str(
            r#"{"status":"success","market_service":"active","prediction_engine":{"trained":false,"features_count":0}}"#,
        )
        .unwrap();
        assert_eq!(legacy.market_open, None);
        assert_eq!(legacy.market_service.as_deref(), Some("active"));
    }

    #[test]
    fn flat_price_builds_a_quote() {
        let full: LiveDataResponse = serde_json::from_str(
            r#"{"status":"success","data":{"symbol":"XAUUSD","price":2031.4}}"#,
        )
        .unwrap();
        assert_eq!(full.into_quote("XAUUSD").unwrap().price, 2031.4);

        let flat: LiveDataResponse = serde_json::from_str(
            r#"{"status":"success","current_price":2031.4,"last_update":"2024-01-05 14:30"}"#,
        )
        .unwrap();
        let quote = flat.into_quote("XAUUSD").unwrap();
        assert_eq!(quote.price, 2031.4);
        assert_eq!(quote.symbol, "XAUUSD");
        assert_eq!(quote.timestamp, "2024-01-05 14:30");

        let neither: LiveDataResponse = serde_json::from_str(r#"{"status":"success"}"#).unwrap();
        assert!(neither.into_quote("XAUUSD").is_none());
    }
}
