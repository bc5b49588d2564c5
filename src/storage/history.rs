//! Persisted question/answer history
//!
//! Kept most-recent-first and capped; every mutation writes through to the
//! backing store so a crash never loses more than the in-flight exchange.

use super::KeyValueStore;
use crate::api::types::QueryAnswer;
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

pub const HISTORY_KEY: &str = "query_history";

/// One asked-and-answered exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRecord {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

pub struct QueryHistory {
    store: Arc<dyn KeyValueStore>,
    limit: usize,
    records: Vec<QueryRecord>,
}

impl QueryHistory {
    /// Load persisted history, most recent first.
    ///
    /// Unreadable stored data is discarded rather than blocking startup.
    pub fn load(store: Arc<dyn KeyValueStore>, limit: usize) -> Self {
        let mut records = match store.get(HISTORY_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<Vec<QueryRecord>>(&raw).unwrap_or_else(|e| {
                warn!("Discarding unreadable query history: {}", e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Could not read query history: {}", e);
                Vec::new()
            }
        };
        records.truncate(limit);
        Self {
            store,
            limit,
            records,
        }
    }

    /// Record a new exchange at the front, dropping the oldest past the cap
    pub fn push(&mut self, question: &str, answer: &QueryAnswer) -> Result<()> {
        let record = QueryRecord {
            id: Uuid::new_v4(),
            question: question.to_string(),
            answer: answer.answer.clone(),
            sources: answer.source_names(),
            timestamp: Utc::now(),
        };
        self.records.insert(0, record);
        self.records.truncate(self.limit);
        self.save()
    }

    pub fn records(&self) -> &[QueryRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&QueryRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop every record, in memory and on disk
    pub fn clear(&mut self) -> Result<()> {
        self.records.clear();
        self.store.remove(HISTORY_KEY)
    }

    fn save(&self) -> Result<()> {
        let raw = serde_json::to_string(&self.records)?;
        self.store.set(HISTORY_KEY, &raw)
    }
}
