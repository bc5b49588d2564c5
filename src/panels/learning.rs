//! Learning summary panel
//!
//! Shows what the assistant has absorbed so far. A fresh backend yields an
//! all-zero summary, rendered as a guided empty state instead of blank
//! widgets. Chart images are saved to disk on request; a chart the backend
//! cannot render yet degrades to a placeholder note rather than an error.

use super::Banner;
use crate::api::learning::ChartKind;
use crate::api::types::LearningStats;
use crate::error::{AppError, Result};
use std::path::PathBuf;

/// Render state of one downloadable chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartSlot {
    /// Never fetched
    Empty,
    Fetching,
    Saved(PathBuf),
    /// Backend has nothing to plot yet, or the fetch failed
    Unavailable(String),
}

pub struct LearningPanel {
    pub stats: Option<LearningStats>,
    pub loading: bool,
    pub banner: Option<Banner>,
    pub concepts_chart: ChartSlot,
    pub timeline_chart: ChartSlot,
}

impl LearningPanel {
    pub fn new() -> Self {
        Self {
            stats: None,
            loading: false,
            banner: None,
            concepts_chart: ChartSlot::Empty,
            timeline_chart: ChartSlot::Empty,
        }
    }

    pub fn begin_refresh(&mut self) {
        self.loading = true;
    }

    pub fn apply_stats(&mut self, result: Result<LearningStats>) {
        self.loading = false;
        match result {
            Ok(stats) => {
                self.stats = Some(stats);
                self.banner = None;
            }
            Err(e) => {
                self.banner = Some(Banner::error(e.user_message()));
            }
        }
    }

    /// True when the guided empty state should render instead of the summary
    pub fn shows_empty_state(&self) -> bool {
        self.stats.as_ref().map(|s| s.is_empty()).unwrap_or(false)
    }

    pub fn begin_chart_fetch(&mut self, kind: ChartKind) {
        *self.slot_mut(kind) = ChartSlot::Fetching;
    }

    pub fn apply_chart(&mut self, kind: ChartKind, result: Result<PathBuf>) {
        let slot = self.slot_mut(kind);
        *slot = match result {
            Ok(path) => ChartSlot::Saved(path),
            Err(AppError::NotFound(_)) => {
                ChartSlot::Unavailable("no data to plot yet".to_string())
            }
            Err(e) => ChartSlot::Unavailable(e.user_message()),
        };
    }

    fn slot_mut(&mut self, kind: ChartKind) -> &mut ChartSlot {
        match kind {
            ChartKind::Concepts => &mut self.concepts_chart,
            ChartKind::Timeline => &mut self.timeline_chart,
        }
    }

    /// Top concepts by frequency, highest first, for the bar chart
    pub fn top_concepts(&self, limit: usize) -> Vec<(String, u64)> {
        let mut entries: Vec<(String, u64)> = self
            .stats
            .as_ref()
            .map(|s| {
                s.concepts_by_frequency
                    .iter()
                    .map(|(k, v)| (k.clone(), *v))
                    .collect()
            })
            .unwrap_or_default();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries.truncate(limit);
        entries
    }
}

impl Default for LearningPanel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(json: &str) -> LearningStats {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn fresh_backend_renders_empty_state() {
        let mut p = LearningPanel::new();
        assert!(!p.shows_empty_state()); // nothing fetched yet

        p.apply_stats(Ok(stats("{}")));
        assert!(p.shows_empty_state());
    }

    #[test]
    fn populated_stats_leave_the_empty_state() {
        let mut p = LearningPanel::new();
        p.apply_stats(Ok(stats(
            r#"{"total_files_processed":2,"concepts_by_frequency":{"fibonacci":4}}"#,
        )));
        assert!(!p.shows_empty_state());
    }

    #[test]
    fn failed_fetch_keeps_previous_stats() {
        let mut p = LearningPanel::new();
        p.apply_stats(Ok(stats(r#"{"total_files_processed":3}"#)));

        p.apply_stats(Err(AppError::Backend("stats offline".to_string())));
        assert_eq!(p.stats.as_ref().unwrap().total_files_processed, 3);
        assert!(p.banner.is_some());
    }

    #[test]
    fn missing_chart_becomes_a_placeholder() {
        let mut p = LearningPanel::new();
        p.begin_chart_fetch(ChartKind::Concepts);
        assert_eq!(p.concepts_chart, ChartSlot::Fetching);

        p.apply_chart(
            ChartKind::Concepts,
            Err(AppError::NotFound("No concepts found".to_string())),
        );
        assert_eq!(
            p.concepts_chart,
            ChartSlot::Unavailable("no data to plot yet".to_string())
        );
    }

    #[test]
    fn saved_chart_records_its_path() {
        let mut p = LearningPanel::new();
        p.apply_chart(
            ChartKind::Timeline,
            Ok(PathBuf::from("/tmp/goldmind/charts/timeline.png")),
        );
        assert_eq!(
            p.timeline_chart,
            ChartSlot::Saved(PathBuf::from("/tmp/goldmind/charts/timeline.png"))
        );
    }

    #[test]
    fn top_concepts_sorted_by_frequency() {
        let mut p = LearningPanel::new();
        p.apply_stats(Ok(stats(
            r#"{"concepts_by_frequency":{"rsi":2,"support":7,"fibonacci":7,"macd":1}}"#,
        )));

        let top = p.top_concepts(3);
        assert_eq!(
            top,
            vec![
                ("fibonacci".to_string(), 7),
                ("support".to_string(), 7),
                ("rsi".to_string(), 2),
            ]
        );
    }
}
