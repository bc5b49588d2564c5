//! Query panel
//!
//! One question in flight at a time. Answered exchanges land in the persisted
//! history, newest first; the selection cursor recalls past exchanges without
//! touching the network.

use super::{Banner, BannerKind};
use crate::api::types::{QueryAnalytics, QueryAnswer};
use crate::error::Result;
use crate::storage::history::{QueryHistory, QueryRecord};

pub struct QueryPanel {
    pub input: String,
    pub busy: bool,
    /// History cursor; `Some(0)` is the newest exchange
    pub selected: Option<usize>,
    pub banner: Option<Banner>,
    pub analytics: Option<QueryAnalytics>,
    pub show_analytics: bool,
    history: QueryHistory,
}

impl QueryPanel {
    pub fn new(history: QueryHistory) -> Self {
        let selected = if history.is_empty() { None } else { Some(0) };
        Self {
            input: String::new(),
            busy: false,
            selected,
            banner: None,
            analytics: None,
            show_analytics: false,
            history,
        }
    }

    /// Begin asking. Returns the question the app loop should send; `None`
    /// when the input is blank or another question is still in flight.
    pub fn ask(&mut self) -> Option<String> {
        if self.busy {
            return None;
        }
        let question = self.input.trim().to_string();
        if question.is_empty() {
            return None;
        }
        self.busy = true;
        self.banner = Some(Banner::info("Thinking..."));
        Some(question)
    }

    /// Apply the outcome of the in-flight question
    pub fn finish(&mut self, question: &str, result: Result<QueryAnswer>) {
        self.busy = false;
        match result {
            Ok(answer) => {
                self.input.clear();
                self.banner = None;
                if let Err(e) = self.history.push(question, &answer) {
                    self.banner = Some(Banner::error(format!(
                        "Answer shown but not saved: {}",
                        e.user_message()
                    )));
                }
                self.selected = Some(0);
            }
            Err(e) => {
                // Input is preserved so the question can be retried.
                self.banner = Some(Banner::error(e.user_message()));
            }
        }
    }

    /// The exchange currently recalled for display
    pub fn displayed(&self) -> Option<&QueryRecord> {
        self.history.get(self.selected?)
    }

    pub fn records(&self) -> &[QueryRecord] {
        self.history.records()
    }

    /// Move the recall cursor towards older exchanges
    pub fn select_older(&mut self) {
        if self.history.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) if i + 1 < self.history.len() => i + 1,
            Some(i) => i,
            None => 0,
        });
    }

    /// Move the recall cursor towards newer exchanges
    pub fn select_newer(&mut self) {
        if let Some(i) = self.selected {
            self.selected = Some(i.saturating_sub(1));
        }
    }

    pub fn clear_history(&mut self) {
        match self.history.clear() {
            Ok(()) => {
                self.selected = None;
                self.banner = Some(Banner::info("History cleared"));
            }
            Err(e) => {
                self.banner = Some(Banner::error(e.user_message()));
            }
        }
    }

    /// Toggle the analytics overlay. Returns `true` when the app loop should
    /// fetch fresh analytics for it.
    pub fn toggle_analytics(&mut self) -> bool {
        self.show_analytics = !self.show_analytics;
        self.show_analytics
    }

    pub fn apply_analytics(&mut self, result: Result<QueryAnalytics>) {
        match result {
            Ok(analytics) => self.analytics = Some(analytics),
            Err(e) => {
                self.banner = Some(Banner::error(e.user_message()));
            }
        }
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
    }

    /// True when the footer should render the banner as an error
    pub fn has_error(&self) -> bool {
        self.banner
            .as_ref()
            .map(|b| b.kind == BannerKind::Error)
            .unwrap_or(false)
    }
}
