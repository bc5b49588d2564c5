//! Upload panel
//!
//! Drives the submit lifecycle: idle, one in-flight request, then a short
//! "done" confirmation before returning to idle. Submission is refused while
//! a request is in flight and when the input is empty or malformed.

use super::Banner;
use crate::api::types::{ContentTypeTag, UploadAck};
use crate::api::upload::is_youtube_url;
use crate::error::Result;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Which input the panel currently submits from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadSource {
    File,
    Youtube,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadPhase {
    Idle,
    Uploading,
    Done { label: String, since: Instant },
    Error { message: String },
}

/// What the app loop should send to the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadRequest {
    File { path: PathBuf, tag: ContentTypeTag },
    Youtube { url: String, tag: ContentTypeTag },
}

pub struct UploadPanel {
    pub source: UploadSource,
    pub path_input: String,
    pub url_input: String,
    pub tag: ContentTypeTag,
    pub phase: UploadPhase,
    done_display: Duration,
}

impl UploadPanel {
    pub fn new(done_display: Duration) -> Self {
        Self {
            source: UploadSource::File,
            path_input: String::new(),
            url_input: String::new(),
            tag: ContentTypeTag::Document,
            phase: UploadPhase::Idle,
            done_display,
        }
    }

    fn active_input(&self) -> &str {
        match self.source {
            UploadSource::File => self.path_input.trim(),
            UploadSource::Youtube => self.url_input.trim(),
        }
    }

    fn active_input_mut(&mut self) -> &mut String {
        match self.source {
            UploadSource::File => &mut self.path_input,
            UploadSource::Youtube => &mut self.url_input,
        }
    }

    /// True when a submit would actually fire
    pub fn can_submit(&self) -> bool {
        let settled = matches!(self.phase, UploadPhase::Idle | UploadPhase::Error { .. });
        if !settled || self.active_input().is_empty() {
            return false;
        }
        match self.source {
            UploadSource::File => true,
            UploadSource::Youtube => is_youtube_url(self.active_input()),
        }
    }

    /// Validation hint for the current input, shown next to the submit key
    pub fn validation_hint(&self) -> Option<&'static str> {
        if matches!(self.phase, UploadPhase::Uploading) {
            return Some("upload in progress");
        }
        if self.active_input().is_empty() {
            return Some(match self.source {
                UploadSource::File => "enter a file path",
                UploadSource::Youtube => "enter a YouTube URL",
            });
        }
        if self.source == UploadSource::Youtube && !is_youtube_url(self.active_input()) {
            return Some("not a YouTube link");
        }
        None
    }

    /// Begin a submit. `None` means the attempt was refused and nothing may
    /// be sent to the backend. YouTube submissions always carry the video
    /// tag, whatever is selected.
    pub fn submit(&mut self) -> Option<UploadRequest> {
        if !self.can_submit() {
            return None;
        }
        let request = match self.source {
            UploadSource::File => UploadRequest::File {
                path: PathBuf::from(self.active_input()),
                tag: self.tag,
            },
            UploadSource::Youtube => UploadRequest::Youtube {
                url: self.active_input().to_string(),
                tag: ContentTypeTag::Video,
            },
        };
        self.phase = UploadPhase::Uploading;
        Some(request)
    }

    /// Apply the outcome of the in-flight request. Returns `true` when the
    /// file registry should be refreshed (i.e. the upload was accepted).
    pub fn finish(&mut self, result: Result<UploadAck>, now: Instant) -> bool {
        match result {
            Ok(ack) => {
                self.phase = UploadPhase::Done {
                    label: ack.label().to_string(),
                    since: now,
                };
                self.active_input_mut().clear();
                true
            }
            Err(e) => {
                self.phase = UploadPhase::Error {
                    message: e.user_message(),
                };
                false
            }
        }
    }

    /// Time-based transitions; the done confirmation decays back to idle
    pub fn tick(&mut self, now: Instant) {
        if let UploadPhase::Done { since, .. } = self.phase {
            if now.duration_since(since) >= self.done_display {
                self.phase = UploadPhase::Idle;
            }
        }
    }

    pub fn toggle_source(&mut self) {
        self.source = match self.source {
            UploadSource::File => UploadSource::Youtube,
            UploadSource::Youtube => UploadSource::File,
        };
    }

    pub fn next_tag(&mut self) {
        self.tag = self.tag.next();
    }

    pub fn prev_tag(&mut self) {
        self.tag = self.tag.prev();
    }

    pub fn push_char(&mut self, c: char) {
        self.active_input_mut().push(c);
    }

    pub fn pop_char(&mut self) {
        self.active_input_mut().pop();
    }

    /// Status line for the footer
    pub fn banner(&self) -> Option<Banner> {
        match &self.phase {
            UploadPhase::Idle => None,
            UploadPhase::Uploading => Some(Banner::info("Uploading...")),
            UploadPhase::Done { label, .. } => {
                Some(Banner::info(format!("{} accepted, processing", label)))
            }
            UploadPhase::Error { message } => Some(Banner::error(message.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn ack(filename: &str) -> UploadAck {
        UploadAck {
            filename: Some(filename.to_string()),
            url: None,
            file_type: Some("document".to_string()),
            status: Some("processing".to_string()),
            error: None,
        }
    }

    fn panel() -> UploadPanel {
        UploadPanel::new(Duration::from_secs(2))
    }

    #[test]
    fn empty_input_refuses_submit() {
        let mut p = panel();
        assert!(!p.can_submit());
        assert_eq!(p.submit(), None);
        assert_eq!(p.phase, UploadPhase::Idle);
    }

    #[test]
    fn whitespace_only_input_refuses_submit() {
        let mut p = panel();
        p.path_input = "   ".to_string();
        assert_eq!(p.submit(), None);
    }

    #[test]
    fn submit_moves_to_uploading_and_blocks_reentry() {
        let mut p = panel();
        p.path_input = "/tmp/gold-notes.pdf".to_string();

        let request = p.submit().unwrap();
        assert_eq!(
            request,
            UploadRequest::File {
                path: PathBuf::from("/tmp/gold-notes.pdf"),
                tag: ContentTypeTag::Document,
            }
        );
        assert_eq!(p.phase, UploadPhase::Uploading);
        assert_eq!(p.submit(), None);
    }

    #[test]
    fn success_shows_done_then_decays_to_idle() {
        let mut p = panel();
        p.path_input = "/tmp/a.pdf".to_string();
        p.submit().unwrap();

        let t0 = Instant::now();
        let refresh = p.finish(Ok(ack("a.pdf")), t0);
        assert!(refresh);
        assert!(matches!(p.phase, UploadPhase::Done { .. }));
        assert!(p.path_input.is_empty());

        p.tick(t0 + Duration::from_millis(500));
        assert!(matches!(p.phase, UploadPhase::Done { .. }));

        p.tick(t0 + Duration::from_secs(2));
        assert_eq!(p.phase, UploadPhase::Idle);
    }

    #[test]
    fn failure_keeps_input_and_allows_retry() {
        let mut p = panel();
        p.path_input = "/tmp/a.pdf".to_string();
        p.submit().unwrap();

        let refresh = p.finish(
            Err(AppError::Backend("disk full".to_string())),
            Instant::now(),
        );
        assert!(!refresh);
        assert_eq!(
            p.phase,
            UploadPhase::Error {
                message: "disk full".to_string()
            }
        );
        assert_eq!(p.path_input, "/tmp/a.pdf");

        // Retry straight from the error state.
        assert!(p.can_submit());
        assert!(p.submit().is_some());
    }

    #[test]
    fn youtube_source_requires_a_youtube_link() {
        let mut p = panel();
        p.toggle_source();
        assert_eq!(p.source, UploadSource::Youtube);

        p.url_input = "https://example.com/video".to_string();
        assert!(!p.can_submit());
        assert_eq!(p.validation_hint(), Some("not a YouTube link"));

        p.url_input = "https://youtu.be/abc123".to_string();
        assert!(p.can_submit());
        // The selected tag is irrelevant for YouTube: the request is video.
        p.next_tag();
        match p.submit().unwrap() {
            UploadRequest::Youtube { url, tag } => {
                assert_eq!(url, "https://youtu.be/abc123");
                assert_eq!(tag, ContentTypeTag::Video);
            }
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[test]
    fn tag_selection_travels_with_the_request() {
        let mut p = panel();
        p.path_input = "/tmp/prices.csv".to_string();
        p.next_tag(); // image
        p.next_tag(); // data

        match p.submit().unwrap() {
            UploadRequest::File { tag, .. } => assert_eq!(tag, ContentTypeTag::Data),
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[test]
    fn inputs_are_tracked_per_source() {
        let mut p = panel();
        p.push_char('a');
        p.toggle_source();
        p.push_char('b');

        assert_eq!(p.path_input, "a");
        assert_eq!(p.url_input, "b");

        p.pop_char();
        assert_eq!(p.url_input, "");
        assert_eq!(p.path_input, "a");
    }
}
