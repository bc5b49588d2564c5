//! File registry panel
//!
//! Mirrors the backend's file listing. Refreshes replace the whole list;
//! deletion is a two-step arm/confirm flow so a stray keypress can never
//! remove a file.

use super::{Banner, BannerKind};
use crate::api::types::FileEntry;
use crate::error::Result;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

pub struct FilesPanel {
    pub files: Vec<FileEntry>,
    pub selected: usize,
    /// Filename armed for deletion, awaiting confirmation
    pub pending_delete: Option<String>,
    pub banner: Option<Banner>,
    pub loading: bool,
    pub last_refresh: Option<DateTime<Utc>>,
}

impl FilesPanel {
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            selected: 0,
            pending_delete: None,
            banner: None,
            loading: false,
            last_refresh: None,
        }
    }

    /// Mark a refresh as started; the view shows a loading hint meanwhile
    pub fn begin_refresh(&mut self) {
        self.loading = true;
    }

    /// Replace the listing with a fresh snapshot, or keep the old one and
    /// surface the error.
    pub fn apply_refresh(&mut self, result: Result<Vec<FileEntry>>) {
        self.loading = false;
        match result {
            Ok(files) => {
                self.files = files;
                self.last_refresh = Some(Utc::now());
                self.clamp_selection();
                if self
                    .banner
                    .as_ref()
                    .map(|b| b.kind == BannerKind::Error)
                    .unwrap_or(false)
                {
                    self.banner = None;
                }
            }
            Err(e) => {
                self.banner = Some(Banner::error(e.user_message()));
            }
        }
    }

    pub fn selected_file(&self) -> Option<&FileEntry> {
        self.files.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if !self.files.is_empty() && self.selected + 1 < self.files.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        if self.files.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.files.len() {
            self.selected = self.files.len() - 1;
        }
    }

    /// Arm deletion of the selected file; nothing is sent yet
    pub fn arm_delete(&mut self) {
        if let Some(entry) = self.selected_file() {
            self.pending_delete = Some(entry.filename.clone());
        }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Confirm the armed deletion. Returns the filename the app loop should
    /// delete; `None` when nothing was armed.
    pub fn confirm_delete(&mut self) -> Option<String> {
        let filename = self.pending_delete.take()?;
        self.banner = Some(Banner::info(format!("Deleting {}...", filename)));
        Some(filename)
    }

    /// Apply the outcome of a delete. The listing itself is never touched
    /// here: on success the caller re-runs a refresh, which replaces it; on
    /// failure the stale rows stay visible until the user refreshes.
    pub fn apply_delete(&mut self, result: Result<String>) -> bool {
        match result {
            Ok(message) => {
                self.banner = Some(Banner::info(message));
                true
            }
            Err(e) => {
                self.banner = Some(Banner::error(e.user_message()));
                false
            }
        }
    }

    /// Where a downloaded copy of `filename` should land
    pub fn download_dest(&self, downloads_dir: &std::path::Path, filename: &str) -> PathBuf {
        downloads_dir.join(filename)
    }

    pub fn apply_download(&mut self, filename: &str, result: Result<PathBuf>) {
        match result {
            Ok(path) => {
                self.banner = Some(Banner::info(format!(
                    "{} saved to {}",
                    filename,
                    path.display()
                )));
            }
            Err(e) => {
                self.banner = Some(Banner::error(e.user_message()));
            }
        }
    }

    /// Count of files still waiting on background processing
    pub fn pending_count(&self) -> usize {
        self.files.iter().filter(|f| !f.processed).count()
    }
}

impl Default for FilesPanel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn entry(name: &str, processed: bool) -> FileEntry {
        FileEntry {
            filename: name.to_string(),
            size: 100,
            processed,
            date_modified: 1_700_000_000.0,
        }
    }

    #[test]
    fn refresh_replaces_the_whole_listing() {
        let mut p = FilesPanel::new();
        p.apply_refresh(Ok(vec![entry("a.pdf", true), entry("b.csv", false)]));
        assert_eq!(p.files.len(), 2);

        // A file disappeared server-side; the stale row must not linger.
        p.apply_refresh(Ok(vec![entry("b.csv", true)]));
        assert_eq!(p.files.len(), 1);
        assert_eq!(p.files[0].filename, "b.csv");
        assert!(p.files[0].processed);
    }

    #[test]
    fn failed_refresh_keeps_previous_listing() {
        let mut p = FilesPanel::new();
        p.apply_refresh(Ok(vec![entry("a.pdf", true)]));

        p.apply_refresh(Err(AppError::Backend("listing failed".to_string())));
        assert_eq!(p.files.len(), 1);
        let banner = p.banner.as_ref().unwrap();
        assert_eq!(banner.kind, BannerKind::Error);
        assert_eq!(banner.text, "listing failed");
    }

    #[test]
    fn selection_clamps_when_the_list_shrinks() {
        let mut p = FilesPanel::new();
        p.apply_refresh(Ok(vec![
            entry("a", true),
            entry("b", true),
            entry("c", true),
        ]));
        p.select_next();
        p.select_next();
        assert_eq!(p.selected, 2);

        p.apply_refresh(Ok(vec![entry("a", true)]));
        assert_eq!(p.selected, 0);
    }

    #[test]
    fn delete_requires_arm_then_confirm() {
        let mut p = FilesPanel::new();
        p.apply_refresh(Ok(vec![entry("a.pdf", true)]));

        // Confirm without arming is a no-op.
        assert_eq!(p.confirm_delete(), None);

        p.arm_delete();
        assert_eq!(p.pending_delete.as_deref(), Some("a.pdf"));
        assert_eq!(p.confirm_delete().as_deref(), Some("a.pdf"));
        assert_eq!(p.pending_delete, None);
    }

    #[test]
    fn cancel_disarms_without_deleting() {
        let mut p = FilesPanel::new();
        p.apply_refresh(Ok(vec![entry("a.pdf", true)]));
        p.arm_delete();
        p.cancel_delete();
        assert_eq!(p.pending_delete, None);
        assert_eq!(p.confirm_delete(), None);
        assert_eq!(p.files.len(), 1);
    }

    #[test]
    fn successful_delete_triggers_a_refresh() {
        let mut p = FilesPanel::new();
        p.apply_refresh(Ok(vec![entry("a.pdf", true), entry("b.csv", true)]));

        let refresh = p.apply_delete(Ok("File a.pdf deleted successfully".to_string()));
        assert!(refresh);
        // The row disappears only when the follow-up refresh lands.
        assert_eq!(p.files.len(), 2);
        assert_eq!(p.banner.as_ref().unwrap().kind, BannerKind::Info);
    }

    #[test]
    fn failed_delete_leaves_the_listing_alone() {
        let mut p = FilesPanel::new();
        p.apply_refresh(Ok(vec![entry("gone.pdf", true)]));

        let refresh = p.apply_delete(Err(AppError::NotFound("File not found".to_string())));
        assert!(!refresh);
        assert_eq!(p.files.len(), 1);
        let banner = p.banner.as_ref().unwrap();
        assert_eq!(banner.kind, BannerKind::Error);
        assert_eq!(banner.text, "File not found");
    }

    #[test]
    fn pending_count_tracks_unprocessed_rows() {
        let mut p = FilesPanel::new();
        p.apply_refresh(Ok(vec![
            entry("a", true),
            entry("b", false),
            entry("c", false),
        ]));
        assert_eq!(p.pending_count(), 2);
    }
}
