//! Batch notifications.
//!
//! The orchestrator reports its lifecycle through an [`ExportListener`]. The
//! command line front-end draws an indicatif bar; library callers can plug in
//! their own listener or use [`NoopListener`].

use crate::batch::ExportSummary;
use crate::constants::PROGRESS_BAR_TEMPLATE;
use indicatif::{ProgressBar, ProgressStyle};

/// Receives batch lifecycle events. Called from worker threads, hence `Sync`.
pub trait ExportListener: Sync {
    /// Number of files about to be processed
    fn progress_range_set(&self, _total: u64) {}

    /// One file finished, successfully or not
    fn progress_advanced(&self) {}

    /// Sent once before archive entries are written
    fn progress_reset(&self) {}

    /// One archive entry written
    fn entry_archived(&self, _name: &str) {}

    /// Sent exactly once per batch, even when every file failed
    fn batch_finished(&self, _summary: &ExportSummary) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl ExportListener for NoopListener {}

pub struct ProgressBarListener {
    bar: ProgressBar,
}

impl ProgressBarListener {
    pub fn new() -> Self {
        Self::with_bar(ProgressBar::new(0))
    }

    /// A listener that tracks progress without drawing anything
    pub fn hidden() -> Self {
        Self::with_bar(ProgressBar::hidden())
    }

    fn with_bar(bar: ProgressBar) -> Self {
        let style = ProgressStyle::with_template(PROGRESS_BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(style);
        Self { bar }
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl Default for ProgressBarListener {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportListener for ProgressBarListener {
    fn progress_range_set(&self, total: u64) {
        self.bar.set_length(total);
        self.bar.set_position(0);
        self.bar.set_message("compressing");
    }

    fn progress_advanced(&self) {
        self.bar.inc(1);
    }

    fn progress_reset(&self) {
        self.bar.set_position(0);
        self.bar.set_message("archiving");
    }

    fn entry_archived(&self, name: &str) {
        self.bar.inc(1);
        self.bar.set_message(name.to_string());
    }

    fn batch_finished(&self, summary: &ExportSummary) {
        self.bar.finish_with_message(format!(
            "{}/{} textures exported",
            summary.succeeded, summary.total
        ));
    }
}
