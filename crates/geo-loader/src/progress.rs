//! Terminal progress display for the geocoding loop.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Progress bar over the list of locations being geocoded.
pub struct LoadProgress {
    bar: ProgressBar,
}

impl LoadProgress {
    pub fn new(total: u64) -> Self {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("  {prefix:.bold} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("##-"),
        );
        bar.set_prefix("Geocoding");
        Self { bar }
    }

    /// A bar that draws nothing, for non-interactive runs.
    pub fn hidden(total: u64) -> Self {
        Self {
            bar: ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::hidden()),
        }
    }

    /// Show the location currently being looked up.
    pub fn set_current(&self, location: &str) {
        self.bar.set_message(location.to_string());
    }

    /// Mark one location as done.
    pub fn tick(&self) {
        self.bar.inc(1);
    }

    /// Clear the bar.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
