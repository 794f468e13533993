// feedback while we wait on the network

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Told when a slow operation starts and stops. Purely cosmetic.
pub trait Progress {
    fn start(&self, label: &str);
    fn stop(&self);
}

// no feedback at all
impl Progress for () {
    fn start(&self, _label: &str) {}
    fn stop(&self) {}
}

/// Terminal spinner on stderr, ticking on indicatif's own thread.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    pub fn new() -> Self {
        let style = ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ");

        let bar = ProgressBar::new_spinner();
        bar.set_style(style);
        Self { bar }
    }
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress for Spinner {
    fn start(&self, label: &str) {
        self.bar.set_message(label.to_string());
        self.bar.enable_steady_tick(Duration::from_millis(100));
    }

    fn stop(&self) {
        self.bar.finish_and_clear();
    }
}
