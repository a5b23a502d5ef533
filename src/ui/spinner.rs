use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::ui::icons::CHECK;

/// Loading indicator shown while a request is in flight.
///
/// Draws to stderr and stays hidden when stderr is not a terminal, so
/// piped output and tests see nothing.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    pub fn new(message: impl Into<String>) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_draw_target(ProgressDrawTarget::stderr());
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("spinner template is a valid static string"),
        );
        bar.set_message(message.into());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// Hidden spinner for `--json` and other machine-readable output.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Remove the spinner line entirely.
    pub fn clear(&self) {
        self.bar.finish_and_clear();
    }

    pub fn success(&self, message: &str) {
        self.bar
            .finish_with_message(format!("{}{}", CHECK, style(message).green()));
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
