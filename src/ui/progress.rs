//! Download progress display.

use std::io::Read;

use indicatif::{ProgressBar, ProgressBarIter, ProgressStyle};

/// Progress bar for an asset download.
///
/// Hidden entirely when progress display is disabled, so callers never
/// branch on the quiet flag themselves.
pub struct DownloadProgress {
    bar: ProgressBar,
}

impl DownloadProgress {
    /// Create a progress display for `name`.
    ///
    /// `total` is the content length when the server reports one; without it
    /// a byte-counting spinner is shown instead of a bar.
    pub fn new(name: &str, total: Option<u64>, enabled: bool) -> Self {
        let bar = if !enabled {
            ProgressBar::hidden()
        } else if let Some(len) = total {
            let bar = ProgressBar::new(len);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{msg} [{bar:30.magenta}] {bytes}/{total_bytes} ({bytes_per_sec})")
                    .unwrap()
                    .progress_chars("=> "),
            );
            bar
        } else {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::default_spinner()
                    .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                    .template("{spinner:.magenta} {msg} {bytes}")
                    .unwrap(),
            );
            bar
        };
        bar.set_message(name.to_string());

        Self { bar }
    }

    /// Wrap a reader so reads advance the bar.
    pub fn wrap_read<R: Read>(&self, read: R) -> ProgressBarIter<R> {
        self.bar.wrap_read(read)
    }

    /// Remove the bar from the terminal.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
