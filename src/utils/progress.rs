//! Download progress bars.
//!
//! Sized downloads get a bar with rate, percentage and ETA. Without a
//! `Content-Length` the bar degrades to a spinner with a byte counter.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{prefix}: [{bar:30}] {binary_bytes_per_sec} {percent}% {eta}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("= ")
}

fn counter_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner} {prefix}: {binary_bytes} {binary_bytes_per_sec}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Progress bar for one download. Hidden when `visible` is false or stderr is
/// not a terminal.
pub fn download_bar(title: &str, total: Option<u64>, visible: bool) -> ProgressBar {
    if !visible || !std::io::stderr().is_terminal() {
        return ProgressBar::with_draw_target(total, ProgressDrawTarget::hidden());
    }

    let pb = match total {
        Some(total) => {
            let pb = ProgressBar::new(total);
            pb.set_style(bar_style());
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(counter_style());
            pb.enable_steady_tick(Duration::from_millis(120));
            pb
        }
    };
    pb.set_prefix(title.to_string());
    pb
}
