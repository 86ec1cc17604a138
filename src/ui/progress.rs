//! Spinners and download progress with CI fallback

use super::context::UiContext;
use console::style;
use indicatif::{HumanBytes, ProgressBar, ProgressStyle};

/// A task spinner; plain lines when not interactive
pub struct TaskSpinner {
    spinner: Option<cliclack::ProgressBar>,
    interactive: bool,
}

impl TaskSpinner {
    pub fn new(ctx: &UiContext) -> Self {
        Self {
            spinner: None,
            interactive: ctx.use_fancy_output(),
        }
    }

    pub fn start(&mut self, message: &str) {
        if self.interactive {
            let spinner = cliclack::spinner();
            spinner.start(message);
            self.spinner = Some(spinner);
        } else {
            println!("{} {}", style("...").dim(), message);
        }
    }

    pub fn stop(&mut self, message: &str) {
        self.finish(message, style("[OK]").green());
    }

    pub fn stop_warn(&mut self, message: &str) {
        self.finish(message, style("[WARN]").yellow());
    }

    fn finish(&mut self, message: &str, tag: console::StyledObject<&str>) {
        match self.spinner.take() {
            Some(spinner) => spinner.stop(message),
            None => println!("{} {}", tag, message),
        }
    }
}

/// Byte progress for an archive download.
///
/// Draws an indicatif bar when interactive. Plain mode prints a single line
/// when the download finishes.
pub struct DownloadProgress {
    bar: Option<ProgressBar>,
    label: String,
}

impl DownloadProgress {
    pub fn new(ctx: &UiContext, label: &str) -> Self {
        let bar = ctx.use_fancy_output().then(|| {
            let bar = ProgressBar::new(0);
            let template = ProgressStyle::with_template(
                "  {spinner:.magenta} {prefix}  {bar:24.magenta/dim} {bytes}/{total_bytes} {elapsed:.dim}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
            .progress_chars("━╸─");
            bar.set_style(template);
            bar.set_prefix(label.to_string());
            bar.enable_steady_tick(std::time::Duration::from_millis(120));
            bar
        });
        Self {
            bar,
            label: label.to_string(),
        }
    }

    /// Record `done` bytes out of `total`, when the server announced a length
    pub fn update(&self, done: u64, total: Option<u64>) {
        if let Some(bar) = &self.bar {
            match total {
                Some(total) => bar.set_length(total),
                // Unknown length: keep the bar just ahead of the position
                None => bar.set_length(done.max(1)),
            }
            bar.set_position(done);
        }
    }

    /// Clear the bar and report the final size
    pub fn finish(&self, bytes: u64) {
        match &self.bar {
            Some(bar) => {
                bar.disable_steady_tick();
                bar.finish_and_clear();
            }
            None => println!(
                "  {} {} ({})",
                style("[OK]").green(),
                self.label,
                HumanBytes(bytes)
            ),
        }
    }

    /// Clear the bar after a failed download
    pub fn abandon(&self) {
        if let Some(bar) = &self.bar {
            bar.disable_steady_tick();
            bar.finish_and_clear();
        }
    }
}
