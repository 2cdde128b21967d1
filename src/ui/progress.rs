use crate::extractor::ExtractionProgress;
use crate::ui::output::format_duration;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

const BAR_TEMPLATE: &str = "{spinner:.green} {pos}/{len} [{wide_bar:.cyan/blue}] {msg}";
const IDLE_MESSAGE: &str = "Extracting text...";

/// Terminal area for batch progress. Draws nothing unless `visible`.
pub struct ProgressManager {
    multi: MultiProgress,
    visible: bool,
}

impl ProgressManager {
    pub fn new(visible: bool) -> Self {
        let multi = if visible {
            MultiProgress::new()
        } else {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        };

        Self { multi, visible }
    }

    /// Bar counting the files of one batch.
    pub fn batch(&self, total_files: usize) -> BatchBar {
        let total = total_files as u64;

        let bar = if self.visible {
            let bar = self.multi.add(ProgressBar::new(total));
            bar.set_style(
                ProgressStyle::with_template(BAR_TEMPLATE)
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=> "),
            );
            bar.enable_steady_tick(Duration::from_millis(120));
            bar
        } else {
            ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::hidden())
        };

        bar.set_message(IDLE_MESSAGE);
        BatchBar { bar }
    }

    /// Run `print` with the bars lifted so its lines are not torn.
    pub fn suspend<R>(&self, print: impl FnOnce() -> R) -> R {
        self.multi.suspend(print)
    }

    pub fn clear(&self) {
        if self.visible {
            let _ = self.multi.clear();
        }
    }
}

pub struct BatchBar {
    bar: ProgressBar,
}

impl BatchBar {
    pub fn advance(&self, progress: &ExtractionProgress) {
        self.bar.set_position(progress.files_processed as u64);
        self.bar.set_message(status_line(progress));
    }

    pub fn finish(&self, progress: &ExtractionProgress) {
        self.bar.finish_with_message(format!(
            "Processed {} files in {}",
            progress.files_processed,
            format_duration(progress.elapsed())
        ));
    }

    pub fn abandon(&self) {
        self.bar.abandon();
    }
}

fn status_line(progress: &ExtractionProgress) -> String {
    let Some(current) = progress.current_file.as_deref() else {
        return IDLE_MESSAGE.to_string();
    };

    let remaining = progress.estimated_remaining();
    if remaining.as_secs() == 0 {
        current.to_string()
    } else {
        format!("{} (ETA: {})", current, format_duration(remaining))
    }
}
