//! Terminal rendering of task progress

use crossterm::style::{Color, Stylize};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

use crate::client::VideoInfo;
use crate::poller::{Badge, DisplayState, ProgressView};
use crate::prefs::Theme;

const BAR_TEMPLATE: &str = "{prefix} [{bar:30}] {pos:>3}%  {msg}";

/// Draws one progress bar per task on stdout; errors go to stderr.
///
/// Lines printed while a bar is active are written with the bar suspended so
/// they never interleave with a redraw.
pub struct TerminalView {
    theme: Theme,
    color: bool,
    visible: bool,
    bar: Mutex<Option<ProgressBar>>,
}

impl TerminalView {
    pub fn new(theme: Theme, color: bool) -> Self {
        Self {
            theme,
            color,
            visible: true,
            bar: Mutex::new(None),
        }
    }

    /// Draws the preview panel
    pub fn show_preview(&self, info: &VideoInfo) {
        let field = |value: &Option<String>| value.clone().unwrap_or_default();

        let mut lines = vec![
            format!("  {}", field(&info.title)),
            format!(
                "  by {} | {} | {} views",
                field(&info.uploader),
                field(&info.duration_string),
                field(&info.view_count_string)
            ),
        ];
        if let Some(thumbnail) = info.thumbnail.as_deref().filter(|t| !t.is_empty()) {
            lines.push(format!("  thumbnail: {}", thumbnail));
        }
        if let Some(description) = info.description.as_deref().filter(|d| !d.is_empty()) {
            let summary: String = description
                .lines()
                .next()
                .unwrap_or_default()
                .chars()
                .take(120)
                .collect();
            lines.push(format!("  {}", summary));
        }

        for line in lines {
            self.out(&line);
        }
    }

    /// Informational line outside the progress bar
    pub fn notice(&self, message: &str) {
        self.out(message);
    }

    fn slot(&self) -> MutexGuard<'_, Option<ProgressBar>> {
        self.bar.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn new_bar(&self) -> ProgressBar {
        let target = if self.visible {
            ProgressDrawTarget::stdout()
        } else {
            ProgressDrawTarget::hidden()
        };
        let bar = ProgressBar::with_draw_target(Some(100), target);

        match ProgressStyle::with_template(BAR_TEMPLATE) {
            Ok(style) => bar.set_style(style.progress_chars("#-")),
            Err(e) => debug!(error = %e, "Falling back to the default bar style"),
        }
        bar
    }

    fn badge(&self, badge: Badge) -> String {
        let label = format!("[{}]", badge.label());
        if !self.color {
            return label;
        }
        label.with(badge_color(self.theme, badge)).to_string()
    }

    fn out(&self, line: &str) {
        match self.slot().as_ref() {
            Some(bar) => bar.suspend(|| emit(io::stdout().lock(), line)),
            None => emit(io::stdout().lock(), line),
        }
    }
}

impl ProgressView for TerminalView {
    fn show_progress(&self, task_id: &str) {
        let mut slot = self.slot();
        if let Some(previous) = slot.take() {
            previous.abandon();
        }
        emit(io::stdout().lock(), &format!("ID: {}", task_id));
        *slot = Some(self.new_bar());
    }

    fn hide_progress(&self) {
        if let Some(bar) = self.slot().take() {
            bar.finish_and_clear();
        }
    }

    fn render(&self, state: &DisplayState) {
        let mut slot = self.slot();
        let bar = slot.get_or_insert_with(|| self.new_bar()).clone();

        let mut lines = state.message.as_deref().unwrap_or_default().lines();
        bar.set_prefix(self.badge(state.badge));
        bar.set_position(u64::from(state.progress));
        bar.set_message(lines.next().unwrap_or_default().to_string());

        if state.is_terminal() {
            bar.finish();
            *slot = None;
            drop(slot);

            for line in lines {
                self.out(&format!("    {}", line));
            }
            if let Some(elapsed) = state.elapsed {
                self.out(&format!("Finished in {}s", elapsed.num_seconds()));
            }
        }
    }

    fn show_error(&self, message: &str) {
        let mut text = format!("Error: {}", message);
        if self.color {
            text = text.with(badge_color(self.theme, Badge::Failed)).to_string();
        }

        match self.slot().as_ref() {
            Some(bar) => bar.suspend(|| emit(io::stderr().lock(), &text)),
            None => emit(io::stderr().lock(), &text),
        }
    }

    // The terminal has no error panel to clear or form to lock
    fn hide_error(&self) {}

    fn set_form_disabled(&self, _disabled: bool) {}
}

/// A closed or broken pipe must not stop the download, so the failure is only logged
fn emit(mut out: impl Write, line: &str) {
    if let Err(e) = writeln!(out, "{}", line) {
        debug!(error = %e, "Terminal write failed");
    }
}

fn badge_color(theme: Theme, badge: Badge) -> Color {
    match (theme, badge) {
        (Theme::Light, Badge::Pending) => Color::DarkYellow,
        (Theme::Light, Badge::Downloading) => Color::DarkBlue,
        (Theme::Light, Badge::Processing) => Color::DarkMagenta,
        (Theme::Light, Badge::Completed) => Color::DarkGreen,
        (Theme::Light, Badge::Failed) => Color::DarkRed,
        (Theme::Dark, Badge::Pending) => Color::Yellow,
        (Theme::Dark, Badge::Downloading) => Color::Blue,
        (Theme::Dark, Badge::Processing) => Color::Magenta,
        (Theme::Dark, Badge::Completed) => Color::Green,
        (Theme::Dark, Badge::Failed) => Color::Red,
    }
}
