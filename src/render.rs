//! Terminal rendering for calsheet-core types.
//!
//! Extension traits that draw extracted events with owo_colors, reproducing
//! bold/italic runs as terminal attributes.

use calsheet_core::{CalendarEvent, FormattedText, TextRun};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for TextRun {
    fn render(&self) -> String {
        match (self.bold, self.italic) {
            (true, true) => self.text.bold().italic().to_string(),
            (true, false) => self.text.bold().to_string(),
            (false, true) => self.text.italic().to_string(),
            (false, false) => self.text.clone(),
        }
    }
}

impl Render for FormattedText {
    fn render(&self) -> String {
        self.iter().map(Render::render).collect()
    }
}

impl Render for CalendarEvent {
    fn render(&self) -> String {
        let title = if self.summary_formatted.has_visible_text() {
            self.summary_formatted.render()
        } else if self.summary.is_empty() {
            "(No title)".dimmed().to_string()
        } else {
            self.summary.clone()
        };

        let mut lines = vec![format!("📅 {}", title)];

        let time = match (self.start.is_empty(), self.end.is_empty()) {
            (true, true) => None,
            (false, true) => Some(self.start.clone()),
            (true, false) => Some(format!("→ {}", self.end)),
            (false, false) => Some(format!("{} → {}", self.start, self.end)),
        };
        if let Some(time) = time {
            lines.push(format!("   {}", time.dimmed()));
        }
        if !self.location.is_empty() {
            lines.push(format!("   📍 {}", self.location));
        }
        if self.description_formatted.has_visible_text() {
            let description = self.description_formatted.render();
            lines.extend(
                description
                    .lines()
                    .filter(|line| !line.trim().is_empty())
                    .map(|line| format!("   │ {}", line.trim())),
            );
        }

        lines.join("\n")
    }
}

pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
