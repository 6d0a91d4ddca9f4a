//! Event records produced by the extractor and consumed by the exporters.
//!
//! Free-text fields are kept twice: as plain text and as a sequence of
//! formatted runs, so exporters that can render bold/italic spans do so and
//! the rest fall back to the plain rendering.

use serde::{Deserialize, Serialize};

/// A span of text sharing one bold/italic state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

impl TextRun {
    pub fn new(text: impl Into<String>, bold: bool, italic: bool) -> Self {
        Self {
            text: text.into(),
            bold,
            italic,
        }
    }

    /// An unformatted run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, false, false)
    }

    /// The run emitted for a `<br>` tag.
    pub fn line_break() -> Self {
        Self::plain("\n")
    }

    pub fn is_formatted(&self) -> bool {
        self.bold || self.italic
    }
}

/// Ordered runs of a text field.
///
/// Never empty: text without any content holds a single empty, unformatted
/// run so consumers can treat "nothing here" the same way everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormattedText(Vec<TextRun>);

impl FormattedText {
    /// The single-run placeholder used when there is no content.
    pub fn empty() -> Self {
        Self(vec![TextRun::default()])
    }

    /// Wrap runs, substituting the placeholder for an empty list.
    pub fn from_runs(runs: Vec<TextRun>) -> Self {
        if runs.is_empty() {
            Self::empty()
        } else {
            Self(runs)
        }
    }

    pub fn runs(&self) -> &[TextRun] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TextRun> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when this is the no-content placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.0.len() == 1 && self.0[0] == TextRun::default()
    }

    /// True when at least one run has non-whitespace text.
    pub fn has_visible_text(&self) -> bool {
        self.0.iter().any(|run| !run.text.trim().is_empty())
    }

    /// Concatenation of all run texts, in order.
    pub fn plain_text(&self) -> String {
        self.0.iter().map(|run| run.text.as_str()).collect()
    }
}

impl Default for FormattedText {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a> IntoIterator for &'a FormattedText {
    type Item = &'a TextRun;
    type IntoIter = std::slice::Iter<'a, TextRun>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// One VEVENT, normalized for tabular export.
///
/// Every string defaults to empty when the source property is absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub summary: String,
    pub summary_formatted: FormattedText,
    pub start: String,
    pub end: String,
    pub description: String,
    pub description_formatted: FormattedText,
    pub location: String,
    pub organizer: String,
    pub url: String,
    pub uid: String,
}

impl CalendarEvent {
    /// Plain-text value of a column.
    pub fn plain(&self, column: Column) -> &str {
        match column {
            Column::Title => &self.summary,
            Column::Start => &self.start,
            Column::End => &self.end,
            Column::Description => &self.description,
            Column::Location => &self.location,
            Column::Organizer => &self.organizer,
            Column::Url => &self.url,
            Column::Uid => &self.uid,
        }
    }

    /// Formatted runs of a column, for the columns that carry them.
    pub fn formatted(&self, column: Column) -> Option<&FormattedText> {
        match column {
            Column::Title => Some(&self.summary_formatted),
            Column::Description => Some(&self.description_formatted),
            _ => None,
        }
    }
}

/// Export columns. The order of `ALL` is part of the output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Title,
    Start,
    End,
    Description,
    Location,
    Organizer,
    Url,
    Uid,
}

impl Column {
    pub const ALL: [Column; 8] = [
        Column::Title,
        Column::Start,
        Column::End,
        Column::Description,
        Column::Location,
        Column::Organizer,
        Column::Url,
        Column::Uid,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Column::Title => "Title",
            Column::Start => "Start",
            Column::End => "End",
            Column::Description => "Description",
            Column::Location => "Location",
            Column::Organizer => "Organizer",
            Column::Url => "URL",
            Column::Uid => "UID",
        }
    }

    /// Spreadsheet column width, in character units.
    pub fn width(self) -> f64 {
        match self {
            Column::Title => 30.0,
            Column::Start | Column::End => 20.0,
            Column::Description => 40.0,
            Column::Location => 25.0,
            Column::Organizer => 30.0,
            Column::Url | Column::Uid => 40.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatted_text_never_empty() {
        let text = FormattedText::from_runs(vec![]);
        assert_eq!(text.len(), 1);
        assert!(text.is_placeholder());
        assert!(!text.has_visible_text());
        assert_eq!(text.plain_text(), "");
    }

    #[test]
    fn test_whitespace_runs_are_not_visible() {
        let text = FormattedText::from_runs(vec![TextRun::line_break(), TextRun::plain("  ")]);
        assert!(!text.is_placeholder());
        assert!(!text.has_visible_text());
    }

    #[test]
    fn test_column_order_and_labels() {
        let headers: Vec<&str> = Column::ALL.iter().map(|c| c.header()).collect();
        assert_eq!(
            headers,
            ["Title", "Start", "End", "Description", "Location", "Organizer", "URL", "UID"]
        );
    }

    #[test]
    fn test_only_free_text_columns_are_formatted() {
        let event = CalendarEvent::default();
        let formatted: Vec<Column> = Column::ALL
            .into_iter()
            .filter(|c| event.formatted(*c).is_some())
            .collect();
        assert_eq!(formatted, [Column::Title, Column::Description]);
    }
}
