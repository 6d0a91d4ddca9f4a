//! Restricted HTML handling for calendar text fields.
//!
//! Calendar clients (Outlook, Teams, some web exports) put HTML into SUMMARY and
//! DESCRIPTION. Only `b`/`strong`, `i`/`em` and `br` carry meaning here; every
//! other tag is dropped. Two renderings are produced:
//!
//! - [`extract_runs`]: ordered [`TextRun`]s with bold/italic flags
//! - [`clean_html`]: a single plain string
//!
//! Both decode the same fixed entity set and both turn `<br>` into a line break.

use std::sync::LazyLock;

use regex::Regex;

use crate::event::{FormattedText, TextRun};

/// Entities decoded before any tag handling, applied in this order.
const ENTITIES: [(&str, &str); 6] = [
    ("&nbsp;", " "),
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
];

static BREAK_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("break tag pattern is valid"));
static ANY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Replace the supported named entities. Anything else is left as written.
pub fn decode_entities(text: &str) -> String {
    ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (entity, replacement)| {
            acc.replace(entity, replacement)
        })
}

/// Split HTML into bold/italic text runs.
///
/// A run's flags reflect the tags open when its text is reached. Text chunks
/// that are only whitespace are skipped, `<br>` yields an unformatted `"\n"`
/// run, and closing a tag that is not open does nothing. Adjacent runs with
/// equal formatting are not merged.
///
/// Empty input gives the single empty placeholder run.
pub fn extract_runs(html: &str) -> FormattedText {
    if html.is_empty() {
        return FormattedText::empty();
    }

    let decoded = decode_entities(html);
    let mut builder = RunBuilder::default();
    for token in Tokenizer::new(&decoded) {
        match token {
            Token::Text(text) => builder.text(text),
            Token::StartTag { name, self_closing } => builder.start_tag(&name, self_closing),
            Token::EndTag { name } => builder.end_tag(&name),
            Token::Markup => {}
        }
    }

    FormattedText::from_runs(builder.runs)
}

/// Reduce HTML to plain text.
///
/// `<br>` variants become line breaks, all other tags are removed, whitespace
/// inside each line collapses to one space and lines are trimmed. Raw newlines
/// in the source are ordinary whitespace; only `<br>` produces a break.
pub fn clean_html(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }

    let decoded = decode_entities(html);
    let lines: Vec<String> = BREAK_TAG
        .split(&decoded)
        .map(|segment| {
            let stripped = ANY_TAG.replace_all(segment, "");
            WHITESPACE.replace_all(&stripped, " ").trim().to_string()
        })
        .collect();

    lines.join("\n").trim().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Emphasis {
    Bold,
    Italic,
}

impl Emphasis {
    fn from_tag(name: &str) -> Option<Self> {
        match name {
            "b" | "strong" => Some(Emphasis::Bold),
            "i" | "em" => Some(Emphasis::Italic),
            _ => None,
        }
    }
}

/// Nesting depths plus the runs emitted so far.
#[derive(Default)]
struct RunBuilder {
    bold_depth: usize,
    italic_depth: usize,
    runs: Vec<TextRun>,
}

impl RunBuilder {
    fn depth_mut(&mut self, emphasis: Emphasis) -> &mut usize {
        match emphasis {
            Emphasis::Bold => &mut self.bold_depth,
            Emphasis::Italic => &mut self.italic_depth,
        }
    }

    fn start_tag(&mut self, name: &str, self_closing: bool) {
        if name == "br" {
            self.runs.push(TextRun::line_break());
            return;
        }
        match Emphasis::from_tag(name) {
            // `<b/>` opens and closes at once
            Some(_) if self_closing => {}
            Some(emphasis) => *self.depth_mut(emphasis) += 1,
            None => {}
        }
    }

    fn end_tag(&mut self, name: &str) {
        if let Some(emphasis) = Emphasis::from_tag(name) {
            let depth = self.depth_mut(emphasis);
            *depth = depth.saturating_sub(1);
        }
    }

    fn text(&mut self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        self.runs.push(TextRun::new(
            text,
            self.bold_depth > 0,
            self.italic_depth > 0,
        ));
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    Text(&'a str),
    StartTag { name: String, self_closing: bool },
    EndTag { name: String },
    /// Comments, doctypes and processing instructions.
    Markup,
}

/// Streaming scanner over already entity-decoded HTML.
///
/// A `<` that does not open a tag, or a tag that never closes, is kept as text.
struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Text from the current position up to the next `<` (not counting one at
    /// the current position).
    fn take_text(&mut self) -> Token<'a> {
        let rest = &self.input[self.pos..];
        let end = rest
            .char_indices()
            .skip(1)
            .find(|&(_, c)| c == '<')
            .map_or(rest.len(), |(i, _)| i);
        self.pos += end;
        Token::Text(&rest[..end])
    }

    fn take_rest_as_text(&mut self) -> Token<'a> {
        let rest = &self.input[self.pos..];
        self.pos = self.input.len();
        Token::Text(rest)
    }

    /// Byte offset (within `rest`) of the `>` closing a tag, skipping quoted
    /// attribute values.
    fn tag_end(rest: &str) -> Option<usize> {
        let mut quote: Option<char> = None;
        for (i, c) in rest.char_indices() {
            match quote {
                Some(q) if c == q => quote = None,
                Some(_) => {}
                None if c == '"' || c == '\'' => quote = Some(c),
                None if c == '>' => return Some(i),
                None => {}
            }
        }
        None
    }

    fn tag_name(inner: &str) -> String {
        inner
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | ':'))
            .collect::<String>()
            .to_ascii_lowercase()
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.input[self.pos..];
        if rest.is_empty() {
            return None;
        }
        if !rest.starts_with('<') {
            return Some(self.take_text());
        }

        if let Some(body) = rest.strip_prefix("<!--") {
            return Some(match body.find("-->") {
                Some(end) => {
                    self.pos += 4 + end + 3;
                    Token::Markup
                }
                None => self.take_rest_as_text(),
            });
        }

        let mut chars = rest.chars().skip(1);
        let (is_end, is_markup) = match (chars.next(), chars.next()) {
            (Some(c), _) if c.is_ascii_alphabetic() => (false, false),
            (Some('/'), Some(c)) if c.is_ascii_alphabetic() => (true, false),
            (Some('!' | '?'), _) => (false, true),
            _ => return Some(self.take_text()),
        };

        let Some(end) = Self::tag_end(rest) else {
            return Some(self.take_rest_as_text());
        };
        self.pos += end + 1;

        if is_markup {
            return Some(Token::Markup);
        }
        let inner = &rest[1..end];
        Some(if is_end {
            Token::EndTag {
                name: Self::tag_name(&inner[1..]),
            }
        } else {
            Token::StartTag {
                name: Self::tag_name(inner),
                self_closing: inner.trim_end().ends_with('/'),
            }
        })
    }
}
