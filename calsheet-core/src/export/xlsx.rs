//! Excel export.
//!
//! Title and Description cells are written as rich strings so bold/italic runs
//! survive. A cell falls back to its plain text when the runs have nothing
//! visible, when they would not fit in a cell, or when the writer rejects them.
//! Plain text longer than a cell allows is cut at the limit.

use std::path::Path;

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatPattern, Workbook, Worksheet};
use tracing::{debug, info};

use super::MAX_DATA_ROWS;
use crate::error::{CalSheetError, CalSheetResult};
use crate::event::{CalendarEvent, Column, FormattedText, TextRun};

const HEADER_FILL: u32 = 0xCCCCCC;
const HEADER_FONT_SIZE: f64 = 11.0;
const HEADER_ROW_HEIGHT: f64 = 25.0;

/// Excel's limit on characters in one cell.
const MAX_CELL_CHARS: usize = 32_767;

/// Write events to an xlsx workbook with a single worksheet.
///
/// The file at `path` is replaced if it exists.
pub fn write_spreadsheet(
    events: &[CalendarEvent],
    path: &Path,
    sheet_name: &str,
) -> CalSheetResult<()> {
    if events.is_empty() {
        return Err(CalSheetError::EmptyInput);
    }
    if events.len() > MAX_DATA_ROWS {
        return Err(CalSheetError::TooManyEvents(events.len()));
    }

    let formats = SheetFormats::new();
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    write_header(worksheet, &formats)?;
    for (index, event) in events.iter().enumerate() {
        // bounded by MAX_DATA_ROWS above
        let row = index as u32 + 1;
        write_event_row(worksheet, row, event, &formats)?;
    }

    workbook.save(path)?;
    info!(path = %path.display(), rows = events.len(), "wrote spreadsheet");
    Ok(())
}

struct SheetFormats {
    header: Format,
    cell: Format,
    regular: Format,
    bold: Format,
    italic: Format,
    bold_italic: Format,
}

impl SheetFormats {
    fn new() -> Self {
        Self {
            header: Format::new()
                .set_bold()
                .set_font_size(HEADER_FONT_SIZE)
                .set_background_color(Color::RGB(HEADER_FILL))
                .set_pattern(FormatPattern::Solid)
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter),
            cell: Format::new().set_text_wrap().set_align(FormatAlign::Top),
            regular: Format::new(),
            bold: Format::new().set_bold(),
            italic: Format::new().set_italic(),
            bold_italic: Format::new().set_bold().set_italic(),
        }
    }

    fn run_format(&self, run: &TextRun) -> &Format {
        match (run.bold, run.italic) {
            (false, false) => &self.regular,
            (true, false) => &self.bold,
            (false, true) => &self.italic,
            (true, true) => &self.bold_italic,
        }
    }
}

fn write_header(worksheet: &mut Worksheet, formats: &SheetFormats) -> CalSheetResult<()> {
    for (col, column) in Column::ALL.iter().enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(0, col, column.header(), &formats.header)?;
        worksheet.set_column_width(col, column.width())?;
    }
    worksheet.set_row_height(0, HEADER_ROW_HEIGHT)?;
    Ok(())
}

fn write_event_row(
    worksheet: &mut Worksheet,
    row: u32,
    event: &CalendarEvent,
    formats: &SheetFormats,
) -> CalSheetResult<()> {
    for (col, column) in Column::ALL.iter().enumerate() {
        let col = col as u16;
        let plain = event.plain(*column);
        match event.formatted(*column) {
            Some(runs) => write_formatted_cell(worksheet, row, col, runs, plain, formats)?,
            None => write_plain_cell(worksheet, row, col, plain, formats)?,
        }
    }
    Ok(())
}

/// What a formatted column's cell ends up holding.
#[derive(Debug)]
enum CellContent<'a> {
    Rich(Vec<(&'a Format, &'a str)>),
    Plain(&'a str),
}

fn cell_content<'a>(
    runs: &'a FormattedText,
    fallback: &'a str,
    formats: &'a SheetFormats,
) -> CellContent<'a> {
    if !runs.has_visible_text() {
        return CellContent::Plain(fallback);
    }

    let segments: Vec<(&Format, &str)> = runs
        .iter()
        .filter(|run| !run.text.is_empty())
        .map(|run| (formats.run_format(run), run.text.as_str()))
        .collect();

    let chars: usize = segments.iter().map(|(_, text)| text.chars().count()).sum();
    if chars > MAX_CELL_CHARS {
        debug!(chars, "rich text too long for one cell, using plain text");
        return CellContent::Plain(fallback);
    }

    CellContent::Rich(segments)
}

fn write_formatted_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    runs: &FormattedText,
    fallback: &str,
    formats: &SheetFormats,
) -> CalSheetResult<()> {
    match cell_content(runs, fallback, formats) {
        CellContent::Rich(segments) => {
            if let Err(e) =
                worksheet.write_rich_string_with_format(row, col, &segments, &formats.cell)
            {
                debug!(row, col, error = %e, "rich text rejected, using plain text");
                write_plain_cell(worksheet, row, col, fallback, formats)?;
            }
        }
        CellContent::Plain(text) => write_plain_cell(worksheet, row, col, text, formats)?,
    }
    Ok(())
}

fn write_plain_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    text: &str,
    formats: &SheetFormats,
) -> CalSheetResult<()> {
    let fitted = fit_cell(text);
    if fitted.len() < text.len() {
        debug!(row, col, chars = text.chars().count(), "cell text cut to Excel's limit");
    }
    worksheet.write_string_with_format(row, col, fitted, &formats.cell)?;
    Ok(())
}

/// The longest prefix of `text` that fits in one cell, cut on a char boundary.
fn fit_cell(text: &str) -> &str {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
