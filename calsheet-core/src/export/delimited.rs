//! Semicolon-separated export.
//!
//! Formatting runs are dropped; every column holds its plain text. The file
//! starts with a UTF-8 byte-order mark so spreadsheet applications pick the
//! right encoding when opening it.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::error::{CalSheetError, CalSheetResult};
use crate::event::{CalendarEvent, Column};

const DELIMITER: u8 = b';';
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Write events as semicolon-separated text. Replaces `path` if it exists.
pub fn write_delimited(events: &[CalendarEvent], path: &Path) -> CalSheetResult<()> {
    if events.is_empty() {
        return Err(CalSheetError::EmptyInput);
    }

    let mut file = File::create(path)?;
    file.write_all(UTF8_BOM)?;

    let mut writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .from_writer(file);

    writer.write_record(Column::ALL.iter().map(|column| column.header()))?;
    for event in events {
        writer.write_record(Column::ALL.iter().map(|column| event.plain(*column)))?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = events.len(), "wrote delimited file");
    Ok(())
}
