//! Tabular export of calendar events.
//!
//! Both outputs share the column order in [`Column::ALL`]: Title, Start, End,
//! Description, Location, Organizer, URL, UID.

mod delimited;
mod xlsx;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CalSheetResult;
use crate::event::CalendarEvent;

pub use delimited::write_delimited;
pub use xlsx::write_spreadsheet;

/// Worksheet name used when none is configured.
pub const DEFAULT_SHEET_NAME: &str = "Events";

/// Data rows that fit under the header row of one worksheet.
pub const MAX_DATA_ROWS: usize = 1_048_575;

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }

    /// Format implied by a file extension, if any.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "xlsx" => Some(ExportFormat::Xlsx),
            "csv" | "txt" => Some(ExportFormat::Csv),
            _ => None,
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!("unknown format '{other}' (expected xlsx or csv)")),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Xlsx => write!(f, "Excel"),
            ExportFormat::Csv => write!(f, "CSV"),
        }
    }
}

/// Write events in the given format. `sheet_name` only applies to xlsx.
pub fn export(
    events: &[CalendarEvent],
    path: &Path,
    format: ExportFormat,
    sheet_name: &str,
) -> CalSheetResult<()> {
    match format {
        ExportFormat::Xlsx => write_spreadsheet(events, path, sheet_name),
        ExportFormat::Csv => write_delimited(events, path),
    }
}
