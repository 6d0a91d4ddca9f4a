//! Core of calsheet: turn iCalendar exports into spreadsheet rows.
//!
//! The pipeline has three parts:
//! - `html` splits HTML-bearing text fields into bold/italic runs and plain text
//! - `ics` reads a calendar and produces one `CalendarEvent` per VEVENT
//! - `export` writes those records as an xlsx workbook or a semicolon CSV file

pub mod config;
pub mod error;
pub mod event;
pub mod export;
pub mod html;
pub mod ics;

pub use error::{CalSheetError, CalSheetResult};
pub use event::{CalendarEvent, Column, FormattedText, TextRun};
pub use export::{ExportFormat, export, write_delimited, write_spreadsheet};
pub use ics::{extract_events, extract_events_from_file};
