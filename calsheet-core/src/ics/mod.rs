//! ICS file reading.
//!
//! Decoding of the container format (folding, property grammar) is left to the
//! icalendar crate's parser; this module maps each VEVENT onto a `CalendarEvent`.

mod parse;

pub use parse::{extract_events, extract_events_from_file};
