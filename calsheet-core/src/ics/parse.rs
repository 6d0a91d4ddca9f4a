//! VEVENT to `CalendarEvent` mapping using the icalendar crate's parser.

use std::path::Path;

use chrono::NaiveDateTime;
use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{Component, Property, read_calendar, unfold},
};
use tracing::{debug, info};

use crate::error::{CalSheetError, CalSheetResult};
use crate::event::CalendarEvent;
use crate::html::{clean_html, extract_runs};

const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Read an .ics file and extract its events.
pub fn extract_events_from_file(path: &Path) -> CalSheetResult<Vec<CalendarEvent>> {
    if !path.exists() {
        return Err(CalSheetError::NotFound(path.to_path_buf()));
    }

    let source = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => CalSheetError::NotFound(path.to_path_buf()),
        _ => CalSheetError::Io(e),
    })?;

    let events = extract_events(&source)?;
    info!(path = %path.display(), events = events.len(), "read calendar");
    Ok(events)
}

/// Extract one record per top-level VEVENT, in document order.
pub fn extract_events(source: &[u8]) -> CalSheetResult<Vec<CalendarEvent>> {
    let content = std::str::from_utf8(source)
        .map_err(|e| CalSheetError::Format(format!("calendar is not valid UTF-8: {e}")))?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let unfolded = unfold(content);
    let unfolded = unfolded.trim_start();
    if !starts_with_calendar(unfolded) {
        return Err(CalSheetError::Format(
            "expected the data to start with BEGIN:VCALENDAR".into(),
        ));
    }

    let calendar = read_calendar(unfolded).map_err(|e| CalSheetError::Format(e.to_string()))?;

    Ok(calendar
        .components
        .iter()
        .filter(|c| c.name.as_str().eq_ignore_ascii_case("VEVENT"))
        .map(to_calendar_event)
        .collect())
}

fn starts_with_calendar(content: &str) -> bool {
    content
        .get(.."BEGIN:VCALENDAR".len())
        .is_some_and(|head| head.eq_ignore_ascii_case("BEGIN:VCALENDAR"))
}

fn to_calendar_event(vevent: &Component) -> CalendarEvent {
    let summary = text_value(vevent, "SUMMARY");
    let description = text_value(vevent, "DESCRIPTION");

    CalendarEvent {
        summary_formatted: extract_runs(&summary),
        summary: clean_html(&summary),
        start: time_value(vevent, "DTSTART"),
        end: time_value(vevent, "DTEND"),
        description_formatted: extract_runs(&description),
        description: clean_html(&description),
        location: text_value(vevent, "LOCATION"),
        organizer: raw_value(vevent, "ORGANIZER"),
        url: raw_value(vevent, "URL"),
        uid: text_value(vevent, "UID"),
    }
}

/// Property names are case-insensitive.
fn find_property<'a>(vevent: &'a Component<'a>, name: &str) -> Option<&'a Property<'a>> {
    vevent
        .properties
        .iter()
        .find(|p| p.name.as_str().eq_ignore_ascii_case(name))
}

/// Property value exactly as written, or empty when absent.
fn raw_value(vevent: &Component, name: &str) -> String {
    find_property(vevent, name)
        .map(|p| p.val.to_string())
        .unwrap_or_default()
}

/// TEXT property value with escapes decoded.
fn text_value(vevent: &Component, name: &str) -> String {
    unescape_text(&raw_value(vevent, name))
}

/// Date-times keep their own wall-clock time (no conversion between zones);
/// values that are not dates at all are kept verbatim.
fn time_value(vevent: &Component, name: &str) -> String {
    let Some(prop) = find_property(vevent, name) else {
        return String::new();
    };

    match DatePerhapsTime::try_from(prop) {
        Ok(DatePerhapsTime::Date(date)) => date.format(DATE_FORMAT).to_string(),
        Ok(DatePerhapsTime::DateTime(date_time)) => format_date_time(&date_time),
        Err(_) => {
            let raw = prop.val.to_string();
            debug!(property = name, value = %raw, "keeping unrecognized date value verbatim");
            raw
        }
    }
}

fn format_date_time(date_time: &CalendarDateTime) -> String {
    let wall_clock: NaiveDateTime = match date_time {
        CalendarDateTime::Utc(dt) => dt.naive_utc(),
        CalendarDateTime::Floating(naive) => *naive,
        CalendarDateTime::WithTimezone { date_time, .. } => *date_time,
    };
    wall_clock.format(DATE_TIME_FORMAT).to_string()
}

/// Decode RFC 5545 TEXT escapes: `\n`, `\N`, `\,`, `\;` and `\\`.
fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n' | 'N') => out.push('\n'),
            Some(escaped @ (',' | ';' | '\\')) => out.push(escaped),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::TextRun;
    use std::io::Write;

    fn calendar(events: &str) -> String {
        format!("BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:TEST\r\n{events}END:VCALENDAR\r\n")
    }

    #[test]
    fn test_extract_full_event() {
        let ics = calendar(
            "BEGIN:VEVENT\r\n\
UID:meeting-1@example.com\r\n\
SUMMARY:<b>Quarterly</b> review\r\n\
DTSTART:20240311T090000Z\r\n\
DTEND:20240311T103000Z\r\n\
DESCRIPTION:Agenda:<br><i>numbers</i>&nbsp;&amp; plans\r\n\
LOCATION:Room 4\\, floor 2\r\n\
ORGANIZER;CN=Alice:mailto:alice@example.com\r\n\
URL:https://example.com/meet\r\n\
END:VEVENT\r\n",
        );

        let events = extract_events(ics.as_bytes()).expect("Should parse");
        assert_eq!(events.len(), 1);
        let event = &events[0];

        assert_eq!(event.summary, "Quarterly review");
        assert_eq!(
            event.summary_formatted.runs(),
            [TextRun::new("Quarterly", true, false), TextRun::plain(" review")]
        );
        assert_eq!(event.start, "2024-03-11 09:00:00");
        assert_eq!(event.end, "2024-03-11 10:30:00");
        assert_eq!(event.description, "Agenda:\nnumbers & plans");
        assert_eq!(
            event.description_formatted.runs(),
            [
                TextRun::plain("Agenda:"),
                TextRun::line_break(),
                TextRun::new("numbers", false, true),
                TextRun::plain(" & plans"),
            ]
        );
        assert_eq!(event.location, "Room 4, floor 2");
        assert_eq!(event.organizer, "mailto:alice@example.com");
        assert_eq!(event.url, "https://example.com/meet");
        assert_eq!(event.uid, "meeting-1@example.com");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let ics = calendar("BEGIN:VEVENT\r\nDTSTART:20240101T100000Z\r\nEND:VEVENT\r\n");

        let events = extract_events(ics.as_bytes()).expect("Should parse");
        let event = &events[0];

        assert_eq!(event.summary, "");
        assert!(event.summary_formatted.is_placeholder());
        assert!(event.description_formatted.is_placeholder());
        assert_eq!(event.end, "");
        assert_eq!(event.location, "");
        assert_eq!(event.organizer, "");
        assert_eq!(event.url, "");
        assert_eq!(event.uid, "");
    }

    #[test]
    fn test_event_count_and_order_preserved() {
        let mut body = String::new();
        for i in 0..50 {
            body.push_str(&format!(
                "BEGIN:VEVENT\r\nUID:event-{i}\r\nSUMMARY:Event {i}\r\nDTSTART:20240101T100000Z\r\nEND:VEVENT\r\n"
            ));
        }
        body.push_str("BEGIN:VTODO\r\nUID:todo-1\r\nSUMMARY:Not an event\r\nEND:VTODO\r\n");

        let events = extract_events(calendar(&body).as_bytes()).expect("Should parse");

        assert_eq!(events.len(), 50);
        for (i, event) in events.iter().enumerate() {
            assert_eq!(event.uid, format!("event-{i}"));
        }
    }

    #[test]
    fn test_names_are_case_insensitive() {
        let ics = calendar(
            "begin:vevent\r\n\
uid:low\r\n\
Summary:<b>Hi</b>\r\n\
dtstart:20240301T093000Z\r\n\
Location:Room 4\r\n\
end:vevent\r\n\
BEGIN:VEVENT\r\nUID:up\r\nEND:VEVENT\r\n",
        );

        let events = extract_events(ics.as_bytes()).expect("Should parse");
        let uids: Vec<&str> = events.iter().map(|e| e.uid.as_str()).collect();
        assert_eq!(uids, ["low", "up"]);

        let event = &events[0];
        assert_eq!(event.summary, "Hi");
        assert_eq!(
            event.summary_formatted.runs(),
            [TextRun::new("Hi", true, false)]
        );
        assert_eq!(event.start, "2024-03-01 09:30:00");
        assert_eq!(event.location, "Room 4");
    }

    #[test]
    fn test_same_summary_events_are_not_merged() {
        let event = "BEGIN:VEVENT\r\nUID:dup\r\nSUMMARY:Standup\r\nEND:VEVENT\r\n";
        let ics = calendar(&event.repeat(2));

        let events = extract_events(ics.as_bytes()).expect("Should parse");
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_date_only_values() {
        let ics = calendar(
            "BEGIN:VEVENT\r\nUID:allday\r\nDTSTART;VALUE=DATE:20240301\r\nDTEND;VALUE=DATE:20240302\r\nEND:VEVENT\r\n",
        );

        let events = extract_events(ics.as_bytes()).expect("Should parse");
        assert_eq!(events[0].start, "2024-03-01");
        assert_eq!(events[0].end, "2024-03-02");
    }

    #[test]
    fn test_zoned_and_floating_times_keep_wall_clock() {
        let ics = calendar(
            "BEGIN:VEVENT\r\nUID:zoned\r\nDTSTART;TZID=Europe/Istanbul:20240301T093000\r\nDTEND:20240301T110000\r\nEND:VEVENT\r\n",
        );

        let events = extract_events(ics.as_bytes()).expect("Should parse");
        assert_eq!(events[0].start, "2024-03-01 09:30:00");
        assert_eq!(events[0].end, "2024-03-01 11:00:00");
    }

    #[test]
    fn test_unrecognized_date_kept_verbatim() {
        let ics = calendar("BEGIN:VEVENT\r\nUID:odd\r\nDTSTART:sometime\r\nEND:VEVENT\r\n");

        let events = extract_events(ics.as_bytes()).expect("Should parse");
        assert_eq!(events[0].start, "sometime");
    }

    #[test]
    fn test_escaped_text_is_decoded() {
        let ics = calendar(
            "BEGIN:VEVENT\r\nUID:esc\r\nDESCRIPTION:Line one\\nLine two\\, more\\; done\r\nEND:VEVENT\r\n",
        );

        let events = extract_events(ics.as_bytes()).expect("Should parse");
        let event = &events[0];
        // a raw newline is plain whitespace; only <br> keeps a line break
        assert_eq!(event.description, "Line one Line two, more; done");
        assert_eq!(
            event.description_formatted.runs(),
            [TextRun::plain("Line one\nLine two, more; done")]
        );
    }

    #[test]
    fn test_folded_summary_is_unfolded() {
        let ics = calendar(
            "BEGIN:VEVENT\r\nUID:fold\r\nSUMMARY:<b>Long</b> \r\n title\r\nEND:VEVENT\r\n",
        );

        let events = extract_events(ics.as_bytes()).expect("Should parse");
        assert_eq!(events[0].summary, "Long title");
        assert_eq!(
            events[0].summary_formatted.runs(),
            [TextRun::new("Long", true, false), TextRun::plain(" title")]
        );
    }

    #[test]
    fn test_byte_order_mark_is_skipped() {
        let ics = format!(
            "\u{feff}{}",
            calendar("BEGIN:VEVENT\r\nUID:bom\r\nEND:VEVENT\r\n")
        );

        let events = extract_events(ics.as_bytes()).expect("Should parse");
        assert_eq!(events[0].uid, "bom");
    }

    #[test]
    fn test_calendar_without_events() {
        let events = extract_events(calendar("").as_bytes()).expect("Should parse");
        assert!(events.is_empty());
    }

    #[test]
    fn test_non_calendar_input_is_format_error() {
        let result = extract_events(b"this is not a calendar");
        assert!(matches!(result, Err(CalSheetError::Format(_))), "Got: {result:?}");

        let result = extract_events(&[0xff, 0xfe, 0x00, 0x42]);
        assert!(matches!(result, Err(CalSheetError::Format(_))), "Got: {result:?}");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.ics");

        let result = extract_events_from_file(&path);
        assert!(matches!(result, Err(CalSheetError::NotFound(p)) if p == path));
    }

    #[test]
    fn test_extract_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            calendar("BEGIN:VEVENT\r\nUID:from-file\r\nSUMMARY:<em>Hello</em>\r\nEND:VEVENT\r\n")
                .as_bytes(),
        )
        .unwrap();

        let events = extract_events_from_file(file.path()).expect("Should read");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].summary, "Hello");
        assert_eq!(
            events[0].summary_formatted.runs(),
            [TextRun::new("Hello", false, true)]
        );
    }

    #[test]
    fn test_unescape_text() {
        assert_eq!(unescape_text(r"a\nb\Nc"), "a\nb\nc");
        assert_eq!(unescape_text(r"x\\y"), r"x\y");
        assert_eq!(unescape_text(r"keep \q and trailing \"), r"keep \q and trailing \");
    }
}
