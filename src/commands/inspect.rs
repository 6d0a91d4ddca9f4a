use std::path::Path;

use anyhow::{Context, Result};
use calsheet_core::extract_events_from_file;
use owo_colors::OwoColorize;

use crate::render::{Render, pluralize};

pub fn run(input: &Path, json: bool) -> Result<()> {
    let events = extract_events_from_file(input)
        .with_context(|| format!("Could not read {}", input.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    if events.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    for event in &events {
        println!("{}\n", event.render());
    }

    let total = format!("{} {}", events.len(), pluralize("event", events.len()));
    println!("{}", total.dimmed());

    Ok(())
}
