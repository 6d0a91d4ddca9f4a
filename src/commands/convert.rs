use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use calsheet_core::config::CalsheetConfig;
use calsheet_core::{CalSheetError, ExportFormat, export, extract_events_from_file};
use owo_colors::OwoColorize;

use crate::render::pluralize;
use crate::utils::tui::create_spinner;

pub struct ConvertArgs {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub format: Option<ExportFormat>,
    pub sheet_name: Option<String>,
    pub open: bool,
}

pub fn run(args: ConvertArgs) -> Result<()> {
    let config = CalsheetConfig::load().context("Failed to load configuration")?;

    let format = resolve_format(args.format, args.output.as_deref(), &config);
    let output = match args.output {
        Some(path) => path,
        None => suggest_output_path(&args.input, format, config.output_dir().as_deref()),
    };
    let sheet_name = args.sheet_name.unwrap_or_else(|| config.sheet_name.clone());

    let spinner = create_spinner(format!("Reading {}", args.input.display()));
    let events = extract_events_from_file(&args.input);
    spinner.finish_and_clear();
    let events = events.with_context(|| format!("Could not read {}", args.input.display()))?;

    let spinner = create_spinner(format!(
        "Writing {} {} to {}",
        events.len(),
        pluralize("event", events.len()),
        format
    ));
    let result = export(&events, &output, format, &sheet_name);
    spinner.finish_and_clear();

    match result {
        Err(CalSheetError::EmptyInput) => {
            anyhow::bail!("No events found in {}", args.input.display())
        }
        other => other.with_context(|| format!("Could not write {}", output.display()))?,
    }

    println!(
        "{} Exported {} {} to {} ({})",
        "✓".green(),
        events.len(),
        pluralize("event", events.len()),
        output.display().bold(),
        format
    );

    if args.open || config.open_after_export {
        open::that(&output).with_context(|| format!("Could not open {}", output.display()))?;
    }

    Ok(())
}

/// Flag first, then the output file's extension, then config.
fn resolve_format(
    flag: Option<ExportFormat>,
    output: Option<&Path>,
    config: &CalsheetConfig,
) -> ExportFormat {
    flag.or_else(|| output.and_then(ExportFormat::from_path))
        .or(config.format)
        .unwrap_or_default()
}

/// `<dir>/<input stem>.<ext>`, next to the input unless a directory is configured.
fn suggest_output_path(input: &Path, format: ExportFormat, output_dir: Option<&Path>) -> PathBuf {
    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };

    let mut file_name: OsString = input
        .file_stem()
        .map(|stem| stem.to_os_string())
        .unwrap_or_else(|| OsString::from("events"));
    file_name.push(".");
    file_name.push(format.extension());

    dir.join(file_name)
}
