mod commands;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use calsheet_core::ExportFormat;
use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "calsheet")]
#[command(about = "Convert iCalendar (.ics) exports into Excel or CSV files")]
#[command(version)]
struct Cli {
    /// Increase log output (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an .ics file to an Excel workbook or a semicolon-separated CSV file
    Convert {
        /// The .ics file to read
        input: PathBuf,

        /// Output file (defaults to the input name with the format's extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: xlsx or csv (defaults to the output extension, then config)
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// Worksheet name for Excel output
        #[arg(long)]
        sheet_name: Option<String>,

        /// Open the exported file when done
        #[arg(long)]
        open: bool,
    },
    /// List the events found in an .ics file
    Inspect {
        /// The .ics file to read
        input: PathBuf,

        /// Print the extracted records as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    utils::logging::init(cli.verbose);

    match cli.command {
        Commands::Convert {
            input,
            output,
            format,
            sheet_name,
            open,
        } => commands::convert::run(commands::convert::ConvertArgs {
            input,
            output,
            format,
            sheet_name,
            open,
        }),
        Commands::Inspect { input, json } => commands::inspect::run(&input, json),
    }
}
