//! User configuration at ~/.config/calsheet/config.toml

use std::path::{Path, PathBuf};

use config::{Config, File};
use serde::Deserialize;

use crate::error::{CalSheetError, CalSheetResult};
use crate::export::{DEFAULT_SHEET_NAME, ExportFormat};

fn default_sheet_name() -> String {
    DEFAULT_SHEET_NAME.to_string()
}

/// Defaults for `calsheet convert`. Command-line flags take precedence.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct CalsheetConfig {
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,

    /// Used when neither a flag nor the output extension picks a format.
    #[serde(default)]
    pub format: Option<ExportFormat>,

    /// Where suggested output files go. Defaults to the input file's directory.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    #[serde(default)]
    pub open_after_export: bool,
}

impl Default for CalsheetConfig {
    fn default() -> Self {
        Self {
            sheet_name: default_sheet_name(),
            format: None,
            output_dir: None,
            open_after_export: false,
        }
    }
}

impl CalsheetConfig {
    pub fn config_path() -> CalSheetResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalSheetError::Config("Could not determine config directory".into()))?
            .join("calsheet");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the user config, writing a commented template on first use.
    pub fn load() -> CalSheetResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from a specific file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> CalSheetResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .build()
            .map_err(|e| CalSheetError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalSheetError::Config(e.to_string()))
    }

    /// `output_dir` with a leading `~` expanded.
    pub fn output_dir(&self) -> Option<PathBuf> {
        self.output_dir.as_ref().map(|dir| {
            PathBuf::from(shellexpand::tilde(&dir.to_string_lossy()).into_owned())
        })
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalSheetResult<()> {
        let contents = format!(
            "\
# calsheet configuration

# Worksheet name for Excel output:
# sheet_name = \"{DEFAULT_SHEET_NAME}\"

# Format when the output file name does not decide (\"xlsx\" or \"csv\"):
# format = \"xlsx\"

# Directory for output files (defaults to the input file's directory):
# output_dir = \"~/Documents\"

# Open the exported file when done:
# open_after_export = false
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalSheetError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalSheetError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
