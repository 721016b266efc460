//! User preferences for pdfcombine.
//!
//! Preferences are a typed struct that is handed by reference to the parts of
//! the library whose behaviour depends on them (the move algorithm, the merge
//! orchestrator, the PDF backend). They persist as a JSON object whose keys are
//! the human-readable names shown in the preferences dialog:
//!
//! ```json
//! {
//!   "Font Type": "Times New Roman",
//!   "Font Size": 12,
//!   "Dark Mode": true,
//!   "Combine Non-Sequential File Selections on Move": "Ask",
//!   "Compress Output": false,
//!   "Launch File Dialog to Script Folder": false,
//!   "Add Blank Page Between Files": true,
//!   "Shortcut Prompt": true,
//!   "Desktop Shortcut": null,
//!   "Start Menu Shortcut": null
//! }
//! ```
//!
//! Appearance keys (font, dark mode) and shortcut keys are stored and
//! round-tripped but carry no behaviour inside the library.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{PdfCombineError, Result};

/// File name of the preferences blob inside the config directory.
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// How non-contiguous selections are treated when they are moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CombineNonSequential {
    /// Always close the gaps between the selected entries.
    Always,
    /// Ask the user every time a non-sequential selection is moved.
    #[default]
    Ask,
    /// Never close the gaps; every entry moves by the same offset.
    Never,
}

impl FromStr for CombineNonSequential {
    type Err = PdfCombineError;

    /// Parse a policy from `always`, `ask` or `never` (case-insensitive).
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "ask" => Ok(Self::Ask),
            "never" => Ok(Self::Never),
            _ => Err(PdfCombineError::invalid_preferences(format!(
                "Invalid combine policy: {s}. Must be one of: always, ask, never"
            ))),
        }
    }
}

impl fmt::Display for CombineNonSequential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Always => "Always",
            Self::Ask => "Ask",
            Self::Never => "Never",
        };
        f.write_str(name)
    }
}

/// Persistent user preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Font family used by the list view.
    #[serde(rename = "Font Type")]
    pub font_type: String,

    /// Font size used by the list view.
    #[serde(rename = "Font Size")]
    pub font_size: u32,

    /// Dark colour scheme.
    #[serde(rename = "Dark Mode")]
    pub dark_mode: bool,

    /// Move policy for non-contiguous selections.
    #[serde(rename = "Combine Non-Sequential File Selections on Move")]
    pub combine_non_sequential: CombineNonSequential,

    /// Compress object streams of the merged document.
    #[serde(rename = "Compress Output")]
    pub compress_output: bool,

    /// Start file dialogs in the application's working folder.
    #[serde(rename = "Launch File Dialog to Script Folder")]
    pub launch_dialog_to_script_folder: bool,

    /// Insert one blank page after every merged file.
    #[serde(rename = "Add Blank Page Between Files")]
    pub add_blank_page_between_files: bool,

    /// Offer to create shortcuts on start-up.
    #[serde(rename = "Shortcut Prompt")]
    pub shortcut_prompt: bool,

    /// Location of the desktop shortcut, if one was created.
    #[serde(rename = "Desktop Shortcut")]
    pub desktop_shortcut: Option<PathBuf>,

    /// Location of the start menu shortcut, if one was created.
    #[serde(rename = "Start Menu Shortcut")]
    pub start_menu_shortcut: Option<PathBuf>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            font_type: "Times New Roman".to_string(),
            font_size: 12,
            dark_mode: true,
            combine_non_sequential: CombineNonSequential::Ask,
            compress_output: false,
            launch_dialog_to_script_folder: false,
            add_blank_page_between_files: true,
            shortcut_prompt: true,
            desktop_shortcut: None,
            start_menu_shortcut: None,
        }
    }
}

impl Preferences {
    /// Default location of the preferences file.
    ///
    /// Returns `None` when the platform exposes no home/config directory.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "pdfcombine")
            .map(|dirs| dirs.config_dir().join(PREFERENCES_FILE_NAME))
    }

    /// Load preferences from `path`, falling back to defaults when the file
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!(
                "Preferences file {} not found, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path)?;
        let prefs: Self = serde_json::from_str(&text)?;
        log::debug!("Loaded preferences from {}", path.display());
        Ok(prefs)
    }

    /// Save preferences to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        log::debug!("Saved preferences to {}", path.display());
        Ok(())
    }

    /// Set a preference by its persisted key name.
    ///
    /// Boolean values accept `true/false`, `yes/no`, `on/off`,
    /// `enabled/disabled`. Shortcut keys accept a path, or an empty string
    /// to clear the entry.
    ///
    /// # Errors
    ///
    /// Returns [`PdfCombineError::InvalidPreferences`] for unknown keys or
    /// values that do not parse.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "Font Type" => self.font_type = value.to_string(),
            "Font Size" => {
                self.font_size = value.trim().parse().map_err(|_| {
                    PdfCombineError::invalid_preferences(format!("Invalid font size: {value}"))
                })?
            }
            "Dark Mode" => self.dark_mode = parse_flag(key, value)?,
            "Combine Non-Sequential File Selections on Move" => {
                self.combine_non_sequential = value.parse()?
            }
            "Compress Output" => self.compress_output = parse_flag(key, value)?,
            "Launch File Dialog to Script Folder" => {
                self.launch_dialog_to_script_folder = parse_flag(key, value)?
            }
            "Add Blank Page Between Files" => {
                self.add_blank_page_between_files = parse_flag(key, value)?
            }
            "Shortcut Prompt" => self.shortcut_prompt = parse_flag(key, value)?,
            "Desktop Shortcut" => self.desktop_shortcut = optional_path(value),
            "Start Menu Shortcut" => self.start_menu_shortcut = optional_path(value),
            _ => {
                return Err(PdfCombineError::invalid_preferences(format!(
                    "Unknown preference key: {key}"
                )));
            }
        }
        Ok(())
    }

    /// All preferences as `(key, value)` display pairs, in dialog order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let show_path = |p: &Option<PathBuf>| {
            p.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        };

        vec![
            ("Font Type", self.font_type.clone()),
            ("Font Size", self.font_size.to_string()),
            ("Dark Mode", self.dark_mode.to_string()),
            (
                "Combine Non-Sequential File Selections on Move",
                self.combine_non_sequential.to_string(),
            ),
            ("Compress Output", self.compress_output.to_string()),
            (
                "Launch File Dialog to Script Folder",
                self.launch_dialog_to_script_folder.to_string(),
            ),
            (
                "Add Blank Page Between Files",
                self.add_blank_page_between_files.to_string(),
            ),
            ("Shortcut Prompt", self.shortcut_prompt.to_string()),
            ("Desktop Shortcut", show_path(&self.desktop_shortcut)),
            ("Start Menu Shortcut", show_path(&self.start_menu_shortcut)),
        ]
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "enabled" | "1" => Ok(true),
        "false" | "no" | "off" | "disabled" | "0" => Ok(false),
        _ => Err(PdfCombineError::invalid_preferences(format!(
            "Invalid value for '{key}': {value}. Expected true or false"
        ))),
    }
}

fn optional_path(value: &str) -> Option<PathBuf> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}
