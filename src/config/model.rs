// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [options]
/// recursive = true
/// input = "src"
/// log = true
/// length = 20
/// debug = false
/// log_dir = "logs"
/// ```
///
/// Every key is optional; CLI flags take precedence over the file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub options: OptionsSection,
}

/// `[options]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionsSection {
    #[serde(default)]
    pub recursive: Option<bool>,

    /// Directory, file or glob resolving the initial watch set.
    #[serde(default)]
    pub input: Option<String>,

    /// Enables the session log.
    #[serde(default)]
    pub log: Option<bool>,

    /// Console output line cap; `0` disables the cap.
    #[serde(default)]
    pub length: Option<usize>,

    #[serde(default)]
    pub debug: Option<bool>,

    /// Where the session log file is created.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

/// Effective options after merging the config file and the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub recursive: bool,
    pub input: String,
    pub log: bool,
    pub length: usize,
    pub debug: bool,
    pub log_dir: PathBuf,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            recursive: false,
            input: ".".to_string(),
            log: false,
            length: 0,
            debug: false,
            log_dir: PathBuf::from("."),
        }
    }
}

impl Options {
    /// One-line summary, written to the banner and the session log header.
    pub fn summary(&self) -> String {
        let length = if self.length > 0 {
            self.length.to_string()
        } else {
            "none".to_string()
        };
        format!(
            "--debug {}; --recursive {}; --length {}; --log {}; --input {}",
            self.debug, self.recursive, length, self.log, self.input
        )
    }
}
