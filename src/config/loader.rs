// src/config/loader.rs

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::model::{Options, RawConfigFile};
use crate::errors::{GentrError, Result};

/// Config file picked up from the working directory when `--config` is not
/// given.
pub const DEFAULT_CONFIG_FILE: &str = "gentr.toml";

/// Load a configuration file from a given path.
///
/// This only performs TOML deserialization; merging with the CLI and
/// validation happen in [`crate::config::validate`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Resolve the effective [`Options`] for this run.
///
/// - An explicit `--config` path must exist.
/// - Otherwise `gentr.toml` is used when present, and ignored when absent.
pub fn load_options(args: &CliArgs) -> Result<Options> {
    let raw = match &args.config {
        Some(path) => load_from_path(path).map_err(|e| match e {
            GentrError::IoError(err) => {
                GentrError::ConfigError(format!("cannot read config file {path}: {err}"))
            }
            other => other,
        })?,
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
            debug!(path = DEFAULT_CONFIG_FILE, "loading default config file");
            load_from_path(DEFAULT_CONFIG_FILE)?
        }
        None => RawConfigFile::default(),
    };

    Options::from_parts(args, raw)
}
