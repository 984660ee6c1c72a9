// src/config/mod.rs

//! Configuration: an optional `gentr.toml` layered under the CLI flags.
//!
//! - [`model`] holds the serde types for the file and the effective
//!   [`Options`] used by the rest of the crate.
//! - [`loader`] reads the file (if any).
//! - [`validate`] merges file + CLI and checks the result.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{DEFAULT_CONFIG_FILE, load_from_path, load_options};
pub use model::{Options, OptionsSection, RawConfigFile};
