// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `gentr`.
///
/// Everything after the options is the command template, e.g.
/// `gentr -i 'src/*.rs' rustfmt --check /_`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "gentr",
    version,
    about = "Watch files and run a command against each one that changes.",
    long_about = None
)]
pub struct CliArgs {
    /// Watch directories recursively (new files are picked up every 10s).
    #[arg(short, long)]
    pub recursive: bool,

    /// Input directory, file, or glob pattern (e.g. '.', 'logs/*.log').
    ///
    /// Ignored when a file list is piped on STDIN.
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<String>,

    /// Write a session log (`<start timestamp>.log`).
    #[arg(long)]
    pub log: bool,

    /// Limit command output to the last N lines (0 = no limit).
    #[arg(short, long, value_name = "N")]
    pub length: Option<usize>,

    /// Enable debug mode.
    #[arg(short, long)]
    pub debug: bool,

    /// Path to an optional TOML config file.
    ///
    /// Default: `gentr.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `--debug`, `GENTR_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Command to run; `/_` is replaced with the changed file's path.
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}

impl CliArgs {
    /// The command template: remaining tokens joined by single spaces.
    pub fn command_template(&self) -> String {
        self.command.join(" ")
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
