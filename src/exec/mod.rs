// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`command`] holds the placeholder substitution, the exit/signal
//!   classification and the immutable [`CommandResult`].
//! - [`backend`] provides the [`CommandRunner`] trait the coordinator talks
//!   to and the production [`ShellRunner`], which runs the command through
//!   `sh -c` and captures stdout + stderr as one stream. Tests swap in a
//!   recording runner.

pub mod backend;
pub mod command;

pub use backend::{CommandRunner, ShellRunner};
pub use command::{CommandResult, Outcome, PLACEHOLDER, substitute_placeholder};
