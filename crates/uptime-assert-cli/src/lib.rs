//! # uptime-assert-cli
//!
//! Command-line front end for `uptime-assert`.
//!
//! Provides commands for:
//! - Building the default, empty and hand-added nodes
//! - Preparing an edited assertion for submission
//! - Merging a suggested condition into an assertion
//! - Rendering a tree as a one-line expression
//!
//! Every command reads JSON from a file or stdin and writes JSON (the wire
//! shape) or text to stdout. Logs go to stderr and are filtered by
//! `RUST_LOG`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use cli::{AddKind, Cli, Commands, Format};
pub use error::CliError;
pub use output::{OutputFormat, TextDisplay};
