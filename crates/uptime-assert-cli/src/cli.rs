//! Command-line argument parsing with clap.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use uptime_assert::{AddOpKind, OpFactory, SequentialIdGenerator, StatusCodeBounds};

use crate::error::CliError;

/// Build, normalize and merge uptime assertion trees.
#[derive(Parser, Debug, Clone)]
#[command(name = "uptime-assertctl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format.
    #[arg(short, long, value_enum, env = "UPTIME_ASSERT_FORMAT", default_value_t = Format::Json)]
    pub format: Format,

    /// Lowest status code kept by normalization.
    #[arg(long, env = "UPTIME_ASSERT_MIN_STATUS", default_value_t = StatusCodeBounds::DEFAULT_MIN)]
    pub min_status: u16,

    /// Highest status code kept by normalization.
    #[arg(long, env = "UPTIME_ASSERT_MAX_STATUS", default_value_t = StatusCodeBounds::DEFAULT_MAX)]
    pub max_status: u16,

    /// Status code substituted for a cleared value.
    #[arg(long, env = "UPTIME_ASSERT_FALLBACK_STATUS", default_value_t = StatusCodeBounds::DEFAULT_FALLBACK)]
    pub fallback_status: u16,

    /// Issue `<PREFIX>-<n>` ids instead of UUIDs.
    #[arg(long, value_name = "PREFIX")]
    pub sequential_ids: Option<String>,

    /// Reject nodes with an unrecognized `op` tag instead of passing them through.
    #[arg(long)]
    pub strict: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Status code bounds from the flags.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Config` if the bounds are inconsistent.
    pub fn bounds(&self) -> Result<StatusCodeBounds, CliError> {
        StatusCodeBounds::new(self.min_status, self.max_status, self.fallback_status)
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Node factory using the id scheme selected by the flags.
    #[must_use]
    pub fn factory(&self) -> OpFactory {
        match &self.sequential_ids {
            Some(prefix) => OpFactory::with_ids(Arc::new(SequentialIdGenerator::new(prefix.clone()))),
            None => OpFactory::new(),
        }
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum Format {
    /// JSON, in the shape the uptime API accepts.
    #[default]
    Json,
    /// One-line expression.
    Text,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print the default assertion for a new monitor (status code is 2xx).
    Default,

    /// Print an explicitly empty assertion.
    Empty,

    /// Print a fresh node for an "add assertion" action.
    Add {
        /// Kind of node to create.
        #[arg(value_enum)]
        kind: AddKind,
    },

    /// Apply the submission transform to an assertion (JSON, `null` or `{}`).
    Submit {
        /// Input file; stdin when omitted.
        input: Option<PathBuf>,
    },

    /// Normalize a single node and its subtree.
    Normalize {
        /// Input file; stdin when omitted.
        input: Option<PathBuf>,
    },

    /// Append a suggested node to the current assertion.
    Merge {
        /// File holding the suggested node.
        #[arg(short, long)]
        suggestion: PathBuf,

        /// File holding the current assertion; none when omitted.
        #[arg(short, long)]
        current: Option<PathBuf>,
    },

    /// Render an assertion or node as an expression.
    Describe {
        /// Input file; stdin when omitted.
        input: Option<PathBuf>,
    },
}

/// Node kinds accepted by `add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AddKind {
    /// Status code check.
    StatusCode,
    /// JSON-path check.
    JsonPath,
    /// Header check.
    HeaderCheck,
    /// Empty `and` group.
    LogicalGroup,
}

impl From<AddKind> for AddOpKind {
    fn from(kind: AddKind) -> Self {
        match kind {
            AddKind::StatusCode => Self::StatusCode,
            AddKind::JsonPath => Self::JsonPath,
            AddKind::HeaderCheck => Self::HeaderCheck,
            AddKind::LogicalGroup => Self::LogicalGroup,
        }
    }
}
