//! CLI command implementations.
//!
//! Each submodule implements a specific CLI command:
//! - [`construct`] - Default, empty and freshly added nodes
//! - [`submit`] - Submission transform and single-node normalization
//! - [`merge`] - Appending a suggested node
//! - [`describe`] - Expression rendering

pub mod construct;
pub mod describe;
pub mod merge;
pub mod submit;

pub use construct::{ConstructCommand, Construct};
pub use describe::DescribeCommand;
pub use merge::MergeCommand;
pub use submit::{NormalizeCommand, SubmitCommand};

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::CliError;

/// A JSON document read from a file or stdin.
#[derive(Debug, Clone)]
pub struct Input {
    origin: String,
    value: Value,
}

impl Input {
    /// Reads and parses JSON from `path`, or from stdin when `path` is `None`.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Io` if reading fails and `CliError::Input` if the
    /// text is not JSON.
    pub fn read(path: Option<&Path>) -> Result<Self, CliError> {
        match path {
            Some(path) => {
                let text = fs::read_to_string(path)?;
                Self::parse_text(path.display().to_string(), &text)
            }
            None => Self::from_reader("<stdin>", io::stdin().lock()),
        }
    }

    /// Reads and parses JSON from `reader`.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Io` if reading fails and `CliError::Input` if the
    /// text is not JSON.
    pub fn from_reader<R: Read>(origin: impl Into<String>, mut reader: R) -> Result<Self, CliError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::parse_text(origin.into(), &text)
    }

    /// Wraps an already parsed value.
    #[must_use]
    pub fn from_value(origin: impl Into<String>, value: Value) -> Self {
        Self {
            origin: origin.into(),
            value,
        }
    }

    fn parse_text(origin: String, text: &str) -> Result<Self, CliError> {
        let value = serde_json::from_str(text).map_err(|e| CliError::Input {
            origin: origin.clone(),
            reason: e.to_string(),
        })?;
        debug!(%origin, bytes = text.len(), "read input");
        Ok(Self { origin, value })
    }

    /// Where the document came from.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// The raw JSON value.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// Deserializes the document as `T`.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Input` if the document does not have the shape of `T`.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, CliError> {
        T::deserialize(&self.value).map_err(|e| CliError::Input {
            origin: self.origin.clone(),
            reason: e.to_string(),
        })
    }
}
