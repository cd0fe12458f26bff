//! Output formatting for CLI commands.
//!
//! Supports JSON (the wire shape) and a one-line text expression.

use std::io::Write;

use serde::Serialize;
use uptime_assert::{Assertion, Op};

use crate::cli::Format;
use crate::error::CliError;

/// Output formatter that handles both JSON and text output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Get the current format.
    #[must_use]
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Check if JSON format is selected.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self.format, Format::Json)
    }

    /// Write a serializable value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TextDisplay + ?Sized,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Text => {
                value.write_text(writer)?;
            }
        }
        Ok(())
    }

    /// Write a serializable value to a string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_string<T>(&self, value: &T) -> Result<String, CliError>
    where
        T: Serialize + TextDisplay + ?Sized,
    {
        let mut buf = Vec::new();
        self.write(&mut buf, value)?;
        String::from_utf8(buf).map_err(|e| CliError::Format(format!("UTF-8 error: {e}")))
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Json)
    }
}

/// Trait for types that can be displayed as plain text.
pub trait TextDisplay {
    /// Write the value as human-readable text.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_text<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

impl TextDisplay for Op {
    fn write_text<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "{self}")?;
        Ok(())
    }
}

impl TextDisplay for Assertion {
    fn write_text<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "{self}")?;
        Ok(())
    }
}

/// A submitted assertion is `None` when there is nothing to check.
impl TextDisplay for Option<Assertion> {
    fn write_text<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        match self {
            Some(assertion) => assertion.write_text(writer),
            None => {
                writeln!(writer, "No assertions")?;
                Ok(())
            }
        }
    }
}

/// Summary of an assertion or node for `describe`.
#[derive(Debug, Clone, Serialize)]
pub struct Description {
    /// Kind of the top node (`op` tag).
    pub op: String,
    /// One-line expression.
    pub expression: String,
    /// Number of nodes in the tree.
    pub nodes: usize,
    /// Depth of the tree.
    pub depth: usize,
    /// Number of nodes with an unrecognized `op` tag.
    pub unrecognized: usize,
}

impl TextDisplay for Description {
    fn write_text<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "{}", self.expression)?;
        writeln!(writer)?;
        writeln!(writer, "Op:            {}", self.op)?;
        writeln!(writer, "Nodes:         {}", self.nodes)?;
        writeln!(writer, "Depth:         {}", self.depth)?;
        if self.unrecognized > 0 {
            writeln!(writer, "Unrecognized:  {}", self.unrecognized)?;
        }
        Ok(())
    }
}
