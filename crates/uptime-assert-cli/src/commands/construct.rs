//! Construction of fresh assertion nodes.

use std::io::Write;

use tracing::info;
use uptime_assert::{AddOpKind, Assertion, OpFactory};

use crate::error::CliError;
use crate::output::OutputFormat;

/// What to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Construct {
    /// The default assertion of a new monitor.
    Default,
    /// An explicitly empty assertion.
    Empty,
    /// A single node of the given kind.
    Add(AddOpKind),
}

/// Command for building assertions and nodes from scratch.
#[derive(Debug)]
pub struct ConstructCommand {
    factory: OpFactory,
}

impl ConstructCommand {
    /// Create a new construct command.
    #[must_use]
    pub const fn new(factory: OpFactory) -> Self {
        Self { factory }
    }

    /// Execute the construct command.
    ///
    /// # Errors
    ///
    /// Returns an error if output fails.
    pub fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        target: Construct,
    ) -> Result<(), CliError> {
        match target {
            Construct::Default => {
                let assertion = self.factory.initial_assertion(None, false);
                info!(root = %assertion.root.id, "created default assertion");
                format.write(writer, &assertion)
            }
            Construct::Empty => {
                let assertion = Assertion::new(self.factory.empty_root());
                info!(root = %assertion.root.id, "created empty assertion");
                format.write(writer, &assertion)
            }
            Construct::Add(kind) => {
                let op = self.factory.create(kind);
                info!(%kind, id = op.id().unwrap_or_default(), "created node");
                format.write(writer, &op)
            }
        }
    }
}
