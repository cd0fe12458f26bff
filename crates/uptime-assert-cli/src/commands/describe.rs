//! Expression rendering for assertions and nodes.

use std::io::Write;

use tracing::debug;
use uptime_assert::{Assertion, Op};

use crate::commands::submit::is_assertion_document;
use crate::commands::Input;
use crate::error::CliError;
use crate::output::{Description, OutputFormat};

/// Command for describing an assertion or a single node.
#[derive(Debug, Default)]
pub struct DescribeCommand;

impl DescribeCommand {
    /// Create a new describe command.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Execute the describe command.
    ///
    /// Accepts an assertion document (`{"root": ...}`, `{}` or `null`) or a
    /// bare node.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is neither, or if output fails.
    pub fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        input: &Input,
    ) -> Result<(), CliError> {
        let value = input.value();
        let description = if is_assertion_document(value) {
            let root = value.get("root").filter(|root| !root.is_null());
            match root {
                Some(_) => describe_assertion(&input.parse::<Assertion>()?),
                None => Description {
                    op: "none".to_string(),
                    expression: "No assertions".to_string(),
                    nodes: 0,
                    depth: 0,
                    unrecognized: 0,
                },
            }
        } else {
            describe_op(&input.parse::<Op>()?)
        };
        debug!(origin = input.origin(), nodes = description.nodes, "described input");
        format.write(writer, &description)
    }
}

fn describe_assertion(assertion: &Assertion) -> Description {
    let root = Op::And(assertion.root.clone());
    Description {
        expression: assertion.to_string(),
        ..describe_op(&root)
    }
}

fn describe_op(op: &Op) -> Description {
    Description {
        op: op.tag().unwrap_or("<missing>").to_string(),
        expression: op.to_string(),
        nodes: op.node_count(),
        depth: op.depth(),
        unrecognized: count_unrecognized(op),
    }
}

fn count_unrecognized(op: &Op) -> usize {
    match op {
        Op::And(group) | Op::Or(group) => group.children.iter().map(count_unrecognized).sum(),
        Op::Not(not) => count_unrecognized(&not.operand),
        Op::Unrecognized(_) => 1,
        _ => 0,
    }
}
