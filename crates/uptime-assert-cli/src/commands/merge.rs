//! Merging a suggested node into the current assertion.

use std::io::Write;

use tracing::info;
use uptime_assert::{ensure_recognized, merge_suggestion, Assertion, Op, OpFactory};

use crate::commands::Input;
use crate::error::CliError;
use crate::output::OutputFormat;

/// Command for appending a suggestion to an assertion.
#[derive(Debug)]
pub struct MergeCommand {
    factory: OpFactory,
    strict: bool,
}

impl MergeCommand {
    /// Create a new merge command.
    #[must_use]
    pub const fn new(factory: OpFactory, strict: bool) -> Self {
        Self { factory, strict }
    }

    /// Execute the merge command.
    ///
    /// A missing `current`, or one holding `null` or no `root`, merges into a
    /// fresh root.
    ///
    /// # Errors
    ///
    /// Returns an error if either input has the wrong shape, if `strict` is
    /// set and either tree holds an unrecognized node, or if output fails.
    pub fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        suggestion: &Input,
        current: Option<&Input>,
    ) -> Result<(), CliError> {
        let suggested: Op = suggestion.parse()?;
        let current = current.map(current_assertion).transpose()?.flatten();
        if self.strict {
            ensure_recognized(&suggested)?;
            if let Some(assertion) = &current {
                assertion.root.children.iter().try_for_each(ensure_recognized)?;
            }
        }

        let merged = merge_suggestion(&suggested, current.as_ref(), self.factory.ids());
        info!(
            root = %merged.root.id,
            children = merged.root.children.len(),
            "merged suggested assertion"
        );
        format.write(writer, &merged)
    }
}

fn current_assertion(input: &Input) -> Result<Option<Assertion>, CliError> {
    match input.value().get("root") {
        Some(root) if !root.is_null() => input.parse().map(Some),
        _ if input.value().is_null() || input.value().is_object() => Ok(None),
        _ => Err(CliError::Input {
            origin: input.origin().to_string(),
            reason: "expected an assertion object or null".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cli::Format;
    use serde_json::{json, Value};
    use uptime_assert::{AssertionError, SequentialIdGenerator};

    fn merge(suggestion: Value, current: Option<Value>) -> Result<Assertion, CliError> {
        merge_with(suggestion, current, false)
    }

    fn merge_with(
        suggestion: Value,
        current: Option<Value>,
        strict: bool,
    ) -> Result<Assertion, CliError> {
        let command = MergeCommand::new(
            OpFactory::with_ids(Arc::new(SequentialIdGenerator::new("m"))),
            strict,
        );
        let current = current.map(|value| Input::from_value("current", value));
        let mut buf = Vec::new();
        command.execute(
            &mut buf,
            &OutputFormat::new(Format::Json),
            &Input::from_value("suggestion", suggestion),
            current.as_ref(),
        )?;
        Ok(serde_json::from_slice(&buf).expect("assertion json"))
    }

    fn suggestion() -> Value {
        json!({"op": "status_code_check", "id": "s", "operator": {"cmp": "not_equal"}, "value": 503})
    }

    #[test]
    fn merge_appends_to_current() {
        let current = json!({"root": {"op": "and", "id": "r", "children": [
            {"op": "status_code_check", "id": "a", "operator": {"cmp": "equals"}, "value": 200}
        ]}});

        let merged = merge(suggestion(), Some(current)).expect("merge");
        assert_eq!(merged.root.id, "r");
        assert_eq!(merged.root.children.len(), 2);
        assert_eq!(merged.root.children[0].id(), Some("a"));
        assert_eq!(merged.root.children[1].id(), Some("m-1"));
    }

    #[test]
    fn merge_without_current_creates_root() {
        for current in [None, Some(Value::Null), Some(json!({}))] {
            let merged = merge(suggestion(), current).expect("merge");
            assert_eq!(merged.root.id, "m-2");
            assert_eq!(merged.root.children.len(), 1);
        }
    }

    #[test]
    fn merge_rejects_non_assertion_current() {
        let err = merge(suggestion(), Some(json!([1]))).expect_err("array");
        assert!(matches!(err, CliError::Input { ref origin, .. } if origin == "current"));
    }

    #[test]
    fn merge_strict_rejects_unrecognized_suggestion() {
        let suggestion = json!({"op": "body_regex", "id": "x", "pattern": "ok"});

        let merged = merge(suggestion.clone(), None).expect("lenient merge");
        assert_eq!(merged.root.children[0].tag(), Some("body_regex"));

        assert!(matches!(
            merge_with(suggestion, None, true),
            Err(CliError::Assertion(AssertionError::UnknownOp { ref tag })) if tag == "body_regex"
        ));
    }

    #[test]
    fn merge_strict_rejects_unrecognized_current() {
        let current = json!({"root": {"op": "and", "id": "r", "children": [
            {"op": "not", "id": "n", "operand": {"op": "body_regex", "id": "x"}}
        ]}});

        assert!(merge_with(suggestion(), Some(current.clone()), false).is_ok());
        assert!(matches!(
            merge_with(suggestion(), Some(current), true),
            Err(CliError::Assertion(AssertionError::UnknownOp { ref tag })) if tag == "body_regex"
        ));
    }
}
