//! Submission transform and single-node normalization.

use std::io::Write;

use serde_json::Value;
use tracing::info;
use uptime_assert::{ensure_recognized, Assertion, Normalizer, Op};

use crate::commands::Input;
use crate::error::CliError;
use crate::output::OutputFormat;

/// Command applying the submission policy to a whole assertion.
#[derive(Debug, Clone, Copy)]
pub struct SubmitCommand {
    normalizer: Normalizer,
    strict: bool,
}

impl SubmitCommand {
    /// Create a new submit command.
    #[must_use]
    pub const fn new(normalizer: Normalizer, strict: bool) -> Self {
        Self { normalizer, strict }
    }

    /// Execute the submit command.
    ///
    /// Writes `null` when there is nothing to check.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not an assertion, if `strict` is set
    /// and the tree holds an unrecognized node, or if output fails.
    pub fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        input: &Input,
    ) -> Result<(), CliError> {
        if self.strict {
            if let Some(root) = input.value().get("root").filter(|root| !root.is_null()) {
                let root: Op = Input::from_value(input.origin(), root.clone()).parse()?;
                ensure_recognized(&root)?;
            }
        }

        let prepared = self.normalizer.prepare_submission_json(input.value())?;
        let submission: Option<Assertion> =
            Input::from_value(input.origin(), prepared).parse()?;
        match &submission {
            Some(assertion) => info!(root = %assertion.root.id, "prepared assertion for submission"),
            None => info!("no assertions to submit"),
        }
        format.write(writer, &submission)
    }
}

/// Command normalizing one node and its subtree.
#[derive(Debug, Clone, Copy)]
pub struct NormalizeCommand {
    normalizer: Normalizer,
    strict: bool,
}

impl NormalizeCommand {
    /// Create a new normalize command.
    #[must_use]
    pub const fn new(normalizer: Normalizer, strict: bool) -> Self {
        Self { normalizer, strict }
    }

    /// Execute the normalize command.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a node, if `strict` is set and
    /// the tree holds an unrecognized node, or if output fails.
    pub fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        input: &Input,
    ) -> Result<(), CliError> {
        let op: Op = input.parse()?;
        if self.strict {
            ensure_recognized(&op)?;
        }
        let normalized = self.normalizer.normalize(&op);
        info!(nodes = normalized.node_count(), "normalized node");
        format.write(writer, &normalized)
    }
}

/// Whether `value` looks like a submitted assertion rather than a bare node.
#[must_use]
pub fn is_assertion_document(value: &Value) -> bool {
    value.is_null() || value.as_object().is_some_and(|fields| !fields.contains_key("op"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Format;
    use serde_json::json;
    use uptime_assert::{AssertionError, StatusCodeBounds};

    fn submit(value: Value, strict: bool) -> Result<Value, CliError> {
        let mut buf = Vec::new();
        SubmitCommand::new(Normalizer::new(), strict).execute(
            &mut buf,
            &OutputFormat::new(Format::Json),
            &Input::from_value("test", value),
        )?;
        Ok(serde_json::from_slice(&buf).expect("json"))
    }

    #[test]
    fn submit_clamps_and_fills() {
        let output = submit(
            json!({"root": {"op": "and", "id": "r", "children": [
                {"op": "status_code_check", "id": "a", "operator": {"cmp": "equals"}, "value": 42},
                {"op": "status_code_check", "id": "b", "operator": {"cmp": "equals"}, "value": null}
            ]}}),
            false,
        )
        .expect("submit");

        assert_eq!(output["root"]["id"], "r");
        assert_eq!(output["root"]["children"][0]["value"], 100);
        assert_eq!(output["root"]["children"][1]["value"], 200);
    }

    #[test]
    fn submit_empty_inputs_as_null() {
        assert_eq!(submit(Value::Null, false).expect("null"), Value::Null);
        assert_eq!(submit(json!({}), false).expect("empty object"), Value::Null);
        assert_eq!(
            submit(json!({"root": {"op": "and", "id": "r", "children": []}}), false)
                .expect("empty root"),
            Value::Null
        );
    }

    #[test]
    fn submit_strict_rejects_unrecognized() {
        let value = json!({"root": {"op": "and", "id": "r", "children": [
            {"op": "body_contains", "id": "x", "needle": "ok"}
        ]}});

        assert!(submit(value.clone(), false).is_ok());
        assert!(matches!(
            submit(value, true),
            Err(CliError::Assertion(AssertionError::UnknownOp { ref tag })) if tag == "body_contains"
        ));
    }

    #[test]
    fn submit_rejects_or_root() {
        let err = submit(json!({"root": {"op": "or", "id": "r", "children": []}}), false)
            .expect_err("or root");
        assert!(matches!(err, CliError::Assertion(AssertionError::SerializationError(_))));
    }

    #[test]
    fn normalize_uses_custom_bounds() {
        let bounds = StatusCodeBounds::new(200, 299, 204).expect("valid bounds");
        let mut buf = Vec::new();
        NormalizeCommand::new(Normalizer::with_bounds(bounds), false)
            .execute(
                &mut buf,
                &OutputFormat::new(Format::Text),
                &Input::from_value(
                    "test",
                    json!({"op": "not", "id": "n", "operand":
                        {"op": "status_code_check", "id": "s", "operator": {"cmp": "equals"}, "value": null}}),
                ),
            )
            .expect("normalize");
        assert_eq!(String::from_utf8(buf).expect("utf-8"), "NOT status_code == 204\n");
    }

    #[test]
    fn assertion_documents() {
        assert!(is_assertion_document(&Value::Null));
        assert!(is_assertion_document(&json!({"root": null})));
        assert!(!is_assertion_document(&json!({"op": "and", "id": "a", "children": []})));
        assert!(!is_assertion_document(&json!([1, 2])));
    }
}
