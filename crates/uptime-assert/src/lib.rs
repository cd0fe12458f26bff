//! Assertion expression trees for uptime checks.
//!
//! `uptime-assert` models the conditions an uptime monitor evaluates against
//! an HTTP response, and the pure transforms applied to them between the
//! editor, the suggestion source and persistence.
//!
//! # Features
//!
//! - **Tree model**: `and`/`or`/`not` groups over status code, JSON-path and
//!   header checks, serialized with an `op` tag
//! - **Classifier**: one predicate per node kind
//! - **Normalizer**: clamps status codes into `[100, 599]` and fills cleared
//!   values with `200` before submission; empty roots submit as `null`
//! - **Merger**: appends a suggested condition with freshly issued ids
//! - **Edits**: id-addressed replace/remove/append/duplicate returning new trees
//!
//! # Example
//!
//! ```rust
//! use uptime_assert::{merge_suggestion, prepare_submission, Comparison, Op, OpFactory};
//!
//! let factory = OpFactory::new();
//!
//! // A new monitor starts with "status code is 2xx".
//! let assertion = factory.initial_assertion(None, false);
//! assert_eq!(assertion.to_string(), "(status_code > 199 AND status_code < 300)");
//!
//! // A suggested check is appended without disturbing the existing ones.
//! let suggested = Op::status_code("from-suggestion", Comparison::NotEqual, 503.0);
//! let merged = merge_suggestion(&suggested, Some(&assertion), factory.ids());
//! assert_eq!(merged.root.children.len(), 3);
//! assert_ne!(merged.root.children[2].id(), Some("from-suggestion"));
//!
//! // Submission normalizes the tree.
//! let submitted = prepare_submission(Some(&merged)).expect("non-empty");
//! assert_eq!(submitted.root.id, assertion.root.id);
//! ```
//!
//! # Emptiness
//!
//! An `and` root without children means "no assertions" and is submitted as
//! `null`, the same as an absent assertion:
//!
//! ```rust
//! use serde_json::json;
//! use uptime_assert::prepare_submission_json;
//!
//! let empty = json!({"root": {"op": "and", "id": "x", "children": []}});
//! assert_eq!(prepare_submission_json(&empty)?, serde_json::Value::Null);
//! assert_eq!(prepare_submission_json(&json!({}))?, serde_json::Value::Null);
//! # Ok::<(), uptime_assert::AssertionError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod classify;
pub mod edit;
pub mod error;
pub mod factory;
pub mod ids;
pub mod merge;
pub mod normalize;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export main types at crate root
pub use classify::{ensure_recognized, OpKind};
pub use edit::{append_child, duplicate_op, find_op, remove_op, replace_op};
pub use error::{AssertionError, Result};
pub use factory::{create_default_assertion_root, create_empty_assertion_root, AddOpKind, OpFactory};
pub use ids::{IdGenerator, SequentialIdGenerator, UuidIdGenerator};
pub use merge::{merge_suggestion, refresh_ids};
pub use normalize::{
    normalize, prepare_submission, prepare_submission_json, Normalizer, StatusCodeBounds,
};
pub use types::{
    Assertion, Comparison, GlobPattern, GroupOp, HeaderCheckOp, HeaderOperand, JsonPathOp,
    JsonPathOperand, NotOp, Op, StatusCodeOp,
};
