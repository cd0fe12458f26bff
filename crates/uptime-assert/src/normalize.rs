//! Submission-time normalization.
//!
//! Live editing may leave a tree in an invalid intermediate state, such as a
//! cleared status code field holding `NaN`. [`Normalizer`] turns such a tree
//! into one that is safe to persist, and [`Normalizer::prepare_submission`]
//! applies the emptiness policy: an absent assertion and an `and` root with
//! no children both go out as `null`.
//!
//! Normalization is idempotent and never changes ids, tree shape or
//! non-numeric leaf fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{AssertionError, Result};
use crate::types::{Assertion, GroupOp, NotOp, Op, StatusCodeOp};

/// Status code range and fallback used by the normalizer.
///
/// Deserialization goes through [`StatusCodeBounds::new`], so a config file
/// cannot produce inconsistent bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBounds")]
pub struct StatusCodeBounds {
    min: u16,
    max: u16,
    fallback: u16,
}

impl StatusCodeBounds {
    /// Lowest status code kept as-is.
    pub const DEFAULT_MIN: u16 = 100;
    /// Highest status code kept as-is.
    pub const DEFAULT_MAX: u16 = 599;
    /// Replacement for a cleared (`NaN`) value.
    pub const DEFAULT_FALLBACK: u16 = 200;

    /// Creates bounds.
    ///
    /// # Errors
    ///
    /// Returns `AssertionError::InvalidBounds` if `min > max` or the fallback
    /// lies outside `[min, max]`.
    pub fn new(min: u16, max: u16, fallback: u16) -> Result<Self> {
        if min > max {
            return Err(AssertionError::InvalidBounds {
                reason: format!("min {min} is greater than max {max}"),
            });
        }
        if !(min..=max).contains(&fallback) {
            return Err(AssertionError::InvalidBounds {
                reason: format!("fallback {fallback} is outside [{min}, {max}]"),
            });
        }
        Ok(Self { min, max, fallback })
    }

    /// Lower bound.
    #[must_use]
    pub const fn min(&self) -> u16 {
        self.min
    }

    /// Upper bound.
    #[must_use]
    pub const fn max(&self) -> u16 {
        self.max
    }

    /// Value substituted for `NaN`.
    #[must_use]
    pub const fn fallback(&self) -> u16 {
        self.fallback
    }

    /// Clamps `value` into range, substituting the fallback for `NaN`.
    #[must_use]
    pub fn apply(&self, value: f64) -> f64 {
        if value.is_nan() {
            return f64::from(self.fallback);
        }
        value.max(f64::from(self.min)).min(f64::from(self.max))
    }
}

impl Default for StatusCodeBounds {
    fn default() -> Self {
        Self {
            min: Self::DEFAULT_MIN,
            max: Self::DEFAULT_MAX,
            fallback: Self::DEFAULT_FALLBACK,
        }
    }
}

#[derive(Deserialize)]
struct RawBounds {
    #[serde(default = "default_min")]
    min: u16,
    #[serde(default = "default_max")]
    max: u16,
    #[serde(default = "default_fallback")]
    fallback: u16,
}

const fn default_min() -> u16 {
    StatusCodeBounds::DEFAULT_MIN
}

const fn default_max() -> u16 {
    StatusCodeBounds::DEFAULT_MAX
}

const fn default_fallback() -> u16 {
    StatusCodeBounds::DEFAULT_FALLBACK
}

impl TryFrom<RawBounds> for StatusCodeBounds {
    type Error = AssertionError;

    fn try_from(raw: RawBounds) -> Result<Self> {
        Self::new(raw.min, raw.max, raw.fallback)
    }
}

/// Recursive value-clamping pass over assertion trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    bounds: StatusCodeBounds,
}

impl Normalizer {
    /// Creates a normalizer with the default bounds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a normalizer with custom bounds.
    #[must_use]
    pub const fn with_bounds(bounds: StatusCodeBounds) -> Self {
        Self { bounds }
    }

    /// Returns the bounds in use.
    #[must_use]
    pub const fn bounds(&self) -> &StatusCodeBounds {
        &self.bounds
    }

    /// Returns a normalized copy of `op`.
    #[must_use]
    pub fn normalize(&self, op: &Op) -> Op {
        match op {
            Op::StatusCodeCheck(check) => Op::StatusCodeCheck(self.normalize_status_code(check)),
            Op::And(group) => Op::And(self.normalize_group(group)),
            Op::Or(group) => Op::Or(self.normalize_group(group)),
            Op::Not(not) => Op::Not(NotOp {
                id: not.id.clone(),
                operand: Box::new(self.normalize(&not.operand)),
            }),
            Op::JsonPath(_) | Op::HeaderCheck(_) | Op::Unrecognized(_) => op.clone(),
        }
    }

    /// Returns a normalized copy of a group, children in order.
    #[must_use]
    pub fn normalize_group(&self, group: &GroupOp) -> GroupOp {
        GroupOp {
            id: group.id.clone(),
            children: group.children.iter().map(|child| self.normalize(child)).collect(),
        }
    }

    fn normalize_status_code(&self, check: &StatusCodeOp) -> StatusCodeOp {
        let value = self.bounds.apply(check.value);
        if value.to_bits() != check.value.to_bits() {
            debug!(id = %check.id, from = check.value, to = value, "adjusted status code");
        }
        StatusCodeOp {
            value,
            ..check.clone()
        }
    }

    /// Applies the submission policy to a typed assertion.
    ///
    /// Returns `None` for an absent assertion or an empty root, and the
    /// normalized assertion otherwise.
    #[must_use]
    pub fn prepare_submission(&self, assertion: Option<&Assertion>) -> Option<Assertion> {
        let assertion = assertion?;
        if assertion.is_empty() {
            debug!(root = %assertion.root.id, "empty assertion root submitted as null");
            return None;
        }
        Some(Assertion::new(self.normalize_group(&assertion.root)))
    }

    /// Applies the submission policy to a raw JSON value.
    ///
    /// `null`, an object without `root`, and `{"root": null}` all map to
    /// `null`.
    ///
    /// # Errors
    ///
    /// Returns `AssertionError::SerializationError` if the value is neither
    /// an object nor `null`, or if `root` is not a valid `and` group.
    pub fn prepare_submission_json(&self, value: &Value) -> Result<Value> {
        match value {
            Value::Null => return Ok(Value::Null),
            Value::Object(fields) => {
                if fields.get("root").is_none_or(Value::is_null) {
                    return Ok(Value::Null);
                }
            }
            other => {
                return Err(AssertionError::SerializationError(format!(
                    "expected an assertion object or null, found {other}"
                )));
            }
        }

        let assertion: Assertion = serde_json::from_value(value.clone())?;
        match self.prepare_submission(Some(&assertion)) {
            Some(prepared) => Ok(serde_json::to_value(prepared)?),
            None => Ok(Value::Null),
        }
    }
}

/// Normalizes `op` with the default bounds.
#[must_use]
pub fn normalize(op: &Op) -> Op {
    Normalizer::new().normalize(op)
}

/// Submission policy with the default bounds. See [`Normalizer::prepare_submission`].
#[must_use]
pub fn prepare_submission(assertion: Option<&Assertion>) -> Option<Assertion> {
    Normalizer::new().prepare_submission(assertion)
}

/// Submission policy over raw JSON with the default bounds.
///
/// # Errors
///
/// See [`Normalizer::prepare_submission_json`].
pub fn prepare_submission_json(value: &Value) -> Result<Value> {
    Normalizer::new().prepare_submission_json(value)
}
