//! Core types for assertion trees.
//!
//! This module provides the node model shared by every other module:
//! - [`Comparison`]: how a check compares the observed value to its operand
//! - [`JsonPathOperand`] / [`HeaderOperand`]: literal, glob or absent operands
//! - [`Op`]: one node of the tree, discriminated on the wire by its `op` field
//! - [`Assertion`]: the persisted wrapper whose root is always an `and` group

use std::fmt;

use serde::de::{self, Deserializer, Error as _};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::classify::OpKind;

/// Comparison applied by a check. Serialized as `{"cmp": "<kind>"}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "cmp", rename_all = "snake_case")]
pub enum Comparison {
    /// Observed value equals the operand.
    #[default]
    Equals,
    /// Observed value differs from the operand.
    NotEqual,
    /// Observed value is below the operand.
    LessThan,
    /// Observed value is above the operand.
    GreaterThan,
    /// Always holds, regardless of the observed value.
    Always,
    /// Never holds.
    Never,
}

impl Comparison {
    /// All comparison kinds, in wire order.
    pub const ALL: [Self; 6] = [
        Self::Equals,
        Self::NotEqual,
        Self::LessThan,
        Self::GreaterThan,
        Self::Always,
        Self::Never,
    ];

    /// Returns the wire name of the comparison.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::NotEqual => "not_equal",
            Self::LessThan => "less_than",
            Self::GreaterThan => "greater_than",
            Self::Always => "always",
            Self::Never => "never",
        }
    }

    /// Returns the comparison as a symbol for rendering.
    #[must_use]
    pub const fn as_symbol(&self) -> &'static str {
        match self {
            Self::Equals => "==",
            Self::NotEqual => "!=",
            Self::LessThan => "<",
            Self::GreaterThan => ">",
            Self::Always => "always",
            Self::Never => "never",
        }
    }

    /// True for `always`/`never`, which ignore their operand.
    #[must_use]
    pub const fn is_constant(&self) -> bool {
        matches!(self, Self::Always | Self::Never)
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

/// A wildcard pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GlobPattern {
    /// The pattern text.
    pub value: String,
}

/// Operand of a JSON-path check, tagged by `jsonpath_op`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "jsonpath_op", rename_all = "snake_case")]
pub enum JsonPathOperand {
    /// Matched exactly.
    Literal {
        /// The literal text.
        value: String,
    },
    /// Matched as a wildcard pattern.
    Glob {
        /// The pattern.
        pattern: GlobPattern,
    },
    /// No operand.
    None,
}

impl JsonPathOperand {
    /// Creates a literal operand.
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
        }
    }

    /// Creates a glob operand.
    pub fn glob(pattern: impl Into<String>) -> Self {
        Self::Glob {
            pattern: GlobPattern {
                value: pattern.into(),
            },
        }
    }
}

/// Operand of a header check, tagged by `header_op`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "header_op", rename_all = "snake_case")]
pub enum HeaderOperand {
    /// Matched exactly.
    Literal {
        /// The literal text.
        value: String,
    },
    /// Matched as a wildcard pattern.
    Glob {
        /// The pattern.
        pattern: GlobPattern,
    },
    /// No operand.
    None,
}

impl HeaderOperand {
    /// Creates a literal operand.
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
        }
    }

    /// Creates a glob operand.
    pub fn glob(pattern: impl Into<String>) -> Self {
        Self::Glob {
            pattern: GlobPattern {
                value: pattern.into(),
            },
        }
    }
}

fn fmt_operand(f: &mut fmt::Formatter<'_>, literal: Option<&str>, glob: Option<&str>) -> fmt::Result {
    match (literal, glob) {
        (Some(value), _) => write!(f, "{value:?}"),
        (None, Some(pattern)) => write!(f, "glob({pattern:?})"),
        (None, None) => f.write_str("none"),
    }
}

impl fmt::Display for JsonPathOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal { value } => fmt_operand(f, Some(value), None),
            Self::Glob { pattern } => fmt_operand(f, None, Some(&pattern.value)),
            Self::None => fmt_operand(f, None, None),
        }
    }
}

impl fmt::Display for HeaderOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal { value } => fmt_operand(f, Some(value), None),
            Self::Glob { pattern } => fmt_operand(f, None, Some(&pattern.value)),
            Self::None => fmt_operand(f, None, None),
        }
    }
}

/// An `and`/`or` group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupOp {
    /// Node id.
    pub id: String,
    /// Child conditions, possibly empty.
    pub children: Vec<Op>,
}

/// A negation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotOp {
    /// Node id.
    pub id: String,
    /// The negated node.
    pub operand: Box<Op>,
}

/// A comparison against the response status code.
///
/// `value` is a float because a cleared input field holds `NaN` until the
/// tree is normalized. On the wire `NaN` is `null`, and infinities are
/// written as the largest finite values of the same sign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusCodeOp {
    /// Node id.
    pub id: String,
    /// How the status code is compared.
    pub operator: Comparison,
    /// The status code compared against.
    #[serde(with = "status_value")]
    pub value: f64,
}

/// A comparison against the value found at a JSON path in the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonPathOp {
    /// Node id.
    pub id: String,
    /// The JSON path expression.
    pub value: String,
    /// How the located value is compared.
    pub operator: Comparison,
    /// What it is compared against.
    pub operand: JsonPathOperand,
}

/// A match against response headers by key and value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderCheckOp {
    /// Node id.
    pub id: String,
    /// Comparison applied to the header name.
    pub key_op: Comparison,
    /// Header name operand.
    pub key_operand: HeaderOperand,
    /// Comparison applied to the header value.
    pub value_op: Comparison,
    /// Header value operand.
    pub value_operand: HeaderOperand,
}

/// One node of an assertion tree.
///
/// The model puts no bound on nesting depth, but `serde_json` readers stop at
/// 128 levels of JSON nesting by default. A group level takes two (the node
/// object and its `children` array), so roughly 60 nested groups is the
/// deepest tree `serde_json::from_str` will load. Each node is buffered as a
/// `Value` before its fields are read, so decoding costs grow with depth
/// times tree size.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    /// All children must hold.
    And(GroupOp),
    /// At least one child must hold.
    Or(GroupOp),
    /// Negation of the operand.
    Not(NotOp),
    /// Status code comparison.
    StatusCodeCheck(StatusCodeOp),
    /// JSON-path comparison.
    JsonPath(JsonPathOp),
    /// Header match.
    HeaderCheck(HeaderCheckOp),
    /// A node whose `op` tag is not known to this crate, kept verbatim.
    Unrecognized(Value),
}

impl Op {
    /// Creates an `and` group.
    pub fn and(id: impl Into<String>, children: Vec<Op>) -> Self {
        Self::And(GroupOp {
            id: id.into(),
            children,
        })
    }

    /// Creates an `or` group.
    pub fn or(id: impl Into<String>, children: Vec<Op>) -> Self {
        Self::Or(GroupOp {
            id: id.into(),
            children,
        })
    }

    /// Creates a negation of `operand`.
    pub fn not(id: impl Into<String>, operand: Op) -> Self {
        Self::Not(NotOp {
            id: id.into(),
            operand: Box::new(operand),
        })
    }

    /// Creates a status code check.
    pub fn status_code(id: impl Into<String>, operator: Comparison, value: f64) -> Self {
        Self::StatusCodeCheck(StatusCodeOp {
            id: id.into(),
            operator,
            value,
        })
    }

    /// Returns the node id. `None` only for an unrecognized node without one.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::And(group) | Self::Or(group) => Some(&group.id),
            Self::Not(not) => Some(&not.id),
            Self::StatusCodeCheck(check) => Some(&check.id),
            Self::JsonPath(check) => Some(&check.id),
            Self::HeaderCheck(check) => Some(&check.id),
            Self::Unrecognized(raw) => raw.get("id").and_then(Value::as_str),
        }
    }

    /// Returns the wire tag of the node.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Unrecognized(raw) => raw.get("op").and_then(Value::as_str),
            known => known.kind().map(|kind| kind.as_tag()),
        }
    }

    /// Returns the node with its own id replaced. Descendants keep theirs.
    #[must_use]
    pub fn with_id(self, id: String) -> Self {
        match self {
            Self::And(group) => Self::And(GroupOp { id, ..group }),
            Self::Or(group) => Self::Or(GroupOp { id, ..group }),
            Self::Not(not) => Self::Not(NotOp { id, ..not }),
            Self::StatusCodeCheck(check) => Self::StatusCodeCheck(StatusCodeOp { id, ..check }),
            Self::JsonPath(check) => Self::JsonPath(JsonPathOp { id, ..check }),
            Self::HeaderCheck(check) => Self::HeaderCheck(HeaderCheckOp { id, ..check }),
            Self::Unrecognized(mut raw) => {
                if let Some(object) = raw.as_object_mut() {
                    object.insert("id".to_string(), Value::String(id));
                }
                Self::Unrecognized(raw)
            }
        }
    }

    /// Returns the children of an `and`/`or` group.
    #[must_use]
    pub fn children(&self) -> Option<&[Op]> {
        match self {
            Self::And(group) | Self::Or(group) => Some(&group.children),
            _ => None,
        }
    }

    /// Counts this node and all of its descendants.
    #[must_use]
    pub fn node_count(&self) -> usize {
        match self {
            Self::And(group) | Self::Or(group) => {
                1 + group.children.iter().map(Op::node_count).sum::<usize>()
            }
            Self::Not(not) => 1 + not.operand.node_count(),
            _ => 1,
        }
    }

    /// Depth of the subtree rooted here; a leaf has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::And(group) | Self::Or(group) => {
                1 + group.children.iter().map(Op::depth).max().unwrap_or(0)
            }
            Self::Not(not) => 1 + not.operand.depth(),
            _ => 1,
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum TaggedRef<'a> {
    And(&'a GroupOp),
    Or(&'a GroupOp),
    Not(&'a NotOp),
    StatusCodeCheck(&'a StatusCodeOp),
    JsonPath(&'a JsonPathOp),
    HeaderCheck(&'a HeaderCheckOp),
}


impl Serialize for Op {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let tagged = match self {
            Self::And(group) => TaggedRef::And(group),
            Self::Or(group) => TaggedRef::Or(group),
            Self::Not(not) => TaggedRef::Not(not),
            Self::StatusCodeCheck(check) => TaggedRef::StatusCodeCheck(check),
            Self::JsonPath(check) => TaggedRef::JsonPath(check),
            Self::HeaderCheck(check) => TaggedRef::HeaderCheck(check),
            Self::Unrecognized(raw) => return raw.serialize(serializer),
        };
        tagged.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Op {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        let tag = raw.get("op").and_then(Value::as_str);
        let Some(kind) = tag.and_then(OpKind::from_tag) else {
            warn!(tag = tag.unwrap_or("<missing>"), "keeping unrecognized assertion op");
            return Ok(Self::Unrecognized(raw));
        };

        // The node structs ignore the `op` field, so they read straight from `raw`.
        let op = match kind {
            OpKind::And => GroupOp::deserialize(raw).map(Self::And),
            OpKind::Or => GroupOp::deserialize(raw).map(Self::Or),
            OpKind::Not => NotOp::deserialize(raw).map(Self::Not),
            OpKind::StatusCodeCheck => StatusCodeOp::deserialize(raw).map(Self::StatusCodeCheck),
            OpKind::JsonPath => JsonPathOp::deserialize(raw).map(Self::JsonPath),
            OpKind::HeaderCheck => HeaderCheckOp::deserialize(raw).map(Self::HeaderCheck),
        };
        op.map_err(D::Error::custom)
    }
}

fn write_group(f: &mut fmt::Formatter<'_>, label: &str, children: &[Op]) -> fmt::Result {
    if children.is_empty() {
        return write!(f, "{label}()");
    }
    f.write_str("(")?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            write!(f, " {label} ")?;
        }
        write!(f, "{child}")?;
    }
    f.write_str(")")
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And(group) => write_group(f, "AND", &group.children),
            Self::Or(group) => write_group(f, "OR", &group.children),
            Self::Not(not) => write!(f, "NOT {}", not.operand),
            Self::StatusCodeCheck(check) if check.operator.is_constant() => {
                write!(f, "status_code {}", check.operator)
            }
            Self::StatusCodeCheck(check) => {
                write!(f, "status_code {} {}", check.operator, check.value)
            }
            Self::JsonPath(check) if check.operator.is_constant() => {
                write!(f, "json_path({:?}) {}", check.value, check.operator)
            }
            Self::JsonPath(check) => write!(
                f,
                "json_path({:?}) {} {}",
                check.value, check.operator, check.operand
            ),
            Self::HeaderCheck(check) => write!(
                f,
                "header(key {} {}, value {} {})",
                check.key_op, check.key_operand, check.value_op, check.value_operand
            ),
            Self::Unrecognized(_) => {
                write!(f, "<unrecognized op {:?}>", self.tag().unwrap_or("<missing>"))
            }
        }
    }
}

/// The assertion attached to an uptime monitor.
///
/// The root is always an `and` group; deserializing any other root fails.
/// Parsing is subject to the nesting limit described on [`Op`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assertion {
    /// The root group.
    #[serde(with = "and_root")]
    pub root: GroupOp,
}

impl Assertion {
    /// Wraps a root group.
    #[must_use]
    pub const fn new(root: GroupOp) -> Self {
        Self { root }
    }

    /// True when the root has no children, i.e. no assertions are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }
}

impl fmt::Display for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_group(f, "AND", &self.root.children)
    }
}

mod and_root {
    use super::{de, Deserialize, Deserializer, GroupOp, Op, Serialize, Serializer, TaggedRef};

    pub fn serialize<S: Serializer>(root: &GroupOp, serializer: S) -> Result<S::Ok, S::Error> {
        TaggedRef::And(root).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<GroupOp, D::Error> {
        match Op::deserialize(deserializer)? {
            Op::And(group) => Ok(group),
            other => Err(de::Error::custom(format!(
                "assertion root must be an `and` group, found `{}`",
                other.tag().unwrap_or("<missing>")
            ))),
        }
    }
}

mod status_value {
    use super::{Deserialize, Deserializer, Serializer};

    // Integral values go out as JSON integers and NaN goes out as null.
    // Infinities saturate to the largest finite values so they still clamp.
    #[allow(clippy::trivially_copy_pass_by_ref, clippy::float_cmp)]
    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        let value = &value.clamp(f64::MIN, f64::MAX);
        if value.is_nan() {
            serializer.serialize_none()
        } else if value.fract() == 0.0 && value.abs() <= 9_007_199_254_740_992.0 {
            serializer.serialize_i64(*value as i64)
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}
