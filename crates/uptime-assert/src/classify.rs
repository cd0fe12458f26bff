//! Variant predicates for [`Op`].
//!
//! Callers decide how to render, recurse into or edit a node through these
//! predicates instead of inspecting fields. Exactly one of the six leaf/group
//! predicates holds for every recognized node; none holds for
//! [`Op::Unrecognized`].

use std::fmt;

use crate::error::{AssertionError, Result};
use crate::types::Op;

/// The recognized node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    /// `and` group.
    And,
    /// `or` group.
    Or,
    /// `not` wrapper.
    Not,
    /// `status_code_check` leaf.
    StatusCodeCheck,
    /// `json_path` leaf.
    JsonPath,
    /// `header_check` leaf.
    HeaderCheck,
}

impl OpKind {
    /// All recognized kinds.
    pub const ALL: [Self; 6] = [
        Self::And,
        Self::Or,
        Self::Not,
        Self::StatusCodeCheck,
        Self::JsonPath,
        Self::HeaderCheck,
    ];

    /// Returns the wire tag (`op` field value) for this kind.
    #[must_use]
    pub const fn as_tag(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::StatusCodeCheck => "status_code_check",
            Self::JsonPath => "json_path",
            Self::HeaderCheck => "header_check",
        }
    }

    /// Looks up a kind by wire tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_tag() == tag)
    }

    /// Like [`OpKind::from_tag`], but an unknown tag is an error.
    pub fn try_from_tag(tag: &str) -> Result<Self> {
        Self::from_tag(tag).ok_or_else(|| AssertionError::UnknownOp {
            tag: tag.to_string(),
        })
    }

    /// True for `and` and `or`.
    #[must_use]
    pub const fn is_group(&self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl Op {
    /// Returns the kind, or `None` for an unrecognized node.
    #[must_use]
    pub const fn kind(&self) -> Option<OpKind> {
        match self {
            Self::And(_) => Some(OpKind::And),
            Self::Or(_) => Some(OpKind::Or),
            Self::Not(_) => Some(OpKind::Not),
            Self::StatusCodeCheck(_) => Some(OpKind::StatusCodeCheck),
            Self::JsonPath(_) => Some(OpKind::JsonPath),
            Self::HeaderCheck(_) => Some(OpKind::HeaderCheck),
            Self::Unrecognized(_) => None,
        }
    }

    /// Returns the kind, treating an unrecognized node as an error.
    pub fn try_kind(&self) -> Result<OpKind> {
        self.kind().ok_or_else(|| AssertionError::UnknownOp {
            tag: self.tag().unwrap_or("<missing>").to_string(),
        })
    }

    /// `and` group.
    #[must_use]
    pub const fn is_and_op(&self) -> bool {
        matches!(self, Self::And(_))
    }

    /// `or` group.
    #[must_use]
    pub const fn is_or_op(&self) -> bool {
        matches!(self, Self::Or(_))
    }

    /// `and` or `or` group.
    #[must_use]
    pub const fn is_group_op(&self) -> bool {
        matches!(self, Self::And(_) | Self::Or(_))
    }

    /// `not` wrapper.
    #[must_use]
    pub const fn is_not_op(&self) -> bool {
        matches!(self, Self::Not(_))
    }

    /// Status code check.
    #[must_use]
    pub const fn is_status_code_op(&self) -> bool {
        matches!(self, Self::StatusCodeCheck(_))
    }

    /// JSON-path check.
    #[must_use]
    pub const fn is_json_path_op(&self) -> bool {
        matches!(self, Self::JsonPath(_))
    }

    /// Header check.
    #[must_use]
    pub const fn is_header_check_op(&self) -> bool {
        matches!(self, Self::HeaderCheck(_))
    }
}

/// Fails on the first unrecognized node found anywhere in the tree.
pub fn ensure_recognized(op: &Op) -> Result<()> {
    match op {
        Op::And(group) | Op::Or(group) => group.children.iter().try_for_each(ensure_recognized),
        Op::Not(not) => ensure_recognized(&not.operand),
        Op::Unrecognized(_) => op.try_kind().map(|_| ()),
        _ => Ok(()),
    }
}
