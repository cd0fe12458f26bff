//! Constructors for roots and for nodes added by hand.

use std::fmt;
use std::sync::Arc;

use crate::ids::{IdGenerator, UuidIdGenerator};
use crate::types::{
    Assertion, Comparison, GroupOp, HeaderCheckOp, HeaderOperand, JsonPathOp, JsonPathOperand,
    Op, StatusCodeOp,
};

/// Kinds of node offered by an "add assertion" action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddOpKind {
    /// `status_code_check equals 200`.
    StatusCode,
    /// `json_path` with an empty path and literal operand.
    JsonPath,
    /// `header_check` with empty literal key and value.
    HeaderCheck,
    /// Empty `and` group.
    LogicalGroup,
}

impl AddOpKind {
    /// All kinds, in menu order.
    pub const ALL: [Self; 4] = [
        Self::StatusCode,
        Self::JsonPath,
        Self::HeaderCheck,
        Self::LogicalGroup,
    ];

    /// Returns the kind as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::StatusCode => "status_code",
            Self::JsonPath => "json_path",
            Self::HeaderCheck => "header_check",
            Self::LogicalGroup => "logical_group",
        }
    }
}

impl fmt::Display for AddOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds nodes with fresh ids from a shared generator.
#[derive(Clone)]
pub struct OpFactory {
    ids: Arc<dyn IdGenerator>,
}

impl OpFactory {
    /// Creates a factory issuing UUID ids.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ids(Arc::new(UuidIdGenerator))
    }

    /// Creates a factory over a custom generator.
    #[must_use]
    pub fn with_ids(ids: Arc<dyn IdGenerator>) -> Self {
        Self { ids }
    }

    /// The generator backing this factory, for merge and duplicate.
    #[must_use]
    pub fn ids(&self) -> &dyn IdGenerator {
        self.ids.as_ref()
    }

    /// Root for a monitor known to have no assertions.
    #[must_use]
    pub fn empty_root(&self) -> GroupOp {
        GroupOp {
            id: self.ids.next_id(),
            children: Vec::new(),
        }
    }

    /// Root for a new monitor: status code `> 199` and `< 300`.
    #[must_use]
    pub fn default_root(&self) -> GroupOp {
        GroupOp {
            id: self.ids.next_id(),
            children: vec![
                self.status_code_with(Comparison::GreaterThan, 199.0),
                self.status_code_with(Comparison::LessThan, 300.0),
            ],
        }
    }

    fn status_code_with(&self, operator: Comparison, value: f64) -> Op {
        Op::StatusCodeCheck(StatusCodeOp {
            id: self.ids.next_id(),
            operator,
            value,
        })
    }

    /// `status_code_check equals 200`.
    #[must_use]
    pub fn status_code_op(&self) -> Op {
        self.status_code_with(Comparison::Equals, 200.0)
    }

    /// `json_path` with an empty path, `equals`, and an empty literal.
    #[must_use]
    pub fn json_path_op(&self) -> Op {
        Op::JsonPath(JsonPathOp {
            id: self.ids.next_id(),
            value: String::new(),
            operator: Comparison::Equals,
            operand: JsonPathOperand::literal(""),
        })
    }

    /// `header_check` comparing empty literals with `equals`.
    #[must_use]
    pub fn header_check_op(&self) -> Op {
        Op::HeaderCheck(HeaderCheckOp {
            id: self.ids.next_id(),
            key_op: Comparison::Equals,
            key_operand: HeaderOperand::literal(""),
            value_op: Comparison::Equals,
            value_operand: HeaderOperand::literal(""),
        })
    }

    /// Empty `and` group.
    #[must_use]
    pub fn logical_group_op(&self) -> Op {
        Op::And(self.empty_root())
    }

    /// Dispatches on [`AddOpKind`].
    #[must_use]
    pub fn create(&self, kind: AddOpKind) -> Op {
        match kind {
            AddOpKind::StatusCode => self.status_code_op(),
            AddOpKind::JsonPath => self.json_path_op(),
            AddOpKind::HeaderCheck => self.header_check_op(),
            AddOpKind::LogicalGroup => self.logical_group_op(),
        }
    }

    /// Picks the assertion a monitor form starts editing from.
    ///
    /// A persisted assertion wins. Otherwise an existing monitor starts from
    /// an explicit empty root, and a new monitor from the default 2xx root.
    #[must_use]
    pub fn initial_assertion(&self, persisted: Option<Assertion>, monitor_exists: bool) -> Assertion {
        match persisted {
            Some(assertion) => assertion,
            None if monitor_exists => Assertion::new(self.empty_root()),
            None => Assertion::new(self.default_root()),
        }
    }
}

impl Default for OpFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for OpFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpFactory").finish_non_exhaustive()
    }
}

/// Fresh empty `and` root with a UUID id.
#[must_use]
pub fn create_empty_assertion_root() -> GroupOp {
    OpFactory::new().empty_root()
}

/// Fresh default `and` root (`> 199` and `< 300`) with UUID ids.
#[must_use]
pub fn create_default_assertion_root() -> GroupOp {
    OpFactory::new().default_root()
}
