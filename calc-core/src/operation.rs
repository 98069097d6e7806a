//! Remote arithmetic operations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::instruction::BinaryOp;

/// An operation exposed by the arithmetic service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Sqrt,
    Percentage,
}

impl Operation {
    /// All operations, in route registration order.
    pub const ALL: [Operation; 7] = [
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Divide,
        Self::Power,
        Self::Sqrt,
        Self::Percentage,
    ];

    /// Path segment the operation is served under.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
            Self::Power => "power",
            Self::Sqrt => "sqrt",
            Self::Percentage => "percentage",
        }
    }

    /// Number of operands.
    pub fn arity(&self) -> usize {
        match self {
            Self::Sqrt => 1,
            _ => 2,
        }
    }

    /// Operator symbol (`s` for square root).
    pub fn symbol(&self) -> char {
        match self {
            Self::Sqrt => 's',
            Self::Add => BinaryOp::Add.symbol(),
            Self::Subtract => BinaryOp::Subtract.symbol(),
            Self::Multiply => BinaryOp::Multiply.symbol(),
            Self::Divide => BinaryOp::Divide.symbol(),
            Self::Power => BinaryOp::Power.symbol(),
            Self::Percentage => BinaryOp::Percentage.symbol(),
        }
    }

    /// Look up an operation by operator symbol.
    pub fn from_symbol(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == c)
    }

    /// Look up an operation by path segment.
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.path() == path)
    }
}

impl From<BinaryOp> for Operation {
    fn from(op: BinaryOp) -> Self {
        match op {
            BinaryOp::Add => Self::Add,
            BinaryOp::Subtract => Self::Subtract,
            BinaryOp::Multiply => Self::Multiply,
            BinaryOp::Divide => Self::Divide,
            BinaryOp::Power => Self::Power,
            BinaryOp::Percentage => Self::Percentage,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
