//! Instruction alphabet and classification.
//!
//! Every calculator input event is a single character from a fixed alphabet.
//! Parsing into [`Instruction`] is the only validation the calculator does.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CalcError;

/// Every character accepted as an instruction.
pub const ALPHABET: &str = "0123456789.+-*/^%scdt=";

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Percentage,
}

impl BinaryOp {
    /// All binary operators in keypad order.
    pub const ALL: [BinaryOp; 6] = [
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Divide,
        Self::Power,
        Self::Percentage,
    ];

    /// Operator symbol as typed by the user.
    pub fn symbol(&self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
            Self::Power => '^',
            Self::Percentage => '%',
        }
    }

    /// Look up an operator by symbol.
    pub fn from_symbol(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == c)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A single calculator input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// Digit `0`-`9`.
    Digit(u8),
    /// Decimal point `.`.
    Decimal,
    /// `+ - * / ^ %`.
    Binary(BinaryOp),
    /// `s`, square root of the display.
    Sqrt,
    /// `c`, reset everything.
    Clear,
    /// `d`, backspace.
    Delete,
    /// `t`, toggle sign.
    ToggleSign,
    /// `=`, evaluate the pending operation.
    Equals,
}

impl Instruction {
    /// Canonical character for this instruction.
    pub fn as_char(&self) -> char {
        match self {
            // Digit is only ever constructed from '0'..='9'.
            Self::Digit(d) => char::from(b'0' + d),
            Self::Decimal => '.',
            Self::Binary(op) => op.symbol(),
            Self::Sqrt => 's',
            Self::Clear => 'c',
            Self::Delete => 'd',
            Self::ToggleSign => 't',
            Self::Equals => '=',
        }
    }

    /// Digits and the decimal point.
    pub fn is_digit(&self) -> bool {
        matches!(self, Self::Digit(_) | Self::Decimal)
    }

    /// Binary operators.
    pub fn is_binary_op(&self) -> bool {
        matches!(self, Self::Binary(_))
    }

    /// Square root and equals.
    pub fn is_unary_op(&self) -> bool {
        matches!(self, Self::Sqrt | Self::Equals)
    }

    /// Any operator, binary or unary.
    pub fn is_operator(&self) -> bool {
        self.is_binary_op() || self.is_unary_op()
    }

    /// Clear, delete and toggle-sign.
    pub fn is_control(&self) -> bool {
        matches!(self, Self::Clear | Self::Delete | Self::ToggleSign)
    }
}

impl TryFrom<char> for Instruction {
    type Error = CalcError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        let inst = match c {
            '0'..='9' => Self::Digit(c as u8 - b'0'),
            '.' => Self::Decimal,
            's' => Self::Sqrt,
            'c' => Self::Clear,
            'd' => Self::Delete,
            't' => Self::ToggleSign,
            '=' => Self::Equals,
            _ => match BinaryOp::from_symbol(c) {
                Some(op) => Self::Binary(op),
                None => return Err(CalcError::InvalidInstruction(c.to_string())),
            },
        };
        Ok(inst)
    }
}

impl FromStr for Instruction {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::try_from(c),
            _ => Err(CalcError::InvalidInstruction(s.to_string())),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// True iff `s` is exactly one character from the instruction alphabet.
pub fn is_instruction(s: &str) -> bool {
    s.parse::<Instruction>().is_ok()
}
