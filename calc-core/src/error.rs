//! Error types for the calculator.

use thiserror::Error;

/// Message shown when a remote failure carries no message of its own.
pub const API_ERROR_FALLBACK: &str = "API Error";

/// Message shown for local arithmetic precondition violations.
pub const LOCAL_ERROR: &str = "Error";

/// Calculator errors that propagate to the caller of `handle`.
///
/// Remote arithmetic failures never show up here: they are folded into the
/// snapshot's `error` field instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// Input is not a member of the instruction alphabet.
    #[error("invalid instruction: {0:?}")]
    InvalidInstruction(String),

    /// An instruction arrived while a remote call was still in flight.
    #[error("calculator is busy processing a previous instruction")]
    Busy,
}

/// Result type alias for calculator operations.
pub type CalcResult<T> = Result<T, CalcError>;

/// Failure of a remote arithmetic call.
///
/// `Display` yields the bare message so it can be shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The service answered with an `error` field.
    #[error("{0}")]
    Server(String),

    /// The service answered without a usable `result`.
    #[error("Result is empty")]
    EmptyResult,

    /// Connection, timeout or other transport failure.
    #[error("{0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("{0}")]
    Decode(String),
}

impl ClientError {
    /// Message to put on the display, falling back to [`API_ERROR_FALLBACK`].
    pub fn display_message(&self) -> String {
        let msg = self.to_string();
        if msg.trim().is_empty() {
            API_ERROR_FALLBACK.to_string()
        } else {
            msg
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Failure of a local evaluation on the service side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArithmeticError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("sqrt negative number")]
    NegativeSqrt,

    #[error("negative percentage")]
    NegativePercentage,

    #[error("result is not finite")]
    NotFinite,
}
