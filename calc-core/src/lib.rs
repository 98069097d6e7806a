//! # calc-core
//!
//! Core library for the remote-backed calculator.
//!
//! This crate provides the instruction alphabet and its classifier, the
//! decimal-string helpers, calculator snapshots, the wire format spoken with
//! the arithmetic service, and the service's reference arithmetic.

pub mod arithmetic;
pub mod error;
pub mod instruction;
pub mod message;
pub mod number;
pub mod operation;
pub mod state;

pub use arithmetic::evaluate;
pub use error::{ArithmeticError, CalcError, CalcResult, ClientError, API_ERROR_FALLBACK, LOCAL_ERROR};
pub use instruction::{is_instruction, BinaryOp, Instruction};
pub use message::{OperationRequest, OperationResponse};
pub use operation::Operation;
pub use state::{CalculatorSnapshot, Phase};

/// Version prefix of the service routes.
pub const API_VERSION: &str = "v1";
