//! Reference semantics of the arithmetic service.

use crate::error::ArithmeticError;
use crate::operation::Operation;

/// Evaluate `op` over `a` and `b`. `b` is ignored for square root.
pub fn evaluate(op: Operation, a: f64, b: f64) -> Result<f64, ArithmeticError> {
    let result = match op {
        Operation::Add => a + b,
        Operation::Subtract => a - b,
        Operation::Multiply => a * b,
        Operation::Divide => {
            if b == 0.0 {
                return Err(ArithmeticError::DivisionByZero);
            }
            a / b
        }
        Operation::Power => {
            let result = a.powf(b);
            if result.is_nan() {
                return Err(ArithmeticError::NegativeSqrt);
            }
            result
        }
        Operation::Sqrt => {
            if a < 0.0 {
                return Err(ArithmeticError::NegativeSqrt);
            }
            a.sqrt()
        }
        Operation::Percentage => {
            if a < 0.0 {
                return Err(ArithmeticError::NegativePercentage);
            }
            (a / 100.0) * b
        }
    };

    if result.is_finite() {
        Ok(result)
    } else {
        Err(ArithmeticError::NotFinite)
    }
}
