//! Wire types for the arithmetic service.
//!
//! Requests are `{"a": "...", "b": "..."}` (`b` omitted for unary operations).
//! Responses are `{"result": ...}` or `{"error": "..."}`.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ClientError;

/// Operands sent to the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationRequest {
    #[serde(deserialize_with = "decimal_operand")]
    pub a: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "optional_decimal_operand"
    )]
    pub b: Option<String>,
}

impl OperationRequest {
    /// Request for a two-operand operation.
    pub fn binary(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            a: a.into(),
            b: Some(b.into()),
        }
    }

    /// Request for a one-operand operation.
    pub fn unary(a: impl Into<String>) -> Self {
        Self {
            a: a.into(),
            b: None,
        }
    }
}

/// Service reply. Either field may be absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OperationResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OperationResponse {
    /// Successful reply carrying a decimal string.
    pub fn success(result: impl Into<String>) -> Self {
        Self {
            result: Some(serde_json::Value::String(result.into())),
            error: None,
        }
    }

    /// Failed reply carrying a message.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            result: None,
            error: Some(error.into()),
        }
    }

    /// Interpret the reply: a non-empty `error` wins, then a usable `result`.
    pub fn into_result(self) -> Result<String, ClientError> {
        if let Some(error) = self.error.filter(|e| !e.is_empty()) {
            return Err(ClientError::Server(error));
        }
        match self.result {
            Some(serde_json::Value::String(s)) if !s.is_empty() => Ok(s),
            Some(serde_json::Value::Number(n)) => Ok(n.to_string()),
            _ => Err(ClientError::EmptyResult),
        }
    }
}

/// Operands arrive as numeric strings from the calculator, but plain JSON
/// numbers are accepted too.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawOperand {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawOperand> for String {
    fn from(raw: RawOperand) -> Self {
        match raw {
            RawOperand::Text(s) => s,
            RawOperand::Number(n) => n.to_string(),
        }
    }
}

fn decimal_operand<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawOperand::deserialize(deserializer).map(String::from)
}

fn optional_decimal_operand<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawOperand>::deserialize(deserializer).map(|raw| raw.map(String::from))
}
