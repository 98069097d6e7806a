//! Calculator snapshot and phase automaton.

use serde::{Deserialize, Serialize};

/// Display value of a freshly created or cleared calculator.
pub const INITIAL_DISPLAY: &str = "0";

/// Immutable read of every calculator field at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorSnapshot {
    /// Current entry, always a partial or complete decimal numeral.
    pub display: String,
    /// Left-hand value captured when an operator was chosen.
    pub operand: Option<String>,
    /// Pending operator symbol.
    pub operator: Option<char>,
    /// Next digit starts a fresh number instead of appending.
    pub reset_display: bool,
    /// Set when the last remote call or local precondition failed.
    pub error: Option<String>,
    /// A remote call is in flight.
    pub processing: bool,
}

impl Default for CalculatorSnapshot {
    fn default() -> Self {
        Self {
            display: INITIAL_DISPLAY.to_string(),
            operand: None,
            operator: None,
            reset_display: false,
            error: None,
            processing: false,
        }
    }
}

impl CalculatorSnapshot {
    /// What the display area shows: the error if any, otherwise the entry.
    pub fn display_text(&self) -> &str {
        self.error.as_deref().unwrap_or(&self.display)
    }

    /// `"{operand} {operator}"` while an operation is pending, empty otherwise.
    pub fn expression(&self) -> String {
        if self.error.is_some() {
            return String::new();
        }
        match (&self.operand, self.operator) {
            (Some(operand), Some(operator)) => format!("{} {}", operand, operator),
            _ => String::new(),
        }
    }

    /// Phase of the automaton this snapshot is in.
    pub fn phase(&self) -> Phase {
        if self.processing {
            Phase::Processing
        } else if self.error.is_some() {
            Phase::Error
        } else if self.operator.is_some() {
            Phase::AwaitingOperand
        } else {
            Phase::Idle
        }
    }
}

/// Calculator automaton phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// No operation pending.
    Idle,
    /// Operand and operator captured, waiting for the right-hand value.
    AwaitingOperand,
    /// Remote call in flight.
    Processing,
    /// Last remote call or local precondition failed.
    Error,
}

impl Phase {
    /// Get valid transitions from this phase.
    pub fn valid_transitions(&self) -> &'static [Phase] {
        match self {
            Self::Idle => &[Self::AwaitingOperand, Self::Processing, Self::Error],
            Self::AwaitingOperand => &[Self::Idle, Self::Processing, Self::Error],
            Self::Processing => &[Self::Idle, Self::AwaitingOperand, Self::Error],
            Self::Error => &[Self::Idle],
        }
    }

    /// Check if transition to target phase is valid. Staying put is always valid.
    pub fn can_transition_to(&self, target: Phase) -> bool {
        *self == target || self.valid_transitions().contains(&target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_snapshot() {
        let snap = CalculatorSnapshot::default();
        assert_eq!(snap.display_text(), "0");
        assert_eq!(snap.expression(), "");
        assert_eq!(snap.phase(), Phase::Idle);
    }

    #[test]
    fn expression_and_error() {
        let mut snap = CalculatorSnapshot {
            operand: Some("5".to_string()),
            operator: Some('+'),
            reset_display: true,
            ..Default::default()
        };
        assert_eq!(snap.expression(), "5 +");
        assert_eq!(snap.phase(), Phase::AwaitingOperand);

        snap.error = Some("division by zero".to_string());
        assert_eq!(snap.expression(), "");
        assert_eq!(snap.display_text(), "division by zero");
        assert_eq!(snap.phase(), Phase::Error);
    }

    #[test]
    fn phase_transitions() {
        assert!(Phase::Idle.can_transition_to(Phase::Processing));
        assert!(Phase::Processing.can_transition_to(Phase::Error));
        assert!(Phase::Error.can_transition_to(Phase::Idle));
        assert!(!Phase::Error.can_transition_to(Phase::Processing));
        assert!(!Phase::Error.can_transition_to(Phase::AwaitingOperand));
    }

    #[test]
    fn snapshot_serializes_camel_case() {
        let json = serde_json::to_value(CalculatorSnapshot::default()).unwrap();
        assert_eq!(json["display"], "0");
        assert_eq!(json["resetDisplay"], false);
        assert!(json["operand"].is_null());
    }
}
