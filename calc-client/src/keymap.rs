//! Key-name to instruction mapping for presentation layers.

use calc_core::Instruction;

/// Map a key name (as reported by a keyboard event) to an instruction.
///
/// Named keys: `Backspace`, `Escape`, `Enter`. Any single character from the
/// instruction alphabet maps to itself. Everything else is ignored.
pub fn instruction_for_key(key: &str) -> Option<Instruction> {
    match key {
        "Backspace" => Some(Instruction::Delete),
        "Escape" => Some(Instruction::Clear),
        "Enter" => Some(Instruction::Equals),
        _ => key.parse().ok(),
    }
}
