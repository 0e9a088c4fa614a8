use crate::calculator::Calculator;

/// Mutable state shared by REPL commands.
///
/// - `calculator`: the engine every command operates on.
/// - `should_exit`: set by a command to ask the loop to terminate.
pub struct Session {
    pub calculator: Calculator,
    pub should_exit: bool,
}

impl Session {
    pub fn new(calculator: Calculator) -> Self {
        Self {
            calculator,
            should_exit: false,
        }
    }

    /// Format a result with the configured precision.
    pub fn format_result(&self, value: rust_decimal::Decimal) -> String {
        crate::calculation::format_decimal(value, self.calculator.config().precision)
    }
}
