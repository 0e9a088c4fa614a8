use crate::config::CalculatorConfig;
use crate::error::{CalculatorError, Result};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a user-supplied operand into a normalized decimal.
///
/// Accepts plain (`12.5`) and scientific (`1.25e1`) notation.
pub fn parse_operand(raw: &str, config: &CalculatorConfig) -> Result<Decimal> {
    let trimmed = raw.trim();
    let value = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| CalculatorError::validation(format!("Invalid number format: {raw}")))?;

    if value.abs() > config.max_input_value {
        return Err(CalculatorError::validation(format!(
            "Value exceeds maximum allowed: {}",
            config.max_input_value
        )));
    }
    Ok(value.normalize())
}
