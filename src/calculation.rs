use crate::error::{CalculatorError, Result};
use crate::operation::OperationFactory;
use chrono::{Local, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// CSV header of the history file, in column order.
pub const CSV_HEADERS: [&str; 5] = ["operation", "operand1", "operand2", "result", "timestamp"];

/// Immutable record of one performed operation.
///
/// Field order matches [`CSV_HEADERS`]; decimals are persisted as their
/// exact string form so a save/load cycle keeps every digit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calculation {
    operation: String,
    #[serde(with = "rust_decimal::serde::str")]
    operand1: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    operand2: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    result: Decimal,
    timestamp: NaiveDateTime,
}

impl Calculation {
    /// Record a calculation performed now.
    pub fn new(
        operation: impl Into<String>,
        operand1: Decimal,
        operand2: Decimal,
        result: Decimal,
    ) -> Self {
        Self::with_timestamp(operation, operand1, operand2, result, Local::now().naive_local())
    }

    pub fn with_timestamp(
        operation: impl Into<String>,
        operand1: Decimal,
        operand2: Decimal,
        result: Decimal,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            operation: operation.into(),
            operand1,
            operand2,
            result,
            timestamp,
        }
    }

    /// Rebuild a calculation from a history file row.
    ///
    /// Rows naming an unknown operation are rejected. For known operations
    /// the result is recomputed, and a disagreement with the stored value is
    /// logged; the stored value is kept.
    pub fn from_record(record: &csv::StringRecord, headers: &csv::StringRecord) -> Result<Self> {
        let calculation: Calculation = record
            .deserialize(Some(headers))
            .map_err(|e| CalculatorError::operation(format!("Failed to load history: {e}")))?;

        let operation = OperationFactory::from_display_name(&calculation.operation).ok_or_else(|| {
            CalculatorError::operation(format!(
                "Failed to load history: unknown operation '{}'",
                calculation.operation
            ))
        })?;

        match operation.execute(calculation.operand1, calculation.operand2) {
            Ok(expected) if expected != calculation.result => warn!(
                %calculation,
                %expected,
                "Loaded calculation result differs from recomputed value"
            ),
            Ok(_) => {}
            Err(err) => warn!(%calculation, error = %err, "Loaded calculation cannot be recomputed"),
        }
        Ok(calculation)
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn operand1(&self) -> Decimal {
        self.operand1
    }

    pub fn operand2(&self) -> Decimal {
        self.operand2
    }

    pub fn result(&self) -> Decimal {
        self.result
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// The result rounded to `precision` decimal places, without trailing zeros.
    pub fn format_result(&self, precision: u32) -> String {
        format_decimal(self.result, precision)
    }
}

impl fmt::Display for Calculation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}, {}) = {}",
            self.operation, self.operand1, self.operand2, self.result
        )
    }
}

/// Round to `precision` places and strip trailing zeros.
pub fn format_decimal(value: Decimal, precision: u32) -> String {
    value.round_dp(precision).normalize().to_string()
}
