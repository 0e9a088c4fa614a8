//! Arithmetic strategies selectable by the calculator.
//!
//! Every operation is a small unit struct implementing [`Operation`]. The
//! [`OperationFactory`] maps REPL command names (`add`, `divide`, ...) and the
//! display names stored in the history file (`Addition`, `Division`, ...) back
//! to boxed instances.

use crate::error::{CalculatorError, Result};
use rust_decimal::prelude::*;

/// Object-safe arithmetic strategy over two decimal operands.
pub trait Operation {
    /// Display name, e.g. "Addition". This is what gets persisted.
    fn name(&self) -> &'static str;

    /// Check domain constraints before computing.
    ///
    /// The default accepts every pair of operands.
    fn validate(&self, _a: Decimal, _b: Decimal) -> Result<()> {
        Ok(())
    }

    /// Compute the result. Callers should go through [`Operation::execute`].
    fn compute(&self, a: Decimal, b: Decimal) -> Result<Decimal>;

    /// Validate the operands and compute the result.
    fn execute(&self, a: Decimal, b: Decimal) -> Result<Decimal> {
        self.validate(a, b)?;
        self.compute(a, b)
    }
}

fn overflow(name: &str, value: Option<Decimal>) -> Result<Decimal> {
    value.ok_or_else(|| CalculatorError::operation(format!("{name} result is out of range")))
}

fn reject_zero_divisor(b: Decimal) -> Result<()> {
    if b.is_zero() {
        return Err(CalculatorError::validation("Division by zero is not allowed"));
    }
    Ok(())
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Addition;

impl Operation for Addition {
    fn name(&self) -> &'static str {
        "Addition"
    }

    fn compute(&self, a: Decimal, b: Decimal) -> Result<Decimal> {
        overflow(self.name(), a.checked_add(b))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Subtraction;

impl Operation for Subtraction {
    fn name(&self) -> &'static str {
        "Subtraction"
    }

    fn compute(&self, a: Decimal, b: Decimal) -> Result<Decimal> {
        overflow(self.name(), a.checked_sub(b))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Multiplication;

impl Operation for Multiplication {
    fn name(&self) -> &'static str {
        "Multiplication"
    }

    fn compute(&self, a: Decimal, b: Decimal) -> Result<Decimal> {
        overflow(self.name(), a.checked_mul(b))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Division;

impl Operation for Division {
    fn name(&self) -> &'static str {
        "Division"
    }

    fn validate(&self, _a: Decimal, b: Decimal) -> Result<()> {
        reject_zero_divisor(b)
    }

    fn compute(&self, a: Decimal, b: Decimal) -> Result<Decimal> {
        overflow(self.name(), a.checked_div(b))
    }
}

/// `a` raised to a non-negative exponent `b`.
///
/// Integral exponents are computed exactly; fractional ones go through
/// `powd` (`ln`/`exp`), are subject to rounding, and fail when the
/// intermediate or final value leaves `powd`'s range, including results
/// too small to represent. A negative base only accepts integral exponents.
#[derive(Debug, Default, Clone, Copy)]
pub struct Power;

impl Operation for Power {
    fn name(&self) -> &'static str {
        "Power"
    }

    fn validate(&self, a: Decimal, b: Decimal) -> Result<()> {
        if b.is_sign_negative() && !b.is_zero() {
            return Err(CalculatorError::validation("Negative exponents not supported"));
        }
        if a.is_sign_negative() && !a.is_zero() && !b.fract().is_zero() {
            return Err(CalculatorError::validation(
                "Cannot raise negative number to fractional power",
            ));
        }
        Ok(())
    }

    fn compute(&self, a: Decimal, b: Decimal) -> Result<Decimal> {
        match b.fract().is_zero().then(|| b.to_u64()).flatten() {
            Some(exponent) => overflow(self.name(), a.checked_powu(exponent)),
            None => a.checked_powd(b).ok_or_else(|| {
                CalculatorError::operation(
                    "Power result is outside the range supported for fractional exponents",
                )
            }),
        }
    }
}

/// The `b`-th root of `a`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Root;

impl Operation for Root {
    fn name(&self) -> &'static str {
        "Root"
    }

    fn validate(&self, a: Decimal, b: Decimal) -> Result<()> {
        if a.is_sign_negative() && !a.is_zero() {
            return Err(CalculatorError::validation(
                "Cannot calculate root of negative number",
            ));
        }
        if b.is_zero() {
            return Err(CalculatorError::validation("Zero root is undefined"));
        }
        // 0^(1/b) with b < 0 is 1 / 0
        if a.is_zero() && b.is_sign_negative() {
            return Err(CalculatorError::validation("Division by zero is not allowed"));
        }
        Ok(())
    }

    fn compute(&self, a: Decimal, b: Decimal) -> Result<Decimal> {
        if a.is_zero() {
            return Ok(Decimal::ZERO);
        }
        let value = if b == Decimal::TWO {
            a.sqrt()
        } else {
            Decimal::ONE.checked_div(b).and_then(|exponent| a.checked_powd(exponent))
        };
        overflow(self.name(), value)
    }
}

/// Remainder of `a / b`, carrying the sign of `a`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Modulus;

impl Operation for Modulus {
    fn name(&self) -> &'static str {
        "Modulus"
    }

    fn validate(&self, _a: Decimal, b: Decimal) -> Result<()> {
        reject_zero_divisor(b)
    }

    fn compute(&self, a: Decimal, b: Decimal) -> Result<Decimal> {
        overflow(self.name(), a.checked_rem(b))
    }
}

/// `a / b` truncated towards zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct IntegerDivision;

impl Operation for IntegerDivision {
    fn name(&self) -> &'static str {
        "IntegerDivision"
    }

    fn validate(&self, _a: Decimal, b: Decimal) -> Result<()> {
        reject_zero_divisor(b)
    }

    fn compute(&self, a: Decimal, b: Decimal) -> Result<Decimal> {
        overflow(self.name(), a.checked_div(b).map(|q| q.trunc()))
    }
}

/// `a` expressed as a percentage of `b`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Percentage;

impl Operation for Percentage {
    fn name(&self) -> &'static str {
        "Percentage"
    }

    fn validate(&self, _a: Decimal, b: Decimal) -> Result<()> {
        reject_zero_divisor(b)
    }

    fn compute(&self, a: Decimal, b: Decimal) -> Result<Decimal> {
        let value = a
            .checked_div(b)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));
        overflow(self.name(), value)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AbsoluteDifference;

impl Operation for AbsoluteDifference {
    fn name(&self) -> &'static str {
        "AbsoluteDifference"
    }

    fn compute(&self, a: Decimal, b: Decimal) -> Result<Decimal> {
        overflow(self.name(), a.checked_sub(b).map(|d| d.abs()))
    }
}

struct Entry {
    command: &'static str,
    description: &'static str,
    create: fn() -> Box<dyn Operation>,
}

fn boxed<T: Operation + Default + 'static>() -> Box<dyn Operation> {
    Box::new(T::default())
}

const OPERATIONS: &[Entry] = &[
    Entry {
        command: "add",
        description: "add two numbers",
        create: boxed::<Addition>,
    },
    Entry {
        command: "subtract",
        description: "subtract the second number from the first",
        create: boxed::<Subtraction>,
    },
    Entry {
        command: "multiply",
        description: "multiply two numbers",
        create: boxed::<Multiplication>,
    },
    Entry {
        command: "divide",
        description: "divide the first number by the second",
        create: boxed::<Division>,
    },
    Entry {
        command: "power",
        description: "raise the first number to the power of the second",
        create: boxed::<Power>,
    },
    Entry {
        command: "root",
        description: "take the n-th root of the first number",
        create: boxed::<Root>,
    },
    Entry {
        command: "modulus",
        description: "remainder of dividing the first number by the second",
        create: boxed::<Modulus>,
    },
    Entry {
        command: "int_divide",
        description: "divide and drop the fractional part",
        create: boxed::<IntegerDivision>,
    },
    Entry {
        command: "percent",
        description: "first number as a percentage of the second",
        create: boxed::<Percentage>,
    },
    Entry {
        command: "abs_diff",
        description: "absolute difference between two numbers",
        create: boxed::<AbsoluteDifference>,
    },
];

/// Resolves operation names to strategy instances.
pub struct OperationFactory;

impl OperationFactory {
    /// Create the operation bound to a REPL command name (case-insensitive).
    pub fn create(command: &str) -> Option<Box<dyn Operation>> {
        OPERATIONS
            .iter()
            .find(|entry| entry.command.eq_ignore_ascii_case(command))
            .map(|entry| (entry.create)())
    }

    /// Create the operation whose [`Operation::name`] is `name`.
    pub fn from_display_name(name: &str) -> Option<Box<dyn Operation>> {
        OPERATIONS
            .iter()
            .map(|entry| (entry.create)())
            .find(|operation| operation.name() == name)
    }

    /// `(command, description)` pairs in help order.
    pub fn commands() -> impl Iterator<Item = (&'static str, &'static str)> {
        OPERATIONS
            .iter()
            .map(|entry| (entry.command, entry.description))
    }
}
