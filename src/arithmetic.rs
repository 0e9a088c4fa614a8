use crate::command::{CommandFactory, ExecutableCommand, Line, LineSource};
use crate::operation::{Operation, OperationFactory};
use crate::session::Session;
use anyhow::{Result, bail};
use std::io::Write;

/// Word that aborts an operand prompt.
const CANCEL: &str = "cancel";

/// Resolves operation command names (`add`, `divide`, ...) to runnable commands.
#[derive(Default)]
pub(crate) struct ArithmeticFactory;

impl CommandFactory for ArithmeticFactory {
    fn try_create(&self, name: &str, args: &[&str]) -> Option<Box<dyn ExecutableCommand>> {
        let operation = OperationFactory::create(name)?;
        Some(Box::new(ArithmeticCommand {
            operation,
            operands: args.iter().map(|s| s.to_string()).collect(),
        }))
    }
}

/// Runs one operation on the calculator.
///
/// Operands may be given inline (`add 2 3`); missing ones are prompted for.
/// Operands are kept as raw strings so the calculator reports bad numbers.
pub(crate) struct ArithmeticCommand {
    operation: Box<dyn Operation>,
    operands: Vec<String>,
}

enum Prompted {
    Value(String),
    Cancelled,
    Terminated,
}

fn prompt_operand(input: &mut dyn LineSource, prompt: &str) -> Result<Prompted> {
    Ok(match input.read_line(prompt)? {
        Line::Text(text) if text.trim().eq_ignore_ascii_case(CANCEL) => Prompted::Cancelled,
        Line::Text(text) => Prompted::Value(text),
        Line::Interrupted => Prompted::Cancelled,
        Line::Eof => Prompted::Terminated,
    })
}

impl ExecutableCommand for ArithmeticCommand {
    fn execute(
        self: Box<Self>,
        input: &mut dyn LineSource,
        stdout: &mut dyn Write,
        session: &mut Session,
    ) -> Result<()> {
        let ArithmeticCommand {
            operation,
            mut operands,
        } = *self;

        if operands.len() > 2 {
            bail!(
                "{} takes at most two operands, got {}",
                operation.name(),
                operands.len()
            );
        }

        if operands.len() < 2 {
            writeln!(stdout, "\nEnter numbers (or '{CANCEL}' to abort):")?;
            for prompt in ["First number: ", "Second number: "]
                .into_iter()
                .skip(operands.len())
            {
                match prompt_operand(input, prompt)? {
                    Prompted::Value(value) => operands.push(value),
                    Prompted::Cancelled => {
                        writeln!(stdout, "Operation cancelled")?;
                        return Ok(());
                    }
                    Prompted::Terminated => {
                        writeln!(stdout, "\nInput terminated. Exiting...")?;
                        session.should_exit = true;
                        return Ok(());
                    }
                }
            }
        }

        session.calculator.set_operation(operation);
        let result = session
            .calculator
            .perform_operation(&operands[0], &operands[1])?;
        writeln!(stdout, "\nResult: {}", session.format_result(result))?;
        Ok(())
    }
}
