use crate::arithmetic::ArithmeticFactory;
use crate::calculator::Calculator;
use crate::command::{CommandFactory, Line, LineSource};
use crate::error::CalculatorError;
use crate::io_adapters::EditorInput;
use crate::session::Session;
use anyhow::Result;
use std::io::Write;

const PROMPT: &str = "\nEnter command: ";

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports the builtin commands defined in this crate.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// The calculator REPL.
///
/// The interpreter owns a [`Session`] and a list of [`CommandFactory`] objects
/// that are queried, in order, to create a command from the first word of
/// each input line.
///
/// Example
/// ```
/// use decimal_calculator::{Calculator, CalculatorConfig, Interpreter, ScriptedInput};
/// let dir = std::env::temp_dir().join("interpreter_doc_example");
/// let mut config = CalculatorConfig::new(&dir);
/// config.auto_save = false;
/// let mut repl = Interpreter::with_default_commands(Calculator::new(config).unwrap());
/// let mut out = Vec::new();
/// repl.execute_line("add 2 3", &mut ScriptedInput::default(), &mut out).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), "\nResult: 5\n");
/// ```
pub struct Interpreter {
    session: Session,
    commands: Vec<Box<dyn CommandFactory>>,
}

impl Interpreter {
    /// Create a new interpreter with a custom set of command factories.
    pub fn new(calculator: Calculator, commands: Vec<Box<dyn CommandFactory>>) -> Self {
        Self {
            session: Session::new(calculator),
            commands,
        }
    }

    /// Create an interpreter with the builtins and every arithmetic operation.
    pub fn with_default_commands(calculator: Calculator) -> Self {
        use crate::builtin::*;
        Self::new(
            calculator,
            vec![
                Box::new(Factory::<Help>::default()),
                Box::new(Factory::<History>::default()),
                Box::new(Factory::<Clear>::default()),
                Box::new(Factory::<Undo>::default()),
                Box::new(Factory::<Redo>::default()),
                Box::new(Factory::<Save>::default()),
                Box::new(Factory::<Load>::default()),
                Box::new(Factory::<Exit>::default()),
                Box::new(ArithmeticFactory),
            ],
        )
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn calculator(&self) -> &Calculator {
        &self.session.calculator
    }

    /// Run a single command invocation by name with arguments.
    ///
    /// An unknown name is reported on `stdout`, not returned as an error.
    pub fn run(
        &mut self,
        name: &str,
        args: &[&str],
        input: &mut dyn LineSource,
        stdout: &mut dyn Write,
    ) -> Result<()> {
        for factory in &self.commands {
            if let Some(cmd) = factory.try_create(name, args) {
                return cmd.execute(input, stdout, &mut self.session);
            }
        }
        writeln!(
            stdout,
            "Unknown command: '{name}'. Type 'help' for available commands."
        )?;
        Ok(())
    }

    /// Split a line into command name and arguments and run it.
    ///
    /// The command name is matched case-insensitively; blank lines are ignored.
    pub fn execute_line(
        &mut self,
        line: &str,
        input: &mut dyn LineSource,
        stdout: &mut dyn Write,
    ) -> Result<()> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(());
        };
        let name = name.to_lowercase();
        let args: Vec<&str> = words.collect();
        self.run(&name, &args, input, stdout)
    }

    /// Read-eval-print loop over an arbitrary line source.
    ///
    /// Returns when a command asks to exit or the input ends.
    pub fn run_loop(&mut self, input: &mut dyn LineSource, stdout: &mut dyn Write) -> Result<()> {
        writeln!(stdout, "Calculator started. Type 'help' for commands.")?;

        while !self.session.should_exit {
            match input.read_line(PROMPT)? {
                Line::Text(line) => {
                    if let Err(err) = self.execute_line(&line, input, stdout) {
                        report_error(&err, stdout)?;
                    }
                }
                Line::Interrupted => {
                    writeln!(stdout, "\nOperation cancelled")?;
                }
                Line::Eof => {
                    writeln!(stdout, "\nInput terminated. Exiting...")?;
                    break;
                }
            }
            stdout.flush()?;
        }
        Ok(())
    }

    /// Interactive loop on the terminal.
    pub fn repl(&mut self) -> Result<()> {
        let mut input = EditorInput::new()?;
        self.run_loop(&mut input, &mut std::io::stdout())
    }
}

/// Print a command failure the way the user should see it.
fn report_error(err: &anyhow::Error, stdout: &mut dyn Write) -> Result<()> {
    match err.downcast_ref::<CalculatorError>() {
        Some(calc_err) if calc_err.is_user_error() => writeln!(stdout, "Error: {calc_err}")?,
        _ => {
            tracing::error!("Unexpected error: {err:#}");
            writeln!(stdout, "Unexpected error: {err}")?
        }
    }
    Ok(())
}
