use crate::command::{CommandFactory, ExecutableCommand, LineSource};
use crate::interpreter::Factory;
use crate::operation::OperationFactory;
use crate::session::Session;
use anyhow::{Context, Result};
use argh::{EarlyExit, FromArgs};
use regex::RegexBuilder;
use std::io::Write;

/// Built-in commands known to the REPL at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and operate on
/// the shared [`Session`].
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "undo" or "history".
    fn name() -> &'static str;

    /// One-line summary shown by `help`.
    fn summary() -> &'static str;

    /// Executes the command using provided IO streams and session.
    fn execute(
        self,
        input: &mut dyn LineSource,
        stdout: &mut dyn Write,
        session: &mut Session,
    ) -> Result<()>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(
        self: Box<Self>,
        input: &mut dyn LineSource,
        stdout: &mut dyn Write,
        session: &mut Session,
    ) -> Result<()> {
        T::execute(*self, input, stdout, session)
    }
}

/// Output of `argh` when it stops before building a command (`--help` or
/// bad arguments).
struct InvalidArgs {
    output: String,
    is_error: bool,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(
        self: Box<Self>,
        _input: &mut dyn LineSource,
        stdout: &mut dyn Write,
        _session: &mut Session,
    ) -> Result<()> {
        if self.is_error {
            writeln!(stdout, "Error: {}", self.output.trim_end())?;
        } else {
            writeln!(stdout, "{}", self.output.trim_end())?;
        }
        Ok(())
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(&self, name: &str, args: &[&str]) -> Option<Box<dyn ExecutableCommand>> {
        if name == T::name() {
            Some(match T::from_args(&[name], args) {
                Ok(cmd) => Box::new(cmd),
                Err(EarlyExit { output, status }) => Box::new(InvalidArgs {
                    output,
                    is_error: status.is_err(),
                }),
            })
        } else {
            None
        }
    }
}

/// `(name, summary)` of every builtin, in help order.
pub(crate) fn summaries() -> [(&'static str, &'static str); 8] {
    [
        (History::name(), History::summary()),
        (Clear::name(), Clear::summary()),
        (Undo::name(), Undo::summary()),
        (Redo::name(), Redo::summary()),
        (Save::name(), Save::summary()),
        (Load::name(), Load::summary()),
        (Help::name(), Help::summary()),
        (Exit::name(), Exit::summary()),
    ]
}

#[derive(FromArgs)]
/// List the available commands.
pub struct Help {}

impl BuiltinCommand for Help {
    fn name() -> &'static str {
        "help"
    }

    fn summary() -> &'static str {
        "Show this help message"
    }

    fn execute(
        self,
        _input: &mut dyn LineSource,
        stdout: &mut dyn Write,
        _session: &mut Session,
    ) -> Result<()> {
        writeln!(stdout, "\nAvailable commands:")?;
        for (command, description) in OperationFactory::commands() {
            writeln!(stdout, "  {command} [a] [b] - {description}")?;
        }
        for (name, summary) in summaries() {
            writeln!(stdout, "  {name} - {summary}")?;
        }
        writeln!(stdout, "  (type '<command> --help' for command options)")?;
        Ok(())
    }
}

#[derive(FromArgs)]
/// Show the calculation history, oldest first.
pub struct History {
    #[argh(option, short = 'g')]
    /// only show entries matching this regular expression
    pub grep: Option<String>,

    #[argh(switch, short = 'i')]
    /// ignore case distinctions in the pattern
    pub ignore_case: bool,
}

impl BuiltinCommand for History {
    fn name() -> &'static str {
        "history"
    }

    fn summary() -> &'static str {
        "Show calculation history"
    }

    fn execute(
        self,
        _input: &mut dyn LineSource,
        stdout: &mut dyn Write,
        session: &mut Session,
    ) -> Result<()> {
        let entries = session.calculator.show_history();
        if entries.is_empty() {
            writeln!(stdout, "No calculations in history")?;
            return Ok(());
        }

        let filter = match &self.grep {
            Some(pattern) => Some(
                RegexBuilder::new(pattern)
                    .case_insensitive(self.ignore_case)
                    .build()
                    .with_context(|| format!("Invalid regex pattern: {pattern}"))?,
            ),
            None => None,
        };

        writeln!(stdout, "\nCalculation History:")?;
        for (i, entry) in entries.iter().enumerate() {
            if filter.as_ref().is_none_or(|re| re.is_match(entry)) {
                writeln!(stdout, "{}. {}", i + 1, entry)?;
            }
        }
        Ok(())
    }
}

#[derive(FromArgs)]
/// Clear the calculation history and the undo/redo stacks.
pub struct Clear {}

impl BuiltinCommand for Clear {
    fn name() -> &'static str {
        "clear"
    }

    fn summary() -> &'static str {
        "Clear calculation history"
    }

    fn execute(
        self,
        _input: &mut dyn LineSource,
        stdout: &mut dyn Write,
        session: &mut Session,
    ) -> Result<()> {
        session.calculator.clear_history();
        writeln!(stdout, "History cleared")?;
        Ok(())
    }
}

#[derive(FromArgs)]
/// Undo the last calculation.
pub struct Undo {}

impl BuiltinCommand for Undo {
    fn name() -> &'static str {
        "undo"
    }

    fn summary() -> &'static str {
        "Undo the last calculation"
    }

    fn execute(
        self,
        _input: &mut dyn LineSource,
        stdout: &mut dyn Write,
        session: &mut Session,
    ) -> Result<()> {
        if session.calculator.undo() {
            writeln!(stdout, "Operation undone")?;
        } else {
            writeln!(stdout, "Nothing to undo")?;
        }
        Ok(())
    }
}

#[derive(FromArgs)]
/// Redo the last undone calculation.
pub struct Redo {}

impl BuiltinCommand for Redo {
    fn name() -> &'static str {
        "redo"
    }

    fn summary() -> &'static str {
        "Redo the last undone calculation"
    }

    fn execute(
        self,
        _input: &mut dyn LineSource,
        stdout: &mut dyn Write,
        session: &mut Session,
    ) -> Result<()> {
        if session.calculator.redo() {
            writeln!(stdout, "Operation redone")?;
        } else {
            writeln!(stdout, "Nothing to redo")?;
        }
        Ok(())
    }
}

#[derive(FromArgs)]
/// Save the calculation history to the history file.
pub struct Save {}

impl BuiltinCommand for Save {
    fn name() -> &'static str {
        "save"
    }

    fn summary() -> &'static str {
        "Save calculation history to file"
    }

    fn execute(
        self,
        _input: &mut dyn LineSource,
        stdout: &mut dyn Write,
        session: &mut Session,
    ) -> Result<()> {
        match session.calculator.save_history() {
            Ok(()) => writeln!(stdout, "History saved successfully")?,
            Err(e) => writeln!(stdout, "Error saving history: {e}")?,
        }
        Ok(())
    }
}

#[derive(FromArgs)]
/// Replace the current history with the content of the history file.
pub struct Load {}

impl BuiltinCommand for Load {
    fn name() -> &'static str {
        "load"
    }

    fn summary() -> &'static str {
        "Load calculation history from file"
    }

    fn execute(
        self,
        _input: &mut dyn LineSource,
        stdout: &mut dyn Write,
        session: &mut Session,
    ) -> Result<()> {
        match session.calculator.load_history() {
            Ok(()) => writeln!(stdout, "History loaded successfully")?,
            Err(e) => writeln!(stdout, "Error loading history: {e}")?,
        }
        Ok(())
    }
}

#[derive(FromArgs)]
/// Save the history and leave the calculator.
pub struct Exit {}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn summary() -> &'static str {
        "Exit the calculator"
    }

    fn execute(
        self,
        _input: &mut dyn LineSource,
        stdout: &mut dyn Write,
        session: &mut Session,
    ) -> Result<()> {
        match session.calculator.save_history() {
            Ok(()) => writeln!(stdout, "History saved successfully.")?,
            Err(e) => writeln!(stdout, "Warning: Could not save history: {e}")?,
        }
        writeln!(stdout, "Goodbye!")?;
        session.should_exit = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::Calculator;
    use crate::config::CalculatorConfig;
    use crate::io_adapters::ScriptedInput;
    use std::fs;
    use tempfile::TempDir;

    fn session_in(dir: &TempDir) -> Session {
        let mut config = CalculatorConfig::new(dir.path());
        config.auto_save = false;
        Session::new(Calculator::new(config).unwrap())
    }

    fn run<T: BuiltinCommand>(cmd: T, session: &mut Session) -> String {
        let mut out = Vec::new();
        cmd.execute(&mut ScriptedInput::default(), &mut out, session)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    fn add(session: &mut Session, a: &str, b: &str) {
        session
            .calculator
            .set_operation(OperationFactory::create("add").unwrap());
        session.calculator.perform_operation(a, b).unwrap();
    }

    #[test]
    fn test_history_empty_and_populated() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir);
        let history = || History {
            grep: None,
            ignore_case: false,
        };
        assert_eq!(run(history(), &mut session), "No calculations in history\n");

        add(&mut session, "2", "3");
        add(&mut session, "4", "5");
        assert_eq!(
            run(history(), &mut session),
            "\nCalculation History:\n1. Addition(2, 3) = 5\n2. Addition(4, 5) = 9\n"
        );
    }

    #[test]
    fn test_history_filter_keeps_original_numbering() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir);
        add(&mut session, "2", "3");
        add(&mut session, "4", "5");

        let cmd = History {
            grep: Some(r"= 9$".to_string()),
            ignore_case: false,
        };
        assert_eq!(
            run(cmd, &mut session),
            "\nCalculation History:\n2. Addition(4, 5) = 9\n"
        );

        let cmd = History {
            grep: Some("ADDITION\\(2".to_string()),
            ignore_case: true,
        };
        assert!(run(cmd, &mut session).contains("1. Addition(2, 3) = 5"));
    }

    #[test]
    fn test_history_rejects_bad_pattern() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir);
        add(&mut session, "2", "3");
        let cmd = History {
            grep: Some("(".to_string()),
            ignore_case: false,
        };
        let res = cmd.execute(&mut ScriptedInput::default(), &mut Vec::new(), &mut session);
        assert!(res.is_err());
    }

    #[test]
    fn test_undo_redo_messages() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir);
        assert_eq!(run(Undo {}, &mut session), "Nothing to undo\n");
        assert_eq!(run(Redo {}, &mut session), "Nothing to redo\n");

        add(&mut session, "1", "1");
        assert_eq!(run(Undo {}, &mut session), "Operation undone\n");
        assert_eq!(run(Redo {}, &mut session), "Operation redone\n");
        assert_eq!(session.calculator.history().len(), 1);
    }

    #[test]
    fn test_clear_save_and_load() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir);
        add(&mut session, "2", "3");

        assert_eq!(run(Save {}, &mut session), "History saved successfully\n");
        assert_eq!(run(Clear {}, &mut session), "History cleared\n");
        assert!(session.calculator.history().is_empty());
        assert_eq!(run(Load {}, &mut session), "History loaded successfully\n");
        assert_eq!(session.calculator.history().len(), 1);
    }

    #[test]
    fn test_load_reports_failures() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir);
        fs::write(&session.calculator.config().history_file, "operation\nTeleport\n").unwrap();
        let out = run(Load {}, &mut session);
        assert!(out.starts_with("Error loading history: "), "{out}");
    }

    #[test]
    fn test_exit_saves_and_flags_session() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir);
        assert_eq!(
            run(Exit {}, &mut session),
            "History saved successfully.\nGoodbye!\n"
        );
        assert!(session.should_exit);
        assert!(session.calculator.config().history_file.exists());
    }

    #[test]
    fn test_exit_warns_when_save_fails() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir);
        // occupy the history file path with a directory
        fs::create_dir_all(&session.calculator.config().history_file).unwrap();
        let out = run(Exit {}, &mut session);
        assert!(out.starts_with("Warning: Could not save history: "), "{out}");
        assert!(out.ends_with("Goodbye!\n"));
        assert!(session.should_exit);
    }

    #[test]
    fn test_help_lists_operations_and_builtins() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir);
        let out = run(Help {}, &mut session);
        assert!(out.starts_with("\nAvailable commands:\n"));
        assert!(out.contains("  divide [a] [b] - "));
        assert!(out.contains("  undo - Undo the last calculation"));
        assert!(out.contains("  exit - Exit the calculator"));
    }

    #[test]
    fn test_factory_reports_bad_arguments() {
        let factory = Factory::<Undo>::default();
        assert!(factory.try_create("redo", &[]).is_none());

        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir);
        let cmd = factory.try_create("undo", &["--bogus"]).unwrap();
        let mut out = Vec::new();
        cmd.execute(&mut ScriptedInput::default(), &mut out, &mut session)
            .unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("Error: "));
    }
}
