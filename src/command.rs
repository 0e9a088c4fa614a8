use crate::session::Session;
use anyhow::Result;
use std::io::Write;

/// One answer from an interactive input source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// A line of text, without the trailing newline.
    Text(String),
    /// The user pressed Ctrl-C.
    Interrupted,
    /// Input is exhausted (Ctrl-D or end of script).
    Eof,
}

/// Source of lines for the REPL and for commands that prompt for more input.
///
/// Implemented by the terminal line editor and by scripted input in tests.
pub trait LineSource {
    /// Show `prompt` and read one line.
    fn read_line(&mut self, prompt: &str) -> Result<Line>;
}

/// Object-safe trait for any command that can be executed by the REPL.
///
/// This is implemented by built-ins via a blanket impl and by arithmetic commands.
pub trait ExecutableCommand {
    /// Executes the command.
    fn execute(
        self: Box<Self>,
        input: &mut dyn LineSource,
        stdout: &mut dyn Write,
        session: &mut Session,
    ) -> Result<()>;
}

/// Factory that tries to create a command from a name and its arguments.
///
/// Returns `None` when the factory doesn't recognize the `name`.
pub trait CommandFactory {
    /// Attempt to create a command instance for the provided name and arguments.
    fn try_create(&self, name: &str, args: &[&str]) -> Option<Box<dyn ExecutableCommand>>;
}
