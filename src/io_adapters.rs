use crate::command::{Line, LineSource};
use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::collections::VecDeque;

/// Terminal input backed by `rustyline`, with in-memory line history.
pub struct EditorInput {
    editor: DefaultEditor,
}

impl EditorInput {
    pub fn new() -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineSource for EditorInput {
    fn read_line(&mut self, prompt: &str) -> Result<Line> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(line.as_str())?;
                }
                Ok(Line::Text(line))
            }
            Err(ReadlineError::Interrupted) => Ok(Line::Interrupted),
            Err(ReadlineError::Eof) => Ok(Line::Eof),
            Err(err) => Err(err.into()),
        }
    }
}

/// Memory-backed input replaying a fixed list of lines.
///
/// Reports [`Line::Eof`] once the script is exhausted. Prompts are recorded
/// so callers can inspect what would have been shown.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    lines: VecDeque<Line>,
    prompts: Vec<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(|s| Line::Text(s.into())).collect(),
            prompts: Vec::new(),
        }
    }

    /// Queue a Ctrl-C after the lines already scripted.
    pub fn push_interrupt(&mut self) {
        self.lines.push_back(Line::Interrupted);
    }

    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push_back(Line::Text(line.into()));
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl LineSource for ScriptedInput {
    fn read_line(&mut self, prompt: &str) -> Result<Line> {
        self.prompts.push(prompt.to_string());
        Ok(self.lines.pop_front().unwrap_or(Line::Eof))
    }
}
