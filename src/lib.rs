//! An interactive decimal calculator with undo/redo and persisted history.
//!
//! The core is the [`Calculator`] engine: it applies the selected
//! [`Operation`] strategy to two operands, records each result as an
//! immutable [`Calculation`], keeps undo/redo stacks of history snapshots,
//! notifies registered [`HistoryObserver`]s and saves/loads the history as a
//! CSV file.
//!
//! Around it sit the pieces the `calculator` binary is made of: environment
//! driven [`CalculatorConfig`], file logging via [`init_logging`], and the
//! [`Interpreter`] REPL, whose commands are pluggable through the public
//! [`command`] traits.

mod arithmetic;
mod builtin;
pub mod calculation;
pub mod calculator;
pub mod command;
pub mod config;
pub mod error;
pub mod input;
mod interpreter;
mod io_adapters;
pub mod logging;
pub mod memento;
pub mod observer;
pub mod operation;
pub mod session;

pub use calculation::Calculation;
pub use calculator::Calculator;
pub use config::CalculatorConfig;
pub use error::{CalculatorError, Result};
pub use interpreter::Interpreter;
pub use io_adapters::{EditorInput, ScriptedInput};
pub use logging::init_logging;
pub use memento::HistorySnapshot;
pub use observer::{AutoSaveObserver, HistoryObserver, LoggingObserver};
pub use operation::{Operation, OperationFactory};
