use crate::calculation::{CSV_HEADERS, Calculation};
use crate::config::CalculatorConfig;
use crate::error::{CalculatorError, Result};
use crate::input::parse_operand;
use crate::memento::HistorySnapshot;
use crate::observer::HistoryObserver;
use crate::operation::Operation;
use rust_decimal::Decimal;
use std::fs::{self, File};
use std::rc::Rc;
use tracing::{debug, info, warn};

/// The calculator engine.
///
/// Owns the calculation history, the undo/redo stacks of history snapshots,
/// the active [`Operation`] strategy and the registered observers.
///
/// Example
/// ```
/// use decimal_calculator::{Calculator, CalculatorConfig, OperationFactory};
/// let dir = std::env::temp_dir().join("calculator_doc_example");
/// let mut config = CalculatorConfig::new(&dir);
/// config.auto_save = false;
/// let mut calc = Calculator::new(config).unwrap();
/// calc.set_operation(OperationFactory::create("add").unwrap());
/// assert_eq!(calc.perform_operation("2", "3").unwrap().to_string(), "5");
/// assert!(calc.undo());
/// assert!(calc.history().is_empty());
/// ```
pub struct Calculator {
    config: CalculatorConfig,
    history: Vec<Calculation>,
    undo_stack: Vec<HistorySnapshot>,
    redo_stack: Vec<HistorySnapshot>,
    operation_strategy: Option<Box<dyn Operation>>,
    observers: Vec<Rc<dyn HistoryObserver>>,
}

impl Calculator {
    /// Create a calculator and load any previously saved history.
    ///
    /// A history file that cannot be loaded is logged and ignored; the
    /// calculator then starts with an empty history.
    pub fn new(config: CalculatorConfig) -> Result<Self> {
        config.validate()?;
        fs::create_dir_all(&config.history_dir)?;

        let mut calculator = Self {
            config,
            history: Vec::new(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            operation_strategy: None,
            observers: Vec::new(),
        };

        if let Err(err) = calculator.load_history() {
            warn!(error = %err, "Could not load existing history");
        }

        info!("Calculator initialized with configuration");
        Ok(calculator)
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    pub fn history(&self) -> &[Calculation] {
        &self.history
    }

    pub fn undo_stack(&self) -> &[HistorySnapshot] {
        &self.undo_stack
    }

    pub fn redo_stack(&self) -> &[HistorySnapshot] {
        &self.redo_stack
    }

    pub fn add_observer(&mut self, observer: Rc<dyn HistoryObserver>) {
        self.observers.push(observer);
        info!("Added observer");
    }

    /// Unregister an observer previously passed to [`Calculator::add_observer`].
    pub fn remove_observer(&mut self, observer: &Rc<dyn HistoryObserver>) {
        let before = self.observers.len();
        self.observers.retain(|o| !Rc::ptr_eq(o, observer));
        if self.observers.len() != before {
            info!("Removed observer");
        }
    }

    pub fn has_observer(&self, observer: &Rc<dyn HistoryObserver>) -> bool {
        self.observers.iter().any(|o| Rc::ptr_eq(o, observer))
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn notify_observers(&self, calculation: &Calculation) -> Result<()> {
        for observer in &self.observers {
            observer.update(calculation, self)?;
        }
        Ok(())
    }

    pub fn set_operation(&mut self, operation: Box<dyn Operation>) {
        info!("Set operation: {}", operation.name());
        self.operation_strategy = Some(operation);
    }

    pub fn operation_strategy(&self) -> Option<&dyn Operation> {
        self.operation_strategy.as_deref()
    }

    /// Apply the active strategy to two raw operands.
    ///
    /// On success the previous history is pushed onto the undo stack, the
    /// redo stack is cleared, the calculation is recorded and every observer
    /// is notified.
    pub fn perform_operation(&mut self, a: &str, b: &str) -> Result<Decimal> {
        let operation = self
            .operation_strategy
            .as_deref()
            .ok_or_else(|| CalculatorError::operation("No operation set"))?;

        let operand1 = parse_operand(a, &self.config)?;
        let operand2 = parse_operand(b, &self.config)?;
        let result = operation.execute(operand1, operand2)?;
        let calculation = Calculation::new(operation.name(), operand1, operand2, result);

        self.undo_stack.push(HistorySnapshot::capture(&self.history));
        self.redo_stack.clear();
        self.history.push(calculation.clone());
        self.enforce_history_limit();

        self.notify_observers(&calculation)?;
        info!("Performed operation: {calculation}");
        Ok(result)
    }

    fn enforce_history_limit(&mut self) {
        let max = self.config.max_history_size;
        if self.history.len() > max {
            let excess = self.history.len() - max;
            self.history.drain(..excess);
        }
    }

    /// Restore the history as it was before the last calculation.
    ///
    /// Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.undo_stack.pop() else {
            return false;
        };
        self.redo_stack.push(HistorySnapshot::capture(&self.history));
        self.history = snapshot.into_history();
        debug!(len = self.history.len(), "Undo restored history");
        true
    }

    /// Re-apply the last undone calculation.
    ///
    /// Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.redo_stack.pop() else {
            return false;
        };
        self.undo_stack.push(HistorySnapshot::capture(&self.history));
        self.history = snapshot.into_history();
        debug!(len = self.history.len(), "Redo restored history");
        true
    }

    /// Write the history to the configured CSV file.
    ///
    /// An empty history still produces a file holding just the header row.
    pub fn save_history(&self) -> Result<()> {
        let path = &self.config.history_file;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut writer = csv::Writer::from_writer(File::create(path)?);
        if self.history.is_empty() {
            writer
                .write_record(CSV_HEADERS)
                .map_err(|e| CalculatorError::from_csv("save", e))?;
        }
        for calculation in &self.history {
            writer
                .serialize(calculation)
                .map_err(|e| CalculatorError::from_csv("save", e))?;
        }
        writer.flush()?;

        info!(
            "History saved successfully to {} ({} entries)",
            path.display(),
            self.history.len()
        );
        Ok(())
    }

    /// Replace the history with the content of the configured CSV file.
    ///
    /// A missing file yields an empty history. The undo and redo stacks are
    /// left as they are.
    pub fn load_history(&mut self) -> Result<()> {
        let path = &self.config.history_file;
        if !path.exists() {
            info!("No history file found - starting with empty history");
            self.history.clear();
            return Ok(());
        }

        let mut reader = csv::Reader::from_reader(File::open(path)?);
        let headers = reader
            .headers()
            .map_err(|e| CalculatorError::from_csv("load", e))?
            .clone();

        let mut loaded = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| CalculatorError::from_csv("load", e))?;
            loaded.push(Calculation::from_record(&record, &headers)?);
        }

        info!(
            "Loaded {} calculations from history file {}",
            loaded.len(),
            path.display()
        );
        self.history = loaded;
        self.enforce_history_limit();
        Ok(())
    }

    /// Empty the history and both undo/redo stacks.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.undo_stack.clear();
        self.redo_stack.clear();
        info!("History cleared");
    }

    /// The history rendered one calculation per entry, oldest first.
    pub fn show_history(&self) -> Vec<String> {
        self.history.iter().map(ToString::to_string).collect()
    }
}
