use crate::calculation::Calculation;
use crate::calculator::Calculator;
use crate::error::Result;
use tracing::info;

/// Callback notified by the [`Calculator`] after every new calculation.
///
/// Observers are notified synchronously, in registration order, after the
/// calculation has been appended to the history. An error aborts the
/// notification round and is returned from `perform_operation`.
pub trait HistoryObserver {
    fn update(&self, calculation: &Calculation, calculator: &Calculator) -> Result<()>;
}

/// Writes every calculation to the operational log.
#[derive(Debug, Default)]
pub struct LoggingObserver;

impl HistoryObserver for LoggingObserver {
    fn update(&self, calculation: &Calculation, _calculator: &Calculator) -> Result<()> {
        info!(
            "Calculation performed: {} ({}, {}) = {}",
            calculation.operation(),
            calculation.operand1(),
            calculation.operand2(),
            calculation.result()
        );
        Ok(())
    }
}

/// Persists the history after every calculation when `auto_save` is enabled.
#[derive(Debug, Default)]
pub struct AutoSaveObserver;

impl HistoryObserver for AutoSaveObserver {
    fn update(&self, _calculation: &Calculation, calculator: &Calculator) -> Result<()> {
        if calculator.config().auto_save {
            calculator.save_history()?;
            info!("History auto-saved");
        }
        Ok(())
    }
}
