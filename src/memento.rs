use crate::calculation::Calculation;
use chrono::{Local, NaiveDateTime};

/// Copy of the calculator history at a point in time, kept on the undo and
/// redo stacks.
#[derive(Debug, Clone)]
pub struct HistorySnapshot {
    history: Vec<Calculation>,
    timestamp: NaiveDateTime,
}

impl HistorySnapshot {
    pub fn capture(history: &[Calculation]) -> Self {
        Self {
            history: history.to_vec(),
            timestamp: Local::now().naive_local(),
        }
    }

    pub fn history(&self) -> &[Calculation] {
        &self.history
    }

    /// When the snapshot was taken.
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn into_history(self) -> Vec<Calculation> {
        self.history
    }
}
