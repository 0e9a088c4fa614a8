use thiserror::Error;

/// Errors produced by the calculator core.
///
/// The REPL uses the kind to pick how an error is reported: validation and
/// operation errors are expected user mistakes, everything else is shown as
/// unexpected.
#[derive(Error, Debug)]
pub enum CalculatorError {
    /// Bad input or a domain violation (e.g. a zero divisor).
    #[error("{0}")]
    Validation(String),

    /// No strategy selected, malformed persisted data or arithmetic overflow.
    #[error("{0}")]
    Operation(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CalculatorError>;

impl CalculatorError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        CalculatorError::Validation(message.into())
    }

    pub(crate) fn operation(message: impl Into<String>) -> Self {
        CalculatorError::Operation(message.into())
    }

    /// Split a `csv` failure into a disk error or a data error.
    ///
    /// `action` is the verb used in the message, e.g. "save" or "load".
    pub(crate) fn from_csv(action: &str, err: csv::Error) -> Self {
        if !err.is_io_error() {
            return CalculatorError::Operation(format!("Failed to {action} history: {err}"));
        }
        match err.into_kind() {
            csv::ErrorKind::Io(io) => CalculatorError::Io(io),
            other => CalculatorError::Operation(format!("Failed to {action} history: {other:?}")),
        }
    }

    /// True for the kinds a user can fix by changing their input.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            CalculatorError::Validation(_) | CalculatorError::Operation(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_validation_message_is_shown_verbatim() {
        let err = CalculatorError::validation("Invalid number format: two");
        assert_eq!(err.to_string(), "Invalid number format: two");
        assert!(err.is_user_error());
    }

    #[test]
    fn test_io_error_is_not_a_user_error() {
        let err: CalculatorError = io::Error::new(io::ErrorKind::Other, "disk full").into();
        assert_eq!(err.to_string(), "disk full");
        assert!(!err.is_user_error());
    }

    #[test]
    fn test_csv_io_failure_maps_to_io_kind() {
        let csv_err = csv::Error::from(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        let err = CalculatorError::from_csv("save", csv_err);
        assert!(matches!(err, CalculatorError::Io(_)));
    }
}
