//! Error type shared by every feature container and computation object.

use thiserror::Error;

/// Errors raised while building features or running a computation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A dataset, sequence list or label vector had no entries.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Rows of a numeric dataset did not share one length.
    #[error("Ragged rows: row {row} has {actual} values, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// Two operands disagree on a size that has to match.
    #[error("Dimension mismatch: expected {expected}, actual {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A hyperparameter was out of range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A sequence contained a symbol outside its alphabet.
    #[error("Invalid symbol {symbol:?} at position {position} of sequence {sequence}")]
    InvalidSymbol {
        sequence: usize,
        position: usize,
        symbol: char,
    },

    /// Symbol data from two sources used incompatible alphabets.
    #[error("Alphabet mismatch: {0}")]
    AlphabetMismatch(String),

    /// A computation was evaluated before features were bound.
    #[error("{0} has no features bound. Call init() first.")]
    NotInitialized(&'static str),

    /// A model was applied before it was trained.
    #[error("{0} not trained. Call train() first.")]
    NotTrained(&'static str),

    /// An optional solver backend was compiled out.
    #[error("No support for {0} available.")]
    BackendUnavailable(&'static str),
}

impl Error {
    pub fn empty_input(what: impl Into<String>) -> Self {
        Self::EmptyInput(what.into())
    }

    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::dimension_mismatch(3, 2);
        assert_eq!(err.to_string(), "Dimension mismatch: expected 3, actual 2");

        let err = Error::BackendUnavailable("SVRLight");
        assert_eq!(err.to_string(), "No support for SVRLight available.");

        let err = Error::InvalidSymbol { sequence: 1, position: 4, symbol: 'X' };
        assert_eq!(err.to_string(), "Invalid symbol 'X' at position 4 of sequence 1");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
