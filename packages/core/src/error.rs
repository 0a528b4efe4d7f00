//! Error types: the grammar-level [`ParseError`] and the uniform
//! [`TransferError`] envelope every import/export failure is reported as.

use std::fmt;

/// Errors from the instruction grammar and the escape-aware splitter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The string ended while still inside an escape sequence.
    #[error("unterminated escape sequence in '{input}'")]
    UnterminatedEscape { input: String },

    /// The naming path is empty or a component has more than two
    /// `.`-delimited sub-fields.
    #[error("invalid name '{path}'")]
    InvalidName { path: String },

    /// Trailing content after the naming path was not introduced by `@`.
    #[error("was expecting '@' after the path in the naming directory")]
    ExpectedAt,

    /// `@` was present but nothing non-whitespace followed it.
    #[error("was expecting a directory address after the '@'")]
    MissingAddress,

    /// No registered scheme prefix matched the instructions.
    #[error("no recognized scheme prefix")]
    UnrecognizedScheme,
}

/// Which half of the engine an error was raised from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Import,
    Export,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Import => write!(f, "import"),
            Operation::Export => write!(f, "export"),
        }
    }
}

/// Failure taxonomy carried inside the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Unrecognized scheme, malformed naming path, missing `@`
    /// continuation, missing `IOR` placeholder.
    InvalidInstructions,
    /// Export of an absent handle, or import producing an absent result.
    NilHandle,
    /// Directory RPC, filesystem I/O, process spawn or non-zero exit,
    /// codec failure.
    Backend,
    /// Dynamic strategy resolution failed.
    LoadFailed,
    /// Server-publish scheme under an inactive or unknown backend family.
    UnsupportedBackend,
}

/// The uniform failure for every import/export error.
///
/// Carries the operation, the original instruction string verbatim, and a
/// human-readable cause. A cause may embed a previously wrapped envelope's
/// description as free text; the chain is deliberately flattened so the
/// external contract stays one line per failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{operation} failed for instructions '{instructions}': {cause}")]
pub struct TransferError {
    pub operation: Operation,
    pub kind: FailureKind,
    pub instructions: String,
    pub cause: String,
}

impl TransferError {
    pub fn new(
        operation: Operation,
        kind: FailureKind,
        instructions: &str,
        cause: impl Into<String>,
    ) -> Self {
        TransferError {
            operation,
            kind,
            instructions: instructions.to_string(),
            cause: cause.into(),
        }
    }

    /// The failure category this error belongs to.
    pub fn kind(&self) -> FailureKind {
        self.kind
    }
}
