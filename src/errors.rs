//! sandlisp error handling.
//!
//! Every failure the core can raise is a variant of [`EvalError`]. Variants are
//! distinct so hosts can match on them, and each carries a stable diagnostic
//! code of the form `sandlisp::<phase>::<kind>` for `miette` reporting.
//! Reader failures are [`SyntaxError`]s, which carry the offending source text
//! and a labelled span.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::ast::Value;

/// Result of evaluating a form or applying a callable.
pub type EvalResult = Result<Value, EvalError>;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Unified error type for evaluation failures.
#[derive(Debug, Error, Diagnostic)]
pub enum EvalError {
    #[error("incorrect arity for `{callee}`: expected {expected}, got {actual}")]
    #[diagnostic(code(sandlisp::eval::arity_mismatch))]
    Arity {
        callee: String,
        expected: String,
        actual: usize,
    },

    #[error("type error in `{callee}`: expected {expected}, got {actual}")]
    #[diagnostic(code(sandlisp::eval::type_mismatch))]
    TypeMismatch {
        callee: String,
        expected: String,
        actual: String,
    },

    #[error("index {index} is out of range in `{callee}` (length {length})")]
    #[diagnostic(code(sandlisp::eval::index_out_of_range))]
    IndexOutOfRange {
        callee: String,
        index: String,
        length: usize,
    },

    #[error("`{callee}` cannot take an element of an empty list")]
    #[diagnostic(code(sandlisp::eval::empty_structure))]
    EmptyStructure { callee: String },

    #[error("cannot import `{name}`")]
    #[diagnostic(
        code(sandlisp::import::unresolved),
        help("imports must name a registered host function, or a host type written as <Type>")
    )]
    UnresolvedImport {
        name: String,
        #[source]
        source: Box<EvalError>,
    },

    #[error("unknown host {kind} `{name}`")]
    #[diagnostic(code(sandlisp::host::unknown_identifier))]
    UnknownIdentifier { kind: &'static str, name: String },

    #[error("division by zero in `{callee}`")]
    #[diagnostic(code(sandlisp::eval::division_by_zero))]
    DivisionByZero { callee: String },

    #[error("recursion limit of {limit} nested applications exceeded")]
    #[diagnostic(
        code(sandlisp::eval::recursion_limit),
        help("raise `max_depth` in the evaluation config if this program is expected to nest deeply")
    )]
    RecursionLimit { limit: usize },

    #[error("evaluation budget of {limit} steps exhausted")]
    #[diagnostic(code(sandlisp::eval::budget_exceeded))]
    BudgetExceeded { limit: u64 },

    #[error("host function `{name}` failed: {message}")]
    #[diagnostic(code(sandlisp::host::call_failed))]
    Host { name: String, message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] SyntaxError),
}

/// A reader failure pointing into the source text that produced it.
#[derive(Debug, Error, Diagnostic)]
#[error("syntax error: {message}")]
#[diagnostic(code(sandlisp::read::syntax))]
pub struct SyntaxError {
    pub message: String,
    #[source_code]
    pub source_code: NamedSource<String>,
    #[label("here")]
    pub span: SourceSpan,
}

/// Type-safe classification of [`EvalError`] variants, for assertions and
/// host-side dispatch that should not depend on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Arity,
    TypeMismatch,
    IndexOutOfRange,
    EmptyStructure,
    UnresolvedImport,
    UnknownIdentifier,
    DivisionByZero,
    RecursionLimit,
    BudgetExceeded,
    Host,
    Syntax,
}

// ============================================================================
// CONSTRUCTION HELPERS
// ============================================================================

impl EvalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EvalError::Arity { .. } => ErrorKind::Arity,
            EvalError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            EvalError::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            EvalError::EmptyStructure { .. } => ErrorKind::EmptyStructure,
            EvalError::UnresolvedImport { .. } => ErrorKind::UnresolvedImport,
            EvalError::UnknownIdentifier { .. } => ErrorKind::UnknownIdentifier,
            EvalError::DivisionByZero { .. } => ErrorKind::DivisionByZero,
            EvalError::RecursionLimit { .. } => ErrorKind::RecursionLimit,
            EvalError::BudgetExceeded { .. } => ErrorKind::BudgetExceeded,
            EvalError::Host { .. } => ErrorKind::Host,
            EvalError::Syntax(_) => ErrorKind::Syntax,
        }
    }

    pub fn arity(callee: &str, expected: impl ToString, actual: usize) -> Self {
        EvalError::Arity {
            callee: callee.into(),
            expected: expected.to_string(),
            actual,
        }
    }

    /// Builds a type error describing the value that was actually found.
    pub fn type_mismatch(callee: &str, expected: &str, found: &Value) -> Self {
        EvalError::TypeMismatch {
            callee: callee.into(),
            expected: expected.into(),
            actual: found.type_name().into(),
        }
    }

    pub fn index_out_of_range(callee: &str, index: impl ToString, length: usize) -> Self {
        EvalError::IndexOutOfRange {
            callee: callee.into(),
            index: index.to_string(),
            length,
        }
    }

    pub fn host(name: &str, message: impl Into<String>) -> Self {
        EvalError::Host {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, name: &str, source: &str, span: (usize, usize)) -> Self {
        let (start, end) = span;
        SyntaxError {
            message: message.into(),
            source_code: NamedSource::new(name, source.to_string()),
            span: (start, end.saturating_sub(start)).into(),
        }
    }
}

/// Renders an error with full `miette` diagnostics, source snippet included
/// for syntax errors.
pub fn render(error: EvalError) -> String {
    let report = miette::Report::new(error);
    format!("{report:?}")
}
