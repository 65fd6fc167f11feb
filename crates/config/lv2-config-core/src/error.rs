//! Error types for loading and evaluating host configurations

use crate::value::ValueKind;

/// Failure raised by a function from the registry.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum FunctionError {
    /// Wrong number of arguments; checked before any coercion happens
    #[error("{function}() expects {expected} argument(s), got {actual}")]
    Arity {
        function: String,
        expected: usize,
        actual: usize,
    },

    /// An argument could not be coerced to a number
    #[error("{function}() argument {position} is {kind}, expected a number")]
    Coercion {
        function: String,
        position: usize,
        kind: ValueKind,
    },

    /// Domain or range precondition violated
    #[error("{function}(): {reason}")]
    Range { function: String, reason: String },

    /// Free-form failure from a host-provided function
    #[error("{function}() failed: {message}")]
    Failed { function: String, message: String },
}

impl FunctionError {
    pub fn range(function: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Range {
            function: function.into(),
            reason: reason.into(),
        }
    }

    pub fn failed(function: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            function: function.into(),
            message: message.into(),
        }
    }
}

/// Failure while resolving a single parameter text.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ExprError {
    /// Text is neither a float literal nor a valid expression
    #[error("cannot parse expression '{text}': {reason}")]
    Syntax { text: String, reason: String },

    #[error("unknown variable '{name}'")]
    UnknownVariable { name: String },

    #[error("unknown function '{name}'")]
    UnknownFunction { name: String },

    #[error(transparent)]
    Function(#[from] FunctionError),

    /// Operand of an arithmetic operator is not numeric
    #[error("operand of '{op}' is {kind}, expected a number")]
    Operand { op: &'static str, kind: ValueKind },

    /// Expression evaluated to something that is not a number
    #[error("expression result is {kind}, expected a number")]
    Result { kind: ValueKind },
}

/// Coarse classification of every failure the engine reports.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Document,
    Syntax,
    Evaluation,
    Arity,
    Coercion,
    Range,
}

impl FunctionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Arity { .. } => ErrorKind::Arity,
            Self::Coercion { .. } => ErrorKind::Coercion,
            Self::Range { .. } => ErrorKind::Range,
            Self::Failed { .. } => ErrorKind::Evaluation,
        }
    }
}

impl ExprError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Syntax { .. } => ErrorKind::Syntax,
            Self::UnknownVariable { .. } | Self::UnknownFunction { .. } => ErrorKind::Evaluation,
            Self::Function(inner) => inner.kind(),
            Self::Operand { .. } | Self::Result { .. } => ErrorKind::Coercion,
        }
    }
}

/// Top-level error returned by [`HostConfig`](crate::HostConfig) operations.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    /// Source document could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Source document could not be parsed or produced
    #[error("malformed config document: {0}")]
    Document(#[from] serde_yaml::Error),

    /// A parameter failed to resolve; the evaluation pass was rolled back
    #[error("plugin '{plugin}' parameter '{parameter}' = '{text}': {source}")]
    Parameter {
        plugin: String,
        parameter: String,
        text: String,
        #[source]
        source: ExprError,
    },
}

impl ConfigError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } | Self::Document(_) => ErrorKind::Document,
            Self::Parameter { source, .. } => source.kind(),
        }
    }

    /// Underlying expression failure, when the error came from evaluation.
    pub fn expr_error(&self) -> Option<&ExprError> {
        match self {
            Self::Parameter { source, .. } => Some(source),
            _ => None,
        }
    }
}
