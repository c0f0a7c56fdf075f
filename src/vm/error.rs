//! Match-time error contracts.

use std::fmt;

/// Stable match error categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchErrorKind {
    /// The backtrack/call stack exceeded its configured depth limit.
    StackOverflow,
    /// The program is structurally invalid at runtime.
    InvalidProgram,
    /// A backref names a capture that never matched.
    UnknownBackref(String),
    /// An `Err` instruction aborted the match.
    Aborted(String),
}

impl fmt::Display for MatchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StackOverflow => write!(f, "stack overflow"),
            Self::InvalidProgram => write!(f, "invalid program"),
            Self::UnknownBackref(name) => write!(f, "unknown backref: {name}"),
            Self::Aborted(message) => write!(f, "aborted: {message}"),
        }
    }
}

/// Match error payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchError {
    /// Error category.
    pub kind: MatchErrorKind,
    /// Human-readable error summary.
    pub message: String,
}

impl MatchError {
    /// Creates a match error.
    pub fn new(kind: MatchErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Creates a `StackOverflow` error.
    pub fn stack_overflow(limit: usize) -> Self {
        Self::new(
            MatchErrorKind::StackOverflow,
            format!("backtrack stack exceeded depth limit {limit}"),
        )
    }

    /// Creates an `InvalidProgram` error.
    pub fn invalid_program(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        let message = format!("invalid program: {detail}");
        Self::new(MatchErrorKind::InvalidProgram, message)
    }

    /// Creates an `UnknownBackref` error.
    pub fn unknown_backref(name: impl Into<String>) -> Self {
        let name = name.into();
        let message = format!("backref `{name}` has no captured text");
        Self::new(MatchErrorKind::UnknownBackref(name), message)
    }

    /// Creates an `Aborted` error from an `Err` instruction payload.
    pub fn aborted(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(MatchErrorKind::Aborted(message.clone()), message)
    }
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for MatchError {}
