//! Pattern construction and translation error contracts.

use std::fmt;

use crate::pattern::patt::MAX_PATT_LEN;

/// Stable pattern error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternErrorKind {
    /// The input node's shape or operator is not recognized.
    UnknownConstruct,
    /// A capture call has wrong arity, an unknown kind, or a bad selector.
    MalformedCapture,
    /// A character-class literal contains an invalid element.
    MalformedCharClass,
    /// A composed pattern exceeded [`MAX_PATT_LEN`].
    PatternTooLarge,
    /// A structural invariant did not hold.
    InvariantViolation,
}

impl fmt::Display for PatternErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UnknownConstruct => "unknown construct",
            Self::MalformedCapture => "malformed capture",
            Self::MalformedCharClass => "malformed character class",
            Self::PatternTooLarge => "pattern too large",
            Self::InvariantViolation => "invariant violation",
        };
        write!(f, "{name}")
    }
}

/// Pattern error payload.
///
/// Errors carry the offending construct rendered as source-like text so a
/// front-end can attach its own source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternError {
    /// Error category.
    pub kind: PatternErrorKind,
    /// Human-readable error summary.
    pub message: String,
    /// Offending construct as source-like text, when available.
    pub construct: Option<String>,
}

impl PatternError {
    /// Creates a pattern error.
    pub fn new(
        kind: PatternErrorKind,
        message: impl Into<String>,
        construct: Option<String>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            construct,
        }
    }

    /// Creates an `UnknownConstruct` error quoting the offending node.
    pub fn unknown_construct(message: impl Into<String>, construct: impl fmt::Display) -> Self {
        Self::new(
            PatternErrorKind::UnknownConstruct,
            message,
            Some(construct.to_string()),
        )
    }

    /// Creates a `MalformedCapture` error quoting the offending node.
    pub fn malformed_capture(message: impl Into<String>, construct: impl fmt::Display) -> Self {
        Self::new(
            PatternErrorKind::MalformedCapture,
            message,
            Some(construct.to_string()),
        )
    }

    /// Creates a `MalformedCharClass` error quoting the offending node.
    pub fn malformed_char_class(message: impl Into<String>, construct: impl fmt::Display) -> Self {
        Self::new(
            PatternErrorKind::MalformedCharClass,
            message,
            Some(construct.to_string()),
        )
    }

    /// Creates a `PatternTooLarge` error naming the tuning knob.
    pub fn pattern_too_large(len: usize) -> Self {
        Self::new(
            PatternErrorKind::PatternTooLarge,
            format!(
                "pattern length {len} exceeds MAX_PATT_LEN ({MAX_PATT_LEN}); \
                 raise pattern::MAX_PATT_LEN to compile larger patterns"
            ),
            None,
        )
    }

    /// Creates an `InvariantViolation` error.
    pub fn invariant_violation(message: impl Into<String>) -> Self {
        Self::new(PatternErrorKind::InvariantViolation, message, None)
    }
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.construct {
            Some(construct) => write!(f, "{} in `{construct}`", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for PatternError {}
