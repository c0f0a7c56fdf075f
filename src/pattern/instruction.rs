//! Typed instruction contracts for compiled patterns.

use std::fmt;

use crate::ast::Ast;
use crate::pattern::charset::CharSet;

/// Signed branch distance relative to the carrying instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Offset(i32);

impl Offset {
    /// Creates an offset from a signed distance.
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Returns the raw signed distance.
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Absolute target index for an instruction at `index`, when non-negative.
    pub fn target(self, index: usize) -> Option<usize> {
        usize::try_from(index as i64 + self.0 as i64).ok()
    }
}

/// Capture classification driving post-processing of matched spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapKind {
    /// Verbatim substring of the subject.
    Str,
    /// Span handed to a user action.
    Action,
    /// JSON string value.
    JString,
    /// JSON integer value.
    JInt,
    /// JSON float value.
    JFloat,
    /// JSON array collecting nested captures.
    JArray,
    /// JSON object collecting nested field captures.
    JObject,
    /// JSON object field with a fixed name.
    JFieldFixed,
    /// JSON object field named by the matched text.
    JFieldDynamic,
}

impl fmt::Display for CapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Str => "Str",
            Self::Action => "Action",
            Self::JString => "JString",
            Self::JInt => "JInt",
            Self::JFloat => "JFloat",
            Self::JArray => "JArray",
            Self::JObject => "JObject",
            Self::JFieldFixed => "JFieldFixed",
            Self::JFieldDynamic => "JFieldDynamic",
        };
        write!(f, "{name}")
    }
}

/// One virtual-machine instruction of a compiled pattern.
///
/// Every branch-carrying variant stores a distance relative to its own
/// index; combinators only emit branches that land inside the fragment
/// they produce, so concatenation never rewrites offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Matches the literal bytes of the payload.
    Str(String),
    /// Matches the literal bytes, ASCII case-insensitive.
    IStr(String),
    /// Matches one byte contained in the set.
    Set(CharSet),
    /// Greedily matches zero or more bytes contained in the set.
    Span(CharSet),
    /// Matches any single byte.
    Any,
    /// Consumes nothing and always succeeds.
    Nop,
    /// Pushes a backtrack frame resuming at the branch target.
    Choice(Offset),
    /// Pops the innermost backtrack frame and jumps to the branch target.
    Commit(Offset),
    /// Updates the innermost frame's subject position and jumps, keeping
    /// the frame for the next iteration.
    PartCommit(Offset),
    /// Pushes a return address and jumps to the named rule. The offset is a
    /// placeholder until the link pass resolves the label.
    Call {
        /// Referenced rule name.
        label: String,
        /// Resolved branch distance; 0 while unlinked.
        offset: Offset,
    },
    /// Unconditional jump, optionally labeled for link-time resolution.
    Jump {
        /// Rule name for link-time resolution, when present.
        label: Option<String>,
        /// Branch distance.
        offset: Offset,
    },
    /// Pops a return address and resumes there.
    Return,
    /// Forces a backtrack to the innermost frame.
    Fail,
    /// Opens a capture span.
    CapOpen {
        /// Capture classification.
        kind: CapKind,
        /// Capture or field name, when present.
        name: Option<String>,
        /// Opaque user action attached by the translator; never interpreted.
        action: Option<Box<Ast>>,
        /// Sequential id assigned by the link pass.
        id: u32,
    },
    /// Closes the innermost open capture span.
    CapClose {
        /// Capture classification, mirroring the opening marker.
        kind: CapKind,
    },
    /// Matches the bytes last captured under the name.
    Backref(String),
    /// Aborts the match with the payload message.
    Err(String),
}

impl Instruction {
    /// Returns the relative branch distance, when this instruction carries one.
    pub fn branch_offset(&self) -> Option<Offset> {
        match self {
            Self::Choice(offset)
            | Self::Commit(offset)
            | Self::PartCommit(offset)
            | Self::Call { offset, .. }
            | Self::Jump { offset, .. } => Some(*offset),
            _ => None,
        }
    }

    /// Opcode name used by the disassembler.
    pub fn opcode_name(&self) -> &'static str {
        match self {
            Self::Str(_) => "Str",
            Self::IStr(_) => "IStr",
            Self::Set(_) => "Set",
            Self::Span(_) => "Span",
            Self::Any => "Any",
            Self::Nop => "Nop",
            Self::Choice(_) => "Choice",
            Self::Commit(_) => "Commit",
            Self::PartCommit(_) => "PartCommit",
            Self::Call { .. } => "Call",
            Self::Jump { .. } => "Jump",
            Self::Return => "Return",
            Self::Fail => "Fail",
            Self::CapOpen { .. } => "CapOpen",
            Self::CapClose { .. } => "CapClose",
            Self::Backref(_) => "Backref",
            Self::Err(_) => "Err",
        }
    }
}
