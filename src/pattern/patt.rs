//! Pattern container and single-instruction constructors.

use crate::ast::Ast;
use crate::pattern::charset::CharSet;
use crate::pattern::error::PatternError;
use crate::pattern::instruction::{CapKind, Instruction, Offset};

/// Upper bound on instructions in one compiled pattern.
///
/// Enforced after every infix composition. Raise to compile larger patterns.
pub const MAX_PATT_LEN: usize = 4096;

/// Compiled instruction sequence for one PEG expression.
///
/// Combinators take patterns by value and return fresh sequences; there is
/// no sharing between fragments. Every branch inside a pattern targets an
/// index within that same pattern, so composition is plain concatenation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pattern {
    code: Vec<Instruction>,
}

impl Pattern {
    /// Creates the empty pattern, which matches the empty string.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wraps an instruction sequence produced by a combinator.
    pub(crate) fn from_instructions(code: Vec<Instruction>) -> Self {
        Self { code }
    }

    /// Matches the literal string.
    pub fn literal(s: impl Into<String>) -> Self {
        Self::from_instructions(vec![Instruction::Str(s.into())])
    }

    /// Matches the literal string, ASCII case-insensitive.
    pub fn literal_ci(s: impl Into<String>) -> Self {
        Self::from_instructions(vec![Instruction::IStr(s.into())])
    }

    /// Matches exactly `n` bytes; `n <= 0` consumes nothing and succeeds.
    pub fn any(n: i64) -> Self {
        if n <= 0 {
            return Self::from_instructions(vec![Instruction::Nop]);
        }
        Self::from_instructions(vec![Instruction::Any; n as usize])
    }

    /// Matches one byte from the set.
    pub fn set(cs: CharSet) -> Self {
        Self::from_instructions(vec![Instruction::Set(cs)])
    }

    /// Calls the named rule; the branch offset stays 0 until link time.
    pub fn call(label: impl Into<String>) -> Self {
        Self::from_instructions(vec![Instruction::Call {
            label: label.into(),
            offset: Offset::new(0),
        }])
    }

    /// Matches the bytes last captured under `name`.
    pub fn backref(name: impl Into<String>) -> Self {
        Self::from_instructions(vec![Instruction::Backref(name.into())])
    }

    /// Returns from the current rule.
    pub fn ret() -> Self {
        Self::from_instructions(vec![Instruction::Return])
    }

    /// Aborts the match with a message.
    pub fn err(message: impl Into<String>) -> Self {
        Self::from_instructions(vec![Instruction::Err(message.into())])
    }

    /// Wraps the pattern in paired capture markers.
    ///
    /// The markers carry no branches, so the wrapped body needs no offset
    /// adjustment. Capture ids are assigned later by the link pass.
    pub fn capture(self, kind: CapKind, name: Option<String>, action: Option<Ast>) -> Pattern {
        let mut code = Vec::with_capacity(self.code.len() + 2);
        code.push(Instruction::CapOpen {
            kind,
            name,
            action: action.map(Box::new),
            id: 0,
        });
        code.extend(self.code);
        code.push(Instruction::CapClose { kind });
        Pattern::from_instructions(code)
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.code.len()
    }

    /// Returns whether the pattern holds no instructions.
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Instruction view.
    pub fn instructions(&self) -> &[Instruction] {
        &self.code
    }

    /// Consumes the pattern into its instruction sequence.
    pub fn into_instructions(self) -> Vec<Instruction> {
        self.code
    }

    /// The single-byte set this pattern losslessly reduces to, when any.
    ///
    /// Reducible forms: a one-instruction `Set`, a one-byte `Str`, a
    /// one-byte `IStr` (both case variants), or `Any` (the full set).
    pub fn as_charset(&self) -> Option<CharSet> {
        let [inst] = self.code.as_slice() else {
            return None;
        };
        match inst {
            Instruction::Set(cs) => Some(*cs),
            Instruction::Str(s) => {
                let [byte] = s.as_bytes() else { return None };
                Some(CharSet::singleton(*byte))
            }
            Instruction::IStr(s) => {
                let [byte] = s.as_bytes() else { return None };
                let mut cs = CharSet::singleton(byte.to_ascii_lowercase());
                cs.insert(byte.to_ascii_uppercase());
                Some(cs)
            }
            Instruction::Any => Some(CharSet::full()),
            _ => None,
        }
    }

    /// Rejects instruction counts above [`MAX_PATT_LEN`].
    pub(crate) fn ensure_len(len: usize) -> Result<(), PatternError> {
        if len > MAX_PATT_LEN {
            return Err(PatternError::pattern_too_large(len));
        }
        Ok(())
    }
}
