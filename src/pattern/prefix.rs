//! Prefix combinators rewriting one fragment with choice/commit bracketing.

use crate::pattern::error::PatternError;
use crate::pattern::instruction::{CapKind, Instruction, Offset};
use crate::pattern::patt::Pattern;

impl Pattern {
    /// `?p`: matches `p` or the empty string.
    pub fn opt(self) -> Pattern {
        let n = self.len() as i32;
        let mut code = Vec::with_capacity(self.len() + 2);
        code.push(Instruction::Choice(Offset::new(n + 2)));
        code.extend(self.into_instructions());
        code.push(Instruction::Commit(Offset::new(1)));
        Pattern::from_instructions(code)
    }

    /// `*p`: matches `p` zero or more times.
    ///
    /// A set-reducible operand collapses to a single non-backtracking
    /// `Span`; anything else loops through one reused backtrack frame.
    pub fn star(self) -> Pattern {
        if let Some(cs) = self.as_charset() {
            return Pattern::from_instructions(vec![Instruction::Span(cs)]);
        }
        let n = self.len() as i32;
        let mut code = Vec::with_capacity(self.len() + 2);
        code.push(Instruction::Choice(Offset::new(n + 2)));
        code.extend(self.into_instructions());
        code.push(Instruction::PartCommit(Offset::new(-n)));
        Pattern::from_instructions(code)
    }

    /// `+p`: matches `p` one or more times.
    pub fn plus(self) -> Result<Pattern, PatternError> {
        let tail = self.clone().star();
        self.seq(tail)
    }

    /// `!p`: succeeds when `p` fails; consumes no input either way.
    pub fn not_pred(self) -> Pattern {
        let n = self.len() as i32;
        let mut code = Vec::with_capacity(self.len() + 3);
        code.push(Instruction::Choice(Offset::new(n + 3)));
        code.extend(self.into_instructions());
        code.push(Instruction::Commit(Offset::new(1)));
        code.push(Instruction::Fail);
        Pattern::from_instructions(code)
    }

    /// `&p`: succeeds when `p` matches; consumes no input either way.
    pub fn and_pred(self) -> Pattern {
        self.not_pred().not_pred()
    }

    /// `@p`: skips ahead byte by byte until `p` matches.
    pub fn search(self) -> Pattern {
        let n = self.len() as i32;
        let mut code = Vec::with_capacity(self.len() + 4);
        code.push(Instruction::Choice(Offset::new(n + 2)));
        code.extend(self.into_instructions());
        code.push(Instruction::Commit(Offset::new(3)));
        code.push(Instruction::Any);
        code.push(Instruction::Jump {
            label: None,
            offset: Offset::new(-n - 3),
        });
        Pattern::from_instructions(code)
    }

    /// `>p`: captures the matched substring verbatim.
    pub fn capture_text(self) -> Pattern {
        self.capture(CapKind::Str, None, None)
    }
}
