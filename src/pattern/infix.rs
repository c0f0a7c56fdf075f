//! Infix combinators: sequencing, ordered choice, set difference.

use crate::pattern::error::PatternError;
use crate::pattern::instruction::{Instruction, Offset};
use crate::pattern::patt::Pattern;

impl Pattern {
    /// `p1 * p2`: matches `p1` followed by `p2`.
    pub fn seq(self, other: Pattern) -> Result<Pattern, PatternError> {
        let mut code = self.into_instructions();
        code.extend(other.into_instructions());
        Pattern::ensure_len(code.len())?;
        Ok(Pattern::from_instructions(code))
    }

    /// `p1 | p2`: ordered choice preferring `p1`.
    ///
    /// Two set-reducible operands fold into one `Set`. When `p1` already is
    /// a choice chain, the new alternative extends that chain instead of
    /// nesting, keeping left-associative chains flat.
    pub fn choice(self, other: Pattern) -> Result<Pattern, PatternError> {
        if let (Some(cs1), Some(cs2)) = (self.as_charset(), other.as_charset()) {
            return Ok(Pattern::set(cs1.union(&cs2)));
        }

        let mut head = self.into_instructions();
        let p2 = other.into_instructions();
        let p1_len = head.len();

        // A leading Choice whose paired Commit exits the fragment marks an
        // existing chain segment. Collect those Commits first; they are
        // stretched past the new alternative only once the remaining tail is
        // known to be safe to shift.
        let mut ip = 0;
        let mut chain_commits: Vec<usize> = Vec::new();
        loop {
            let choice_offset = match head.get(ip) {
                Some(Instruction::Choice(offset)) => *offset,
                _ => break,
            };
            let Some(alt_start) = choice_offset.target(ip) else {
                break;
            };
            if alt_start <= ip + 1 || alt_start > p1_len {
                break;
            }
            let commit_index = alt_start - 1;
            match head.get(commit_index) {
                Some(Instruction::Commit(offset))
                    if offset.target(commit_index) == Some(p1_len) =>
                {
                    chain_commits.push(commit_index);
                    ip = commit_index + 1;
                }
                _ => break,
            }
        }

        // The fresh Choice is inserted right before the final alternative,
        // shifting it by one slot. Any branch leaving that suffix (a search
        // loop's backward jump, for instance) rules the rewrite out.
        let tail_is_contained = head[ip..].iter().enumerate().all(|(k, inst)| {
            inst.branch_offset().is_none_or(|offset| {
                offset
                    .target(ip + k)
                    .is_some_and(|target| target >= ip && target <= p1_len)
            })
        });
        if !tail_is_contained {
            ip = 0;
            chain_commits.clear();
        }

        for &commit_index in &chain_commits {
            if let Instruction::Commit(offset) = head[commit_index] {
                head[commit_index] =
                    Instruction::Commit(Offset::new(offset.value() + p2.len() as i32 + 2));
            }
        }

        let tail = head.split_off(ip);
        let mut code = head;
        code.reserve(tail.len() + p2.len() + 2);
        code.push(Instruction::Choice(Offset::new((p1_len - ip) as i32 + 2)));
        code.extend(tail);
        code.push(Instruction::Commit(Offset::new(p2.len() as i32 + 1)));
        code.extend(p2);
        Pattern::ensure_len(code.len())?;
        Ok(Pattern::from_instructions(code))
    }

    /// `p1 - p2`: matches `p1` only where `p2` does not match.
    ///
    /// Two set-reducible operands fold into one `Set` holding the
    /// difference; otherwise `p2` is rejected up front with a not-predicate.
    pub fn diff(self, other: Pattern) -> Result<Pattern, PatternError> {
        if let (Some(cs1), Some(cs2)) = (self.as_charset(), other.as_charset()) {
            return Ok(Pattern::set(cs1.difference(&cs2)));
        }
        other.not_pred().seq(self)
    }
}
