//! Structural invariant checks for fragments and linked programs.

use std::collections::VecDeque;

use crate::link::Program;
use crate::pattern::error::PatternError;
use crate::pattern::instruction::Instruction;
use crate::pattern::patt::Pattern;

/// Checks a pattern fragment: every branch lands in `[0, len]` and choice
/// bracketing never underflows under a linear push/pop scan.
pub fn verify_pattern(pattern: &Pattern) -> Result<(), PatternError> {
    verify_instructions(pattern.instructions())
}

pub(crate) fn verify_instructions(code: &[Instruction]) -> Result<(), PatternError> {
    for (index, inst) in code.iter().enumerate() {
        if let Some(offset) = inst.branch_offset() {
            match offset.target(index) {
                Some(target) if target <= code.len() => {}
                _ => {
                    return Err(PatternError::invariant_violation(format!(
                        "branch at {index} targets {} outside [0, {}]",
                        index as i64 + offset.value() as i64,
                        code.len()
                    )));
                }
            }
        }
    }

    let mut depth: usize = 0;
    for (index, inst) in code.iter().enumerate() {
        match inst {
            Instruction::Choice(_) => depth += 1,
            Instruction::Commit(_) | Instruction::PartCommit(_) => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    PatternError::invariant_violation(format!(
                        "commit at {index} has no matching choice"
                    ))
                })?;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(PatternError::invariant_violation(format!(
            "{depth} choice frame(s) never committed"
        )));
    }
    Ok(())
}

/// Checks a linked program: fragment invariants, no unresolved calls, and
/// every rule entry reachable from the header.
pub fn verify_program(program: &Program) -> Result<(), PatternError> {
    let code = program.instructions();
    verify_instructions(code)?;

    for (index, inst) in code.iter().enumerate() {
        if let Instruction::Call { label, offset } = inst
            && offset.value() == 0
        {
            return Err(PatternError::invariant_violation(format!(
                "unresolved call to `{label}` at {index}"
            )));
        }
    }

    let reachable = reachable_indices(code);
    for (&entry, name) in program.symbols() {
        if !reachable.contains(&entry) {
            return Err(PatternError::invariant_violation(format!(
                "rule `{name}` at {entry} is unreachable from the header"
            )));
        }
    }
    Ok(())
}

/// Instruction indices reachable from index 0 along fallthrough and branch
/// edges. Branch bounds are assumed already checked.
fn reachable_indices(code: &[Instruction]) -> Vec<usize> {
    let mut seen = vec![false; code.len()];
    let mut queue = VecDeque::from([0usize]);
    while let Some(index) = queue.pop_front() {
        if index >= code.len() || seen[index] {
            continue;
        }
        seen[index] = true;
        let inst = &code[index];
        let target = inst.branch_offset().and_then(|offset| offset.target(index));

        match inst {
            Instruction::Jump { .. }
            | Instruction::Commit(_)
            | Instruction::PartCommit(_) => {
                queue.extend(target);
            }
            Instruction::Return | Instruction::Fail | Instruction::Err(_) => {}
            Instruction::Choice(_) | Instruction::Call { .. } => {
                queue.extend(target);
                queue.push_back(index + 1);
            }
            _ => queue.push_back(index + 1),
        }
    }
    (0..code.len()).filter(|&index| seen[index]).collect()
}
