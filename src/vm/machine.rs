//! Backtracking match engine executing linked programs.

use crate::link::Program;
use crate::pattern::instruction::{CapKind, Instruction, Offset};
use crate::vm::capture::Capture;
use crate::vm::error::MatchError;
use crate::vm::frame::Frame;

/// Default limit for the unified backtrack/call stack.
const DEFAULT_MAX_STACK_DEPTH: usize = 1024;

/// Successful match outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Subject position one past the last consumed byte.
    pub end: usize,
    /// Captures paired from the marker log, in open order.
    pub captures: Vec<Capture>,
}

/// Capture log entry recorded while matching.
#[derive(Debug, Clone)]
enum CapEvent {
    Open {
        kind: CapKind,
        name: Option<String>,
        id: u32,
        pos: usize,
    },
    Close {
        pos: usize,
    },
}

/// Backtracking interpreter for one linked program.
///
/// The machine never mutates the program; one machine can match any number
/// of subjects.
pub struct Machine<'a> {
    program: &'a Program,
    max_stack_depth: usize,
}

impl<'a> Machine<'a> {
    /// Creates a machine with the default stack depth limit.
    pub fn new(program: &'a Program) -> Self {
        Self {
            program,
            max_stack_depth: DEFAULT_MAX_STACK_DEPTH,
        }
    }

    /// Creates a machine with a custom stack depth limit.
    pub fn with_stack_limit(program: &'a Program, limit: usize) -> Self {
        Self {
            program,
            max_stack_depth: limit,
        }
    }

    /// Matches `subject` from its start. `Ok(None)` means no match.
    pub fn run(&self, subject: &[u8]) -> Result<Option<Match>, MatchError> {
        self.run_from(subject, 0)
    }

    /// Matches `subject` from byte position `start`.
    pub fn run_from(&self, subject: &[u8], start: usize) -> Result<Option<Match>, MatchError> {
        let code = self.program.instructions();
        let mut pc = 0usize;
        let mut pos = start;
        let mut stack: Vec<Frame> = Vec::new();
        let mut caps: Vec<CapEvent> = Vec::new();

        loop {
            if pc == code.len() {
                return Ok(Some(Match {
                    end: pos,
                    captures: collect_captures(&caps)?,
                }));
            }
            let Some(inst) = code.get(pc) else {
                return Err(MatchError::invalid_program(format!(
                    "pc {pc} out of range (len {})",
                    code.len()
                )));
            };

            let mut failed = false;
            match inst {
                Instruction::Str(s) => {
                    let bytes = s.as_bytes();
                    match subject.get(pos..pos + bytes.len()) {
                        Some(window) if window == bytes => {
                            pos += bytes.len();
                            pc += 1;
                        }
                        _ => failed = true,
                    }
                }
                Instruction::IStr(s) => {
                    let bytes = s.as_bytes();
                    match subject.get(pos..pos + bytes.len()) {
                        Some(window) if window.eq_ignore_ascii_case(bytes) => {
                            pos += bytes.len();
                            pc += 1;
                        }
                        _ => failed = true,
                    }
                }
                Instruction::Set(cs) => match subject.get(pos) {
                    Some(&byte) if cs.contains(byte) => {
                        pos += 1;
                        pc += 1;
                    }
                    _ => failed = true,
                },
                Instruction::Span(cs) => {
                    while let Some(&byte) = subject.get(pos) {
                        if !cs.contains(byte) {
                            break;
                        }
                        pos += 1;
                    }
                    pc += 1;
                }
                Instruction::Any => match subject.get(pos) {
                    Some(_) => {
                        pos += 1;
                        pc += 1;
                    }
                    None => failed = true,
                },
                Instruction::Nop => pc += 1,
                Instruction::Choice(offset) => {
                    let target = branch_target(code.len(), pc, *offset)?;
                    self.push_frame(
                        &mut stack,
                        Frame::Backtrack {
                            pc: target,
                            pos,
                            cap_height: caps.len(),
                        },
                    )?;
                    pc += 1;
                }
                Instruction::Commit(offset) => {
                    let target = branch_target(code.len(), pc, *offset)?;
                    match stack.pop() {
                        Some(Frame::Backtrack { .. }) => pc = target,
                        _ => {
                            return Err(MatchError::invalid_program(format!(
                                "commit at {pc} without a backtrack frame"
                            )));
                        }
                    }
                }
                Instruction::PartCommit(offset) => {
                    let target = branch_target(code.len(), pc, *offset)?;
                    match stack.last_mut() {
                        Some(Frame::Backtrack {
                            pos: frame_pos,
                            cap_height,
                            ..
                        }) => {
                            *frame_pos = pos;
                            *cap_height = caps.len();
                            pc = target;
                        }
                        _ => {
                            return Err(MatchError::invalid_program(format!(
                                "partial commit at {pc} without a backtrack frame"
                            )));
                        }
                    }
                }
                Instruction::Call { label, offset } => {
                    if offset.value() == 0 {
                        return Err(MatchError::invalid_program(format!(
                            "unlinked call to `{label}` at {pc}"
                        )));
                    }
                    let target = branch_target(code.len(), pc, *offset)?;
                    self.push_frame(&mut stack, Frame::Return { pc: pc + 1 })?;
                    pc = target;
                }
                Instruction::Jump { offset, .. } => {
                    pc = branch_target(code.len(), pc, *offset)?;
                }
                Instruction::Return => match stack.pop() {
                    Some(Frame::Return { pc: return_pc }) => pc = return_pc,
                    _ => {
                        return Err(MatchError::invalid_program(format!(
                            "return at {pc} without a return frame"
                        )));
                    }
                },
                Instruction::Fail => failed = true,
                Instruction::CapOpen { kind, name, id, .. } => {
                    caps.push(CapEvent::Open {
                        kind: *kind,
                        name: name.clone(),
                        id: *id,
                        pos,
                    });
                    pc += 1;
                }
                Instruction::CapClose { .. } => {
                    caps.push(CapEvent::Close { pos });
                    pc += 1;
                }
                Instruction::Backref(name) => {
                    let Some((start, end)) = resolve_backref(&caps, name) else {
                        return Err(MatchError::unknown_backref(name.clone()));
                    };
                    let bytes = &subject[start..end];
                    match subject.get(pos..pos + bytes.len()) {
                        Some(window) if window == bytes => {
                            pos += bytes.len();
                            pc += 1;
                        }
                        _ => failed = true,
                    }
                }
                Instruction::Err(message) => {
                    return Err(MatchError::aborted(message.clone()));
                }
            }

            if failed {
                match unwind(&mut stack) {
                    Some((backtrack_pc, backtrack_pos, cap_height)) => {
                        pc = backtrack_pc;
                        pos = backtrack_pos;
                        caps.truncate(cap_height);
                    }
                    None => return Ok(None),
                }
            }
        }
    }

    /// Pushes one stack entry, honoring the depth limit.
    fn push_frame(&self, stack: &mut Vec<Frame>, frame: Frame) -> Result<(), MatchError> {
        if stack.len() >= self.max_stack_depth {
            return Err(MatchError::stack_overflow(self.max_stack_depth));
        }
        stack.push(frame);
        Ok(())
    }
}

/// Absolute branch target, checked against the program length.
fn branch_target(len: usize, pc: usize, offset: Offset) -> Result<usize, MatchError> {
    match offset.target(pc) {
        Some(target) if target <= len => Ok(target),
        _ => Err(MatchError::invalid_program(format!(
            "branch at {pc} targets {} outside [0, {len}]",
            pc as i64 + offset.value() as i64
        ))),
    }
}

/// Pops entries until the innermost backtrack frame, dropping return
/// addresses above it.
fn unwind(stack: &mut Vec<Frame>) -> Option<(usize, usize, usize)> {
    while let Some(frame) = stack.pop() {
        if let Frame::Backtrack {
            pc,
            pos,
            cap_height,
        } = frame
        {
            return Some((pc, pos, cap_height));
        }
    }
    None
}

/// Pairs marker events into captures, in open order.
fn collect_captures(events: &[CapEvent]) -> Result<Vec<Capture>, MatchError> {
    let mut out: Vec<Capture> = Vec::new();
    let mut open: Vec<usize> = Vec::new();
    for event in events {
        match event {
            CapEvent::Open {
                kind,
                name,
                id,
                pos,
            } => {
                open.push(out.len());
                out.push(Capture {
                    kind: *kind,
                    name: name.clone(),
                    id: *id,
                    start: *pos,
                    end: *pos,
                });
            }
            CapEvent::Close { pos } => {
                let Some(index) = open.pop() else {
                    return Err(MatchError::invalid_program(
                        "capture close without a matching open",
                    ));
                };
                out[index].end = *pos;
            }
        }
    }
    if !open.is_empty() {
        return Err(MatchError::invalid_program("capture never closed"));
    }
    Ok(out)
}

/// Span of the most recently closed capture carrying the name.
fn resolve_backref(events: &[CapEvent], name: &str) -> Option<(usize, usize)> {
    let mut open: Vec<(Option<&str>, usize)> = Vec::new();
    let mut found = None;
    for event in events {
        match event {
            CapEvent::Open {
                name: cap_name,
                pos,
                ..
            } => open.push((cap_name.as_deref(), *pos)),
            CapEvent::Close { pos } => {
                if let Some((cap_name, start)) = open.pop()
                    && cap_name == Some(name)
                {
                    found = Some((start, *pos));
                }
            }
        }
    }
    found
}
