//! Human-readable disassembly for patterns and linked programs.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::link::Program;
use crate::pattern::instruction::{Instruction, Offset};
use crate::pattern::patt::Pattern;

/// Disassembles one pattern fragment, one line per instruction.
pub fn dump_pattern(pattern: &Pattern) -> String {
    dump_instructions(pattern.instructions(), None)
}

/// Disassembles a linked program, prefixing rule bodies with name headers.
pub fn dump_program(program: &Program) -> String {
    dump_instructions(program.instructions(), Some(program.symbols()))
}

/// Shared line renderer. Branch operands print as absolute target indices.
pub(crate) fn dump_instructions(
    code: &[Instruction],
    symbols: Option<&BTreeMap<usize, String>>,
) -> String {
    let mut out = String::new();
    for (index, inst) in code.iter().enumerate() {
        if let Some(symbols) = symbols
            && let Some(name) = symbols.get(&index)
        {
            let _ = writeln!(out, "{name}:");
        }
        let _ = writeln!(out, "{index:3}: {}", render(index, inst));
    }
    out
}

/// Absolute target index of a branch at `index`, or the raw distance when
/// the target would be negative.
fn target_text(index: usize, offset: Offset) -> String {
    match offset.target(index) {
        Some(target) => target.to_string(),
        None => format!("?{}", offset.value()),
    }
}

fn render(index: usize, inst: &Instruction) -> String {
    let name = inst.opcode_name();
    match inst {
        Instruction::Str(s) | Instruction::IStr(s) => {
            format!("{name} \"{}\"", escape_literal(s))
        }
        Instruction::Set(cs) | Instruction::Span(cs) => format!("{name} {cs}"),
        Instruction::Any | Instruction::Nop | Instruction::Return | Instruction::Fail => {
            name.to_string()
        }
        Instruction::Choice(offset)
        | Instruction::Commit(offset)
        | Instruction::PartCommit(offset) => {
            format!("{name} {}", target_text(index, *offset))
        }
        Instruction::Call { label, offset } => {
            format!("{name} {} {label}", target_text(index, *offset))
        }
        Instruction::Jump { label, offset } => {
            let mut line = format!("{name} {}", target_text(index, *offset));
            if let Some(label) = label {
                line.push(' ');
                line.push_str(label);
            }
            line
        }
        Instruction::CapOpen {
            kind, name: cap_name, action, ..
        } => {
            let mut line = format!("{name} {kind}");
            if let Some(cap_name) = cap_name {
                line.push(' ');
                line.push_str(cap_name);
            }
            if let Some(action) = action {
                let _ = write!(line, ": {action}");
            }
            line
        }
        Instruction::CapClose { kind } => format!("{name} {kind}"),
        Instruction::Backref(cap_name) => format!("{name} {cap_name}"),
        Instruction::Err(message) => format!("{name} \"{}\"", escape_literal(message)),
    }
}

/// Escapes literal text for double-quoted rendering.
fn escape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            0x20..=0x7e => out.push(byte as char),
            _ => out.push_str(&format!("\\x{byte:02x}")),
        }
    }
    out
}
