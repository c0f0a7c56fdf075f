//! Grammar layout and branch resolution for compiled rule patterns.
//!
//! Patterns express rule recursion through labeled `Call` instructions with
//! placeholder offsets. Linking lays all rules out in one instruction
//! stream, resolves every label to a relative branch, and renumbers capture
//! ids in emission order.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::pattern::instruction::{Instruction, Offset};
use crate::pattern::patt::Pattern;

/// Upper bound on instructions in one linked program.
pub const MAX_PROGRAM_LEN: usize = 65_536;

/// Stable link error categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkErrorKind {
    /// A `Call` or labeled `Jump` references a rule that was not provided.
    UnknownRule(String),
    /// Two rules share one name.
    DuplicateRule(String),
    /// The requested entry rule was not provided.
    MissingEntry(String),
    /// The linked program exceeded [`MAX_PROGRAM_LEN`].
    ProgramTooLarge,
}

impl fmt::Display for LinkErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownRule(name) => write!(f, "unknown rule: {name}"),
            Self::DuplicateRule(name) => write!(f, "duplicate rule: {name}"),
            Self::MissingEntry(name) => write!(f, "missing entry rule: {name}"),
            Self::ProgramTooLarge => write!(f, "program too large"),
        }
    }
}

/// Link error payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkError {
    /// Error category.
    pub kind: LinkErrorKind,
    /// Human-readable error summary.
    pub message: String,
}

impl LinkError {
    /// Creates a link error.
    pub fn new(kind: LinkErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Creates an `UnknownRule` error naming the referring rule.
    pub fn unknown_rule(label: impl Into<String>, referrer: &str) -> Self {
        let label = label.into();
        let message = format!("rule `{referrer}` calls unknown rule `{label}`");
        Self::new(LinkErrorKind::UnknownRule(label), message)
    }

    /// Creates a `DuplicateRule` error.
    pub fn duplicate_rule(name: impl Into<String>) -> Self {
        let name = name.into();
        let message = format!("rule `{name}` is defined more than once");
        Self::new(LinkErrorKind::DuplicateRule(name), message)
    }

    /// Creates a `MissingEntry` error.
    pub fn missing_entry(name: impl Into<String>) -> Self {
        let name = name.into();
        let message = format!("entry rule `{name}` is not defined");
        Self::new(LinkErrorKind::MissingEntry(name), message)
    }

    /// Creates a `ProgramTooLarge` error naming the tuning knob.
    pub fn program_too_large(len: usize) -> Self {
        Self::new(
            LinkErrorKind::ProgramTooLarge,
            format!(
                "linked program length {len} exceeds MAX_PROGRAM_LEN ({MAX_PROGRAM_LEN}); \
                 raise link::MAX_PROGRAM_LEN to link larger grammars"
            ),
        )
    }
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for LinkError {}

/// Executable program: every branch resolved, capture ids assigned.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    code: Vec<Instruction>,
    symbols: BTreeMap<usize, String>,
}

impl Program {
    /// Instruction view.
    pub fn instructions(&self) -> &[Instruction] {
        &self.code
    }

    /// Rule entry points keyed by instruction index.
    pub fn symbols(&self) -> &BTreeMap<usize, String> {
        &self.symbols
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.code.len()
    }

    /// Returns whether the program holds no instructions.
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Entry index of the named rule, when present.
    pub fn rule_entry(&self, name: &str) -> Option<usize> {
        self.symbols
            .iter()
            .find_map(|(&index, rule)| (rule == name).then_some(index))
    }

    /// Name of the rule whose body contains the instruction index.
    fn rule_at(&self, index: usize) -> &str {
        self.symbols
            .range(..=index)
            .next_back()
            .map(|(_, name)| name.as_str())
            .unwrap_or("<header>")
    }
}

/// Links compiled rules into one program starting at `entry`.
///
/// Layout: a two-instruction header (`Call` to the entry rule, then a
/// `Jump` past all code), followed by each rule's pattern terminated by
/// `Return`. Reaching the end of the stream accepts the match.
pub fn link_grammar(rules: &[(String, Pattern)], entry: &str) -> Result<Program, LinkError> {
    let mut code: Vec<Instruction> = Vec::new();
    code.push(Instruction::Call {
        label: entry.to_string(),
        offset: Offset::new(0),
    });
    code.push(Instruction::Jump {
        label: None,
        offset: Offset::new(0),
    });

    let mut entries: HashMap<&str, usize> = HashMap::new();
    let mut symbols = BTreeMap::new();
    for (name, pattern) in rules {
        if entries.insert(name.as_str(), code.len()).is_some() {
            return Err(LinkError::duplicate_rule(name.clone()));
        }
        symbols.insert(code.len(), name.clone());
        code.extend(pattern.instructions().iter().cloned());
        code.push(Instruction::Return);
    }

    if !entries.contains_key(entry) {
        return Err(LinkError::missing_entry(entry));
    }
    if code.len() > MAX_PROGRAM_LEN {
        return Err(LinkError::program_too_large(code.len()));
    }

    let end = code.len();
    code[1] = Instruction::Jump {
        label: None,
        offset: Offset::new(end as i32 - 1),
    };

    let mut program = Program {
        code,
        symbols,
    };
    resolve_branches(&mut program, &entries)?;
    Ok(program)
}

/// Patches labeled branches against rule entry points and renumbers
/// capture ids in emission order.
fn resolve_branches(
    program: &mut Program,
    entries: &HashMap<&str, usize>,
) -> Result<(), LinkError> {
    let mut next_cap_id = 0u32;
    for index in 0..program.code.len() {
        if let Instruction::CapOpen { id, .. } = &mut program.code[index] {
            *id = next_cap_id;
            next_cap_id += 1;
            continue;
        }

        let label = match &program.code[index] {
            Instruction::Call { label, .. } => label.clone(),
            Instruction::Jump {
                label: Some(label), ..
            } => label.clone(),
            _ => continue,
        };
        let Some(&target) = entries.get(label.as_str()) else {
            let referrer = program.rule_at(index).to_string();
            return Err(LinkError::unknown_rule(label, &referrer));
        };
        let offset = Offset::new(target as i32 - index as i32);
        match &mut program.code[index] {
            Instruction::Call { offset: slot, .. } | Instruction::Jump { offset: slot, .. } => {
                *slot = offset;
            }
            _ => {}
        }
    }
    Ok(())
}
