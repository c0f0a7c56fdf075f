//! Emission-shape tests: every combinator produces the documented
//! instruction sequence with self-contained branch distances.

use pegc::pattern::{CapKind, CharSet, Instruction, Offset, Pattern};

fn choice(offset: i32) -> Instruction {
    Instruction::Choice(Offset::new(offset))
}

fn commit(offset: i32) -> Instruction {
    Instruction::Commit(Offset::new(offset))
}

fn part_commit(offset: i32) -> Instruction {
    Instruction::PartCommit(Offset::new(offset))
}

fn s(text: &str) -> Instruction {
    Instruction::Str(text.to_string())
}

// ---------------------------------------------------------------------------
// Atoms
// ---------------------------------------------------------------------------

#[test]
fn literal_emits_one_str() {
    assert_eq!(Pattern::literal("a").instructions(), &[s("a")]);
}

#[test]
fn literal_ci_emits_one_istr() {
    assert_eq!(
        Pattern::literal_ci("Key").instructions(),
        &[Instruction::IStr("Key".to_string())]
    );
}

#[test]
fn any_emits_n_copies() {
    assert_eq!(
        Pattern::any(3).instructions(),
        &[Instruction::Any, Instruction::Any, Instruction::Any]
    );
}

#[test]
fn any_of_zero_or_less_is_nop() {
    assert_eq!(Pattern::any(0).instructions(), &[Instruction::Nop]);
    assert_eq!(Pattern::any(-2).instructions(), &[Instruction::Nop]);
}

#[test]
fn set_emits_one_set() {
    let cs = CharSet::range(b'0', b'9');
    assert_eq!(Pattern::set(cs).instructions(), &[Instruction::Set(cs)]);
}

#[test]
fn call_carries_placeholder_offset() {
    assert_eq!(
        Pattern::call("word").instructions(),
        &[Instruction::Call {
            label: "word".to_string(),
            offset: Offset::new(0),
        }]
    );
}

#[test]
fn backref_return_and_err_atoms() {
    assert_eq!(
        Pattern::backref("tag").instructions(),
        &[Instruction::Backref("tag".to_string())]
    );
    assert_eq!(Pattern::ret().instructions(), &[Instruction::Return]);
    assert_eq!(
        Pattern::err("expected digit").instructions(),
        &[Instruction::Err("expected digit".to_string())]
    );
}

// ---------------------------------------------------------------------------
// Capture wrapping
// ---------------------------------------------------------------------------

#[test]
fn capture_wraps_without_touching_the_body() {
    let captured = Pattern::literal("ab").capture(CapKind::JInt, None, None);
    assert_eq!(
        captured.instructions(),
        &[
            Instruction::CapOpen {
                kind: CapKind::JInt,
                name: None,
                action: None,
                id: 0,
            },
            s("ab"),
            Instruction::CapClose {
                kind: CapKind::JInt
            },
        ]
    );
}

#[test]
fn capture_text_uses_the_str_kind() {
    let captured = Pattern::literal("x").capture_text();
    assert_eq!(
        captured.instructions()[0],
        Instruction::CapOpen {
            kind: CapKind::Str,
            name: None,
            action: None,
            id: 0,
        }
    );
    assert_eq!(
        captured.instructions()[2],
        Instruction::CapClose { kind: CapKind::Str }
    );
}

// ---------------------------------------------------------------------------
// Prefix combinators
// ---------------------------------------------------------------------------

#[test]
fn opt_brackets_with_choice_and_commit() {
    assert_eq!(
        Pattern::literal("a").opt().instructions(),
        &[choice(3), s("a"), commit(1)]
    );
}

#[test]
fn star_collapses_a_set_to_span() {
    let cs = CharSet::range(b'a', b'z');
    assert_eq!(
        Pattern::set(cs).star().instructions(),
        &[Instruction::Span(cs)]
    );
}

#[test]
fn star_of_a_single_byte_literal_is_a_span() {
    let mut cs = CharSet::singleton(b'q');
    assert_eq!(
        Pattern::literal("q").star().instructions(),
        &[Instruction::Span(cs)]
    );
    cs.insert(b'Q');
    assert_eq!(
        Pattern::literal_ci("q").star().instructions(),
        &[Instruction::Span(cs)]
    );
}

#[test]
fn star_loops_with_partial_commit() {
    assert_eq!(
        Pattern::literal("ab").star().instructions(),
        &[choice(3), s("ab"), part_commit(-1)]
    );
}

#[test]
fn plus_is_one_copy_then_star() {
    let p = Pattern::literal("ab").plus().expect("within limit");
    assert_eq!(
        p.instructions(),
        &[s("ab"), choice(3), s("ab"), part_commit(-1)]
    );
}

#[test]
fn plus_of_a_set_is_set_then_span() {
    let cs = CharSet::range(b'0', b'9');
    let p = Pattern::set(cs).plus().expect("within limit");
    assert_eq!(
        p.instructions(),
        &[Instruction::Set(cs), Instruction::Span(cs)]
    );
}

#[test]
fn not_pred_commits_into_fail() {
    assert_eq!(
        Pattern::literal("x").not_pred().instructions(),
        &[choice(4), s("x"), commit(1), Instruction::Fail]
    );
}

#[test]
fn search_retries_one_byte_at_a_time() {
    assert_eq!(
        Pattern::literal("end").search().instructions(),
        &[
            choice(3),
            s("end"),
            commit(3),
            Instruction::Any,
            Instruction::Jump {
                label: None,
                offset: Offset::new(-4),
            },
        ]
    );
}

// ---------------------------------------------------------------------------
// Sequencing
// ---------------------------------------------------------------------------

#[test]
fn seq_is_plain_concatenation() {
    let p = Pattern::literal("a")
        .seq(Pattern::literal("b"))
        .expect("within limit");
    assert_eq!(p.instructions(), &[s("a"), s("b")]);
}

#[test]
fn seq_never_rewrites_operand_branches() {
    let left = Pattern::literal("ab").star();
    let right = Pattern::literal("x").opt();
    let combined = left.clone().seq(right.clone()).expect("within limit");
    assert_eq!(&combined.instructions()[..left.len()], left.instructions());
    assert_eq!(&combined.instructions()[left.len()..], right.instructions());
}
