//! Translator dispatch: every node shape lowers to the documented pattern.

use pegc::ast::{Ast, ClassItem};
use pegc::pattern::{CapKind, CharSet, Instruction, Pattern, PatternError};
use pegc::translate::{SymbolTable, Translator};

fn translate(expr: &Ast) -> Result<Pattern, PatternError> {
    let symbols = SymbolTable::new();
    Translator::new(&symbols).translate(expr)
}

// ---------------------------------------------------------------------------
// Literals and identifiers
// ---------------------------------------------------------------------------

#[test]
fn string_literal_lowers_to_str() {
    assert_eq!(translate(&Ast::lit("abc")).unwrap(), Pattern::literal("abc"));
}

#[test]
fn case_insensitive_literal_lowers_to_istr() {
    assert_eq!(
        translate(&Ast::ilit("select")).unwrap(),
        Pattern::literal_ci("select")
    );
}

#[test]
fn integer_literal_lowers_to_any() {
    assert_eq!(translate(&Ast::int(3)).unwrap(), Pattern::any(3));
    assert_eq!(translate(&Ast::int(0)).unwrap(), Pattern::any(0));
}

#[test]
fn unknown_identifier_lowers_to_a_call() {
    assert_eq!(
        translate(&Ast::ident("word")).unwrap(),
        Pattern::call("word")
    );
}

#[test]
fn known_identifier_inlines_the_compiled_rule() {
    let mut symbols = SymbolTable::new();
    let compiled = Pattern::set(CharSet::range(b'0', b'9')).star();
    symbols.insert("digits".to_string(), compiled.clone());

    let translated = Translator::new(&symbols)
        .translate(&Ast::ident("digits"))
        .unwrap();
    assert_eq!(translated, compiled);
}

// ---------------------------------------------------------------------------
// Character classes
// ---------------------------------------------------------------------------

#[test]
fn class_builds_one_set() {
    let expr = Ast::class(vec![
        ClassItem::Range('a', 'z'),
        ClassItem::Char('_'),
    ]);
    let mut expected = CharSet::range(b'a', b'z');
    expected.insert(b'_');
    assert_eq!(translate(&expr).unwrap(), Pattern::set(expected));
}

#[test]
fn empty_class_degenerates_to_one_wildcard_byte() {
    assert_eq!(translate(&Ast::class(vec![])).unwrap(), Pattern::any(1));
}

// ---------------------------------------------------------------------------
// Prefix operators
// ---------------------------------------------------------------------------

#[test]
fn prefix_operators_dispatch_to_the_combinators() {
    let operand = Ast::lit("ab");
    let compiled = Pattern::literal("ab");

    let cases: Vec<(&str, Pattern)> = vec![
        ("?", compiled.clone().opt()),
        ("*", compiled.clone().star()),
        ("+", compiled.clone().plus().unwrap()),
        ("!", compiled.clone().not_pred()),
        ("&", compiled.clone().and_pred()),
        (">", compiled.clone().capture_text()),
        ("@", compiled.clone().search()),
    ];
    for (op, expected) in cases {
        let translated = translate(&Ast::prefix(op, operand.clone())).unwrap();
        assert_eq!(translated, expected, "operator `{op}`");
    }
}

// ---------------------------------------------------------------------------
// Infix operators
// ---------------------------------------------------------------------------

#[test]
fn sequence_concatenates() {
    let expr = Ast::infix("*", Ast::lit("a"), Ast::lit("b"));
    let expected = Pattern::literal("a").seq(Pattern::literal("b")).unwrap();
    assert_eq!(translate(&expr).unwrap(), expected);
}

#[test]
fn ordered_choice_folds_reducible_operands() {
    let expr = Ast::infix(
        "|",
        Ast::infix("|", Ast::lit("a"), Ast::lit("b")),
        Ast::lit("c"),
    );
    let mut expected = CharSet::singleton(b'a');
    expected.insert(b'b');
    expected.insert(b'c');
    assert_eq!(translate(&expr).unwrap(), Pattern::set(expected));
}

#[test]
fn difference_folds_reducible_operands() {
    let expr = Ast::infix("-", Ast::lit("y"), Ast::lit("x"));
    let expected = CharSet::singleton(b'y').difference(&CharSet::singleton(b'x'));
    assert_eq!(translate(&expr).unwrap(), Pattern::set(expected));
}

#[test]
fn percent_attaches_the_action_to_an_action_capture() {
    let action = Ast::infix("+", Ast::ident("a"), Ast::int(1));
    let expr = Ast::infix("%", Ast::lit("x"), action.clone());
    let expected = Pattern::literal("x").capture(CapKind::Action, None, Some(action));
    assert_eq!(translate(&expr).unwrap(), expected);
}

// ---------------------------------------------------------------------------
// Blocks and repetition
// ---------------------------------------------------------------------------

#[test]
fn single_child_block_is_transparent() {
    let expr = Ast::block(vec![Ast::lit("ab")]);
    assert_eq!(translate(&expr).unwrap(), Pattern::literal("ab"));
}

#[test]
fn two_child_block_attaches_an_action_capture() {
    let action = Ast::ident("handler");
    let expr = Ast::block(vec![Ast::lit("ab"), action.clone()]);
    let expected = Pattern::literal("ab").capture(CapKind::Action, None, Some(action));
    assert_eq!(translate(&expr).unwrap(), expected);
}

#[test]
fn exact_repetition_concatenates_copies() {
    let expr = Ast::repeat(Ast::lit("ab"), 2, None);
    assert_eq!(
        translate(&expr).unwrap(),
        Pattern::literal("ab").repeat(2).unwrap()
    );
}

#[test]
fn ranged_repetition_appends_optional_tail() {
    let expr = Ast::repeat(Ast::lit("ab"), 1, Some(3));
    assert_eq!(
        translate(&expr).unwrap(),
        Pattern::literal("ab").repeat_range(1, 3).unwrap()
    );
}

// ---------------------------------------------------------------------------
// JSON capture calls
// ---------------------------------------------------------------------------

#[test]
fn unary_capture_calls_map_to_their_kinds() {
    let cases = [
        ("Js", CapKind::JString),
        ("Ji", CapKind::JInt),
        ("Jf", CapKind::JFloat),
        ("Ja", CapKind::JArray),
        ("Jo", CapKind::JObject),
        ("Jt", CapKind::JFieldDynamic),
    ];
    for (name, kind) in cases {
        let expr = Ast::call(name, vec![Ast::lit("x")]);
        let expected = Pattern::literal("x").capture(kind, None, None);
        assert_eq!(translate(&expr).unwrap(), expected, "call `{name}`");
    }
}

#[test]
fn ternary_jf_names_a_fixed_field() {
    let expr = Ast::call("Jf", vec![Ast::lit("count"), Ast::lit("42")]);
    let expected =
        Pattern::literal("42").capture(CapKind::JFieldFixed, Some("count".to_string()), None);
    assert_eq!(translate(&expr).unwrap(), expected);
}

// ---------------------------------------------------------------------------
// A small end-to-end expression
// ---------------------------------------------------------------------------

#[test]
fn identifier_rule_shape_translates_cleanly() {
    // {'a'..'z','_'} * *{'a'..'z','0'..'9','_'}
    let head = Ast::class(vec![ClassItem::Range('a', 'z'), ClassItem::Char('_')]);
    let tail = Ast::prefix(
        "*",
        Ast::class(vec![
            ClassItem::Range('a', 'z'),
            ClassItem::Range('0', '9'),
            ClassItem::Char('_'),
        ]),
    );
    let expr = Ast::infix("*", head, tail);

    let translated = translate(&expr).unwrap();
    assert_eq!(translated.len(), 2);
    assert!(matches!(translated.instructions()[0], Instruction::Set(_)));
    assert!(matches!(translated.instructions()[1], Instruction::Span(_)));
}
