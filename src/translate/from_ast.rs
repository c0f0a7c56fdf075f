//! Recursive descent from expression nodes to compiled patterns.

use crate::ast::{Ast, ClassItem};
use crate::pattern::charset::CharSet;
use crate::pattern::error::PatternError;
use crate::pattern::instruction::CapKind;
use crate::pattern::patt::Pattern;
use crate::translate::Translator;

/// Dispatches one expression node by shape and operator.
pub(crate) fn translate_expr(tr: &Translator<'_>, expr: &Ast) -> Result<Pattern, PatternError> {
    match expr {
        Ast::Str(s) => Ok(Pattern::literal(s.clone())),
        Ast::IStr(s) => Ok(Pattern::literal_ci(s.clone())),
        Ast::Int(n) => Ok(Pattern::any(*n)),
        Ast::Ident(name) => match tr.symbols().get(name) {
            Some(compiled) => Ok(compiled.clone()),
            None => Ok(Pattern::call(name.clone())),
        },
        Ast::Class(items) => translate_class(items, expr),
        Ast::Prefix { op, expr: operand } => translate_prefix(tr, op, operand, expr),
        Ast::Infix { op, lhs, rhs } => translate_infix(tr, op, lhs, rhs, expr),
        Ast::Repeat {
            expr: operand,
            lo,
            hi,
        } => translate_repeat(tr, operand, *lo, *hi, expr),
        Ast::Block(children) => translate_block(tr, children, expr),
        Ast::Call { name, args } => translate_call(tr, name, args, expr),
    }
}

/// Builds a byte set from class items. The empty class degenerates to a
/// single wildcard byte.
fn translate_class(items: &[ClassItem], node: &Ast) -> Result<Pattern, PatternError> {
    if items.is_empty() {
        return Ok(Pattern::any(1));
    }
    let mut cs = CharSet::new();
    for item in items {
        match *item {
            ClassItem::Char(c) => {
                cs.insert(class_byte(c, node)?);
            }
            ClassItem::Range(lo, hi) => {
                let (lo, hi) = (class_byte(lo, node)?, class_byte(hi, node)?);
                if lo > hi {
                    return Err(PatternError::malformed_char_class(
                        format!("range '{}'..'{}' is inverted", lo as char, hi as char),
                        node,
                    ));
                }
                cs.insert_range(lo, hi);
            }
        }
    }
    Ok(Pattern::set(cs))
}

/// Class members must fit in one byte.
fn class_byte(c: char, node: &Ast) -> Result<u8, PatternError> {
    u8::try_from(u32::from(c)).map_err(|_| {
        PatternError::malformed_char_class(format!("character '{c}' is not a byte value"), node)
    })
}

fn translate_prefix(
    tr: &Translator<'_>,
    op: &str,
    operand: &Ast,
    node: &Ast,
) -> Result<Pattern, PatternError> {
    let compiled = translate_expr(tr, operand)?;
    match op {
        "?" => Ok(compiled.opt()),
        "*" => Ok(compiled.star()),
        "+" => compiled.plus(),
        "!" => Ok(compiled.not_pred()),
        "&" => Ok(compiled.and_pred()),
        ">" => Ok(compiled.capture_text()),
        "@" => Ok(compiled.search()),
        _ => Err(PatternError::unknown_construct(
            format!("prefix operator `{op}` is not recognized"),
            node,
        )),
    }
}

fn translate_infix(
    tr: &Translator<'_>,
    op: &str,
    lhs: &Ast,
    rhs: &Ast,
    node: &Ast,
) -> Result<Pattern, PatternError> {
    match op {
        "*" => translate_expr(tr, lhs)?.seq(translate_expr(tr, rhs)?),
        "|" => translate_expr(tr, lhs)?.choice(translate_expr(tr, rhs)?),
        "-" => translate_expr(tr, lhs)?.diff(translate_expr(tr, rhs)?),
        "%" => Ok(translate_expr(tr, lhs)?.capture(CapKind::Action, None, Some(rhs.clone()))),
        _ => Err(PatternError::unknown_construct(
            format!("infix operator `{op}` is not recognized"),
            node,
        )),
    }
}

fn translate_repeat(
    tr: &Translator<'_>,
    operand: &Ast,
    lo: i64,
    hi: Option<i64>,
    node: &Ast,
) -> Result<Pattern, PatternError> {
    let Ok(lo) = u32::try_from(lo) else {
        return Err(PatternError::unknown_construct(
            format!("repetition count {lo} is out of range"),
            node,
        ));
    };
    let compiled = translate_expr(tr, operand)?;
    match hi {
        None => compiled.repeat(lo),
        Some(hi) => {
            let hi = u32::try_from(hi).ok().filter(|&hi| hi >= lo).ok_or_else(|| {
                PatternError::unknown_construct(
                    format!("repetition bounds {lo}..{hi} are out of order"),
                    node,
                )
            })?;
            compiled.repeat_range(lo, hi)
        }
    }
}

/// One child groups; two children attach the second as a capture action.
fn translate_block(
    tr: &Translator<'_>,
    children: &[Ast],
    node: &Ast,
) -> Result<Pattern, PatternError> {
    match children {
        [child] => translate_expr(tr, child),
        [child, action] => Ok(translate_expr(tr, child)?.capture(
            CapKind::Action,
            None,
            Some(action.clone()),
        )),
        _ => Err(PatternError::unknown_construct(
            format!("block with {} children is not recognized", children.len()),
            node,
        )),
    }
}

/// `Jx(p)` call forms mapping to JSON capture kinds. The ternary
/// `Jf("field", p)` form names a fixed object field.
fn translate_call(
    tr: &Translator<'_>,
    name: &str,
    args: &[Ast],
    node: &Ast,
) -> Result<Pattern, PatternError> {
    if !name.starts_with('J') {
        return Err(PatternError::unknown_construct(
            format!("call to `{name}` is not recognized"),
            node,
        ));
    }

    if name == "Jf" && args.len() == 2 {
        let Ast::Str(field) = &args[0] else {
            return Err(PatternError::malformed_capture(
                "field selector must be a string literal",
                node,
            ));
        };
        let body = translate_expr(tr, &args[1])?;
        return Ok(body.capture(CapKind::JFieldFixed, Some(field.clone()), None));
    }

    let kind = match name {
        "Js" => CapKind::JString,
        "Ji" => CapKind::JInt,
        "Jf" => CapKind::JFloat,
        "Ja" => CapKind::JArray,
        "Jo" => CapKind::JObject,
        "Jt" => CapKind::JFieldDynamic,
        _ => {
            return Err(PatternError::malformed_capture(
                format!("capture kind `{name}` is not recognized"),
                node,
            ));
        }
    };
    let [body] = args else {
        return Err(PatternError::malformed_capture(
            format!("`{name}` takes exactly one pattern argument"),
            node,
        ));
    };
    Ok(translate_expr(tr, body)?.capture(kind, None, None))
}
