//! Expression AST consumed by the pattern translator.
//!
//! The surface parser producing these nodes lives outside this crate.
//! Operators are carried as surface strings so unrecognized constructs can
//! be reported verbatim, and [`Ast`] renders a source-like form for error
//! messages and disassembled capture actions.

use std::fmt;

/// One element of a character-class literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassItem {
    /// Single character member.
    Char(char),
    /// Inclusive character range.
    Range(char, char),
}

impl fmt::Display for ClassItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(c) => write!(f, "'{c}'"),
            Self::Range(lo, hi) => write!(f, "'{lo}'..'{hi}'"),
        }
    }
}

/// One expression node of a parsing-expression grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ast {
    /// String or character literal.
    Str(String),
    /// Case-insensitive string literal (`i"..."`).
    IStr(String),
    /// Integer literal.
    Int(i64),
    /// Rule reference.
    Ident(String),
    /// Character-class literal.
    Class(Vec<ClassItem>),
    /// Prefix operator applied to one operand.
    Prefix {
        /// Surface operator text.
        op: String,
        /// Operand expression.
        expr: Box<Ast>,
    },
    /// Infix operator applied to two operands.
    Infix {
        /// Surface operator text.
        op: String,
        /// Left operand.
        lhs: Box<Ast>,
        /// Right operand.
        rhs: Box<Ast>,
    },
    /// Bounded repetition (`p{n}` or `p{a..b}`).
    Repeat {
        /// Repeated expression.
        expr: Box<Ast>,
        /// Lower bound, or the exact count when `hi` is absent.
        lo: i64,
        /// Upper bound, when a range was written.
        hi: Option<i64>,
    },
    /// Parenthesized block: one child groups, two children attach an action.
    Block(Vec<Ast>),
    /// Call-shaped node (`Js(p)`, `Jf("field", p)`, ...).
    Call {
        /// Callee name.
        name: String,
        /// Argument expressions.
        args: Vec<Ast>,
    },
}

impl Ast {
    /// Creates a string literal node.
    pub fn lit(s: impl Into<String>) -> Ast {
        Ast::Str(s.into())
    }

    /// Creates a case-insensitive string literal node.
    pub fn ilit(s: impl Into<String>) -> Ast {
        Ast::IStr(s.into())
    }

    /// Creates an integer literal node.
    pub fn int(value: i64) -> Ast {
        Ast::Int(value)
    }

    /// Creates a rule reference node.
    pub fn ident(name: impl Into<String>) -> Ast {
        Ast::Ident(name.into())
    }

    /// Creates a character-class node.
    pub fn class(items: Vec<ClassItem>) -> Ast {
        Ast::Class(items)
    }

    /// Creates a prefix operator node.
    pub fn prefix(op: impl Into<String>, expr: Ast) -> Ast {
        Ast::Prefix {
            op: op.into(),
            expr: Box::new(expr),
        }
    }

    /// Creates an infix operator node.
    pub fn infix(op: impl Into<String>, lhs: Ast, rhs: Ast) -> Ast {
        Ast::Infix {
            op: op.into(),
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Creates a repetition node.
    pub fn repeat(expr: Ast, lo: i64, hi: Option<i64>) -> Ast {
        Ast::Repeat {
            expr: Box::new(expr),
            lo,
            hi,
        }
    }

    /// Creates a block node.
    pub fn block(children: Vec<Ast>) -> Ast {
        Ast::Block(children)
    }

    /// Creates a call-shaped node.
    pub fn call(name: impl Into<String>, args: Vec<Ast>) -> Ast {
        Ast::Call {
            name: name.into(),
            args,
        }
    }

    /// Returns whether the node renders without surrounding parentheses.
    fn is_atom(&self) -> bool {
        matches!(
            self,
            Ast::Str(_) | Ast::IStr(_) | Ast::Int(_) | Ast::Ident(_) | Ast::Class(_)
        )
    }
}

/// Escapes literal text for double-quoted source-like rendering.
fn escape_literal(s: &str, out: &mut fmt::Formatter<'_>) -> fmt::Result {
    for c in s.chars() {
        match c {
            '\n' => write!(out, "\\n")?,
            '\r' => write!(out, "\\r")?,
            '\t' => write!(out, "\\t")?,
            '"' => write!(out, "\\\"")?,
            '\\' => write!(out, "\\\\")?,
            _ => write!(out, "{c}")?,
        }
    }
    Ok(())
}

impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ast::Str(s) => {
                write!(f, "\"")?;
                escape_literal(s, f)?;
                write!(f, "\"")
            }
            Ast::IStr(s) => {
                write!(f, "i\"")?;
                escape_literal(s, f)?;
                write!(f, "\"")
            }
            Ast::Int(value) => write!(f, "{value}"),
            Ast::Ident(name) => write!(f, "{name}"),
            Ast::Class(items) => {
                write!(f, "{{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "}}")
            }
            Ast::Prefix { op, expr } => {
                if expr.is_atom() {
                    write!(f, "{op}{expr}")
                } else {
                    write!(f, "{op}({expr})")
                }
            }
            Ast::Infix { op, lhs, rhs } => write!(f, "{lhs} {op} {rhs}"),
            Ast::Repeat { expr, lo, hi } => {
                if expr.is_atom() {
                    write!(f, "{expr}")?;
                } else {
                    write!(f, "({expr})")?;
                }
                match hi {
                    Some(hi) => write!(f, "{{{lo}..{hi}}}"),
                    None => write!(f, "{{{lo}}}"),
                }
            }
            Ast::Block(children) => {
                write!(f, "(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{child}")?;
                }
                write!(f, ")")
            }
            Ast::Call { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}
