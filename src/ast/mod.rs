//! The abstract syntax tree consumed by the compiler.
//!
//! The tree is binary: a pattern like `abc` is `Concat(Concat(a, b), c)`.
//! Trees are usually produced by [`parse`], but can be built by hand with the
//! constructors on [`Ast`], which is the only way to express shapes the
//! surface syntax lacks, like `(a?){3}`.
use std::fmt;

mod parse;

pub use parse::parse;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ast {
    Char(char),
    Concat(Box<Ast>, Box<Ast>),
    /// Ordered choice, the left branch has priority.
    Alternation(Box<Ast>, Box<Ast>),
    Repetition(Box<Ast>, RepetitionOp),
    Capture(Box<Ast>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepetitionOp {
    /// `?`
    ZeroOrOne,
    /// `+`
    OneOrMore,
    /// `*`
    ZeroOrMore,
}

impl RepetitionOp {
    pub fn symbol(&self) -> char {
        match self {
            RepetitionOp::ZeroOrOne => '?',
            RepetitionOp::OneOrMore => '+',
            RepetitionOp::ZeroOrMore => '*',
        }
    }
}

impl Ast {
    pub fn char(c: char) -> Ast {
        Ast::Char(c)
    }

    pub fn concat(left: Ast, right: Ast) -> Ast {
        Ast::Concat(Box::new(left), Box::new(right))
    }

    pub fn alternation(left: Ast, right: Ast) -> Ast {
        Ast::Alternation(Box::new(left), Box::new(right))
    }

    pub fn repetition(ast: Ast, op: RepetitionOp) -> Ast {
        Ast::Repetition(Box::new(ast), op)
    }

    pub fn capture(ast: Ast) -> Ast {
        Ast::Capture(Box::new(ast))
    }

    /// Concatenates all the given trees from left to right. Returns None if
    /// the iterator is empty.
    pub fn concat_all(asts: impl IntoIterator<Item = Ast>) -> Option<Ast> {
        asts.into_iter().reduce(Ast::concat)
    }

    /// Number of `Capture` nodes in the tree.
    pub fn capture_count(&self) -> usize {
        match self {
            Ast::Char(_) => 0,
            Ast::Concat(left, right) | Ast::Alternation(left, right) => {
                left.capture_count() + right.capture_count()
            }
            Ast::Repetition(ast, _) => ast.capture_count(),
            Ast::Capture(ast) => 1 + ast.capture_count(),
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Ast::Alternation(..) => 0,
            Ast::Concat(..) => 1,
            Ast::Repetition(..) => 2,
            Ast::Char(_) | Ast::Capture(_) => 3,
        }
    }
}

/// Prints the tree back in pattern syntax. There are no non-capturing groups
/// in the grammar, so a tree whose shape can only be written with one, like
/// `Repetition(Concat(a, b))`, doesn't print back to an equivalent pattern.
impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ast::Char(c) => write!(f, "{c}"),
            Ast::Capture(ast) => write!(f, "({ast})"),
            Ast::Repetition(ast, op) => {
                if ast.precedence() < self.precedence() {
                    write!(f, "({ast}){}", op.symbol())
                } else {
                    write!(f, "{ast}{}", op.symbol())
                }
            }
            Ast::Concat(left, right) => {
                write!(f, "{left}")?;
                // The grammar is left-associative, a concatenation on the
                // right only happens in hand-built trees.
                if right.precedence() <= self.precedence() {
                    write!(f, "({right})")
                } else {
                    write!(f, "{right}")
                }
            }
            Ast::Alternation(left, right) => {
                write!(f, "{left}|")?;
                if right.precedence() == 0 {
                    write!(f, "({right})")
                } else {
                    write!(f, "{right}")
                }
            }
        }
    }
}
