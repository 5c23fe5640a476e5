use regex_syntax::ast::{
    self as re, GroupKind, LiteralKind, RepetitionKind, parse::ParserBuilder,
};

use super::{Ast, RepetitionOp};
use crate::error::Error;

/// Parses a pattern into an [`Ast`].
///
/// The grammar is a small subset of the usual regex syntax:
///
/// ```text
/// alternation   -> concatenation ("|" concatenation)*
/// concatenation -> repetition+
/// repetition    -> primary ("?" | "+" | "*")*
/// primary       -> "(" alternation ")" | char
/// ```
///
/// Parsing itself is delegated to [`regex_syntax`], anything it accepts that
/// falls outside of the grammar above is rejected with
/// [`Error::Unsupported`].
pub fn parse(pattern: &str) -> Result<Ast, Error> {
    let mut parser = ParserBuilder::new().build();
    let ast = parser.parse(pattern).map_err(|err| Error::Syntax {
        msg: err.kind().to_string(),
        span: (*err.span()).into(),
    })?;
    translate(&ast)
}

fn translate(ast: &re::Ast) -> Result<Ast, Error> {
    match ast {
        re::Ast::Literal(literal) => match literal.kind {
            LiteralKind::Verbatim => Ok(Ast::Char(literal.c)),
            _ => Err(unsupported(ast, "escape sequence")),
        },
        re::Ast::Concat(concat) => fold(&concat.asts, Ast::concat),
        re::Ast::Alternation(alternation) => fold(&alternation.asts, Ast::alternation),
        re::Ast::Repetition(repetition) => {
            let op = match repetition.op.kind {
                RepetitionKind::ZeroOrOne => RepetitionOp::ZeroOrOne,
                RepetitionKind::OneOrMore => RepetitionOp::OneOrMore,
                RepetitionKind::ZeroOrMore => RepetitionOp::ZeroOrMore,
                RepetitionKind::Range(_) => {
                    return Err(Error::Unsupported {
                        what: "counted repetition",
                        span: repetition.op.span.into(),
                    });
                }
            };
            let ast = Ast::repetition(translate(&repetition.ast)?, op);
            // `a+?` is an optional `a+`, not a lazy one.
            if repetition.greedy {
                Ok(ast)
            } else {
                Ok(Ast::repetition(ast, RepetitionOp::ZeroOrOne))
            }
        }
        re::Ast::Group(group) => match group.kind {
            GroupKind::CaptureIndex(_) => Ok(Ast::capture(translate(&group.ast)?)),
            GroupKind::CaptureName { .. } => Err(unsupported(ast, "named group")),
            GroupKind::NonCapturing(_) => Err(unsupported(ast, "non-capturing group")),
        },
        re::Ast::Empty(span) => Err(Error::Empty {
            span: (**span).into(),
        }),
        re::Ast::Flags(_) => Err(unsupported(ast, "flag")),
        re::Ast::Dot(_) => Err(unsupported(ast, "dot")),
        re::Ast::Assertion(_) => Err(unsupported(ast, "anchor")),
        re::Ast::ClassUnicode(_) | re::Ast::ClassPerl(_) | re::Ast::ClassBracketed(_) => {
            Err(unsupported(ast, "character class"))
        }
    }
}

fn fold(asts: &[re::Ast], join: fn(Ast, Ast) -> Ast) -> Result<Ast, Error> {
    let mut iter = asts.iter();
    let mut acc = match iter.next() {
        Some(first) => translate(first)?,
        // regex-syntax never builds an empty concatenation or alternation,
        // it uses `Ast::Empty` instead.
        None => unreachable!("empty sequence of sub-expressions"),
    };
    for ast in iter {
        acc = join(acc, translate(ast)?);
    }
    Ok(acc)
}

fn unsupported(ast: &re::Ast, what: &'static str) -> Error {
    Error::Unsupported {
        what,
        span: (*ast.span()).into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::Span;
    use pretty_assertions::assert_eq;

    fn c(c: char) -> Ast {
        Ast::char(c)
    }

    #[test]
    fn concat_is_left_associative() {
        assert_eq!(
            parse("abc"),
            Ok(Ast::concat(Ast::concat(c('a'), c('b')), c('c')))
        );
    }

    #[test]
    fn alternation() {
        assert_eq!(
            parse("a|bc|d"),
            Ok(Ast::alternation(
                Ast::alternation(c('a'), Ast::concat(c('b'), c('c'))),
                c('d')
            ))
        );
    }

    #[test]
    fn repetition_binds_tighter_than_concat() {
        assert_eq!(
            parse("ab*"),
            Ok(Ast::concat(
                c('a'),
                Ast::repetition(c('b'), RepetitionOp::ZeroOrMore)
            ))
        );
    }

    #[test]
    fn captures() {
        assert_eq!(
            parse("(a+)|(b+)"),
            Ok(Ast::alternation(
                Ast::capture(Ast::repetition(c('a'), RepetitionOp::OneOrMore)),
                Ast::capture(Ast::repetition(c('b'), RepetitionOp::OneOrMore)),
            ))
        );
    }

    #[test]
    fn non_greedy_suffix_is_an_optional_repetition() {
        assert_eq!(
            parse("a+?"),
            Ok(Ast::repetition(
                Ast::repetition(c('a'), RepetitionOp::OneOrMore),
                RepetitionOp::ZeroOrOne
            ))
        );
    }

    #[test]
    fn stacked_repetitions() {
        assert_eq!(
            parse("a**"),
            Ok(Ast::repetition(
                Ast::repetition(c('a'), RepetitionOp::ZeroOrMore),
                RepetitionOp::ZeroOrMore
            ))
        );
    }

    #[test]
    fn unsupported_constructs() {
        let cases = [
            ("a{2}", "counted repetition"),
            ("[ab]", "character class"),
            (r"\d", "character class"),
            ("a.", "dot"),
            ("^a", "anchor"),
            (r"\*", "escape sequence"),
            ("(?:a)", "non-capturing group"),
            ("(?P<x>a)", "named group"),
            ("(?i)a", "flag"),
        ];
        for (pattern, expected) in cases {
            match parse(pattern) {
                Err(Error::Unsupported { what, .. }) => assert_eq!(what, expected, "{pattern}"),
                other => panic!("unexpected result for {pattern:?}: {other:?}"),
            }
        }
    }

    #[test]
    fn empty_expressions() {
        assert_eq!(
            parse("a|"),
            Err(Error::Empty {
                span: Span::from(2..2)
            })
        );
        assert!(matches!(parse("()"), Err(Error::Empty { .. })));
        assert!(matches!(parse(""), Err(Error::Empty { .. })));
    }

    #[test]
    fn syntax_errors() {
        assert!(matches!(parse("(a"), Err(Error::Syntax { .. })));
        assert!(matches!(parse("a)"), Err(Error::Syntax { .. })));
        assert!(matches!(parse("*a"), Err(Error::Syntax { .. })));
    }
}
