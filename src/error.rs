use thiserror::Error;

use crate::util::Span;

/// Error returned when a pattern can't be turned into an [`crate::ast::Ast`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The pattern is not a valid regular expression at all.
    #[error("{msg}")]
    Syntax { msg: String, span: Span },
    /// The pattern is valid, but uses a construct this engine can't compile.
    #[error("{what} is not supported")]
    Unsupported { what: &'static str, span: Span },
    /// An alternative or a group with nothing in it, like `a|` or `()`.
    #[error("empty expression")]
    Empty { span: Span },
}

impl Error {
    pub fn span(&self) -> Span {
        match self {
            Error::Syntax { span, .. } | Error::Unsupported { span, .. } | Error::Empty { span } => {
                *span
            }
        }
    }
}

/// Error returned by an engine that gave up before deciding whether the input
/// matches.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchError {
    #[error("backtracking exceeded the limit of {limit} pending threads")]
    ThreadLimitExceeded { limit: usize },
}
