//! A small regular expression engine.
//!
//! Patterns are parsed into an [`Ast`], compiled into a linear bytecode
//! [`Program`] and executed by one of three engines which always agree on
//! the result:
//!
//! * [`match_recursive`], a recursive backtracker,
//! * [`match_non_recursive`], a backtracker with a bounded explicit stack,
//! * [`match_thompson`], a Pike VM running in linear time.
//!
//! ```
//! let program = regvm::compile(&regvm::parse("(a+)(b+)").unwrap());
//! let caps = regvm::match_thompson(&program, "aabbbc").unwrap();
//! assert_eq!(caps.offsets(), vec![0, 5, 0, 2, 2, 5]);
//! ```

pub mod ast;
pub mod error;
pub mod regex;
pub mod thompson;
pub mod util;

pub use ast::{Ast, RepetitionOp, parse};
pub use error::{Error, MatchError};
pub use crate::regex::{Builder, Config, Engine, Regex};
pub use thompson::bytecode::{Instruction, Program};
pub use util::{Captures, Match, Span};

use thompson::backtrack::{BoundedBacktracker, RecursiveBacktracker};
use thompson::bytecode::Compiler;
use thompson::pike_vm::PikeVM;

/// Compiles the tree into a [`Program`].
pub fn compile(ast: &Ast) -> Program {
    Compiler::compile(ast)
}

/// Runs the program with the [`RecursiveBacktracker`]. Offsets in the
/// returned [`Captures`] are byte offsets into `subject`.
///
/// Never returns on a loop whose body can match the empty string, like `a**`
/// or `(a?)*` against `"b"`: the recursion goes on until the stack
/// overflows and the process aborts. Prefer [`match_non_recursive`] or
/// [`match_thompson`] for patterns that aren't trusted.
pub fn match_recursive<'s>(program: &Program, subject: &'s str) -> Option<Captures<'s>> {
    RecursiveBacktracker.find_captures(program, subject)
}

/// Runs the program with a [`BoundedBacktracker`] allowing
/// [`thompson::backtrack::DEFAULT_THREAD_LIMIT`] pending threads. Offsets
/// are byte offsets into `subject`.
pub fn match_non_recursive<'s>(
    program: &Program,
    subject: &'s str,
) -> Result<Option<Captures<'s>>, MatchError> {
    BoundedBacktracker::default().find_captures(program, subject)
}

/// Runs the program with the [`PikeVM`]. Offsets are byte offsets into
/// `subject`.
pub fn match_thompson<'s>(program: &Program, subject: &'s str) -> Option<Captures<'s>> {
    PikeVM.find_captures(program, subject)
}
