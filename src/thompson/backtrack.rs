//! Backtracking interpreters for [`crate::thompson::bytecode`].
//!
//! Both engines explore the alternatives of every `Split` depth-first, the
//! first target to completion before the second, and return the first
//! thread reaching `Match`. [`RecursiveBacktracker`] uses the call stack to
//! remember the alternatives left to try, [`BoundedBacktracker`] keeps them
//! in a vector of bounded size.

use crate::{
    error::MatchError,
    regex::RegexImpl,
    thompson::bytecode::{InstPtr, Instruction::*, Program},
    util::Captures,
};

/// Default maximum number of pending threads of a [`BoundedBacktracker`].
pub const DEFAULT_THREAD_LIMIT: usize = 1000;

/// Recursive backtracking.
///
/// The recursion depth grows with the number of `Split` and `Save`
/// instructions executed on the current path, so pathological patterns
/// against long inputs can overflow the stack. Patterns looping on a body
/// that can match the empty string, like `(a*)*`, never terminate. Use
/// [`BoundedBacktracker`] or [`crate::thompson::pike_vm::PikeVM`] for
/// untrusted patterns or inputs.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecursiveBacktracker;

impl RecursiveBacktracker {
    pub fn find_captures<'s>(&self, program: &Program, subject: &'s str) -> Option<Captures<'s>> {
        let mut slots = vec![None; program.slot_count()];
        let search = Search { program, subject };
        if search.step(0, 0, &mut slots) {
            Some(Captures::new(subject, slots.into_boxed_slice()))
        } else {
            None
        }
    }
}

struct Search<'a, 's> {
    program: &'a Program,
    subject: &'s str,
}

impl Search<'_, '_> {
    /// Runs the thread at `pc` until it matches or dies. On failure every
    /// slot written along the way has been restored.
    fn step(&self, mut pc: InstPtr, mut at: usize, slots: &mut [Option<usize>]) -> bool {
        loop {
            match self.program[pc] {
                Char(c) => match self.subject[at..].chars().next() {
                    Some(c2) if c2 == c => {
                        pc += 1;
                        at += c.len_utf8();
                    }
                    _ => return false,
                },
                Jmp(target) => pc = target,
                Split(first, second) => {
                    return self.step(first, at, slots) || self.step(second, at, slots);
                }
                Save(slot) => {
                    let prev = slots[slot].replace(at);
                    if self.step(pc + 1, at, slots) {
                        return true;
                    }
                    slots[slot] = prev;
                    return false;
                }
                Match => {
                    slots[1] = Some(at);
                    return true;
                }
            }
        }
    }
}

impl RegexImpl for RecursiveBacktracker {
    fn exec<'s>(
        &self,
        program: &Program,
        subject: &'s str,
    ) -> Result<Option<Captures<'s>>, MatchError> {
        Ok(self.find_captures(program, subject))
    }
}

/// Backtracking with an explicit stack of pending threads.
///
/// Finds the same match as [`RecursiveBacktracker`], but gives up with
/// [`MatchError::ThreadLimitExceeded`] instead of growing the stack past
/// `thread_limit` threads.
#[derive(Debug, Clone, Copy)]
pub struct BoundedBacktracker {
    thread_limit: usize,
}

/// A thread waiting to be resumed. Each one owns a copy of the slots as they
/// were when it was forked.
#[derive(Debug)]
struct Thread {
    pc: InstPtr,
    at: usize,
    slots: Box<[Option<usize>]>,
}

impl Default for BoundedBacktracker {
    fn default() -> Self {
        Self::new(DEFAULT_THREAD_LIMIT)
    }
}

impl BoundedBacktracker {
    pub fn new(thread_limit: usize) -> Self {
        Self { thread_limit }
    }

    pub fn thread_limit(&self) -> usize {
        self.thread_limit
    }

    pub fn find_captures<'s>(
        &self,
        program: &Program,
        subject: &'s str,
    ) -> Result<Option<Captures<'s>>, MatchError> {
        let mut stack = vec![Thread {
            pc: 0,
            at: 0,
            slots: vec![None; program.slot_count()].into_boxed_slice(),
        }];

        while let Some(Thread {
            mut pc,
            mut at,
            mut slots,
        }) = stack.pop()
        {
            loop {
                match program[pc] {
                    Char(c) => match subject[at..].chars().next() {
                        Some(c2) if c2 == c => {
                            pc += 1;
                            at += c.len_utf8();
                        }
                        _ => break,
                    },
                    Jmp(target) => pc = target,
                    Split(first, second) => {
                        if stack.len() >= self.thread_limit {
                            log::debug!(
                                "giving up at offset {at}, {} threads pending",
                                stack.len()
                            );
                            return Err(MatchError::ThreadLimitExceeded {
                                limit: self.thread_limit,
                            });
                        }
                        stack.push(Thread {
                            pc: second,
                            at,
                            slots: slots.clone(),
                        });
                        pc = first;
                    }
                    Save(slot) => {
                        slots[slot] = Some(at);
                        pc += 1;
                    }
                    Match => {
                        slots[1] = Some(at);
                        return Ok(Some(Captures::new(subject, slots)));
                    }
                }
            }
        }
        Ok(None)
    }
}

impl RegexImpl for BoundedBacktracker {
    fn exec<'s>(
        &self,
        program: &Program,
        subject: &'s str,
    ) -> Result<Option<Captures<'s>>, MatchError> {
        self.find_captures(program, subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Ast, RepetitionOp, parse};
    use crate::thompson::bytecode::Compiler;
    use pretty_assertions::assert_eq;

    fn c(pattern: &str) -> Program {
        Compiler::compile(&parse(pattern).expect("should be a valid pattern"))
    }

    /// Runs both backtrackers, checks they agree and returns the offsets.
    fn offsets(pattern: &str, subject: &str) -> Option<Vec<usize>> {
        let program = c(pattern);
        let recursive = RecursiveBacktracker.find_captures(&program, subject);
        let bounded = BoundedBacktracker::default()
            .find_captures(&program, subject)
            .expect("should not overflow");
        assert_eq!(recursive, bounded, "{pattern} against {subject}");
        recursive.map(|caps| caps.offsets())
    }

    #[test]
    fn whole_match() {
        assert_eq!(offsets("a+b+", "aaabb"), Some(vec![0, 5]));
        assert_eq!(offsets("a+b+", "aabbbc"), Some(vec![0, 5]));
        assert_eq!(offsets("a+b+", "bbaaa"), None);
        assert_eq!(offsets("a+b+", "ab"), Some(vec![0, 2]));
        assert_eq!(offsets("a+b+", "a"), None);
    }

    #[test]
    fn matches_a_prefix() {
        assert_eq!(offsets("ab", "abc"), Some(vec![0, 2]));
        assert_eq!(offsets("a*", "bbb"), Some(vec![0, 0]));
        assert_eq!(offsets("a*", ""), Some(vec![0, 0]));
    }

    #[test]
    fn captures() {
        assert_eq!(offsets("(a+)(b+)", "aabbbc"), Some(vec![0, 5, 0, 2, 2, 5]));
        assert_eq!(offsets("(a+)|(b+)", "bbb"), Some(vec![0, 3, 0, 3]));
    }

    #[test]
    fn failed_branches_leave_no_trace() {
        let program = c("(a)b|(a)c");
        let caps = RecursiveBacktracker
            .find_captures(&program, "ac")
            .unwrap();
        assert_eq!(
            caps.slots(),
            &[Some(0), Some(2), None, None, Some(0), Some(1)]
        );
        assert_eq!(
            BoundedBacktracker::default()
                .find_captures(&program, "ac")
                .unwrap(),
            Some(caps)
        );
    }

    #[test]
    fn greedy_by_construction() {
        assert_eq!(offsets("a+?", "aaabb"), Some(vec![0, 3]));
        assert_eq!(offsets("(a*)(a)", "aaa"), Some(vec![0, 3, 0, 2, 2, 3]));
        assert_eq!(offsets("(a|ab)(c|bcd)", "abcd"), Some(vec![0, 4, 0, 1, 1, 4]));
    }

    #[test]
    fn non_ascii() {
        assert_eq!(offsets("(é+)ß", "ééßx"), Some(vec![0, 6, 0, 4]));
    }

    #[test]
    fn thread_limit() {
        // (a?)(a?)...(a?)aaa...a, twenty times each.
        let n = 20;
        let optional = (0..n).map(|_| {
            Ast::capture(Ast::repetition(Ast::char('a'), RepetitionOp::ZeroOrOne))
        });
        let required = (0..n).map(|_| Ast::char('a'));
        let ast = Ast::concat_all(optional.chain(required)).unwrap();
        let program = Compiler::compile(&ast);
        let subject = "a".repeat(n - 1);

        assert_eq!(
            BoundedBacktracker::new(10).find_captures(&program, &subject),
            Err(MatchError::ThreadLimitExceeded { limit: 10 })
        );
        // A limit above the input length is enough, the search just takes
        // longer.
        assert_eq!(
            BoundedBacktracker::new(64)
                .find_captures(&program, "aaaaaaaa")
                .unwrap(),
            None
        );
    }

    #[test]
    fn empty_loop_body_hits_the_limit() {
        // The recursive engine never returns on these.
        for pattern in ["a**", "(a?)*"] {
            assert_eq!(
                BoundedBacktracker::new(50).find_captures(&c(pattern), "b"),
                Err(MatchError::ThreadLimitExceeded { limit: 50 }),
                "{pattern}"
            );
        }
    }

    #[test]
    fn limit_counts_pending_threads() {
        // Every `?` leaves one pending thread behind while the first branch
        // is explored.
        let program = c("a?a?a?");
        assert!(
            BoundedBacktracker::new(2)
                .find_captures(&program, "aaa")
                .is_err()
        );
        assert_eq!(
            BoundedBacktracker::new(3)
                .find_captures(&program, "aaa")
                .unwrap()
                .map(|caps| caps.offsets()),
            Some(vec![0, 3])
        );
    }
}
