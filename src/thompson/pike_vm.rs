//! An interpreter for [`crate::thompson::bytecode`] simulating all the
//! threads of the NFA in lock-step.

use std::mem;

use crate::{
    error::MatchError,
    regex::RegexImpl,
    thompson::bytecode::{InstPtr, Instruction::*, Program},
    util::Captures,
};

/// A so-called PikeVM.
///
/// All live threads advance over the input one character at a time. At most
/// one thread per instruction is kept at each position, so the cost of a
/// search is bounded by `O(program.len() * subject.len())` no matter how
/// much backtracking the pattern would need.
#[derive(Debug, Default, Clone, Copy)]
pub struct PikeVM;

/// A thread currently alive in the bytecode.
#[derive(Debug)]
struct Thread {
    pc: InstPtr,
    slots: Box<[Option<usize>]>,
}

/// An ordered list of threads, with at most one thread per instruction.
struct Threads {
    list: Vec<Thread>,
    /// `visited[pc] == generation` iff `pc` was reached since the last
    /// [`Threads::clear`].
    visited: Box<[u32]>,
    generation: u32,
}

impl Threads {
    fn new(state_count: usize) -> Self {
        Self {
            list: Vec::with_capacity(state_count),
            visited: vec![0; state_count].into_boxed_slice(),
            generation: 1,
        }
    }

    /// Marks `pc` as visited, returns false if it already was.
    fn visit(&mut self, pc: InstPtr) -> bool {
        let value = &mut self.visited[pc];
        if *value == self.generation {
            false
        } else {
            *value = self.generation;
            true
        }
    }

    fn clear(&mut self) {
        self.list.clear();
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            self.visited.fill(0);
            self.generation = 1;
        }
    }

    fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

impl PikeVM {
    /// Adds the thread at `pc` to `threads`, after following every `Jmp`,
    /// `Split` and `Save` reachable from it without consuming input. Only
    /// threads stopped at a `Char` or a `Match` end up in the list, in the
    /// priority order given by the `Split`s.
    fn add_thread(
        &self,
        program: &Program,
        threads: &mut Threads,
        stack: &mut Vec<Thread>,
        at: usize,
        thread: Thread,
    ) {
        stack.push(thread);
        while let Some(Thread { mut pc, mut slots }) = stack.pop() {
            loop {
                if !threads.visit(pc) {
                    break;
                }
                match program[pc] {
                    Char(_) | Match => {
                        threads.list.push(Thread { pc, slots });
                        break;
                    }
                    Jmp(target) => pc = target,
                    Split(first, second) => {
                        stack.push(Thread {
                            pc: second,
                            slots: slots.clone(),
                        });
                        pc = first;
                    }
                    Save(slot) => {
                        slots[slot] = Some(at);
                        pc += 1;
                    }
                }
            }
        }
    }

    pub fn find_captures<'s>(&self, program: &Program, subject: &'s str) -> Option<Captures<'s>> {
        let mut current = Threads::new(program.len());
        let mut next = Threads::new(program.len());
        let mut stack = Vec::new();
        let mut best_match = None;
        let mut at = 0;

        let first_thread = Thread {
            pc: 0,
            slots: vec![None; program.slot_count()].into_boxed_slice(),
        };
        self.add_thread(program, &mut current, &mut stack, at, first_thread);

        while !current.is_empty() {
            let c = subject[at..].chars().next();
            let next_at = at + c.map_or(0, char::len_utf8);
            for thread in mem::take(&mut current.list) {
                match program[thread.pc] {
                    Char(c2) => {
                        if c == Some(c2) {
                            let thread = Thread {
                                pc: thread.pc + 1,
                                slots: thread.slots,
                            };
                            self.add_thread(program, &mut next, &mut stack, next_at, thread);
                        }
                    }
                    Match => {
                        let mut slots = thread.slots;
                        slots[1] = Some(at);
                        best_match = Some(slots);
                        // Every thread left in the list has a lower priority
                        // than this one. The ones already in `next` have a
                        // higher priority and keep running.
                        break;
                    }
                    Jmp(_) | Split(..) | Save(_) => unreachable!(
                        "control instruction {} at {} in the thread list",
                        program[thread.pc], thread.pc
                    ),
                }
            }
            current.clear();
            if c.is_none() {
                break;
            }
            mem::swap(&mut current, &mut next);
            at = next_at;
        }

        let slots = best_match?;
        log::trace!("pike vm matched {:?}", slots);
        Some(Captures::new(subject, slots))
    }
}

impl RegexImpl for PikeVM {
    fn exec<'s>(
        &self,
        program: &Program,
        subject: &'s str,
    ) -> Result<Option<Captures<'s>>, MatchError> {
        Ok(self.find_captures(program, subject))
    }
}
