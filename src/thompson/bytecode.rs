//! A Thompson NFA represented in a bytecode format.
//!
//! This module contains the definition of [`Instruction`] and [`Program`],
//! the bytecode shared by every engine of the crate, and the [`Compiler`]
//! turning an [`Ast`] into it. Compiling is a single recursive walk over the
//! tree emitting instructions whose jump targets are symbolic [`Label`]s,
//! followed by a resolution pass replacing the labels with absolute
//! positions.
use std::{fmt, ops::Index};

use crate::ast::{Ast, RepetitionOp};

/// Absolute position of an instruction in a [`Program`].
pub type InstPtr = usize;

/// Bytecode
///
/// `T` is the type of the jump targets. The compiler emits
/// `Instruction<Label>`, a [`Program`] only ever holds `Instruction<InstPtr>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction<T = InstPtr> {
    /// Consume one character if it's equal to this one.
    Char(char),
    Jmp(T),
    /// Fork, the first target has priority over the second one.
    Split(T, T),
    /// Write the current input offset into the given capture slot.
    Save(usize),
    /// Write the current input offset into slot 1 and accept.
    Match,
}

impl<T> Instruction<T> {
    fn map_targets<U>(self, mut f: impl FnMut(T) -> U) -> Instruction<U> {
        match self {
            Instruction::Char(c) => Instruction::Char(c),
            Instruction::Jmp(target) => Instruction::Jmp(f(target)),
            Instruction::Split(first, second) => Instruction::Split(f(first), f(second)),
            Instruction::Save(slot) => Instruction::Save(slot),
            Instruction::Match => Instruction::Match,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Char(c) => write!(f, "char {c:?}"),
            Instruction::Jmp(target) => write!(f, "jmp {target}"),
            Instruction::Split(first, second) => write!(f, "split {first}, {second}"),
            Instruction::Save(slot) => write!(f, "save {slot}"),
            Instruction::Match => write!(f, "match"),
        }
    }
}

/// A symbolic jump target, only meaningful during one compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label(usize);

/// Output of the code generation pass, before labels are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Emitted {
    Inst(Instruction<Label>),
    /// Marks the position the label points to.
    Label(Label),
}

/// A compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
    slot_count: usize,
}

impl Program {
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Number of capture slots used by the program, two per group.
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// Number of capture groups, including the implicit group 0.
    pub fn group_count(&self) -> usize {
        self.slot_count / 2
    }
}

impl Index<InstPtr> for Program {
    type Output = Instruction;

    fn index(&self, pc: InstPtr) -> &Instruction {
        &self.instructions[pc]
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pc, inst) in self.instructions.iter().enumerate() {
            writeln!(f, "{pc:04} {inst}")?;
        }
        Ok(())
    }
}

/// A compiler from [`Ast`] to [`Program`].
///
/// A new compiler is created by each call to [`Compiler::compile`], so label
/// and group numbering always start from scratch.
#[derive(Debug)]
pub struct Compiler {
    code: Vec<Emitted>,
    next_label: usize,
    /// Group 0 is the overall match.
    next_group: usize,
}

impl Compiler {
    pub fn compile(ast: &Ast) -> Program {
        let mut compiler = Compiler {
            code: Vec::new(),
            next_label: 0,
            next_group: 1,
        };
        compiler.push(Instruction::Save(0));
        compiler.compile_internal(ast);
        // Slot 1 is written by Match itself.
        compiler.push(Instruction::Match);

        let slot_count = compiler.next_group * 2;
        let instructions = resolve_labels(compiler.code, compiler.next_label);
        log::trace!(
            "compiled {} into {} instructions, {} capture slots",
            ast,
            instructions.len(),
            slot_count
        );
        Program {
            instructions,
            slot_count,
        }
    }

    fn push(&mut self, instruction: Instruction<Label>) {
        self.code.push(Emitted::Inst(instruction));
    }

    fn new_label(&mut self) -> Label {
        let label = Label(self.next_label);
        self.next_label += 1;
        label
    }

    fn place(&mut self, label: Label) {
        self.code.push(Emitted::Label(label));
    }

    fn compile_internal(&mut self, ast: &Ast) {
        match ast {
            Ast::Char(c) => self.push(Instruction::Char(*c)),
            Ast::Concat(left, right) => {
                self.compile_internal(left);
                self.compile_internal(right);
            }
            Ast::Alternation(left, right) => {
                let (l1, l2, l3) = (self.new_label(), self.new_label(), self.new_label());
                self.push(Instruction::Split(l1, l2));
                self.place(l1);
                self.compile_internal(left);
                self.push(Instruction::Jmp(l3));
                self.place(l2);
                self.compile_internal(right);
                self.place(l3);
            }
            Ast::Repetition(sub, RepetitionOp::ZeroOrOne) => {
                let (l1, l2) = (self.new_label(), self.new_label());
                self.push(Instruction::Split(l1, l2));
                self.place(l1);
                self.compile_internal(sub);
                self.place(l2);
            }
            Ast::Repetition(sub, RepetitionOp::OneOrMore) => {
                let (l1, l2) = (self.new_label(), self.new_label());
                self.place(l1);
                self.compile_internal(sub);
                self.push(Instruction::Split(l1, l2));
                self.place(l2);
            }
            Ast::Repetition(sub, RepetitionOp::ZeroOrMore) => {
                let (l1, l2, l3) = (self.new_label(), self.new_label(), self.new_label());
                self.place(l1);
                self.push(Instruction::Split(l2, l3));
                self.place(l2);
                self.compile_internal(sub);
                self.push(Instruction::Jmp(l1));
                self.place(l3);
            }
            Ast::Capture(sub) => {
                let group = self.next_group;
                self.next_group += 1;
                self.push(Instruction::Save(group * 2));
                self.compile_internal(sub);
                self.push(Instruction::Save(group * 2 + 1));
            }
        }
    }
}

/// Replaces every label with the position of the instruction following it.
///
/// Jumps can point forward, so this is done in two passes: the first one
/// drops the label markers and records where they were, the second one
/// rewrites the targets.
fn resolve_labels(code: Vec<Emitted>, label_count: usize) -> Vec<Instruction> {
    let mut positions: Vec<Option<InstPtr>> = vec![None; label_count];
    let mut unresolved = Vec::with_capacity(code.len());
    for emitted in code {
        match emitted {
            Emitted::Inst(inst) => unresolved.push(inst),
            Emitted::Label(Label(id)) => positions[id] = Some(unresolved.len()),
        }
    }

    unresolved
        .into_iter()
        .map(|inst| {
            inst.map_targets(|Label(id)| match positions[id] {
                Some(pc) => pc,
                None => unreachable!("label {id} is used but never placed"),
            })
        })
        .collect()
}
