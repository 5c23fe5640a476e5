//! Types and API for Regex matching
//!
//! This module defines the [`Regex`] struct, which is a nice wrapper around a
//! compiled [`Program`] and one of the available [`RegexImpl`].

use crate::ast::{self, Ast};
use crate::error::{Error, MatchError};
use crate::thompson::backtrack::{BoundedBacktracker, DEFAULT_THREAD_LIMIT, RecursiveBacktracker};
use crate::thompson::bytecode::{Compiler, Program};
use crate::thompson::pike_vm::PikeVM;
use crate::util::{Captures, Match};

/// A regular expression
///
/// Matches are anchored at the start of the subject, but don't need to
/// reach its end: `a+` matches `"aab"` with the span `0..2`.
#[derive(Debug, Clone)]
pub struct Regex {
    program: Program,
    engine: RegexEngine,
}

impl Regex {
    /// Compiles the pattern with the default configuration.
    pub fn new(pattern: &str) -> Result<Self, Error> {
        Builder::new(pattern).build()
    }

    pub fn recursive(pattern: &str) -> Result<Self, Error> {
        Builder::new(pattern).engine(Engine::Recursive).build()
    }

    pub fn backtrack(pattern: &str) -> Result<Self, Error> {
        Builder::new(pattern).engine(Engine::Backtrack).build()
    }

    pub fn pike_vm(pattern: &str) -> Result<Self, Error> {
        Builder::new(pattern).engine(Engine::PikeVM).build()
    }

    /// Compiles an already parsed pattern.
    pub fn from_ast(ast: &Ast, config: Config) -> Self {
        Self {
            program: Compiler::compile(ast),
            engine: RegexEngine::new(&config),
        }
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Returns true whenever the subject matches the regex or not, without
    /// returning the bounds of the match.
    pub fn is_match(&self, subject: &str) -> Result<bool, MatchError> {
        Ok(self.find_captures(subject)?.is_some())
    }

    /// Match the regex against the subject and returns the bounds of the
    /// match or None.
    pub fn find<'s>(&self, subject: &'s str) -> Result<Option<Match<'s>>, MatchError> {
        Ok(self.find_captures(subject)?.map(|caps| caps.group0()))
    }

    /// Match the regex against the subject and returns a match with all its
    /// capture groups bounds or None.
    pub fn find_captures<'s>(&self, subject: &'s str) -> Result<Option<Captures<'s>>, MatchError> {
        match &self.engine {
            RegexEngine::Recursive(engine) => engine.exec(&self.program, subject),
            RegexEngine::Backtrack(engine) => engine.exec(&self.program, subject),
            RegexEngine::PikeVM(engine) => engine.exec(&self.program, subject),
        }
    }
}

/// The strategies available to execute a [`Program`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    /// [`RecursiveBacktracker`]. Can overflow the stack.
    Recursive,
    /// [`BoundedBacktracker`]. Can fail with [`MatchError`].
    Backtrack,
    /// [`PikeVM`]. Linear in the size of the subject.
    PikeVM,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub engine: Engine,
    /// Maximum number of pending threads of [`Engine::Backtrack`].
    pub thread_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: Engine::PikeVM,
            thread_limit: DEFAULT_THREAD_LIMIT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Builder<'s> {
    pattern: &'s str,
    config: Config,
}

impl<'s> Builder<'s> {
    pub fn new(pattern: &'s str) -> Self {
        Self {
            pattern,
            config: Config::default(),
        }
    }

    pub fn engine(mut self, value: Engine) -> Self {
        self.config.engine = value;
        self
    }

    pub fn thread_limit(mut self, value: usize) -> Self {
        self.config.thread_limit = value;
        self
    }

    pub fn build(self) -> Result<Regex, Error> {
        let ast = ast::parse(self.pattern)?;
        Ok(Regex::from_ast(&ast, self.config))
    }
}

/// A regex implementation. Used to dispatch to
/// the right version at runtime.
#[derive(Debug, Clone)]
pub(crate) enum RegexEngine {
    Recursive(RecursiveBacktracker),
    Backtrack(BoundedBacktracker),
    PikeVM(PikeVM),
}

impl RegexEngine {
    fn new(config: &Config) -> Self {
        match config.engine {
            Engine::Recursive => RegexEngine::Recursive(RecursiveBacktracker),
            Engine::Backtrack => {
                RegexEngine::Backtrack(BoundedBacktracker::new(config.thread_limit))
            }
            Engine::PikeVM => RegexEngine::PikeVM(PikeVM),
        }
    }
}

/// The Regex impl trait
///
/// Defines the lower-level api implemented by all engines in this crate.
/// For the user-facing one, see [`Regex`] just above.
pub trait RegexImpl {
    /// Runs the program against the subject from offset 0. Returns the
    /// captures of the highest priority thread reaching `Match`, None if
    /// there is none, or an error if the engine gave up.
    fn exec<'s>(
        &self,
        program: &Program,
        subject: &'s str,
    ) -> Result<Option<Captures<'s>>, MatchError>;
}
