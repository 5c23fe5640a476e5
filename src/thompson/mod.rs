//! Bytecode for Thompson NFAs and the engines executing it.

pub mod backtrack;
pub mod bytecode;
pub mod pike_vm;
