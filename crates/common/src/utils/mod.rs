/// Bytecode target resolution.
pub mod bytecode;
/// Input/output utilities for file manipulation.
pub mod io;

/// String manipulation and hex encoding utilities.
pub mod strings;
