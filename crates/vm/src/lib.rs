//! Bytecode execution front-end for an EVM interpreter.
//!
//! This crate provides the two structures an opcode dispatcher sits on: a [`CodeStream`] that
//! walks contract bytecode and knows which positions are legitimate jump targets, and a bounded
//! [`Stack`] of 256-bit words and byte strings.

/// Core components: code stream, opcode table, and stack
pub mod core;

/// Error types for the code stream and stack
pub mod error;

pub use crate::core::{
    code_stream::{CodeStream, Opcodes, SeekGuard},
    stack::{Stack, Value},
};
pub use error::Error;
