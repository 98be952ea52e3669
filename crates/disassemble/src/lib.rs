//! The Disassembler module provides functionality to convert EVM bytecode
//! into human-readable assembly instructions.
//!
//! Every listing is driven by a [`CodeStream`](evmext_vm::CodeStream), so the instruction
//! boundaries it prints are exactly the positions the stream classifies as valid opcodes.

/// Error types for the disassembler module
pub mod error;

mod core;
mod interfaces;

// re-export the public interface
pub use core::{disassemble, jumpdests, walk_stack};
pub use error::Error;
pub use interfaces::{
    DisassemblerArgs, DisassemblerArgsBuilder, JumpdestArgs, JumpdestArgsBuilder, StackArgs,
    StackArgsBuilder,
};
