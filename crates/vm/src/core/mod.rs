/// Code stream over contract bytecode, with jump destination analysis
pub mod code_stream;

/// Opcode definitions and the static opcode table
pub mod opcodes;

/// Stack implementation for the VM
pub mod stack;
