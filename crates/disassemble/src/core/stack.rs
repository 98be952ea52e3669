use crate::{error::Error, interfaces::StackArgs};
use alloy::primitives::U256;
use evmext_vm::{
    core::{
        opcodes::{opcode_name, push_size, DUP1, DUP16, JUMPDEST, POP, PUSH0, SWAP1, SWAP16},
        stack::DEFAULT_STACK_LIMIT,
    },
    CodeStream, Stack,
};
use tracing::debug;

/// Evaluates the leading run of stack-only instructions in the target's bytecode and returns
/// the resulting stack.
///
/// `PUSH0..PUSH32`, `DUP1..DUP16`, `SWAP1..SWAP16`, `POP` and `JUMPDEST` are evaluated in
/// order. The walk ends at the first other instruction, or at the end of the code. A truncated
/// push operand is pushed as the bytes that are present.
///
/// ```
/// use evmext_disassembler::{walk_stack, StackArgsBuilder};
///
/// // PUSH1 0x01, PUSH1 0x02, SWAP1, DUP2, ADD
/// let args = StackArgsBuilder::new().target("60016002908101".to_string()).build().unwrap();
/// let stack = walk_stack(&args).unwrap();
/// assert_eq!(stack.len(), 3);
/// assert_eq!(stack.to_string(), "[0x02, 0x01, 0x02]");
/// ```
pub fn walk_stack(args: &StackArgs) -> Result<Stack, Error> {
    let bytecode = args.get_bytecode().map_err(|e| Error::FetchError(format!("{e}")))?;
    let stream = CodeStream::new(bytecode);
    let mut stack = Stack::new(args.stack_limit.unwrap_or(DEFAULT_STACK_LIMIT));

    for opcode in &stream {
        match opcode {
            PUSH0 => stack.push_int(U256::ZERO)?,
            DUP1..=DUP16 => stack.dup((opcode - DUP1 + 1) as usize)?,
            SWAP1..=SWAP16 => stack.swap((opcode - SWAP1 + 1) as usize)?,
            POP => {
                stack.pop()?;
            }
            JUMPDEST => {}
            _ => match push_size(opcode) {
                Some(size) => stack.push_bytes(stream.read(size).to_vec())?,
                None => {
                    // the sentinel STOP past the end lands here too
                    debug!(
                        "stack walk stopped at {} with depth {}",
                        opcode_name(opcode),
                        stack.len()
                    );
                    break;
                }
            },
        }
    }

    Ok(stack)
}
