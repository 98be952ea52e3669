mod jumpdests;
mod stack;

use std::{fmt::Write, time::Instant};

use crate::{error::Error, interfaces::DisassemblerArgs};
use evmext_common::utils::strings::encode_hex;
use evmext_vm::{
    core::opcodes::{opcode_name, push_size, JUMPDEST},
    CodeStream,
};
use tracing::{debug, info};

pub use jumpdests::jumpdests;
pub use stack::walk_stack;

/// Disassembles EVM bytecode into readable assembly instructions
///
/// Each line holds the program counter, the opcode name, and the hex-encoded push operand (if
/// any). A push whose operand runs past the end of the code is rendered with the bytes that
/// are present.
///
/// ```
/// use evmext_disassembler::{disassemble, DisassemblerArgsBuilder};
///
/// let args = DisassemblerArgsBuilder::new().target("60015b00".to_string()).build().unwrap();
/// assert_eq!(disassemble(&args).unwrap(), "000000 PUSH1 01\n000002 JUMPDEST \n000003 STOP \n");
/// ```
pub fn disassemble(args: &DisassemblerArgs) -> Result<String, Error> {
    let start_time = Instant::now();
    let mut asm = String::new();

    // get the bytecode from the target
    let start_fetch_time = Instant::now();
    let contract_bytecode = args.get_bytecode().map_err(|e| Error::FetchError(format!("{e}")))?;
    debug!("fetching target bytecode took {:?}", start_fetch_time.elapsed());

    // iterate over the bytecode, disassembling each instruction
    let start_disassemble_time = Instant::now();
    let stream = CodeStream::new(contract_bytecode);
    let mut offset = stream.program_counter();
    for opcode in &stream {
        // the trailing STOP sentinel is not part of the code
        if offset >= stream.len() {
            break;
        }

        // PUSH1 -> PUSH32 carry their operand inline
        let pushed_bytes = push_size(opcode).map(|size| encode_hex(stream.read(size)));

        let counter =
            if args.decimal_counter { offset.to_string() } else { format!("{offset:06x}") };

        // writing to a String cannot fail
        let _ = write!(
            asm,
            "{} {} {}",
            counter,
            opcode_name(opcode),
            pushed_bytes.unwrap_or_default()
        );

        if args.mark_jumpdests && opcode == JUMPDEST && stream.is_valid_opcode(offset) {
            asm.push_str("[jumpdest]");
        }
        asm.push('\n');

        offset = stream.program_counter();
    }
    debug!("disassembly took {:?}", start_disassemble_time.elapsed());

    info!("disassembled {} bytes successfully", stream.len());
    debug!("disassemble took {:?} in total", start_time.elapsed());
    Ok(asm)
}
