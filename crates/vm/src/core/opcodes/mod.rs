//! EVM opcodes and related utilities.
//!
//! This module provides the static opcode table consumed by the code stream and the
//! disassembler:
//! - Opcode constants (`STOP`, `PUSH1`, `JUMPDEST`, ...)
//! - Opcode information (names, stack effects, immediate operand sizes)
//!
//! The table layout is partially adapted from https://github.com/bluealloy/revm

/// Information about opcode, such as name, stack inputs and outputs, and the number of
/// immediate bytes following it in the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OpCodeInfo {
    /// Name
    name: &'static str,
    /// Stack inputs.
    inputs: u8,
    /// Stack outputs.
    outputs: u8,
    /// If the opcode stops execution. aka STOP, RETURN, ..
    terminating: bool,
    /// Number of immediate data bytes inlined after the opcode.
    immediate: u8,
}

impl OpCodeInfo {
    /// Creates a new opcode info with the given name and default values.
    pub const fn new(name: &'static str) -> Self {
        Self { name, inputs: 0, outputs: 0, terminating: false, immediate: 0 }
    }

    /// Returns the name of the opcode.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the number of stack inputs.
    #[inline]
    pub const fn inputs(&self) -> u8 {
        self.inputs
    }

    /// Returns the number of stack outputs.
    #[inline]
    pub const fn outputs(&self) -> u8 {
        self.outputs
    }

    /// Returns whether the opcode is terminating.
    #[inline]
    pub const fn terminating(&self) -> bool {
        self.terminating
    }

    /// Returns the number of immediate bytes that follow the opcode.
    #[inline]
    pub const fn immediate_size(&self) -> u8 {
        self.immediate
    }
}

impl From<u8> for OpCodeInfo {
    #[inline]
    fn from(opcode: u8) -> Self {
        OPCODE_INFO_TABLE[opcode as usize].unwrap_or(OpCodeInfo {
            name: "unknown",
            inputs: 0,
            outputs: 0,
            terminating: true,
            immediate: 0,
        })
    }
}

/// Sets the number of stack inputs and outputs.
#[inline]
pub const fn stack_io(mut op: OpCodeInfo, inputs: u8, outputs: u8) -> OpCodeInfo {
    op.inputs = inputs;
    op.outputs = outputs;
    op
}

/// Sets the terminating flag to true.
#[inline]
pub const fn terminating(mut op: OpCodeInfo) -> OpCodeInfo {
    op.terminating = true;
    op
}

/// Sets the number of immediate bytes inlined after the opcode.
#[inline]
pub const fn immediate(mut op: OpCodeInfo, size: u8) -> OpCodeInfo {
    op.immediate = size;
    op
}

macro_rules! opcodes {
    ($($val:literal => $name:ident => $($modifier:ident $(( $($modifier_arg:expr),* ))?),*);* $(;)?) => {
        // create a constant for each opcode
        $(
            #[doc = concat!("The `", stringify!($val), "` (\"", stringify!($name),"\") opcode.")]
            pub const $name: u8 = $val;
        )*

        /// Maps each opcode to its info.
        pub const OPCODE_INFO_TABLE: [Option<OpCodeInfo>; 256] = {
            let mut map = [None; 256];
            let mut prev: u8 = 0;
            $(
                let val: u8 = $val;
                assert!(val == 0 || val > prev, "opcodes must be sorted in ascending order");
                prev = val;
                let info = OpCodeInfo::new(
                    stringify!($name)
                );
                $(
                let info = $modifier(info, $($($modifier_arg),*)?);
                )*
                map[$val] = Some(info);
            )*
            let _ = prev;
            map
        };

        /// Maps each opcode to its name. (So we dont need to load [`OpCodeInfo`] to get the name)
        pub const OPCODE_NAME_TABLE: [&'static str; 256] = {
            let mut map = ["unknown"; 256];
            $(
                map[$val] = stringify!($name);
            )*
            map
        };
    }
}

/// Get the name of an opcode.
#[inline]
pub fn opcode_name(opcode: u8) -> &'static str {
    OPCODE_NAME_TABLE[opcode as usize]
}

/// Returns the number of operand bytes consumed by a `PUSH1..=PUSH32` opcode, or `None` for
/// any other byte. `PUSH0` carries no immediate and also yields `None`.
///
/// ```
/// use evmext_vm::core::opcodes::{push_size, ADD, PUSH0, PUSH1, PUSH32};
///
/// assert_eq!(push_size(PUSH1), Some(1));
/// assert_eq!(push_size(PUSH32), Some(32));
/// assert_eq!(push_size(PUSH0), None);
/// assert_eq!(push_size(ADD), None);
/// ```
#[inline]
pub const fn push_size(opcode: u8) -> Option<usize> {
    if opcode >= PUSH1 && opcode <= PUSH32 {
        Some((opcode - PUSH0) as usize)
    } else {
        None
    }
}

opcodes! {
    0x00 => STOP => terminating;

    0x01 => ADD => stack_io(2, 1);
    0x02 => MUL => stack_io(2, 1);
    0x03 => SUB => stack_io(2, 1);
    0x04 => DIV => stack_io(2, 1);
    0x05 => SDIV => stack_io(2, 1);
    0x06 => MOD => stack_io(2, 1);
    0x07 => SMOD => stack_io(2, 1);
    0x08 => ADDMOD => stack_io(3, 1);
    0x09 => MULMOD => stack_io(3, 1);
    0x0a => EXP => stack_io(2, 1);
    0x0b => SIGNEXTEND => stack_io(2, 1);

    0x10 => LT => stack_io(2, 1);
    0x11 => GT => stack_io(2, 1);
    0x12 => SLT => stack_io(2, 1);
    0x13 => SGT => stack_io(2, 1);
    0x14 => EQ => stack_io(2, 1);
    0x15 => ISZERO => stack_io(1, 1);
    0x16 => AND => stack_io(2, 1);
    0x17 => OR => stack_io(2, 1);
    0x18 => XOR => stack_io(2, 1);
    0x19 => NOT => stack_io(1, 1);
    0x1a => BYTE => stack_io(2, 1);
    0x1b => SHL => stack_io(2, 1);
    0x1c => SHR => stack_io(2, 1);
    0x1d => SAR => stack_io(2, 1);

    0x20 => SHA3 => stack_io(2, 1);

    0x30 => ADDRESS => stack_io(0, 1);
    0x31 => BALANCE => stack_io(1, 1);
    0x32 => ORIGIN => stack_io(0, 1);
    0x33 => CALLER => stack_io(0, 1);
    0x34 => CALLVALUE => stack_io(0, 1);
    0x35 => CALLDATALOAD => stack_io(1, 1);
    0x36 => CALLDATASIZE => stack_io(0, 1);
    0x37 => CALLDATACOPY => stack_io(3, 0);
    0x38 => CODESIZE => stack_io(0, 1);
    0x39 => CODECOPY => stack_io(3, 0);
    0x3a => GASPRICE => stack_io(0, 1);
    0x3b => EXTCODESIZE => stack_io(1, 1);
    0x3c => EXTCODECOPY => stack_io(4, 0);
    0x3d => RETURNDATASIZE => stack_io(0, 1);
    0x3e => RETURNDATACOPY => stack_io(3, 0);
    0x3f => EXTCODEHASH => stack_io(1, 1);
    0x40 => BLOCKHASH => stack_io(1, 1);
    0x41 => COINBASE => stack_io(0, 1);
    0x42 => TIMESTAMP => stack_io(0, 1);
    0x43 => NUMBER => stack_io(0, 1);
    0x44 => PREVRANDAO => stack_io(0, 1);
    0x45 => GASLIMIT => stack_io(0, 1);
    0x46 => CHAINID => stack_io(0, 1);
    0x47 => SELFBALANCE => stack_io(0, 1);
    0x48 => BASEFEE => stack_io(0, 1);
    0x49 => BLOBHASH => stack_io(1, 1);
    0x4a => BLOBBASEFEE => stack_io(0, 1);

    0x50 => POP => stack_io(1, 0);
    0x51 => MLOAD => stack_io(1, 1);
    0x52 => MSTORE => stack_io(2, 0);
    0x53 => MSTORE8 => stack_io(2, 0);
    0x54 => SLOAD => stack_io(1, 1);
    0x55 => SSTORE => stack_io(2, 0);
    0x56 => JUMP => stack_io(1, 0);
    0x57 => JUMPI => stack_io(2, 0);
    0x58 => PC => stack_io(0, 1);
    0x59 => MSIZE => stack_io(0, 1);
    0x5a => GAS => stack_io(0, 1);
    0x5b => JUMPDEST => stack_io(0, 0);
    0x5c => TLOAD => stack_io(1, 1);
    0x5d => TSTORE => stack_io(2, 0);
    0x5e => MCOPY => stack_io(3, 0);

    0x5f => PUSH0 => stack_io(0, 1);
    0x60 => PUSH1 => stack_io(0, 1), immediate(1);
    0x61 => PUSH2 => stack_io(0, 1), immediate(2);
    0x62 => PUSH3 => stack_io(0, 1), immediate(3);
    0x63 => PUSH4 => stack_io(0, 1), immediate(4);
    0x64 => PUSH5 => stack_io(0, 1), immediate(5);
    0x65 => PUSH6 => stack_io(0, 1), immediate(6);
    0x66 => PUSH7 => stack_io(0, 1), immediate(7);
    0x67 => PUSH8 => stack_io(0, 1), immediate(8);
    0x68 => PUSH9 => stack_io(0, 1), immediate(9);
    0x69 => PUSH10 => stack_io(0, 1), immediate(10);
    0x6a => PUSH11 => stack_io(0, 1), immediate(11);
    0x6b => PUSH12 => stack_io(0, 1), immediate(12);
    0x6c => PUSH13 => stack_io(0, 1), immediate(13);
    0x6d => PUSH14 => stack_io(0, 1), immediate(14);
    0x6e => PUSH15 => stack_io(0, 1), immediate(15);
    0x6f => PUSH16 => stack_io(0, 1), immediate(16);
    0x70 => PUSH17 => stack_io(0, 1), immediate(17);
    0x71 => PUSH18 => stack_io(0, 1), immediate(18);
    0x72 => PUSH19 => stack_io(0, 1), immediate(19);
    0x73 => PUSH20 => stack_io(0, 1), immediate(20);
    0x74 => PUSH21 => stack_io(0, 1), immediate(21);
    0x75 => PUSH22 => stack_io(0, 1), immediate(22);
    0x76 => PUSH23 => stack_io(0, 1), immediate(23);
    0x77 => PUSH24 => stack_io(0, 1), immediate(24);
    0x78 => PUSH25 => stack_io(0, 1), immediate(25);
    0x79 => PUSH26 => stack_io(0, 1), immediate(26);
    0x7a => PUSH27 => stack_io(0, 1), immediate(27);
    0x7b => PUSH28 => stack_io(0, 1), immediate(28);
    0x7c => PUSH29 => stack_io(0, 1), immediate(29);
    0x7d => PUSH30 => stack_io(0, 1), immediate(30);
    0x7e => PUSH31 => stack_io(0, 1), immediate(31);
    0x7f => PUSH32 => stack_io(0, 1), immediate(32);

    0x80 => DUP1 => stack_io(1, 2);
    0x81 => DUP2 => stack_io(2, 3);
    0x82 => DUP3 => stack_io(3, 4);
    0x83 => DUP4 => stack_io(4, 5);
    0x84 => DUP5 => stack_io(5, 6);
    0x85 => DUP6 => stack_io(6, 7);
    0x86 => DUP7 => stack_io(7, 8);
    0x87 => DUP8 => stack_io(8, 9);
    0x88 => DUP9 => stack_io(9, 10);
    0x89 => DUP10 => stack_io(10, 11);
    0x8a => DUP11 => stack_io(11, 12);
    0x8b => DUP12 => stack_io(12, 13);
    0x8c => DUP13 => stack_io(13, 14);
    0x8d => DUP14 => stack_io(14, 15);
    0x8e => DUP15 => stack_io(15, 16);
    0x8f => DUP16 => stack_io(16, 17);

    0x90 => SWAP1 => stack_io(2, 2);
    0x91 => SWAP2 => stack_io(3, 3);
    0x92 => SWAP3 => stack_io(4, 4);
    0x93 => SWAP4 => stack_io(5, 5);
    0x94 => SWAP5 => stack_io(6, 6);
    0x95 => SWAP6 => stack_io(7, 7);
    0x96 => SWAP7 => stack_io(8, 8);
    0x97 => SWAP8 => stack_io(9, 9);
    0x98 => SWAP9 => stack_io(10, 10);
    0x99 => SWAP10 => stack_io(11, 11);
    0x9a => SWAP11 => stack_io(12, 12);
    0x9b => SWAP12 => stack_io(13, 13);
    0x9c => SWAP13 => stack_io(14, 14);
    0x9d => SWAP14 => stack_io(15, 15);
    0x9e => SWAP15 => stack_io(16, 16);
    0x9f => SWAP16 => stack_io(17, 17);

    0xa0 => LOG0 => stack_io(2, 0);
    0xa1 => LOG1 => stack_io(3, 0);
    0xa2 => LOG2 => stack_io(4, 0);
    0xa3 => LOG3 => stack_io(5, 0);
    0xa4 => LOG4 => stack_io(6, 0);

    0xf0 => CREATE => stack_io(3, 1);
    0xf1 => CALL => stack_io(7, 1);
    0xf2 => CALLCODE => stack_io(7, 1);
    0xf3 => RETURN => stack_io(2, 0), terminating;
    0xf4 => DELEGATECALL => stack_io(6, 1);
    0xf5 => CREATE2 => stack_io(4, 1);
    0xfa => STATICCALL => stack_io(6, 1);
    0xfd => REVERT => stack_io(2, 0), terminating;
    0xfe => INVALID => terminating;
    0xff => SELFDESTRUCT => stack_io(1, 0), terminating;
}
