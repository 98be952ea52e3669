//! Integration tests for disassemble functionality.

#[cfg(test)]
mod integration_tests {
    use evmext_disassembler::{
        disassemble, jumpdests, walk_stack, DisassemblerArgs, DisassemblerArgsBuilder, Error,
        JumpdestArgsBuilder, StackArgs,
    };
    use evmext_vm::Error as VmError;

    fn args(target: &str, decimal_counter: bool) -> DisassemblerArgs {
        DisassemblerArgs {
            target: target.to_owned(),
            decimal_counter,
            mark_jumpdests: false,
            name: String::from(""),
            output: String::from(""),
        }
    }

    #[test]
    fn test_disassemble_nominal() {
        let bytecode = "366000600037611000600036600073";
        let expected = String::from("000000 CALLDATASIZE \n000001 PUSH1 00\n000003 PUSH1 00\n000005 CALLDATACOPY \n000006 PUSH2 1000\n000009 PUSH1 00\n00000b CALLDATASIZE \n00000c PUSH1 00\n00000e PUSH20 \n");

        let assembly = disassemble(&args(bytecode, false)).expect("failed to disassemble");

        assert_eq!(expected, assembly);
    }

    #[test]
    fn test_disassemble_decimal_counter_nominal() {
        let bytecode = "366000600037611000600036600073";
        let expected = String::from("0 CALLDATASIZE \n1 PUSH1 00\n3 PUSH1 00\n5 CALLDATACOPY \n6 PUSH2 1000\n9 PUSH1 00\n11 CALLDATASIZE \n12 PUSH1 00\n14 PUSH20 \n");

        let assembly = disassemble(&args(bytecode, true)).expect("failed to disassemble");

        assert_eq!(expected, assembly);
    }

    #[test]
    fn test_disassemble_with_push0() {
        let bytecode = "608060405234801561000f575f5ffd5b50600400";
        let expected = String::from("000000 PUSH1 80\n000002 PUSH1 40\n000004 MSTORE \n000005 CALLVALUE \n000006 DUP1 \n000007 ISZERO \n000008 PUSH2 000f\n00000b JUMPI \n00000c PUSH0 \n00000d PUSH0 \n00000e REVERT \n00000f JUMPDEST \n000010 POP \n000011 PUSH1 04\n000013 STOP \n");

        let assembly = disassemble(&args(bytecode, false)).expect("failed to disassemble");

        assert_eq!(expected, assembly);
    }

    #[test]
    fn test_disassemble_truncated_push_renders_available_bytes() {
        let assembly = disassemble(&args("0x6001620102", false)).expect("failed to disassemble");

        assert_eq!(assembly, "000000 PUSH1 01\n000002 PUSH3 0102\n");
    }

    #[test]
    fn test_disassemble_empty_target() {
        let assembly = disassemble(&args("", false)).expect("failed to disassemble");

        assert_eq!(assembly, "");
    }

    #[test]
    fn test_disassemble_omits_trailing_stop() {
        let assembly = disassemble(&args("0160", false)).expect("failed to disassemble");

        assert_eq!(assembly, "000000 ADD \n000001 PUSH1 \n");
    }

    #[test]
    fn test_disassemble_marks_jumpdests() {
        // JUMPDEST, PUSH1 0x5b, JUMPDEST
        let args = DisassemblerArgsBuilder::new()
            .target("5b605b5b".to_string())
            .mark_jumpdests(true)
            .build()
            .expect("failed to build args");

        let assembly = disassemble(&args).expect("failed to disassemble");

        assert_eq!(
            assembly,
            "000000 JUMPDEST [jumpdest]\n000001 PUSH1 5b\n000003 JUMPDEST [jumpdest]\n"
        );
    }

    #[test]
    fn test_disassemble_from_file() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let path = dir.path().join("contract.hex");
        std::fs::write(&path, "0x6080\n6040\n").expect("failed to write file");

        let assembly = disassemble(&args(path.to_str().expect("path is not utf-8"), false))
            .expect("failed to disassemble");

        assert_eq!(assembly, "000000 PUSH1 80\n000002 PUSH1 40\n");
    }

    #[test]
    fn test_disassemble_invalid_target() {
        let result = disassemble(&args("0x60zz", false));

        assert!(matches!(result, Err(Error::FetchError(_))));
    }

    #[test]
    fn test_jumpdests_skip_push_operands() {
        // PUSH2 0x5b5b, JUMPDEST, PUSH32 (0x5b * 32), JUMPDEST
        let bytecode = format!("615b5b5b7f{}5b", "5b".repeat(32));
        let args = JumpdestArgsBuilder::new().target(bytecode).build().expect("failed to build");

        assert_eq!(jumpdests(&args).expect("failed to analyze"), vec![3, 37]);
    }

    #[test]
    fn test_jumpdests_none() {
        let args =
            JumpdestArgsBuilder::new().target("6000".to_string()).build().expect("failed to build");

        assert!(jumpdests(&args).expect("failed to analyze").is_empty());
    }

    #[test]
    fn test_walk_stack_stops_at_first_non_stack_opcode() {
        // PUSH1 0x80, PUSH1 0x40, MSTORE, PUSH1 0x01
        let args = StackArgs { target: "6080604052600101".to_string(), stack_limit: None };

        let stack = walk_stack(&args).expect("failed to walk stack");

        assert_eq!(stack.to_string(), "[0x40, 0x80]");
    }

    #[test]
    fn test_walk_stack_overflow_respects_limit() {
        let args = StackArgs { target: "5f5f5f".to_string(), stack_limit: Some(2) };

        let result = walk_stack(&args);

        assert!(matches!(result, Err(Error::Vm(VmError::StackOverflow { limit: 2 }))));
    }

    #[test]
    fn test_walk_stack_underflow() {
        // PUSH0, SWAP1
        let args = StackArgs { target: "5f90".to_string(), stack_limit: None };

        let result = walk_stack(&args);

        assert!(matches!(
            result,
            Err(Error::Vm(VmError::StackUnderflow { needed: 2, available: 1 }))
        ));
    }

    #[test]
    fn test_walk_stack_pop_and_dup() {
        // PUSH1 0x01, DUP1, DUP1, POP, JUMPDEST, PUSH2 0xbeef
        let args = StackArgs { target: "6001808050 5b61beef".replace(' ', ""), stack_limit: None };

        let stack = walk_stack(&args).expect("failed to walk stack");

        assert_eq!(stack.len(), 3);
        assert_eq!(stack.to_string(), "[0xbeef, 0x01, 0x01]");
    }
}
