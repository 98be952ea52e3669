use clap::Parser;
use derive_builder::Builder;
use evmext_common::utils::bytecode::get_bytecode_from_target;
use eyre::Result;

#[derive(Debug, Clone, Parser, Builder)]
#[clap(
    about = "Disassembles EVM bytecode to assembly",
    override_usage = "evmext disassemble <TARGET> [OPTIONS]"
)]
/// Arguments for the disassemble operation
pub struct DisassemblerArgs {
    /// The target to disassemble, either a file or raw bytecode.
    #[clap(required = true)]
    pub target: String,

    /// Whether to use base-10 for the program counter.
    #[clap(long = "decimal-counter", short = 'd')]
    pub decimal_counter: bool,

    /// Whether to suffix valid jump destinations with `[jumpdest]`.
    #[clap(long = "mark-jumpdests", short = 'j')]
    pub mark_jumpdests: bool,

    /// Name of the output file.
    #[clap(long, short, default_value = "", hide_default_value = true)]
    pub name: String,

    /// The output directory to write the output to or 'print' to print to the console
    #[clap(long = "output", short = 'o', default_value = "output", hide_default_value = true)]
    pub output: String,
}

#[derive(Debug, Clone, Parser, Builder)]
#[clap(
    about = "Lists the valid jump destinations of EVM bytecode",
    override_usage = "evmext jumpdests <TARGET> [OPTIONS]"
)]
/// Arguments for the jumpdests operation
pub struct JumpdestArgs {
    /// The target to analyze, either a file or raw bytecode.
    #[clap(required = true)]
    pub target: String,

    /// Whether to print positions in base-10.
    #[clap(long = "decimal-counter", short = 'd')]
    pub decimal_counter: bool,
}

#[derive(Debug, Clone, Parser, Builder)]
#[clap(
    about = "Evaluates the leading stack-only instructions of EVM bytecode",
    override_usage = "evmext stack <TARGET> [OPTIONS]"
)]
/// Arguments for the stack operation
pub struct StackArgs {
    /// The target to evaluate, either a file or raw bytecode.
    #[clap(required = true)]
    pub target: String,

    /// The maximum stack depth. Defaults to the configured `stack_limit`.
    #[clap(long = "stack-limit", short = 'l')]
    pub stack_limit: Option<usize>,
}

impl DisassemblerArgs {
    /// Decodes the target into bytecode.
    pub fn get_bytecode(&self) -> Result<Vec<u8>> {
        get_bytecode_from_target(&self.target)
    }
}

impl JumpdestArgs {
    /// Decodes the target into bytecode.
    pub fn get_bytecode(&self) -> Result<Vec<u8>> {
        get_bytecode_from_target(&self.target)
    }
}

impl StackArgs {
    /// Decodes the target into bytecode.
    pub fn get_bytecode(&self) -> Result<Vec<u8>> {
        get_bytecode_from_target(&self.target)
    }
}

impl DisassemblerArgsBuilder {
    /// Creates a new builder with every field set to its default.
    pub fn new() -> Self {
        Self {
            target: Some(String::new()),
            decimal_counter: Some(false),
            mark_jumpdests: Some(false),
            name: Some(String::new()),
            output: Some(String::new()),
        }
    }
}

impl JumpdestArgsBuilder {
    /// Creates a new builder with every field set to its default.
    pub fn new() -> Self {
        Self { target: Some(String::new()), decimal_counter: Some(false) }
    }
}

impl StackArgsBuilder {
    /// Creates a new builder with every field set to its default.
    pub fn new() -> Self {
        Self { target: Some(String::new()), stack_limit: Some(None) }
    }
}
