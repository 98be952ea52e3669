use clap::{Parser, Subcommand};

use evmext_config::ConfigArgs;
use evmext_disassembler::{DisassemblerArgs, JumpdestArgs, StackArgs};

use crate::log_args::LogArgs;

#[derive(Debug, Parser)]
#[clap(name = "evmext", version)]
pub(crate) struct Arguments {
    #[clap(subcommand)]
    pub(crate) sub: Subcommands,

    #[clap(flatten)]
    pub(crate) logs: LogArgs,
}

#[derive(Debug, Subcommand)]
#[clap(about = "evmext walks EVM bytecode: listings, jump destinations and stack evaluation.")]
pub(crate) enum Subcommands {
    #[clap(name = "disassemble", about = "Disassemble EVM bytecode to assembly")]
    Disassemble(DisassemblerArgs),

    #[clap(name = "jumpdests", about = "List the valid jump destinations of EVM bytecode")]
    Jumpdests(JumpdestArgs),

    #[clap(name = "stack", about = "Evaluate the leading stack-only instructions of EVM bytecode")]
    Stack(StackArgs),

    #[clap(name = "config", about = "Display and edit the current configuration")]
    Config(ConfigArgs),
}
