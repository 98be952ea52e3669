//! The `evmext` command line: disassembly, jump destination analysis and stack evaluation of
//! EVM bytecode.

pub(crate) mod args;
pub(crate) mod error;
pub(crate) mod log_args;
pub(crate) mod output;

use args::{Arguments, Subcommands};
use clap::Parser;
use error::Error;
use output::{build_filename, build_output_path};
use tracing::info;

use evmext_common::utils::io::file::write_file;
use evmext_config::{config, Configuration};
use evmext_disassembler::{disassemble, jumpdests, walk_stack};

fn main() -> Result<(), Error> {
    let args = Arguments::parse();

    // setup logging
    let _ = args.logs.init_tracing();

    let configuration = Configuration::load()
        .map_err(|e| Error::Generic(format!("failed to load configuration: {}", e)))?;

    match args.sub {
        Subcommands::Disassemble(mut cmd) => {
            // the flag only ever turns the decimal counter on
            cmd.decimal_counter |= configuration.decimal_counter;

            let filename = build_filename(&cmd.name, "disassembled.asm");
            let assembly = disassemble(&cmd)?;

            if cmd.output == "print" {
                print!("{}", assembly);
            } else {
                let output_path = build_output_path(&cmd.output, &filename)
                    .map_err(|e| Error::Generic(format!("failed to build output path: {}", e)))?;

                write_file(&output_path, &assembly)
                    .map_err(|e| Error::Generic(format!("failed to write assembly: {}", e)))?;
                info!("wrote assembly to '{}'", output_path);
            }
        }

        Subcommands::Jumpdests(mut cmd) => {
            cmd.decimal_counter |= configuration.decimal_counter;

            for destination in jumpdests(&cmd)? {
                if cmd.decimal_counter {
                    println!("{}", destination);
                } else {
                    println!("{:06x}", destination);
                }
            }
        }

        Subcommands::Stack(mut cmd) => {
            // if the user has not specified a stack limit, use the default
            if cmd.stack_limit.is_none() {
                cmd.stack_limit = Some(configuration.stack_limit);
            }

            let stack = walk_stack(&cmd)?;
            for (depth, value) in stack.iter().enumerate() {
                println!("{:>4} {}", depth, value);
            }
        }

        Subcommands::Config(cmd) => {
            config(cmd)?;
        }
    }

    Ok(())
}
