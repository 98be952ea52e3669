use crate::{error::Error, interfaces::JumpdestArgs};
use evmext_vm::CodeStream;
use tracing::info;

/// Returns the positions in the target's bytecode that are valid jump destinations: a
/// `JUMPDEST` byte at an instruction boundary. `JUMPDEST` bytes inside push operands are not
/// reported.
///
/// ```
/// use evmext_disassembler::{jumpdests, JumpdestArgsBuilder};
///
/// // PUSH1 0x5b, JUMPDEST
/// let args = JumpdestArgsBuilder::new().target("605b5b".to_string()).build().unwrap();
/// assert_eq!(jumpdests(&args).unwrap(), vec![2]);
/// ```
pub fn jumpdests(args: &JumpdestArgs) -> Result<Vec<usize>, Error> {
    let bytecode = args.get_bytecode().map_err(|e| Error::FetchError(format!("{e}")))?;
    let stream = CodeStream::new(bytecode);

    let destinations = stream.jump_destinations().collect::<Vec<_>>();
    info!("found {} jump destinations in {} bytes", destinations.len(), stream.len());
    Ok(destinations)
}
