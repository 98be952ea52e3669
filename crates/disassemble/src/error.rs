/// Error type for the Disassembler module
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The target could not be resolved to bytecode
    #[error("Fetch error: {0}")]
    FetchError(String),
    /// A stack or code stream operation failed
    #[error("VM error: {0}")]
    Vm(#[from] evmext_vm::Error),
}
