#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error("{0}")]
    Generic(String),
    #[error("Config error: {0}")]
    ConfigError(#[from] evmext_config::error::Error),
    #[error("Disassemble error: {0}")]
    DisassembleError(#[from] evmext_disassembler::Error),
}
