use fancy_regex::Regex;
use lazy_static::lazy_static;

lazy_static! {
    /// Matches a hex-encoded bytecode string, with or without the `0x` prefix.
    pub static ref BYTECODE_REGEX: Regex = Regex::new(r"^(0x)?[0-9a-fA-F]*$").expect("failed to compile regex");
}
