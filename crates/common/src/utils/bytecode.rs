use std::{fs, path::Path};

use eyre::{bail, Result};
use tracing::{debug, error};

use crate::{constants::BYTECODE_REGEX, utils::strings::decode_hex};

/// Given a target, determines whether it is raw bytecode or a path to a file containing bytecode,
/// and returns the decoded bytes.
///
/// ```
/// use evmext_common::utils::bytecode::get_bytecode_from_target;
///
/// let bytecode = get_bytecode_from_target("0x6001600201").expect("should decode");
/// assert_eq!(bytecode, vec![0x60, 0x01, 0x60, 0x02, 0x01]);
/// ```
pub fn get_bytecode_from_target(target: &str) -> Result<Vec<u8>> {
    let target = target.trim();

    if BYTECODE_REGEX.is_match(target).unwrap_or(false) && !Path::new(target).is_file() {
        return decode_hex(target);
    }

    debug!(target, "reading bytecode from file");
    let contents = fs::read_to_string(target).map_err(|e| {
        error!("failed to open file '{}'.", target);
        e
    })?;

    let contents: String = contents.split_whitespace().collect();
    if BYTECODE_REGEX.is_match(&contents).unwrap_or(false) {
        decode_hex(&contents)
    } else {
        bail!("file '{}' doesn't contain valid bytecode.", target)
    }
}
