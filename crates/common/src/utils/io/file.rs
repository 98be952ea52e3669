use std::{
    fs::{self, File},
    io::{Read, Write},
    path::Path,
};

use eyre::{eyre, Result};

/// Write contents to a file on the disc, creating parent directories as needed.
///
/// ```no_run
/// use evmext_common::utils::io::file::write_file;
///
/// let path = "/tmp/test.txt";
/// let contents = "Hello, World!";
/// let result = write_file(path, contents);
/// ```
pub fn write_file(path_str: &str, contents: &str) -> Result<()> {
    let path = Path::new(path_str);

    // Create the directory if it doesn't exist
    fs::create_dir_all(path.parent().ok_or_else(|| eyre!("unable to create directory"))?)?;

    let mut file = File::create(path)?;
    file.write_all(contents.as_bytes())?;

    Ok(())
}

/// Read contents from a file on the disc
///
/// ```no_run
/// use evmext_common::utils::io::file::read_file;
///
/// let path = "/tmp/test.txt";
/// let contents = read_file(path);
/// ```
pub fn read_file(path: &str) -> Result<String> {
    let path = Path::new(path);
    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Delete a file or directory from the disc. Returns `false` if nothing was removed.
///
/// ```no_run
/// use evmext_common::utils::io::file::delete_path;
///
/// let path = "/tmp/test.txt";
/// let result = delete_path(path);
/// ```
pub fn delete_path(path: &str) -> bool {
    let path = Path::new(path);
    if path.is_dir() {
        fs::remove_dir_all(path).is_ok()
    } else {
        fs::remove_file(path).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use crate::utils::io::file::*;

    #[test]
    fn test_write_read_delete() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("nested").join("code.hex");
        let path = path.to_str().expect("utf-8 path");

        write_file(path, "0x6001").expect("failed to write");
        assert_eq!(read_file(path).expect("failed to read"), "0x6001");
        assert!(delete_path(path));
        assert!(read_file(path).is_err());
        assert!(!delete_path(path));
    }
}
