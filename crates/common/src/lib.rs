//! Common utilities used across the evmext crates.
//!
//! This crate provides shared functionality for the evmext toolkit, such as hex encoding,
//! bytecode target resolution and file handling for the command line front-end.

/// Constants used throughout the evmext crates.
pub mod constants;
/// General utility functions and types for common tasks.
pub mod utils;
