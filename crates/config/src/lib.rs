//! Configuration management for evmext
//!
//! This crate provides functionality for managing the evmext configuration,
//! including loading, saving, updating, and deleting configuration settings.

/// Error types for the configuration module
pub mod error;

use std::path::{Path, PathBuf};

use crate::error::Error;
use clap::Parser;
use evmext_common::utils::io::file::{delete_path, read_file, write_file};
use evmext_vm::core::stack::DEFAULT_STACK_LIMIT;
use serde::{Deserialize, Serialize};
#[allow(deprecated)]
use std::env::home_dir;
use tracing::{debug, error, info};

/// Command line arguments for the configuration command
#[derive(Debug, Clone, Parser)]
#[clap(
    about = "Display and edit the current configuration",
    override_usage = "evmext config [OPTIONS]"
)]
pub struct ConfigArgs {
    /// The target key to update.
    #[clap(required = false, default_value = "")]
    key: String,

    /// The value to set the key to.
    #[clap(required = false, default_value = "")]
    value: String,
}

/// The [`Configuration`] struct represents the configuration of the CLI. Commands read their
/// defaults from it when a flag is not given.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Configuration {
    /// The maximum depth of the evaluation stack
    pub stack_limit: usize,

    /// Whether listings print the program counter in base-10 rather than hex
    pub decimal_counter: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration { stack_limit: DEFAULT_STACK_LIMIT, decimal_counter: false }
    }
}

/// Returns the path of the configuration file, `$HOME/.evmext/config.toml`.
#[allow(deprecated)]
pub fn config_path() -> Result<PathBuf, Error> {
    let mut home = home_dir().ok_or_else(|| {
        Error::Generic(
            "failed to get home directory. does your os support `std::env::home_dir()`?"
                .to_string(),
        )
    })?;
    home.push(".evmext");
    home.push("config.toml");
    Ok(home)
}

fn path_str(path: &Path) -> Result<&str, Error> {
    path.to_str().ok_or_else(|| Error::Generic("failed to convert path to string".to_string()))
}

impl Configuration {
    /// Returns the current configuration, creating it with defaults if it does not exist.
    pub fn load() -> Result<Self, Error> {
        Self::load_from(&config_path()?)
    }

    /// Reads the configuration stored at `path`, creating it with defaults if it does not
    /// exist.
    pub fn load_from(path: &Path) -> Result<Self, Error> {
        // if the config file doesn't exist, create it
        if !path.exists() {
            debug!("creating default configuration at {}", path.display());
            Configuration::default().save_to(path)?;
        }

        let contents = read_file(path_str(path)?)
            .map_err(|e| Error::Generic(format!("failed to read config file: {e}")))?;

        toml::from_str(&contents)
            .map_err(|e| Error::ParseError(format!("failed to parse config file: {e}")))
    }

    /// Saves the current configuration to disk.
    pub fn save(&self) -> Result<(), Error> {
        self.save_to(&config_path()?)
    }

    /// Saves the configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<(), Error> {
        write_file(
            path_str(path)?,
            &toml::to_string(&self)
                .map_err(|e| Error::ParseError(format!("failed to serialize config: {e}")))?,
        )
        .map_err(|e| Error::Generic(format!("failed to write config file: {e}")))
    }

    /// Deletes the configuration file at `$HOME/.evmext/config.toml`.
    pub fn delete() -> Result<(), Error> {
        delete_path(path_str(&config_path()?)?);
        Ok(())
    }

    /// Set a single key/value pair, checking that the value has the key's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        match key {
            "stack_limit" => {
                self.stack_limit = value.parse().map_err(|e| {
                    Error::ParseError(format!("'{value}' is not a valid stack limit: {e}"))
                })?;
            }
            "decimal_counter" => {
                self.decimal_counter = value.parse().map_err(|e| {
                    Error::ParseError(format!("'{value}' is not a valid boolean: {e}"))
                })?;
            }
            _ => return Err(Error::InvalidKey(key.to_string())),
        }
        Ok(())
    }

    /// Update a single key/value pair in the configuration and write it to disk.
    pub fn update(&mut self, key: &str, value: &str) -> Result<(), Error> {
        self.set(key, value)?;
        self.save()
    }
}

/// The `config` command is used to display and edit the current configuration.
pub fn config(args: ConfigArgs) -> Result<(), Error> {
    if !args.key.is_empty() {
        if !args.value.is_empty() {
            // read the config file and update the key/value pair
            let mut config = Configuration::load()?;
            config.update(&args.key, &args.value)?;
            info!("updated configuration! Set '{}' = '{}' .", &args.key, &args.value);
        } else {
            // key is set, but no value is set
            error!("found key but no value to set. Please specify a value to set, use `evmext config --help` for more information.");
        }
    } else {
        // no key is set, print the config file
        println!("{:#?}", Configuration::load()?);
        info!("use `evmext config <KEY> <VALUE>` to set a key/value pair.");
    }

    Ok(())
}
