mod auth;
mod file;

use std::{io, path::PathBuf};

use derive_getters::Getters;
use thiserror::Error;

use crate::Args;
pub use file::ConfigFile;

pub const DEFAULT_PORT: u16 = 993;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("cannot parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("no {0} configured, set it in the config file or on the command line")]
    Missing(&'static str),
    #[error("password_cmd `{command}` failed: {reason}")]
    PasswordCommand { command: String, reason: String },
    #[error("cannot read password: {0}")]
    Prompt(io::Error),
}

/// Everything needed for one run, merged from config file and command line.
#[derive(Debug, Getters)]
pub struct Config {
    host: String,
    port: u16,
    user: String,
    destination: PathBuf,
    exclude: Vec<String>,
    #[getter(skip)]
    password_cmd: Option<String>,
}

impl Config {
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let file = match &args.config {
            Some(path) => ConfigFile::read(path)?,
            None => ConfigFile::read_default()?,
        };
        Self::merge(file, args)
    }

    /// Command line values take precedence, excluded mailboxes from both
    /// sources are combined.
    pub fn merge(file: ConfigFile, args: &Args) -> Result<Self, ConfigError> {
        let mut exclude = file.exclude;
        for mailbox in &args.exclude {
            if !exclude.contains(mailbox) {
                exclude.push(mailbox.clone());
            }
        }

        Ok(Self {
            host: args
                .host
                .clone()
                .or(file.host)
                .ok_or(ConfigError::Missing("host"))?,
            port: args.port.or(file.port).unwrap_or(DEFAULT_PORT),
            user: args
                .user
                .clone()
                .or(file.user)
                .ok_or(ConfigError::Missing("user"))?,
            destination: args
                .destination
                .clone()
                .or(file.destination)
                .ok_or(ConfigError::Missing("destination"))?,
            exclude,
            password_cmd: file.password_cmd,
        })
    }

    pub fn password(&self) -> Result<String, ConfigError> {
        auth::password(self.password_cmd.as_deref(), &self.user)
    }
}
