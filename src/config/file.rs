use std::{
    env,
    fs::read_to_string,
    io,
    path::{Path, PathBuf},
};

use log::debug;
use serde::Deserialize;

use crate::config::ConfigError;

/// Contents of `config.toml`. Every field may also come from the command
/// line.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password_cmd: Option<String>,
    pub destination: Option<PathBuf>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl ConfigFile {
    pub fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        debug!("reading config from {}", path.display());
        let contents = read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents, path)
    }

    /// Reads the file at the default location, if there is one.
    pub fn read_default() -> Result<Self, ConfigError> {
        let Some(path) = default_location() else {
            return Ok(Self::default());
        };
        match Self::read(&path) {
            Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                debug!("no config file at {}", path.display());
                Ok(Self::default())
            }
            result => result,
        }
    }
}

fn default_location() -> Option<PathBuf> {
    let mut config_dir = if let Some(config_home) = env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(config_home)
    } else {
        let mut config_home = PathBuf::from(env::var_os("HOME")?);
        config_home.push(".config");
        config_home
    };
    config_dir.push(env!("CARGO_PKG_NAME"));
    config_dir.push("config.toml");

    Some(config_dir)
}
