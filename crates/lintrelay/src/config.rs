//! Configuration file loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::debug;

use lintrelay_types::ConfigFile;

/// Default config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "lintrelay.toml";

/// Load the config file.
///
/// An explicitly passed path must exist; otherwise `./lintrelay.toml`
/// is used when present and the built-in empty config when not.
pub fn load_config(path: Option<PathBuf>) -> Result<ConfigFile> {
    let path = match path {
        Some(p) => {
            if !p.exists() {
                bail!("config file not found: '{}'", p.display());
            }
            p
        }
        None => {
            let p = PathBuf::from(CONFIG_FILE_NAME);
            if !p.exists() {
                debug!("no config file, using defaults");
                return Ok(ConfigFile::default());
            }
            p
        }
    };

    read_config(&path)
}

fn read_config(path: &Path) -> Result<ConfigFile> {
    debug!("loading config from '{}'", path.display());
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config '{}'", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parse config '{}'", path.display()))
}
