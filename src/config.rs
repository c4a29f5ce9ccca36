use crate::error::{Result, UpdateStatusError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR_NAME: &str = "update-status";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Locations of the external programs and files the reporter consults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub apt: PathBuf,
    pub apt_get: PathBuf,
    pub uname: PathBuf,
    pub apt_check: PathBuf,
    pub version_helper: PathBuf,
    pub reboot_marker: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            apt: PathBuf::from("apt"),
            apt_get: PathBuf::from("apt-get"),
            uname: PathBuf::from("uname"),
            apt_check: PathBuf::from("/usr/lib/update-notifier/apt-check"),
            version_helper: PathBuf::from("apt-show-versions"),
            reboot_marker: PathBuf::from("/var/run/reboot-required"),
        }
    }
}

impl Config {
    /// Load from an explicit path, or from the user config dir when none is given.
    ///
    /// An explicit path must exist. The default location is optional and falls
    /// back to built-in defaults when absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(UpdateStatusError::Config(format!(
                        "config file '{}' not found",
                        path.display()
                    )));
                }
                Self::from_file(path)
            }
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => {
                    log::debug!("no config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        log::debug!("loading config from {}", path.display());
        let content = fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}
