//! Configuration for the bracet CLI: how many `processString` recursion
//! levels to run and the default group/question sequence numbers passed
//! to the resolver when the caller doesn't supply one on the command
//! line. Deliberately carries no hook for registering host-defined
//! functions from config — `registerFunctions` is a library API, not
//! something this CLI exposes as a shell-out or plugin mechanism.

use std::path::{Path, PathBuf};

use dirs::{config_dir, home_dir};
use serde::{Deserialize, Serialize};

use crate::error::{BracetError, Result};

pub const CONFIG_FILE_NAME: &str = "bracet.toml";

fn default_recursion_levels() -> u32 {
    1
}

fn default_seq() -> i64 {
    -1
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_recursion_levels")]
    pub recursion_levels: u32,

    #[serde(default = "default_seq")]
    pub group_seq: i64,

    #[serde(default = "default_seq")]
    pub question_seq: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            recursion_levels: default_recursion_levels(),
            group_seq: default_seq(),
            question_seq: default_seq(),
        }
    }
}

impl Config {
    /// Searches, in order: current directory, user home directory,
    /// system configuration directory. Falls back to defaults if none
    /// of those carry a `bracet.toml`.
    pub fn load() -> Result<Self> {
        match Self::find_config_file() {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(BracetError::Config(format!("configuration file not found: {}", path.display())));
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| BracetError::Config(format!("failed to parse configuration: {e}")))
    }

    fn check_current_dir_config() -> Option<PathBuf> {
        let path = PathBuf::from(CONFIG_FILE_NAME);
        path.exists().then_some(path)
    }

    fn check_home_config() -> Option<PathBuf> {
        home_dir()
            .map(|dir| dir.join(".config").join("bracet").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    fn check_system_config() -> Option<PathBuf> {
        config_dir()
            .map(|dir| dir.join("bracet").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    fn find_config_file() -> Option<PathBuf> {
        Self::check_current_dir_config()
            .or_else(Self::check_home_config)
            .or_else(Self::check_system_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_sensible_values() {
        let config = Config::default();
        assert_eq!(config.recursion_levels, 1);
        assert_eq!(config.group_seq, -1);
        assert_eq!(config.question_seq, -1);
    }

    #[test]
    fn load_from_path_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bracet.toml");
        std::fs::write(&path, "recursion_levels = 3\ngroup_seq = 7\nquestion_seq = 2\n").unwrap();
        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.recursion_levels, 3);
        assert_eq!(config.group_seq, 7);
        assert_eq!(config.question_seq, 2);
    }

    #[test]
    fn load_from_nonexistent_path_errors() {
        let result = Config::load_from_path(Path::new("/nonexistent/bracet.toml"));
        assert!(result.is_err());
    }
}
