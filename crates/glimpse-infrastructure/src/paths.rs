//! Path management for glimpse configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/glimpse/
//! ├── config.toml     # Backend selection and timeouts
//! └── secret.json     # API keys
//! ```

use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "glimpse";
const CONFIG_FILE: &str = "config.toml";
const SECRET_FILE: &str = "secret.json";

#[derive(Debug, Error)]
pub enum PathError {
    #[error("Cannot find home directory")]
    HomeDirNotFound,
}

/// Resolves glimpse file locations, optionally under a custom base directory.
#[derive(Debug, Clone)]
pub struct GlimpsePaths {
    base: Option<PathBuf>,
}

impl GlimpsePaths {
    /// `base` replaces `~/.config/glimpse` when given (used by tests).
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the configuration directory.
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base {
            return Ok(base.clone());
        }
        let home = dirs::home_dir().ok_or(PathError::HomeDirNotFound)?;
        Ok(home.join(".config").join(APP_DIR))
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join(CONFIG_FILE))
    }

    pub fn secret_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join(SECRET_FILE))
    }
}

impl Default for GlimpsePaths {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_base() {
        let paths = GlimpsePaths::new(Some(Path::new("/tmp/glimpse-test")));
        assert_eq!(
            paths.config_file().unwrap(),
            PathBuf::from("/tmp/glimpse-test/config.toml")
        );
        assert_eq!(
            paths.secret_file().unwrap(),
            PathBuf::from("/tmp/glimpse-test/secret.json")
        );
    }
}
