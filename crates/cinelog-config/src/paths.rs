use anyhow::Result;
use std::path::{Path, PathBuf};

/// Base directory override, read from `CINELOG_BASE_PATH`
pub fn base_path_override() -> Option<PathBuf> {
    std::env::var("CINELOG_BASE_PATH").ok().map(PathBuf::from)
}

pub struct PathManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("cinelog");

        Ok(Self::from_base(base_dir))
    }

    /// Lay out config and data under one directory
    pub fn from_base(base: PathBuf) -> Self {
        Self {
            data_dir: base.join("data"),
            config_dir: base,
        }
    }

    /// Directory holding the key-value storage files
    pub fn storage_dir(&self) -> PathBuf {
        self.data_dir.join("storage")
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Create the config directory and `storage_dir`, or a configured replacement for it
    pub fn ensure_directories(&self, storage_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(storage_dir)?;
        Ok(())
    }
}

impl Default for PathManager {
    fn default() -> Self {
        if let Some(base) = base_path_override() {
            return Self::from_base(base);
        }

        // Platform-specific paths (e.g., ~/.config/cinelog on Linux)
        Self::new().unwrap_or_else(|_| Self::from_base(PathBuf::from(".cinelog")))
    }
}
