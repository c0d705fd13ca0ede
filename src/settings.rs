use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::Config;

const CONFIG_FILE: &str = "config.json";

pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn open(path: Option<PathBuf>) -> Self {
        let path = path.unwrap_or_else(Self::default_path);
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn default_path() -> PathBuf {
        // Alongside the executable, then the user config dir, then cwd
        if let Some(dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            dir.join(CONFIG_FILE)
        } else if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "jobpacker") {
            proj_dirs.config_dir().join(CONFIG_FILE)
        } else {
            PathBuf::from(CONFIG_FILE)
        }
    }

    /// Missing, empty and unparsable files all yield the default config.
    pub fn load(&self) -> Config {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "no settings file, using defaults");
                return Config::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "unreadable settings file, using defaults");
                Config::default()
            }
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(config).context("Failed to serialize settings")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))?;
        tracing::info!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}
