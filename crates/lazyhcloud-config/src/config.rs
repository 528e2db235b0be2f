//! Project configuration
//!
//! Located at `~/.config/lazyhcloud/config.toml`

use crate::{ConfigError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level lazyhcloud configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name of the project opened automatically at startup
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_project: Option<String>,
    pub defaults: DefaultsConfig,
    pub projects: Vec<ProjectConfig>,
}

/// A named API credential for one cloud project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    pub token: String,
}

impl ProjectConfig {
    pub fn new(name: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            token: token.into(),
        }
    }
}

/// Default settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Remote user for SSH sessions
    pub ssh_user: String,
    /// Preferred terminal emulator for "SSH in new terminal"
    pub terminal: Option<String>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            ssh_user: "root".to_string(),
            terminal: None,
        }
    }
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut config: Self =
            toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
                path: path.to_path_buf(),
                source: e,
            })?;

        // A marker naming a project that no longer exists is dropped
        if let Some(default) = &config.default_project {
            if config.get_project(default).is_none() {
                tracing::warn!("Default project {:?} is not configured, ignoring", default);
                config.default_project = None;
            }
        }

        tracing::debug!(
            "Loaded config from {:?}: {} project(s)",
            path,
            config.projects.len()
        );

        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    /// Save configuration to a specific path
    ///
    /// The file holds API tokens, so on Unix it is restricted to the owner.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let write_err = |e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(write_err)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
                .map_err(write_err)?;
        }

        Ok(())
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "lazyhcloud").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Add a project, replacing any existing project with the same name.
    ///
    /// The first project added becomes the default.
    pub fn add_project(&mut self, project: ProjectConfig) -> Result<()> {
        if project.name.trim().is_empty() {
            return Err(ConfigError::Invalid("project name is empty".to_string()));
        }
        if project.token.trim().is_empty() {
            return Err(ConfigError::Invalid("project token is empty".to_string()));
        }

        match self.projects.iter_mut().find(|p| p.name == project.name) {
            Some(existing) => *existing = project,
            None => self.projects.push(project),
        }

        if self.default_project.is_none() {
            self.default_project = self.projects.first().map(|p| p.name.clone());
        }
        Ok(())
    }

    /// Remove a project by name, returning it if it was present.
    ///
    /// If the removed project was the default, the first remaining project
    /// (if any) becomes the new default.
    pub fn remove_project(&mut self, name: &str) -> Option<ProjectConfig> {
        let idx = self.projects.iter().position(|p| p.name == name)?;
        let removed = self.projects.remove(idx);

        if self.default_project.as_deref() == Some(name) {
            self.default_project = self.projects.first().map(|p| p.name.clone());
        }
        Some(removed)
    }

    pub fn get_project(&self, name: &str) -> Option<&ProjectConfig> {
        self.projects.iter().find(|p| p.name == name)
    }

    /// Mark an existing project as the default
    pub fn set_default(&mut self, name: &str) -> Result<()> {
        if self.get_project(name).is_none() {
            return Err(ConfigError::Invalid(format!("unknown project: {}", name)));
        }
        self.default_project = Some(name.to_string());
        Ok(())
    }

    /// The default project, if one is set and still configured
    pub fn default_project(&self) -> Option<&ProjectConfig> {
        self.default_project
            .as_deref()
            .and_then(|name| self.get_project(name))
    }

    pub fn is_default(&self, name: &str) -> bool {
        self.default_project.as_deref() == Some(name)
    }
}
