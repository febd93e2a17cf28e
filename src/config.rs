use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::metadata::ProgramDefaults;
use crate::setup::SetupOptions;

/// File name searched for in the working directory and its ancestors
pub const CONFIG_FILE_NAME: &str = "apertium-setup.toml";

/// Tool configuration (loaded from TOML file)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SetupConfig {
    #[serde(default)]
    pub programs: ProgramsConfig,

    #[serde(default)]
    pub paths: PathsConfig,
}

/// Programs written into every generated Makefile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgramsConfig {
    /// `MKDIR_P`
    #[serde(default = "default_mkdir_p")]
    pub mkdir_p: String,

    /// `INSTALL`
    #[serde(default = "default_install")]
    pub install: String,

    /// `SHELL`
    #[serde(default = "default_shell")]
    pub shell: String,
}

impl Default for ProgramsConfig {
    fn default() -> Self {
        Self {
            mkdir_p: default_mkdir_p(),
            install: default_install(),
            shell: default_shell(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PathsConfig {
    /// Installation prefix
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
        }
    }
}

fn default_mkdir_p() -> String {
    ProgramDefaults::default().mkdir_p
}

fn default_install() -> String {
    ProgramDefaults::default().install
}

fn default_shell() -> String {
    ProgramDefaults::default().shell
}

fn default_prefix() -> String {
    SetupOptions::default().prefix
}

impl SetupConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: SetupConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        Ok(config)
    }

    /// Config file in effect: the explicit path, else a discovered one
    pub fn locate(explicit_path: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit_path {
            return Ok(Some(path.to_path_buf()));
        }

        let discovered = discover_config(&std::env::current_dir()?);
        match &discovered {
            Some(path) => info!("Using config: {}", path.display()),
            None => debug!("No configuration file found, using defaults"),
        }
        Ok(discovered)
    }

    /// Load a located config file, or fall back to defaults
    pub fn load_located(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Load an explicit config file, or discover one, or fall back to defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let located = Self::locate(explicit_path)?;
        Self::load_located(located.as_deref())
    }

    /// Program defaults for the settings store
    pub fn program_defaults(&self) -> ProgramDefaults {
        ProgramDefaults {
            mkdir_p: self.programs.mkdir_p.clone(),
            install: self.programs.install.clone(),
            shell: self.programs.shell.clone(),
        }
    }

    /// Setup options; a prefix from the command line wins over the file
    pub fn setup_options(&self, prefix: Option<&str>) -> SetupOptions {
        SetupOptions {
            prefix: prefix
                .map(str::to_string)
                .unwrap_or_else(|| self.paths.prefix.clone()),
        }
    }
}

/// Find a config file by walking up from `start_dir`, then the user config dir
pub fn discover_config(start_dir: &Path) -> Option<PathBuf> {
    let found = start_dir
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.exists());
    if found.is_some() {
        return found;
    }

    dirs::config_dir()
        .map(|dir| dir.join("apertium-setup").join("config.toml"))
        .filter(|global| global.exists())
}
