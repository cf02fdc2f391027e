//! Configuration management for the compiler
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (domainforge.toml)
//! - Environment variables (DOMAINFORGE_*)
//!
//! ## Example config file (domainforge.toml):
//! ```toml
//! [output]
//! dir = "generated"
//!
//! [emit]
//! validation = true
//! relational = true
//! interface = true
//! contract = false
//!
//! [import]
//! strict = false
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the compiler
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Which backends to emit
    #[serde(default)]
    pub emit: EmitConfig,

    /// Import settings
    #[serde(default)]
    pub import: ImportConfig,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory artifacts are written to
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

/// Per-backend emission switches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmitConfig {
    #[serde(default = "default_true")]
    pub validation: bool,

    #[serde(default = "default_true")]
    pub relational: bool,

    #[serde(default = "default_true")]
    pub interface: bool,

    #[serde(default = "default_true")]
    pub contract: bool,
}

/// Import configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Treat skipped entries as fatal instead of warnings
    #[serde(default)]
    pub strict: bool,
}

// Default value functions
fn default_output_dir() -> PathBuf {
    PathBuf::from("generated")
}

fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            validation: true,
            relational: true,
            interface: true,
            contract: true,
        }
    }
}

impl CompilerConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // Load from default locations
        let config_locations = ["domainforge.toml", ".domainforge.toml"];
        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "domainforge", "domainforge")
        {
            let xdg_config = config_dir.config_dir().join("domainforge.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        // Load from specified path
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Load from environment variables (DOMAINFORGE_*)
        builder = builder.add_source(
            Environment::with_prefix("DOMAINFORGE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Get the output directory (resolves relative paths)
    pub fn output_dir(&self) -> PathBuf {
        if self.output.dir.is_absolute() {
            self.output.dir.clone()
        } else {
            std::env::current_dir()
                .unwrap_or_default()
                .join(&self.output.dir)
        }
    }
}
