//! Application configuration management.
//!
//! Settings are layered with `figment`, later layers overriding earlier ones:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. TOML file: `--config PATH`, or `config.toml` in the platform config dir
//! 3. Environment variables prefixed `DUPEFIND_`, nested with `__`
//!    (e.g. `DUPEFIND_EXTENSIONS__MEDIA='[".mp3"]'`)
//!
//! Command-line flags are applied on top by [`crate::cli`].

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::search::{
    ExtensionLists, MatchCriterion, NameCase, SearchOption, DEFAULT_SMALL_FILE_THRESHOLD,
};

/// Prefix of environment variables read by [`Config::load`].
pub const ENV_PREFIX: &str = "DUPEFIND_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Files below this size are dropped by `ignore-small-file`.
    pub small_file_threshold: u64,
    /// Name comparison policy.
    pub name_case: NameCase,
    /// Follow symbolic links while walking.
    pub follow_symlinks: bool,
    /// Filter options enabled unless `--no-default-options` is given.
    pub default_options: BTreeSet<SearchOption>,
    /// Match criteria used when `--match` is not given.
    pub default_match: Vec<MatchCriterion>,
    /// Extension lists used by the system/document/image/media filters.
    pub extensions: ExtensionLists,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            small_file_threshold: DEFAULT_SMALL_FILE_THRESHOLD,
            name_case: NameCase::Sensitive,
            follow_symlinks: false,
            default_options: [
                SearchOption::IgnoreEmptyFile,
                SearchOption::IgnoreHiddenFile,
                SearchOption::IgnoreSmallFile,
            ]
            .into_iter()
            .collect(),
            default_match: vec![MatchCriterion::Name],
            extensions: ExtensionLists::default(),
        }
    }
}

impl Config {
    /// Load the layered configuration.
    ///
    /// With `path`, that file must exist. Without it, the default file is
    /// used when present.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing or any layer fails to parse.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => {
                if !path.is_file() {
                    bail!("Config file not found: {}", path.display());
                }
                Some(path.to_path_buf())
            }
            None => Self::default_path().ok(),
        };

        let config = Self::figment(file.as_deref())
            .extract()
            .context("Failed to load configuration")?;
        log::debug!("Configuration loaded: {:?}", config);
        Ok(config)
    }

    /// The figment behind [`load`](Self::load).
    ///
    /// A missing file is skipped by the TOML provider.
    #[must_use]
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(file) = file {
            log::trace!("Reading config file {}", file.display());
            figment = figment.merge(Toml::file(file));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Write the configuration as TOML, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any filesystem operation fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Platform-specific path of the default config file.
    ///
    /// # Errors
    ///
    /// Returns an error when no home directory can be determined.
    pub fn default_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "dupefind", "dupefind")
            .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))?;
        Ok(project_dirs.config_dir().join("config.toml"))
    }
}
