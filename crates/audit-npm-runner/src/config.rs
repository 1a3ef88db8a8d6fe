//! `audit-npm.config.json` loading and CLI merge.
//!
//! The file is read as JSON5 so comments and trailing commas are accepted.
//! Unknown fields are ignored. Precedence:
//! - severity: CLI, then file, then [`DEFAULT_SEVERITY`]
//! - ignore: file entries followed by CLI entries (additive)

use audit_npm_core::IgnoreEntry;
use config::{Config, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::ConfigError;

/// Config file looked up in the target directory when none is given.
pub const CONFIG_FILE_NAME: &str = "audit-npm.config.json";

/// Threshold used when neither the file nor the CLI sets one.
pub const DEFAULT_SEVERITY: &str = "moderate";

#[derive(Debug, Default, Deserialize)]
struct ConfigDocument {
    #[serde(default)]
    severity: Option<String>,
    #[serde(default)]
    ignore: Vec<IgnoreEntry>,
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Explicit config path. Defaults apply when it does not exist.
    pub config_file: Option<PathBuf>,
    pub severity: Option<String>,
    pub ignore: Vec<String>,
}

/// Effective audit policy after merging file and CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditConfig {
    pub severity: String,
    pub ignore: Vec<IgnoreEntry>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            severity: DEFAULT_SEVERITY.to_string(),
            ignore: Vec::new(),
        }
    }
}

impl AuditConfig {
    /// Load the config for `directory` and apply `overrides`.
    ///
    /// A missing config file, default or explicit, yields defaults.
    pub fn load(directory: &Path, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let mut config = AuditConfig::default();

        let document = match &overrides.config_file {
            Some(path) if path.is_file() => Some(read_document(path)?),
            Some(path) => {
                warn!(path = %path.display(), "Config file not found, using defaults");
                None
            }
            None => {
                let path = directory.join(CONFIG_FILE_NAME);
                if path.is_file() {
                    Some(read_document(&path)?)
                } else {
                    debug!(path = %path.display(), "No config file, using defaults");
                    None
                }
            }
        };

        if let Some(document) = document {
            if let Some(severity) = document.severity.filter(|s| !s.is_empty()) {
                config.severity = severity;
            }
            config
                .ignore
                .extend(document.ignore.into_iter().filter(|e| !e.id().is_empty()));
        }

        if let Some(severity) = overrides.severity.as_ref().filter(|s| !s.is_empty()) {
            config.severity = severity.clone();
        }

        config.ignore.extend(
            overrides
                .ignore
                .iter()
                .map(|id| id.trim())
                .filter(|id| !id.is_empty())
                .map(IgnoreEntry::from),
        );

        Ok(config)
    }

    /// Configured ids, in order, without expiry information.
    pub fn ignore_ids(&self) -> Vec<&str> {
        self.ignore.iter().map(IgnoreEntry::id).collect()
    }
}

fn read_document(path: &Path) -> Result<ConfigDocument, ConfigError> {
    info!(path = %path.display(), "Loading config");

    let load_error = |source: config::ConfigError| ConfigError::Load {
        path: path.to_path_buf(),
        source,
    };

    Config::builder()
        .add_source(config::File::from(path).format(FileFormat::Json5))
        .build()
        .map_err(load_error)?
        .try_deserialize::<ConfigDocument>()
        .map_err(load_error)
}
