//! Configuration for the Scribe hint engine (`scribe.toml`) and global
//! `tracing` setup.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use parking_lot::ReentrantMutex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod logging;
mod schema;

pub use logging::{init_tracing, LoggingConfig};
pub use schema::json_schema;

/// Owner id under which the mandate hint producer registers its hints.
pub const DEFAULT_OWNER: &str = "editor-plugins/mandaat-card";

/// Class IRI a schema property must have as its range for a region to be
/// eligible for mandate hints.
pub const DEFAULT_TARGET_RANGE: &str = "http://data.vlaanderen.be/ns/mandaat#Mandaat";

/// Property linking a session to the administrative body that holds it.
pub const DEFAULT_SCOPE_PROPERTY: &str = "http://data.vlaanderen.be/ns/besluit#isGehoudenDoor";

/// Environment variable overriding config discovery.
pub const SCRIBE_CONFIG_ENV_VAR: &str = "SCRIBE_CONFIG_PATH";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct HintsConfig {
    /// Identity attached to every hint this producer emits or removes.
    #[serde(default = "HintsConfig::default_owner")]
    pub owner: String,

    /// Quiet period after a document change before detection starts.
    #[serde(default = "HintsConfig::default_debounce_ms")]
    pub debounce_ms: u64,

    /// Range class a region's applicable schema properties must point at.
    #[serde(default = "HintsConfig::default_target_range")]
    pub target_range: String,

    /// Property whose object in the document identifies the governing scope.
    #[serde(default = "HintsConfig::default_scope_property")]
    pub scope_property: String,

    /// Longest run of consecutive words considered as one token.
    #[serde(default = "HintsConfig::default_max_words")]
    #[schemars(range(min = 1))]
    pub max_words: usize,
}

impl HintsConfig {
    fn default_owner() -> String {
        DEFAULT_OWNER.to_owned()
    }

    fn default_debounce_ms() -> u64 {
        300
    }

    fn default_target_range() -> String {
        DEFAULT_TARGET_RANGE.to_owned()
    }

    fn default_scope_property() -> String {
        DEFAULT_SCOPE_PROPERTY.to_owned()
    }

    fn default_max_words() -> usize {
        5
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for HintsConfig {
    fn default() -> Self {
        Self {
            owner: Self::default_owner(),
            debounce_ms: Self::default_debounce_ms(),
            target_range: Self::default_target_range(),
            scope_property: Self::default_scope_property(),
            max_words: Self::default_max_words(),
        }
    }
}

/// Top-level `scribe.toml`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ScribeConfig {
    /// Hint detection settings.
    #[serde(default)]
    pub hints: HintsConfig,

    /// Global logging settings for Scribe crates.
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // The default `Display` includes a source snippet; keep only the message.
        ConfigError::Toml(err.message().to_owned())
    }
}

impl ScribeConfig {
    /// Load a config file from TOML.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load_from_str(&text)
    }

    /// Load a config from a TOML string.
    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        let config: ScribeConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hints.max_words == 0 {
            return Err(ConfigError::Invalid(
                "hints.max_words must be at least 1".to_owned(),
            ));
        }
        if self.hints.owner.trim().is_empty() {
            return Err(ConfigError::Invalid("hints.owner must not be empty".to_owned()));
        }
        if self.hints.target_range.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "hints.target_range must not be empty".to_owned(),
            ));
        }
        Ok(())
    }
}

static CONFIG_ENV_LOCK: OnceLock<ReentrantMutex<()>> = OnceLock::new();

fn config_env_lock() -> &'static ReentrantMutex<()> {
    CONFIG_ENV_LOCK.get_or_init(|| ReentrantMutex::new(()))
}

/// Run `f` while holding the config environment lock.
///
/// Tests that set [`SCRIBE_CONFIG_ENV_VAR`] must wrap the mutation and the
/// discovery call in this helper, since environment variables are process-global.
pub fn with_config_env_lock<R>(f: impl FnOnce() -> R) -> R {
    let _guard = config_env_lock().lock();
    f()
}

/// Discover the Scribe configuration file for a project root.
///
/// Search order:
/// 1) `SCRIBE_CONFIG_PATH` (absolute or relative to `root`)
/// 2) `scribe.toml` in `root`
/// 3) `.scribe.toml` in `root`
pub fn discover_config_path(root: &Path) -> Option<PathBuf> {
    let _guard = config_env_lock().lock();
    if let Some(value) = std::env::var_os(SCRIBE_CONFIG_ENV_VAR) {
        let candidate = PathBuf::from(value);
        let path = if candidate.is_absolute() {
            candidate
        } else {
            root.join(candidate)
        };
        return Some(path.canonicalize().unwrap_or(path));
    }

    ["scribe.toml", ".scribe.toml"]
        .into_iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file())
        .map(|path| path.canonicalize().unwrap_or(path))
}

/// Load the configuration for a project root.
///
/// If no config is present, returns [`ScribeConfig::default`] and `None`.
pub fn load_for_root(root: &Path) -> Result<(ScribeConfig, Option<PathBuf>), ConfigError> {
    let Some(path) = discover_config_path(root) else {
        tracing::debug!(target = "scribe.config", root = %root.display(), "no config file found, using defaults");
        return Ok((ScribeConfig::default(), None));
    };

    let config = ScribeConfig::load_from_path(&path)?;
    tracing::debug!(target = "scribe.config", path = %path.display(), "loaded config");
    Ok((config, Some(path)))
}
