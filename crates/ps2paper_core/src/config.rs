//! Layered application settings.
//!
//! Layers, later wins:
//! - built-in defaults
//! - a TOML file (`ps2paper.toml` in the working directory unless a path is given)
//! - environment variables prefixed `PS2PAPER_`, with `__` between nesting
//!   levels, e.g. `PS2PAPER_DISPLAY__UNITS=inch` or
//!   `PS2PAPER_SNIPPETS__FILETYPE_SUFFIX=true`

use crate::logging::default_log_level;
use crate::registry::{DefinitionSources, PaperRegistry};
use crate::service::launcher::{default_launcher_command, CommandLauncher};
use crate::snippet::SnippetStore;
use crate::units::DisplayUnits;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "ps2paper.toml";
pub const ENV_PREFIX: &str = "PS2PAPER_";

#[derive(Debug)]
pub enum ConfigError {
    Extract(Box<figment::Error>),
    Serialize(toml::ser::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Extract(err) => write!(f, "invalid configuration: {err}"),
            Self::Serialize(err) => write!(f, "failed to render configuration: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Extract(err) => Some(err.as_ref()),
            Self::Serialize(err) => Some(err),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub sources: DefinitionSources,
    #[serde(default)]
    pub snippets: SnippetSettings,
    #[serde(default)]
    pub display: DisplaySettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetSettings {
    /// Root below which `Printers/ps/Paper` receives written snippets.
    #[serde(default = "default_choices_write")]
    pub choices_write: PathBuf,
    /// Read-only snippet directories probed after the output directory.
    #[serde(default)]
    pub search_path: Vec<PathBuf>,
    /// Write `<key>,ff5` instead of `<key>`.
    #[serde(default)]
    pub filetype_suffix: bool,
    /// Program (with optional arguments) used to open snippet files.
    #[serde(default = "default_launcher")]
    pub launcher: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default)]
    pub units: DisplayUnits,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_level")]
    pub level: String,
    /// Absolute log directory; the platform data directory when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

fn base_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ps2paper")
}

fn default_choices_write() -> PathBuf {
    base_dir().join("Choices")
}

fn default_launcher() -> String {
    default_launcher_command().to_string()
}

fn default_level() -> String {
    default_log_level().to_string()
}

impl Default for SnippetSettings {
    fn default() -> Self {
        Self {
            choices_write: default_choices_write(),
            search_path: Vec::new(),
            filetype_suffix: false,
            launcher: default_launcher(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            dir: None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        let base = base_dir();
        Self {
            sources: DefinitionSources {
                master: Some(base.join("Printers").join("PaperRO")),
                user: Some(base.join("PrinterChoices").join("PaperRW")),
                device: Some(
                    base.join("Printers")
                        .join("ps")
                        .join("Resources")
                        .join("PaperRO"),
                ),
            },
            snippets: SnippetSettings::default(),
            display: DisplaySettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Settings {
    /// Loads settings from defaults, `ps2paper.toml` (if present) and the
    /// environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Loads settings using a specific TOML file. A missing file is skipped.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::extract(
            Figment::new()
                .merge(Serialized::defaults(Settings::default()))
                .merge(Toml::file(path.as_ref()))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    /// Parses settings from TOML text layered over the defaults only.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Self::extract(
            Figment::new()
                .merge(Serialized::defaults(Settings::default()))
                .merge(Toml::string(text)),
        )
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        figment
            .extract()
            .map_err(|err| ConfigError::Extract(Box::new(err)))
    }

    /// Renders the effective settings as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Log directory, falling back to the platform data directory.
    pub fn log_dir(&self) -> PathBuf {
        self.logging.dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("ps2paper")
                .join("logs")
        })
    }

    pub fn snippet_store(&self) -> SnippetStore {
        SnippetStore::new(self.snippets.choices_write.clone())
            .with_search_path(self.snippets.search_path.iter().cloned())
            .with_filetype_suffix(self.snippets.filetype_suffix)
    }

    pub fn registry(&self) -> PaperRegistry {
        PaperRegistry::new(self.sources.clone())
    }

    /// Launcher from settings, or the platform default if the setting is blank.
    pub fn launcher(&self) -> CommandLauncher {
        CommandLauncher::from_command_line(self.snippets.launcher.as_str())
            .unwrap_or_else(|| CommandLauncher::new(default_launcher_command()))
    }
}
