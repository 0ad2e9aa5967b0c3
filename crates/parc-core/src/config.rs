//! Configuration types for parc.
//!
//! [`Config::load`] reads `~/.config/parc/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::defaults`] returns
//! the same defaults without touching the filesystem (useful in tests).

use serde::Deserialize;
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::present::ClassifyRules;
use crate::search::{MatchMode, SearchOptions};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[source]
path       = "PARC RZB (version 1).xlsx"
sheet      = "Feuil2"
header_row = 2
delimiter  = ";"

[search]
mode            = "contains"
include_serials = false

[classify]
preset      = "default"
hme_pattern = ""
rzb_pattern = ""

[ui]
results_pane_width_pct = 55
theme                  = "default"
watch_source           = true
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration, loaded from `~/.config/parc/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub classify: ClassifyConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// `[source]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_source_path")]
    pub path: PathBuf,
    /// Worksheet name; ignored for delimited files.
    #[serde(default = "default_sheet")]
    pub sheet: String,
    /// 0-based row holding the headers.
    #[serde(default = "default_header_row")]
    pub header_row: usize,
    /// Field separator for delimited files.
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

fn default_source_path() -> PathBuf { PathBuf::from("PARC RZB (version 1).xlsx") }
fn default_sheet() -> String { "Feuil2".to_string() }
fn default_header_row() -> usize { 2 }
fn default_delimiter() -> String { ";".to_string() }

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: default_source_path(),
            sheet: default_sheet(),
            header_row: default_header_row(),
            delimiter: default_delimiter(),
        }
    }
}

impl SourceConfig {
    /// The delimiter as a single byte. Must be one ASCII character.
    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(ConfigError::Invalid {
                key: "source.delimiter",
                reason: format!("{:?} is not a single ASCII character", self.delimiter),
            }),
        }
    }
}

/// `[search]` section of `config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub mode: MatchMode,
    #[serde(default)]
    pub include_serials: bool,
}

impl SearchConfig {
    pub fn options(&self) -> SearchOptions {
        SearchOptions {
            mode: self.mode,
            include_serials: self.include_serials,
        }
    }
}

/// `[classify]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifyConfig {
    #[serde(default = "default_preset")]
    pub preset: String,
    /// Overrides the preset's HME pattern when non-empty.
    #[serde(default)]
    pub hme_pattern: String,
    #[serde(default)]
    pub rzb_pattern: String,
}

fn default_preset() -> String { "default".to_string() }

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            preset: default_preset(),
            hme_pattern: String::new(),
            rzb_pattern: String::new(),
        }
    }
}

impl ClassifyConfig {
    /// Build the rules: the preset first, then any non-empty pattern override.
    pub fn rules(&self) -> Result<ClassifyRules, ConfigError> {
        let preset = match self.preset.trim().to_ascii_lowercase().as_str() {
            "" | "default" => ClassifyRules::default(),
            "strict" => ClassifyRules::strict(),
            _ => return Err(ConfigError::UnknownPreset(self.preset.clone())),
        };
        if self.hme_pattern.is_empty() && self.rzb_pattern.is_empty() {
            return Ok(preset);
        }
        let hme = non_empty_or(&self.hme_pattern, preset.hme_pattern());
        let rzb = non_empty_or(&self.rzb_pattern, preset.rzb_pattern());
        Ok(ClassifyRules::new(hme, rzb)?)
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() { fallback } else { value }
}

/// `[ui]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_results_pane_width_pct")]
    pub results_pane_width_pct: u16,
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Reload the table when the source file changes on disk.
    #[serde(default = "default_watch_source")]
    pub watch_source: bool,
}

fn default_results_pane_width_pct() -> u16 { 55 }
fn default_theme() -> String { "default".to_string() }
fn default_watch_source() -> bool { true }

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            results_pane_width_pct: default_results_pane_width_pct(),
            theme: default_theme(),
            watch_source: default_watch_source(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/parc/config.toml`, layered on top of the built-in
    /// defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path();

        if !path.exists() {
            let write = |path: &std::path::Path| -> std::io::Result<()> {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, DEFAULT_CONFIG.trim_start())
            };
            write(&path).map_err(|source| ConfigError::Io { path: path.clone(), source })?;
            tracing::info!(path = %path.display(), "wrote default config");
        }

        let config: Self = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path.as_path()).required(false))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    /// Parse a TOML string layered over the defaults.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that need more than deserialization.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.source.delimiter_byte()?;
        self.classify.rules()?;
        if !(10..=90).contains(&self.ui.results_pane_width_pct) {
            return Err(ConfigError::Invalid {
                key: "ui.results_pane_width_pct",
                reason: format!("{} is outside 10..=90", self.ui.results_pane_width_pct),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// `$XDG_CONFIG_HOME/parc/config.toml`, falling back to `~/.config`.
pub fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("parc")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
