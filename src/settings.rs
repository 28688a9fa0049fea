//! Settings file for editor and compose defaults
//!
//! Settings are optional. Every key has a default, so an empty file (or no
//! file at all) behaves like the built-in configuration.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::layout::config::{DEFAULT_OUTPUT, DEFAULT_SNAP_THRESHOLD};
use crate::layout::LayoutConfig;
use crate::renderer::{RenderConfig, ResampleFilter};
use crate::session::{SessionConfig, DEFAULT_DEBOUNCE};
use crate::ComposeConfig;

/// Errors that can occur when loading or parsing settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse settings TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Resolved settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub snap_threshold: u32,
    pub debounce: Duration,
    pub default_output: String,
    pub filter: ResampleFilter,
}

/// TOML structure for deserializing settings
#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlSettings {
    #[serde(default)]
    editor: TomlEditor,
    #[serde(default)]
    compose: TomlCompose,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlEditor {
    snap_threshold: Option<u32>,
    debounce_ms: Option<u64>,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlCompose {
    default_output: Option<String>,
    filter: Option<ResampleFilter>,
}

impl Settings {
    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Ok(content.parse()?)
    }

    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig::new()
            .with_default_output(self.default_output.clone())
            .with_snap_threshold(self.snap_threshold)
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig::new().with_filter(self.filter)
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::new()
            .with_layout(self.layout_config())
            .with_render(self.render_config())
            .with_debounce(self.debounce)
    }

    pub fn compose_config(&self) -> ComposeConfig {
        ComposeConfig::new()
            .with_layout(self.layout_config())
            .with_render(self.render_config())
    }
}

impl FromStr for Settings {
    type Err = toml::de::Error;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let parsed: TomlSettings = toml::from_str(content)?;
        Ok(Settings {
            snap_threshold: parsed.editor.snap_threshold.unwrap_or(DEFAULT_SNAP_THRESHOLD),
            debounce: parsed
                .editor
                .debounce_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_DEBOUNCE),
            default_output: parsed
                .compose
                .default_output
                .unwrap_or_else(|| DEFAULT_OUTPUT.to_string()),
            filter: parsed.compose.filter.unwrap_or_default(),
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            snap_threshold: DEFAULT_SNAP_THRESHOLD,
            debounce: DEFAULT_DEBOUNCE,
            default_output: DEFAULT_OUTPUT.to_string(),
            filter: ResampleFilter::default(),
        }
    }
}
