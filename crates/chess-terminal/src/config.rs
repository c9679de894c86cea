//! Configuration file loading.
//!
//! Settings live in `simple-chess.toml` in the working directory. The file is
//! optional; every field has a default and command-line flags override it.

use chess_board::TimeControl;
use chess_core::Color;
use chess_engine::Position;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading or resolving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// The file is not valid TOML or does not match the expected layout.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// Neither a built-in nor a custom preset has this name.
    #[error("Unknown time control preset: {0}")]
    UnknownPreset(String),
    #[error("Invalid starting position: {0}")]
    InvalidFen(#[from] chess_core::FenError),
}

/// The color the local player plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    White,
    Black,
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::White => Color::White,
            Side::Black => Color::Black,
        }
    }
}

/// A named time control defined in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct CustomPreset {
    pub minutes: u32,
    /// Seconds added after each move. Defaults to 0.
    #[serde(default)]
    pub increment: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TerminalConfig {
    /// Time control used when none is given on the command line. Either a
    /// built-in label such as "5+3" or the name of a custom preset.
    #[serde(default = "default_preset")]
    pub preset: String,
    #[serde(default)]
    pub color: Side,
    /// Milliseconds between clock updates.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Starting position; the standard one when absent.
    #[serde(default)]
    pub fen: Option<String>,
    #[serde(default)]
    pub presets: HashMap<String, CustomPreset>,
}

fn default_preset() -> String {
    "10+0".to_string()
}

fn default_tick_ms() -> u64 {
    500
}

impl Default for TerminalConfig {
    fn default() -> Self {
        TerminalConfig {
            preset: default_preset(),
            color: Side::default(),
            tick_ms: default_tick_ms(),
            fen: None,
            presets: HashMap::new(),
        }
    }
}

impl TerminalConfig {
    /// Loads the configuration from [`Self::config_path()`], falling back to
    /// defaults when the file does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads the configuration from `path`, falling back to defaults when the
    /// file does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn config_path() -> PathBuf {
        PathBuf::from("simple-chess.toml")
    }

    /// Resolves a preset name: custom presets first, then the built-in
    /// labels, then any `minutes+increment` text.
    pub fn time_control(&self, name: &str) -> Result<TimeControl, ConfigError> {
        if let Some(custom) = self.presets.get(name) {
            return Ok(TimeControl::custom(custom.minutes, custom.increment));
        }
        name.parse::<TimeControl>()
            .map_err(|_| ConfigError::UnknownPreset(name.to_string()))
    }

    /// The position to start from: `fen` if given, else the configured one,
    /// else the standard setup.
    pub fn start_position(&self, fen: Option<&str>) -> Result<Position, ConfigError> {
        match fen.or(self.fen.as_deref()) {
            Some(fen) => Ok(Position::from_fen(fen)?),
            None => Ok(Position::startpos()),
        }
    }
}
