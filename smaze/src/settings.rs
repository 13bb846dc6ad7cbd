use std::{fs, io, path::PathBuf, str::FromStr};

use crossterm::style::{Color, ContentStyle};
use dirs::preference_dir;
use ron::{self, extensions::Extensions};
use serde::{Deserialize, Serialize};
use smaze_core::search::SearchKind;
use thiserror::Error;

const DEFAULT_SETTINGS: &str = include_str!("./default_settings.ron");

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Cannot read settings file: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid settings file: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub wall: Color,
    pub path: Color,
    pub player: Color,
    pub goal: Color,
    pub visited: Color,
    pub solution: Color,
}

impl ColorScheme {
    fn style(color: Color) -> ContentStyle {
        ContentStyle {
            foreground_color: Some(color),
            background_color: None,
            ..Default::default()
        }
    }

    pub fn walls(&self) -> ContentStyle {
        Self::style(self.wall)
    }

    pub fn paths(&self) -> ContentStyle {
        Self::style(self.path)
    }

    pub fn players(&self) -> ContentStyle {
        Self::style(self.player)
    }

    pub fn goals(&self) -> ContentStyle {
        Self::style(self.goal)
    }

    pub fn visiteds(&self) -> ContentStyle {
        Self::style(self.visited)
    }

    pub fn solutions(&self) -> ContentStyle {
        Self::style(self.solution)
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Settings::defaults()
            .color_scheme
            .unwrap_or(ColorScheme {
                wall: Color::White,
                path: Color::Black,
                player: Color::Green,
                goal: Color::Red,
                visited: Color::DarkCyan,
                solution: Color::Yellow,
            })
    }
}

/// User settings, every field is optional and falls back to the embedded defaults.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub maze_size: Option<i64>,
    #[serde(default)]
    pub algorithm: Option<String>,
    #[serde(default)]
    pub step_delay_ms: Option<u64>,
    #[serde(default)]
    pub log_level: Option<String>,
    #[serde(default)]
    pub color_scheme: Option<ColorScheme>,
}

impl Settings {
    pub fn default_path() -> PathBuf {
        preference_dir()
            .unwrap_or_default()
            .join("smaze")
            .join("settings.ron")
    }

    fn options() -> ron::Options {
        ron::Options::default().with_default_extension(Extensions::IMPLICIT_SOME)
    }

    pub fn parse(source: &str) -> Result<Self, SettingsError> {
        Ok(Self::options().from_str(source)?)
    }

    /// Settings embedded in the binary.
    pub fn defaults() -> Self {
        Self::parse(DEFAULT_SETTINGS).expect("embedded default settings are valid")
    }

    /// Loads settings from a file the user asked for, so it has to exist.
    pub fn load(path: PathBuf) -> Result<Self, SettingsError> {
        Self::load_from(path, false)
    }

    /// Loads settings from [`Settings::default_path`], a missing file means defaults only.
    pub fn load_default() -> Result<Self, SettingsError> {
        Self::load_from(Self::default_path(), true)
    }

    fn load_from(path: PathBuf, missing_ok: bool) -> Result<Self, SettingsError> {
        let settings = match fs::read_to_string(&path) {
            Ok(source) => Self::parse(&source)?,
            Err(err) if missing_ok && err.kind() == io::ErrorKind::NotFound => {
                log::debug!("No settings file at {path:?}, using defaults");
                Self::default()
            }
            Err(err) => return Err(err.into()),
        };

        Ok(settings.populate())
    }

    /// Fills in every missing field from the defaults.
    pub fn populate(self) -> Self {
        let defaults = Self::defaults();
        Self {
            maze_size: self.maze_size.or(defaults.maze_size),
            algorithm: self.algorithm.or(defaults.algorithm),
            step_delay_ms: self.step_delay_ms.or(defaults.step_delay_ms),
            log_level: self.log_level.or(defaults.log_level),
            color_scheme: self.color_scheme.or(defaults.color_scheme),
        }
    }

    pub fn get_maze_size(&self) -> i64 {
        self.maze_size.unwrap_or(25)
    }

    /// Unknown names are reported and replaced by A*.
    pub fn get_algorithm(&self) -> SearchKind {
        match self.algorithm.as_deref().map(SearchKind::from_str) {
            Some(Ok(kind)) => kind,
            Some(Err(err)) => {
                log::warn!("{err}, using A*");
                SearchKind::AStar
            }
            None => SearchKind::AStar,
        }
    }

    pub fn get_step_delay_ms(&self) -> u64 {
        self.step_delay_ms.unwrap_or_default()
    }

    pub fn get_log_level(&self) -> log::LevelFilter {
        match self.log_level.as_deref().map(log::LevelFilter::from_str) {
            Some(Ok(level)) => level,
            Some(Err(_)) => {
                log::warn!("Invalid log level {:?}, using warn", self.log_level);
                log::LevelFilter::Warn
            }
            None => log::LevelFilter::Warn,
        }
    }

    pub fn get_color_scheme(&self) -> ColorScheme {
        self.color_scheme.clone().unwrap_or_default()
    }
}
