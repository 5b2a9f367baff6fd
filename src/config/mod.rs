//! Configuration management module.
//!
//! This module handles loading, saving, and managing the engine's tunable
//! heuristics: gesture classification, navigation thresholds and timeouts,
//! and virtualized row metrics. Every value has a named default so a missing
//! or partial `config.yml` is always valid.

mod error;

pub use error::ConfigError;

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

const FILE_NAME: &str = "config.yml";
const DEFAULT_DIRECTORY_PATH: &str = ".config/canvas-nav";

// Gesture classification defaults.
pub const CLASSIFICATION_WINDOW: usize = 5;
pub const MIN_CLASSIFICATION_SAMPLES: usize = 3;
pub const MOUSE_AVERAGE_THRESHOLD: f64 = 100.0;
pub const MOUSE_MIN_SAMPLE: f64 = 50.0;
pub const MOMENTUM_WINDOW_MS: u64 = 50;
pub const MOMENTUM_PATTERN_LEN: usize = 3;
pub const MOMENTUM_GROWTH_TOLERANCE: f64 = 1.1;
pub const MOMENTUM_DECAY_RATIO: f64 = 1.5;
pub const MOUSE_SATURATION: f64 = 150.0;
pub const MOUSE_COMPRESSION: f64 = 0.25;
pub const LINE_HEIGHT_PX: f64 = 16.0;
pub const PAGE_HEIGHT_PX: f64 = 800.0;

// Navigation defaults.
pub const BASE_THRESHOLD: f64 = 400.0;
pub const MOUSE_MULTIPLIER: f64 = 1.5;
pub const TRACKPAD_MULTIPLIER: f64 = 1.0;
pub const TOUCH_MULTIPLIER: f64 = 0.75;
pub const INDICATOR_MIN_PROGRESS: f64 = 10.0;
pub const IDLE_TIMEOUT_MS: u64 = 500;
pub const TRACKPAD_IDLE_TIMEOUT_MS: u64 = 1500;
pub const EDGE_THRESHOLD_PX: f64 = 50.0;
pub const MIN_EDGE_DWELL_MS: u64 = 0;
pub const TRANSITION_DURATION_MS: u64 = 600;
pub const SCROLL_IDLE_MS: u64 = 150;

// Row metrics defaults (pixels).
pub const OVERSCAN: usize = 3;
pub const HEADER_HEIGHT: u32 = 80;
pub const ITEM_HEIGHT: u32 = 120;
pub const ITEM_SPACING: u32 = 16;
pub const CONNECTOR_HEIGHT: u32 = 60;
pub const DEFAULT_ROW_HEIGHT: u32 = 100;

/// Heuristics used by the gesture classifier.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub classification_window: usize,
    pub min_classification_samples: usize,
    pub mouse_average_threshold: f64,
    pub mouse_min_sample: f64,
    pub momentum_window_ms: u64,
    pub momentum_pattern_len: usize,
    pub momentum_growth_tolerance: f64,
    pub momentum_decay_ratio: f64,
    pub mouse_saturation: f64,
    pub mouse_compression: f64,
    pub line_height_px: f64,
    pub page_height_px: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        GestureConfig {
            classification_window: CLASSIFICATION_WINDOW,
            min_classification_samples: MIN_CLASSIFICATION_SAMPLES,
            mouse_average_threshold: MOUSE_AVERAGE_THRESHOLD,
            mouse_min_sample: MOUSE_MIN_SAMPLE,
            momentum_window_ms: MOMENTUM_WINDOW_MS,
            momentum_pattern_len: MOMENTUM_PATTERN_LEN,
            momentum_growth_tolerance: MOMENTUM_GROWTH_TOLERANCE,
            momentum_decay_ratio: MOMENTUM_DECAY_RATIO,
            mouse_saturation: MOUSE_SATURATION,
            mouse_compression: MOUSE_COMPRESSION,
            line_height_px: LINE_HEIGHT_PX,
            page_height_px: PAGE_HEIGHT_PX,
        }
    }
}

/// Thresholds and timeouts for the navigation state machine.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub base_threshold: f64,
    pub mouse_multiplier: f64,
    pub trackpad_multiplier: f64,
    pub touch_multiplier: f64,
    pub indicator_min_progress: f64,
    pub idle_timeout_ms: u64,
    pub trackpad_idle_timeout_ms: u64,
    pub edge_threshold_px: f64,
    pub min_edge_dwell_ms: u64,
    pub gate_directions: bool,
    pub transition_duration_ms: u64,
    pub scroll_idle_ms: u64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        NavigationConfig {
            base_threshold: BASE_THRESHOLD,
            mouse_multiplier: MOUSE_MULTIPLIER,
            trackpad_multiplier: TRACKPAD_MULTIPLIER,
            touch_multiplier: TOUCH_MULTIPLIER,
            indicator_min_progress: INDICATOR_MIN_PROGRESS,
            idle_timeout_ms: IDLE_TIMEOUT_MS,
            trackpad_idle_timeout_ms: TRACKPAD_IDLE_TIMEOUT_MS,
            edge_threshold_px: EDGE_THRESHOLD_PX,
            min_edge_dwell_ms: MIN_EDGE_DWELL_MS,
            gate_directions: true,
            transition_duration_ms: TRANSITION_DURATION_MS,
            scroll_idle_ms: SCROLL_IDLE_MS,
        }
    }
}

/// Row metrics for the virtualized list.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VirtualizationConfig {
    pub overscan: usize,
    pub header_height: u32,
    pub item_height: u32,
    pub item_spacing: u32,
    pub connector_height: u32,
    pub default_height: u32,
}

impl Default for VirtualizationConfig {
    fn default() -> Self {
        VirtualizationConfig {
            overscan: OVERSCAN,
            header_height: HEADER_HEIGHT,
            item_height: ITEM_HEIGHT,
            item_spacing: ITEM_SPACING,
            connector_height: CONNECTOR_HEIGHT,
            default_height: DEFAULT_ROW_HEIGHT,
        }
    }
}

/// Oversees management of configuration file.
///
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub gesture: GestureConfig,
    pub navigation: NavigationConfig,
    pub virtualization: VirtualizationConfig,
    pub storage_dir: Option<PathBuf>,
    file_path: Option<PathBuf>,
}

/// Define specification for configuration file.
///
#[derive(Serialize, Deserialize, Default)]
struct FileSpec {
    #[serde(default)]
    pub gesture: GestureConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub virtualization: VirtualizationConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
}

impl FileSpec {
    /// Reject values that would stall or divide the engine by zero.
    ///
    fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.gesture;
        let n = &self.navigation;
        positive("navigation.base_threshold", n.base_threshold)?;
        positive("navigation.mouse_multiplier", n.mouse_multiplier)?;
        positive("navigation.trackpad_multiplier", n.trackpad_multiplier)?;
        positive("navigation.touch_multiplier", n.touch_multiplier)?;
        positive("gesture.line_height_px", g.line_height_px)?;
        positive("gesture.page_height_px", g.page_height_px)?;
        if !(0.0..100.0).contains(&n.indicator_min_progress) {
            return Err(invalid(
                "navigation.indicator_min_progress",
                format!("must be in 0..100, got {}", n.indicator_min_progress),
            ));
        }
        if !(0.0..=1.0).contains(&g.mouse_compression) {
            return Err(invalid(
                "gesture.mouse_compression",
                format!("must be in 0..=1, got {}", g.mouse_compression),
            ));
        }
        if g.min_classification_samples == 0 || g.min_classification_samples > g.classification_window {
            return Err(invalid(
                "gesture.min_classification_samples",
                format!(
                    "must be between 1 and classification_window ({}), got {}",
                    g.classification_window, g.min_classification_samples
                ),
            ));
        }
        if g.momentum_pattern_len < 2 {
            return Err(invalid(
                "gesture.momentum_pattern_len",
                format!("needs at least 2 samples, got {}", g.momentum_pattern_len),
            ));
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("must be positive, got {}", value)))
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::InvalidValue { field, reason }
}

impl Config {
    /// Return a new instance holding the default heuristics.
    ///
    pub fn new() -> Config {
        Config::default()
    }

    /// Try to load an existing configuration from the disk using the custom
    /// directory if provided, otherwise the default directory under `$HOME`.
    /// A missing file leaves the defaults in place.
    ///
    pub fn load(&mut self, custom_path: Option<&str>) -> Result<(), AppError> {
        let dir_path = match custom_path {
            Some(path) => Path::new(&path).to_path_buf(),
            None => Config::default_path()?,
        };

        if !dir_path.exists() {
            fs::create_dir_all(&dir_path).map_err(|e| ConfigError::CreateDirectoryFailed {
                path: dir_path.clone(),
                source: e,
            })?;
        }

        self.file_path = Some(dir_path.join(Path::new(FILE_NAME)));
        let file_path = self.file_path.as_ref().ok_or(ConfigError::FilePathNotSet)?;

        if file_path.exists() {
            let contents = fs::read_to_string(file_path).map_err(|e| ConfigError::LoadFailed {
                path: file_path.clone(),
                message: format!("IO error: {}", e),
            })?;
            let data = Config::parse(&contents)?;
            self.gesture = data.gesture;
            self.navigation = data.navigation;
            self.virtualization = data.virtualization;
            self.storage_dir = data.storage_dir;
        }

        Ok(())
    }

    /// Save the current configuration to disk.
    ///
    pub fn save(&self) -> Result<(), AppError> {
        let file_path = self.file_path.as_ref().ok_or(ConfigError::FilePathNotSet)?;
        let content = self.to_yaml()?;

        if let Some(parent) = file_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::CreateDirectoryFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let mut file = fs::File::create(file_path).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        write!(file, "{}", content).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        file.flush().map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        Ok(())
    }

    /// Directory the persisted store lives in: the configured override, or
    /// the directory holding `config.yml`.
    ///
    pub fn storage_directory(&self) -> Result<PathBuf, AppError> {
        if let Some(dir) = &self.storage_dir {
            return Ok(dir.clone());
        }
        match self.file_path.as_ref().and_then(|p| p.parent()) {
            Some(parent) => Ok(parent.to_path_buf()),
            None => Config::default_path(),
        }
    }

    /// Path of the loaded configuration file, if any.
    ///
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    fn parse(contents: &str) -> Result<FileSpec, ConfigError> {
        // An empty file deserializes to unit in YAML; treat it as all defaults.
        if contents.trim().is_empty() {
            return Ok(FileSpec::default());
        }
        let spec: FileSpec =
            serde_yaml::from_str(contents).map_err(|e| ConfigError::DeserializationFailed(e.to_string()))?;
        spec.validate()?;
        Ok(spec)
    }

    fn to_yaml(&self) -> Result<String, ConfigError> {
        let data = FileSpec {
            gesture: self.gesture.clone(),
            navigation: self.navigation.clone(),
            virtualization: self.virtualization.clone(),
            storage_dir: self.storage_dir.clone(),
        };
        serde_yaml::to_string(&data).map_err(|e| ConfigError::SerializationFailed(e.to_string()))
    }

    /// Returns the path buffer for the default configuration directory or an
    /// error if the home directory could not be found.
    ///
    fn default_path() -> Result<PathBuf, AppError> {
        match dirs::home_dir() {
            Some(home) => {
                let home_path = Path::new(&home);
                let default_config_path = Path::new(DEFAULT_DIRECTORY_PATH);
                Ok(home_path.join(default_config_path))
            }
            None => Err(ConfigError::HomeDirectoryNotFound.into()),
        }
    }
}
