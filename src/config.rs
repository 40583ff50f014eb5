/// Editor settings
///
/// Read once at startup from `<config dir>/image-stack/config.json`.
/// Missing fields fall back to their defaults; a missing file means
/// all defaults.
use std::path::PathBuf;

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Side length of the composite canvas in pixels
pub const DEFAULT_CANVAS_SIZE: u32 = 1000;

/// Largest accepted canvas side; 8192^2 RGBA is 256 MiB
pub const MAX_CANVAS_SIZE: u32 = 8192;

/// Bounding box of list-row thumbnails in pixels
pub const DEFAULT_THUMBNAIL_SIZE: u32 = 96;

pub const MAX_THUMBNAIL_SIZE: u32 = 512;

/// Resampling filter used when stretching a crop onto the canvas
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResampleFilter {
    Nearest,
    #[default]
    Triangle,
    CatmullRom,
    Lanczos3,
}

impl From<ResampleFilter> for FilterType {
    fn from(filter: ResampleFilter) -> Self {
        match filter {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Triangle => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct EditorConfig {
    /// Composite canvas is `canvas_size` x `canvas_size`
    pub canvas_size: u32,
    pub thumbnail_size: u32,
    pub filter: ResampleFilter,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_size: DEFAULT_CANVAS_SIZE,
            thumbnail_size: DEFAULT_THUMBNAIL_SIZE,
            filter: ResampleFilter::default(),
        }
    }
}

impl EditorConfig {
    #[cfg(test)]
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON, replacing zero sizes with their defaults and
    /// clamping oversized ones
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Load the config file, or defaults if it is absent or unreadable
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };

        let json = match std::fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                tracing::warn!("Could not read {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("Ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Where the config file is expected:
    /// - Linux: ~/.config/image-stack/config.json
    /// - macOS: ~/Library/Application Support/image-stack/config.json
    /// - Windows: %APPDATA%\image-stack\config.json
    pub fn path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("image-stack");
        path.push("config.json");
        Some(path)
    }

    fn sanitized(mut self) -> Self {
        if self.canvas_size == 0 {
            self.canvas_size = DEFAULT_CANVAS_SIZE;
        }
        if self.canvas_size > MAX_CANVAS_SIZE {
            tracing::warn!(
                "canvas_size {} is too large, using {}",
                self.canvas_size,
                MAX_CANVAS_SIZE
            );
            self.canvas_size = MAX_CANVAS_SIZE;
        }
        if self.thumbnail_size == 0 {
            self.thumbnail_size = DEFAULT_THUMBNAIL_SIZE;
        }
        self.thumbnail_size = self.thumbnail_size.min(MAX_THUMBNAIL_SIZE);
        self
    }
}
