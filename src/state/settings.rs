/// User settings for the gallery
///
/// Stored as TOML in `settings.toml` inside the config directory:
/// - `$GALLERY_GRID_CONFIG_DIR` when set
/// - otherwise the platform config directory (e.g. ~/.config/gallery-grid)
///
/// Every field has a default, so a partial file is valid.
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

const APP_DIR: &str = "gallery-grid";
const CONFIG_FILE: &str = "settings.toml";

/// Environment variable overriding the config directory
pub const ENV_CONFIG_DIR: &str = "GALLERY_GRID_CONFIG_DIR";

/// All settings, grouped by section
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Settings {
    pub source: SourceSettings,
    pub grid: GridSettings,
    pub drag: DragSettings,
    pub thumbnails: ThumbnailSettings,
}

/// `[source]`: where the image listing comes from
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SourceSettings {
    pub endpoint: String,
    pub page: u32,
    pub limit: u32,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://picsum.photos/v2/list".to_string(),
            page: 2,
            limit: 100,
        }
    }
}

impl SourceSettings {
    /// Full listing URL including the page and limit parameters
    pub fn listing_url(&self) -> String {
        let separator = if self.endpoint.contains('?') { '&' } else { '?' };
        format!(
            "{}{}page={}&limit={}",
            self.endpoint, separator, self.page, self.limit
        )
    }
}

/// `[grid]`: tile geometry in logical pixels
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct GridSettings {
    pub tile_size: f32,
    pub spacing: f32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            tile_size: 200.0,
            spacing: 12.0,
        }
    }
}

/// `[drag]`: activation constraints for the pointer sensor
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct DragSettings {
    /// Distance the mouse must travel before a drag starts (0 = on press)
    pub mouse_distance: f32,
    /// How long a finger must rest on a tile before a drag starts
    pub touch_delay_ms: u64,
    /// How far a finger may wander during the delay
    pub touch_tolerance: f32,
}

impl Default for DragSettings {
    fn default() -> Self {
        Self {
            mouse_distance: 0.0,
            touch_delay_ms: 250,
            touch_tolerance: 5.0,
        }
    }
}

impl DragSettings {
    pub fn touch_delay(&self) -> Duration {
        Duration::from_millis(self.touch_delay_ms)
    }
}

/// `[thumbnails]`: lazy thumbnail loading
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ThumbnailSettings {
    /// Longest edge of a decoded thumbnail
    pub size: u32,
    /// Extra distance above and below the viewport to preload
    pub preload_buffer: f32,
    /// Cap on a single downloaded image
    pub max_download_bytes: usize,
}

impl Default for ThumbnailSettings {
    fn default() -> Self {
        Self {
            size: 256,
            preload_buffer: 400.0,
            max_download_bytes: 32 * 1024 * 1024,
        }
    }
}

impl Settings {
    /// Serialize to a TOML string
    #[cfg(test)]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    /// Parse from a TOML string
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Clamp values into usable ranges
    pub fn sanitized(mut self) -> Self {
        self.source.limit = self.source.limit.clamp(1, 1000);
        self.grid.tile_size = finite_or(self.grid.tile_size, 200.0).clamp(48.0, 1024.0);
        self.grid.spacing = finite_or(self.grid.spacing, 12.0).clamp(0.0, 128.0);
        self.drag.mouse_distance = finite_or(self.drag.mouse_distance, 0.0).max(0.0);
        self.drag.touch_tolerance = finite_or(self.drag.touch_tolerance, 5.0).max(0.0);
        self.thumbnails.size = self.thumbnails.size.clamp(16, 2048);
        self.thumbnails.preload_buffer = finite_or(self.thumbnails.preload_buffer, 400.0).max(0.0);
        self.thumbnails.max_download_bytes = self.thumbnails.max_download_bytes.max(1024);
        self
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Directory holding `settings.toml`
pub fn config_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os(ENV_CONFIG_DIR) {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|dir| dir.join(APP_DIR))
}

/// Load settings from an explicit file. A missing file yields defaults.
pub fn load_from_path(path: &Path) -> Result<Settings, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Settings::default()),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let settings = Settings::from_toml(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(settings.sanitized())
}

/// Load settings from the default location.
///
/// Never fails: problems are returned as a warning alongside the defaults.
pub fn load() -> (Settings, Option<String>) {
    let Some(dir) = config_dir() else {
        return (
            Settings::default(),
            Some("Could not determine config directory".to_string()),
        );
    };

    match load_from_path(&dir.join(CONFIG_FILE)) {
        Ok(settings) => (settings, None),
        Err(err) => (Settings::default(), Some(err.to_string())),
    }
}
