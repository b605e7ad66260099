//! Canvas configuration.
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! yields a working canvas. Load with `CanvasConfig::from_json` or
//! `CanvasConfig::load`, then call `normalized()` before use.

use serde::{Deserialize, Serialize};
use std::path::Path;

// ─── Errors ───────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid canvas config: {0}")]
    Parse(#[from] serde_json::Error),
}

// ─── Sections ─────────────────────────────────────────────────────────────

/// Grid spacing (zoom) bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Spacing a fresh canvas starts at. Default: **50**.
    pub default_spacing: u32,
    /// Smallest spacing a wheel event can reach. Default: **10**.
    pub min_spacing: u32,
    /// Largest spacing a wheel event can reach. Default: **200**.
    pub max_spacing: u32,
    /// Spacing change per wheel notch. Default: **5**.
    pub zoom_step: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            default_spacing: 50,
            min_spacing: 10,
            max_spacing: 200,
            zoom_step: 5,
        }
    }
}

impl GridConfig {
    /// Clamp a spacing into `[min_spacing, max_spacing]`.
    pub fn clamp(&self, spacing: i64) -> u32 {
        let clamped = spacing.clamp(i64::from(self.min_spacing), i64::from(self.max_spacing));
        u32::try_from(clamped).unwrap_or(self.max_spacing)
    }
}

/// Navigation bar geometry and timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavbarConfig {
    /// Bar height in pixels. Default: **40**.
    pub bar_height: u32,
    /// Height of the top strip that reveals the bar. Default: **40**.
    pub hot_zone: u32,
    /// Delay before a bar the pointer has left hides. Default: **500 ms**.
    pub hide_delay_ms: u64,
    /// Show/hide slide duration. Default: **200 ms**.
    pub animation_ms: u64,
}

impl Default for NavbarConfig {
    fn default() -> Self {
        Self {
            bar_height: 40,
            hot_zone: 40,
            hide_delay_ms: 500,
            animation_ms: 200,
        }
    }
}

/// What happens to the pan offset when the viewport is resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizePolicy {
    /// Keep `pan` numerically identical; the logical origin follows the
    /// viewport center.
    #[default]
    PreservePan,
    /// Adjust `pan` so the logical origin stays on the same screen pixel.
    KeepOrigin,
}

// ─── CanvasConfig ─────────────────────────────────────────────────────────

/// Configuration for a canvas instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub grid: GridConfig,
    /// Max distance in pixels for a hover to count as "on" a grid dot. Default: **6**.
    pub hover_tolerance: f64,
    pub navbar: NavbarConfig,
    pub resize_policy: ResizePolicy,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            hover_tolerance: DEFAULT_HOVER_TOLERANCE,
            navbar: NavbarConfig::default(),
            resize_policy: ResizePolicy::default(),
        }
    }
}

impl CanvasConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Repair inconsistent values instead of rejecting them.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let grid = &mut self.grid;
        if grid.min_spacing == 0 {
            grid.min_spacing = 1;
        }
        if grid.min_spacing > grid.max_spacing {
            log::debug!(
                "swapping grid bounds min={} max={}",
                grid.min_spacing,
                grid.max_spacing
            );
            std::mem::swap(&mut grid.min_spacing, &mut grid.max_spacing);
        }
        grid.default_spacing = grid.clamp(i64::from(grid.default_spacing));
        if grid.zoom_step == 0 {
            grid.zoom_step = 1;
        }
        if !self.hover_tolerance.is_finite() || self.hover_tolerance < 0.0 {
            self.hover_tolerance = DEFAULT_HOVER_TOLERANCE;
        }
        self
    }
}

const DEFAULT_HOVER_TOLERANCE: f64 = 6.0;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_json_is_default() {
        let cfg = CanvasConfig::from_json("{}").unwrap().normalized();
        assert_eq!(cfg.grid, GridConfig::default());
        assert_eq!(cfg.navbar, NavbarConfig::default());
        assert_eq!(cfg.resize_policy, ResizePolicy::PreservePan);
        assert_eq!(cfg.hover_tolerance, 6.0);
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let cfg = CanvasConfig::from_json(
            r#"{"grid": {"zoom_step": 10}, "resize_policy": "keep_origin"}"#,
        )
        .unwrap();
        assert_eq!(cfg.grid.zoom_step, 10);
        assert_eq!(cfg.grid.max_spacing, 200);
        assert_eq!(cfg.resize_policy, ResizePolicy::KeepOrigin);
    }

    #[test]
    fn normalization_repairs_bounds() {
        let cfg = CanvasConfig::from_json(
            r#"{"grid": {"min_spacing": 300, "max_spacing": 20, "default_spacing": 5, "zoom_step": 0}, "hover_tolerance": -1}"#,
        )
        .unwrap()
        .normalized();
        assert_eq!(cfg.grid.min_spacing, 20);
        assert_eq!(cfg.grid.max_spacing, 300);
        assert_eq!(cfg.grid.default_spacing, 20);
        assert_eq!(cfg.grid.zoom_step, 1);
        assert_eq!(cfg.hover_tolerance, 6.0);
    }

    #[test]
    fn bad_json_is_an_error() {
        assert!(matches!(
            CanvasConfig::from_json("{\"grid\": 3}"),
            Err(ConfigError::Parse(_))
        ));
    }
}
