use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::snap::{EDGE_SNAP_PX, SnapRadii, VERTEX_SNAP_PX};
use crate::viewport::ZoomLimits;

/// Environment variable naming a JSON file with an [`EditorConfig`].
pub const CONFIG_ENV_VAR: &str = "MORPHO_STUDY_CONFIG";

/// Tunables of the drawing tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // missing fields fall back to defaults
pub struct EditorConfig {
    /// Vertex snap radius in screen pixels
    pub vertex_snap_px: f32,
    /// Edge snap radius in screen pixels
    pub edge_snap_px: f32,
    /// Pick tolerance for selecting and deleting, in screen pixels
    pub hit_tolerance_px: f32,
    pub zoom_step: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Side of the square exported raster
    pub export_size: u32,
    /// Fill used when the background photo is hidden
    pub export_background: [u8; 3],
    /// Distance between building hatch lines, in drawing units
    pub hatch_spacing: f32,
    pub show_background: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        let zoom = ZoomLimits::default();
        Self {
            vertex_snap_px: VERTEX_SNAP_PX,
            edge_snap_px: EDGE_SNAP_PX,
            hit_tolerance_px: 6.0,
            zoom_step: zoom.step,
            min_scale: zoom.min_scale,
            max_scale: zoom.max_scale,
            export_size: 2000,
            export_background: [255, 255, 255],
            hatch_spacing: 12.0,
            show_background: true,
        }
    }
}

impl EditorConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Load the file named by [`CONFIG_ENV_VAR`], if set and readable.
    pub fn from_env() -> Option<Self> {
        let path = std::env::var_os(CONFIG_ENV_VAR)?;
        match Self::load(&path) {
            Ok(config) => {
                log::info!("Loaded editor config from {}", path.to_string_lossy());
                Some(config)
            }
            Err(err) => {
                log::warn!("Ignoring config {}: {}", path.to_string_lossy(), err);
                None
            }
        }
    }

    pub fn snap_radii(&self) -> SnapRadii {
        SnapRadii {
            vertex_px: self.vertex_snap_px,
            edge_px: self.edge_snap_px,
        }
    }

    pub fn zoom_limits(&self) -> ZoomLimits {
        ZoomLimits {
            min_scale: self.min_scale,
            max_scale: self.max_scale.max(self.min_scale),
            step: self.zoom_step.max(1.0 + f32::EPSILON),
        }
    }
}
