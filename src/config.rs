//! Editor settings.
//!
//! Every field has a default, so a config file only needs the keys it wants to
//! change:
//!
//! ```json
//! { "grid_pitch": 20, "snap_to_grid": false }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NedError, Result};
use crate::keybinds::{default_keybinds, Keybind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Grid spacing in canvas units; also the unit node drags and pastes snap to
    pub grid_pitch: f32,
    pub snap_to_grid: bool,
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Wheel zoom factor
    pub zoom_step: f32,
    /// Wheel zoom factor while Shift is held
    pub fine_zoom_step: f32,
    pub keybinds: Vec<Keybind>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_pitch: 10.0,
            snap_to_grid: true,
            min_zoom: 0.1,
            max_zoom: 5.0,
            zoom_step: 2.0,
            fine_zoom_step: 1.5,
            keybinds: default_keybinds(),
        }
    }
}

impl EditorConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EditorConfig = serde_json::from_str(json)?;
        config.validate().map_err(|reason| NedError::Config {
            path: Default::default(),
            reason,
        })?;
        Ok(config)
    }

    /// Read and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config: EditorConfig = serde_json::from_str(&text)?;
        config.validate().map_err(|reason| NedError::Config {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Pitch to snap to, or `None` when snapping is off.
    pub fn snap(&self) -> Option<f32> {
        self.snap_to_grid.then_some(self.grid_pitch)
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if !(self.grid_pitch > 0.0) {
            return Err(format!("grid_pitch must be positive, got {}", self.grid_pitch));
        }
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom) {
            return Err(format!(
                "zoom range {}..{} is empty or not positive",
                self.min_zoom, self.max_zoom
            ));
        }
        if !(self.zoom_step > 1.0 && self.fine_zoom_step > 1.0) {
            return Err("zoom steps must be greater than 1".to_string());
        }
        Ok(())
    }
}
