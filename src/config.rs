//! Editor configuration
//!
//! Passed from the page as a plain object; every field is optional and falls
//! back to the values the editor page has always used.

use serde::{Deserialize, Serialize};

use crate::error::{AnimError, AnimResult};

pub const DEFAULT_GRID_WIDTH: usize = 12;
pub const DEFAULT_GRID_HEIGHT: usize = 8;
pub const DEFAULT_INITIAL_FRAMES: usize = 3;
pub const DEFAULT_FPS: f64 = 6.0;
pub const DEFAULT_PENDING_KEY: &str = "pendingAnimation";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Columns of every editor grid
    pub grid_width: usize,
    /// Rows of every editor grid
    pub grid_height: usize,
    /// Grids created on start-up (and after "clear animation")
    pub initial_frames: usize,
    /// Playback rate before any document is loaded
    pub default_fps: f64,
    pub editor_scale: f64,
    pub preview_scale: f64,
    /// Base URL of the storage service; empty means same origin
    pub server_url: String,
    /// Where the gallery catalog and saved documents are served from
    pub json_dir: String,
    /// Browser-storage key used to hand an animation from the gallery to the editor
    pub pending_key: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_width: DEFAULT_GRID_WIDTH,
            grid_height: DEFAULT_GRID_HEIGHT,
            initial_frames: DEFAULT_INITIAL_FRAMES,
            default_fps: DEFAULT_FPS,
            editor_scale: 1.0,
            preview_scale: 2.0,
            server_url: String::new(),
            json_dir: "../json".to_string(),
            pending_key: DEFAULT_PENDING_KEY.to_string(),
        }
    }
}

impl EditorConfig {
    pub fn validate(&self) -> AnimResult<()> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(AnimError::Config(format!(
                "grid size must be positive, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }
        if self.initial_frames == 0 {
            return Err(AnimError::Config("initialFrames must be at least 1".into()));
        }
        if !(self.default_fps.is_finite() && self.default_fps > 0.0) {
            return Err(AnimError::Config(format!(
                "defaultFps must be a positive number, got {}",
                self.default_fps
            )));
        }
        if !(self.editor_scale > 0.0 && self.preview_scale > 0.0) {
            return Err(AnimError::Config("scales must be positive".into()));
        }
        if self.pending_key.is_empty() {
            return Err(AnimError::Config("pendingKey must not be empty".into()));
        }
        Ok(())
    }

    /// Join the storage service base URL with an endpoint path
    pub fn server_endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.server_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    /// Location of a named JSON document under `json_dir`
    pub fn json_path(&self, name: &str) -> String {
        format!("{}/{}", self.json_dir.trim_end_matches('/'), name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EditorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid_width, 12);
        assert_eq!(config.grid_height, 8);
    }

    #[test]
    fn test_partial_object_fills_defaults() {
        let config: EditorConfig =
            serde_json::from_str(r#"{"gridWidth": 5, "serverUrl": "http://host:8000/"}"#).unwrap();
        assert_eq!(config.grid_width, 5);
        assert_eq!(config.grid_height, DEFAULT_GRID_HEIGHT);
        assert_eq!(config.server_endpoint("/save"), "http://host:8000/save");
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = EditorConfig::default();
        config.default_fps = 0.0;
        assert!(matches!(config.validate(), Err(AnimError::Config(_))));

        let mut config = EditorConfig::default();
        config.grid_height = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_same_origin_endpoint() {
        let config = EditorConfig::default();
        assert_eq!(config.server_endpoint("listfiles"), "/listfiles");
        assert_eq!(config.json_path("cat.json"), "../json/cat.json");
    }
}
