//! Scene configuration, loadable from JSON

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::grass::{CullConfig, GrassConfig};
use crate::interaction::InteractionConfig;
use crate::terrain::TerrainConfig;

/// Everything needed to regenerate the scene at startup. Missing JSON
/// fields take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub terrain: TerrainConfig,
    pub grass: GrassConfig,
    pub cull: CullConfig,
    pub interaction: InteractionConfig,
    /// Grid coordinates `(i, j)` of tiles whose grass is simulated, drawn
    /// and affected by the pointer
    pub interactive_tiles: Vec<(u32, u32)>,
    /// Terrain texture image
    pub terrain_texture: PathBuf,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            terrain: TerrainConfig::default(),
            grass: GrassConfig::default(),
            cull: CullConfig::default(),
            interaction: InteractionConfig::default(),
            interactive_tiles: vec![(2, 2)],
            terrain_texture: PathBuf::from("images/grass.jpg"),
            window_width: 640,
            window_height: 480,
        }
    }
}

impl SceneConfig {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.terrain.validate()?;
        self.grass.validate()?;
        self.cull.validate()?;
        self.interaction.validate()?;

        for &(i, j) in &self.interactive_tiles {
            if i >= self.terrain.grid_width || j >= self.terrain.grid_height {
                return Err(Error::Config(format!(
                    "interactive tile ({}, {}) is outside the {}x{} grid",
                    i, j, self.terrain.grid_width, self.terrain.grid_height
                )));
            }
        }
        if self.window_width == 0 || self.window_height == 0 {
            return Err(Error::Config("window size must be non-zero".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_validates() {
        let config = SceneConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.interactive_tiles, vec![(2, 2)]);
    }

    #[test]
    fn test_interactive_tile_outside_grid() {
        let config = SceneConfig { interactive_tiles: vec![(3, 0)], ..Default::default() };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "terrain": {{ "grid_width": 5 }}, "interactive_tiles": [[0, 0], [4, 2]] }}"#).unwrap();

        let config = SceneConfig::load(file.path()).unwrap();
        assert_eq!(config.terrain.grid_width, 5);
        assert_eq!(config.terrain.grid_height, 3);
        assert_eq!(config.terrain.tile_size, 15.0);
        assert_eq!(config.grass, GrassConfig::default());
        assert_eq!(config.interactive_tiles, vec![(0, 0), (4, 2)]);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("scene.json");
        let config = SceneConfig {
            window_width: 1280,
            window_height: 720,
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(SceneConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "grass": {{ "blade_count": 1000 }} }}"#).unwrap();
        assert!(matches!(SceneConfig::load(file.path()), Err(Error::Config(_))));

        let mut huge = tempfile::NamedTempFile::new().unwrap();
        write!(huge, r#"{{ "terrain": {{ "resolution": 65536 }} }}"#).unwrap();
        assert!(matches!(SceneConfig::load(huge.path()), Err(Error::Config(_))));

        let mut garbage = tempfile::NamedTempFile::new().unwrap();
        write!(garbage, "not json").unwrap();
        assert!(matches!(SceneConfig::load(garbage.path()), Err(Error::Json(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = SceneConfig::load(Path::new("/nonexistent/meadow/scene.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
