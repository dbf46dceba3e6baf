//! Scene built from a [`SceneConfig`]

use rayon::prelude::*;

use super::config::SceneConfig;
use crate::grass::GrassField;
use crate::terrain::TerrainIndex;

/// Terrain index and the grass fields scattered over its tiles.
///
/// `fields[k]` belongs to `terrain.tiles()[k]`.
pub struct Scene {
    config: SceneConfig,
    terrain: TerrainIndex,
    fields: Vec<GrassField>,
}

impl Scene {
    /// Generate every tile and its grass field. Field `k` is seeded with
    /// `grass.seed + k`, so a config always rebuilds the same scene.
    pub fn build(config: SceneConfig) -> Self {
        let terrain = TerrainIndex::build(&config.terrain);
        let (grid_width, _) = terrain.grid_size();

        let mut fields: Vec<GrassField> = terrain
            .tiles()
            .par_iter()
            .enumerate()
            .map(|(k, tile)| GrassField::generate(&config.grass, tile, config.grass.seed + k as u64))
            .collect();

        for &(i, j) in &config.interactive_tiles {
            if let Some(field) = fields.get_mut((j * grid_width + i) as usize) {
                field.set_interactive(true);
            }
        }

        log::info!(
            "Scene built: {} tiles, {} blades per field, {} interactive",
            terrain.tiles().len(),
            config.grass.blade_count,
            fields.iter().filter(|f| f.is_interactive()).count()
        );

        Self { config, terrain, fields }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn terrain(&self) -> &TerrainIndex {
        &self.terrain
    }

    pub fn fields(&self) -> &[GrassField] {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut [GrassField] {
        &mut self.fields
    }

    /// Terrain and fields together, for the interaction controller
    pub fn split_mut(&mut self) -> (&TerrainIndex, &mut [GrassField]) {
        (&self.terrain, &mut self.fields)
    }

    pub fn interactive_fields(&self) -> impl Iterator<Item = &GrassField> {
        self.fields.iter().filter(|f| f.is_interactive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grass::GrassConfig;
    use crate::terrain::TerrainConfig;

    fn small_config() -> SceneConfig {
        SceneConfig {
            terrain: TerrainConfig { resolution: 4, ..Default::default() },
            grass: GrassConfig { blade_count: 128, ..Default::default() },
            ..Default::default()
        }
    }

    #[test]
    fn test_one_field_per_tile() {
        let scene = Scene::build(small_config());
        assert_eq!(scene.terrain().tiles().len(), 9);
        assert_eq!(scene.fields().len(), 9);
        for (tile, field) in scene.terrain().tiles().iter().zip(scene.fields()) {
            assert_eq!(tile.offset(), field.offset());
            assert_eq!(field.blade_count(), 128);
        }
    }

    #[test]
    fn test_default_interactive_tile() {
        let scene = Scene::build(small_config());
        let interactive: Vec<usize> = scene
            .fields()
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_interactive())
            .map(|(k, _)| k)
            .collect();
        assert_eq!(interactive, vec![8]);
        assert_eq!(scene.interactive_fields().next().map(|f| f.offset()), Some((15.0, 15.0)));
    }

    #[test]
    fn test_build_is_deterministic() {
        let a = Scene::build(small_config());
        let b = Scene::build(small_config());
        assert_eq!(a.fields()[3].blades(), b.fields()[3].blades());
        assert_ne!(a.fields()[3].blades(), a.fields()[4].blades());
    }
}
