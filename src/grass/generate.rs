//! Seeded blade scattering over a tile footprint.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::blade::Blade;
use super::config::GrassConfig;
use crate::math::value_noise;

/// Scatter `config.blade_count` unbent blades uniformly over the square of
/// edge `size` centered at `offset`. The same seed always yields the same field.
pub fn scatter_blades(config: &GrassConfig, size: f32, offset: (f32, f32), seed: u64) -> Vec<Blade> {
    let mut rng = Pcg32::seed_from_u64(seed);
    let noise_seed = seed as u32;

    (0..config.blade_count)
        .map(|_| {
            let x = (rng.random::<f32>() - 0.5) * size + offset.0;
            let z = (rng.random::<f32>() - 0.5) * size + offset.1;
            let y = value_noise(x * config.noise_scale, z * config.noise_scale, noise_seed)
                * config.noise_height;
            let direction = rng.random::<f32>() * std::f32::consts::TAU;

            let height = lerp_range(&mut rng, config.min_height, config.max_height);
            let width = lerp_range(&mut rng, config.min_width, config.max_width);
            let stiffness = lerp_range(&mut rng, config.min_bend, config.max_bend);

            let mut blade = Blade::new(Vec3::new(x, y, z), direction, height, width, stiffness, Vec3::Y);
            blade.blade_type = config.blade_type;
            blade
        })
        .collect()
}

fn lerp_range(rng: &mut Pcg32, min: f32, max: f32) -> f32 {
    (min + rng.random::<f32>() * (max - min)).clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> GrassConfig {
        GrassConfig { blade_count: 1024, ..Default::default() }
    }

    #[test]
    fn test_blades_stay_in_footprint() {
        let config = GrassConfig::default();
        let blades = scatter_blades(&config, 15.0, (0.0, 0.0), 1);
        assert_eq!(blades.len(), 32768);
        for blade in &blades {
            let p = blade.position();
            assert!((-7.5..=7.5).contains(&p.x), "x = {}", p.x);
            assert!((-7.5..=7.5).contains(&p.z), "z = {}", p.z);
        }
    }

    #[test]
    fn test_offset_footprint_and_ranges() {
        let config = small_config();
        let blades = scatter_blades(&config, 15.0, (15.0, -15.0), 7);
        for blade in &blades {
            let p = blade.position();
            assert!((7.5..=22.5).contains(&p.x));
            assert!((-22.5..=-7.5).contains(&p.z));
            assert!((0.0..=config.noise_height).contains(&p.y));
            assert!((config.min_height..=config.max_height).contains(&blade.height()));
            assert!((config.min_width..=config.max_width).contains(&blade.width()));
            assert!((config.min_bend..=config.max_bend).contains(&blade.stiffness()));
            assert!((0.0..std::f32::consts::TAU).contains(&blade.direction()));
        }
    }

    #[test]
    fn test_initial_pose_is_unbent() {
        for blade in scatter_blades(&small_config(), 15.0, (0.0, 0.0), 3) {
            let rest = blade.position() + blade.up_vector() * blade.height();
            assert_eq!(blade.control_point(), rest);
            assert_eq!(blade.guide(), rest);
            assert_eq!(blade.blade_type, 2);
        }
    }

    #[test]
    fn test_seeding_is_deterministic() {
        let config = small_config();
        assert_eq!(
            scatter_blades(&config, 15.0, (0.0, 0.0), 42),
            scatter_blades(&config, 15.0, (0.0, 0.0), 42)
        );
        assert_ne!(
            scatter_blades(&config, 15.0, (0.0, 0.0), 42),
            scatter_blades(&config, 15.0, (0.0, 0.0), 43)
        );
    }
}
