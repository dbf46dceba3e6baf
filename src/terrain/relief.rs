//! Noise-based terrain relief

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

/// Parameters controlling terrain relief.
///
/// A `height_scale` of 0 yields flat tiles, which is the default: blades are
/// lifted by their own placement noise while the collision surface stays at 0.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReliefParams {
    pub seed: u32,
    pub scale: f32,        // Horizontal scale (larger = smoother)
    pub height_scale: f32, // Vertical scale (max height)
    pub octaves: u32,      // FBM octaves (detail levels)
    pub persistence: f32,  // FBM persistence (0.5 typical)
    pub lacunarity: f32,   // FBM lacunarity (2.0 typical)
}

impl Default for ReliefParams {
    fn default() -> Self {
        Self {
            seed: 12345,
            scale: 30.0,
            height_scale: 0.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

/// Height source for terrain tile vertices using fractal Brownian motion (FBM)
pub struct ReliefGenerator {
    params: ReliefParams,
    noise: Fbm<Perlin>,
}

impl ReliefGenerator {
    pub fn new(params: ReliefParams) -> Self {
        let noise = Fbm::<Perlin>::new(params.seed)
            .set_octaves(params.octaves.max(1) as usize)
            .set_persistence(params.persistence as f64)
            .set_lacunarity(params.lacunarity as f64);

        Self { params, noise }
    }

    /// True when every sample is 0
    pub fn is_flat(&self) -> bool {
        self.params.height_scale == 0.0
    }

    /// Relief height at world position (x, z), in `[0, height_scale]`
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        if self.is_flat() {
            return 0.0;
        }

        let nx = (x / self.params.scale) as f64;
        let nz = (z / self.params.scale) as f64;

        // Fbm output is roughly [-1, 1]
        let normalized = ((self.noise.get([nx, nz]) + 1.0) / 2.0).clamp(0.0, 1.0);
        (normalized * self.params.height_scale as f64) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hilly() -> ReliefParams {
        ReliefParams { height_scale: 8.0, ..Default::default() }
    }

    #[test]
    fn test_default_is_flat() {
        let generator = ReliefGenerator::new(ReliefParams::default());
        assert!(generator.is_flat());
        assert_eq!(generator.height_at(12.3, -4.5), 0.0);
    }

    #[test]
    fn test_height_in_range() {
        let generator = ReliefGenerator::new(hilly());
        for (x, z) in [(0.0, 0.0), (50.0, 50.0), (-17.0, 3.5), (100.0, -100.0)] {
            let h = generator.height_at(x, z);
            assert!((0.0..=8.0).contains(&h), "height {} out of range at ({}, {})", h, x, z);
        }
    }

    #[test]
    fn test_height_at_consistency() {
        let generator = ReliefGenerator::new(hilly());
        assert_eq!(generator.height_at(7.0, 9.0), generator.height_at(7.0, 9.0));
    }

    #[test]
    fn test_different_seeds() {
        let gen1 = ReliefGenerator::new(ReliefParams { seed: 1, ..hilly() });
        let gen2 = ReliefGenerator::new(ReliefParams { seed: 2, ..hilly() });
        assert_ne!(gen1.height_at(50.3, 50.7), gen2.height_at(50.3, 50.7));
    }
}
