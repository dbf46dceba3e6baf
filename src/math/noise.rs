//! Smooth 2D value noise.
//!
//! Used for blade placement height and, through its WGSL twin in
//! `simulate_cull.wgsl`, for wind. Integer hashing keeps the CPU and GPU
//! versions bit-compatible in the lattice values.

/// Integer hash producing a value in [0, 1].
pub fn hash_2d(ix: i32, iz: i32, seed: u32) -> f32 {
    let mut h = (ix as u32).wrapping_mul(374761393)
        .wrapping_add((iz as u32).wrapping_mul(668265263))
        .wrapping_add(seed.wrapping_mul(1274126177));
    h = (h ^ (h >> 13)).wrapping_mul(1103515245);
    h = h ^ (h >> 16);
    (h & 0x7FFFFFFF) as f32 / 0x7FFFFFFF_u32 as f32
}

/// Smoothstep-interpolated value noise in [0, 1] with unit lattice spacing.
pub fn value_noise(x: f32, z: f32, seed: u32) -> f32 {
    let ix = x.floor() as i32;
    let iz = z.floor() as i32;
    let fx = x - x.floor();
    let fz = z - z.floor();

    let u = fx * fx * (3.0 - 2.0 * fx);
    let v = fz * fz * (3.0 - 2.0 * fz);

    let h00 = hash_2d(ix, iz, seed);
    let h10 = hash_2d(ix + 1, iz, seed);
    let h01 = hash_2d(ix, iz + 1, seed);
    let h11 = hash_2d(ix + 1, iz + 1, seed);

    let a = h00 + (h10 - h00) * u;
    let b = h01 + (h11 - h01) * u;
    a + (b - a) * v
}
