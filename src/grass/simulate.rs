//! Blade physics and culling on the CPU.
//!
//! Same per-blade math as `shaders/simulate_cull.wgsl`. Blades are evaluated
//! in parallel with rayon; survivors claim output slots from one atomic
//! counter, the way the compute kernel does with `atomicAdd`.

use std::sync::atomic::{AtomicU32, Ordering};

use bytemuck::Zeroable;
use glam::{Vec2, Vec3};
use rayon::prelude::*;

use super::blade::{Blade, CollisionTransform, DrawIndirect};
use super::field::GrassField;
use super::params::SimulateParams;
use crate::core::time::TimeUniform;
use crate::math::value_noise;

/// Fraction of gravity applied along the blade's front direction
const FRONT_GRAVITY: f32 = 0.25;

/// Minimum share of height kept between root and control point
const MIN_CONTROL_HEIGHT: f32 = 0.05;

/// Advance one blade by a frame. Returns the new `(v1, v2)`.
pub fn simulate_blade(
    blade: &Blade,
    params: &SimulateParams,
    collision: &CollisionTransform,
    time: &TimeUniform,
) -> (Vec3, Vec3) {
    let v0 = blade.position();
    let mut v2 = blade.guide();
    let up = blade.up_vector();
    let height = blade.height();
    let theta = blade.direction();

    // Gravity: environmental plus a share along the blade's front
    let g_env = Vec3::new(0.0, -params.gravity, 0.0);
    let width_dir = Vec3::new(theta.cos(), 0.0, theta.sin());
    let front = up.cross(width_dir).normalize_or_zero();
    let gravity = g_env + front * (FRONT_GRAVITY * g_env.length());

    // Recovery toward the upright pose
    let recovery = (v0 + up * height - v2) * blade.stiffness();

    // Wind
    let wind = wind_at(v0, params, time.total_time);
    let bend = v2 - v0;
    let directional = 1.0 - wind.normalize_or_zero().dot(bend.normalize_or_zero()).abs();
    let height_ratio = if height > 0.0 { bend.dot(up) / height } else { 0.0 };
    let wind_force = wind * directional * height_ratio;

    v2 += (gravity + recovery + wind_force) * time.delta_time;

    if collision.is_active() {
        v2 = push_out(v0, v2, front, collision);
    }

    correct(v0, v2, up, height)
}

/// Horizontal push of `v2` away from the collision center, full at the
/// center and none at the radius
fn push_out(v0: Vec3, v2: Vec3, front: Vec3, collision: &CollisionTransform) -> Vec3 {
    let offset = Vec2::new(v0.x - collision.center[0], v0.z - collision.center[2]);
    let distance = offset.length();
    if distance >= collision.radius {
        return v2;
    }

    let dir = if distance > f32::EPSILON {
        offset / distance
    } else {
        Vec2::new(front.x, front.z).normalize_or_zero()
    };
    let push = dir * ((1.0 - distance / collision.radius) * collision.radius);
    v2 + Vec3::new(push.x, 0.0, push.y)
}

/// Keep `v2` above the ground plane, derive `v1`, then rescale the curve to
/// the blade's height
fn correct(v0: Vec3, v2: Vec3, up: Vec3, height: f32) -> (Vec3, Vec3) {
    let mut v2 = v2 - up * up.dot(v2 - v0).min(0.0);

    let bend = v2 - v0;
    let l_proj = (bend - up * bend.dot(up)).length();
    let ratio = if height > 0.0 { l_proj / height } else { 0.0 };
    let mut v1 = v0 + up * height * (1.0 - ratio).max(MIN_CONTROL_HEIGHT * ratio.max(1.0));

    // Degree-2 Bezier length estimate
    let l0 = v0.distance(v2);
    let l1 = v0.distance(v1) + v1.distance(v2);
    let length = (2.0 * l0 + l1) / 3.0;
    if length > f32::EPSILON {
        let r = height / length;
        let v1_corr = v0 + (v1 - v0) * r;
        v2 = v1_corr + (v2 - v1) * r;
        v1 = v1_corr;
    }

    (v1, v2)
}

/// Wind vector at a blade root. Direction and strength both follow the
/// value-noise field, scrolled by time.
pub fn wind_at(v0: Vec3, params: &SimulateParams, total_time: f32) -> Vec3 {
    let n = value_noise(
        v0.x * params.wind_frequency + total_time * 0.5,
        v0.z * params.wind_frequency + total_time * 0.3,
        params.noise_seed,
    );
    let angle = n * std::f32::consts::TAU;
    Vec3::new(angle.cos(), 0.0, angle.sin()) * (params.wind_strength * (0.5 + n))
}

/// Orientation, frustum and distance tests. `index` is the blade's slot in
/// the source array and drives the distance buckets.
pub fn is_culled(index: u32, blade: &Blade, params: &SimulateParams) -> bool {
    let v0 = blade.position();
    let up = blade.up_vector();
    let camera = Vec3::from_array(params.camera_position);

    let to_blade = v0 - camera;
    let view_flat = to_blade - up * to_blade.dot(up);
    let d_proj = view_flat.length();

    // Orientation: blades seen edge-on are thinner than a pixel
    if d_proj > f32::EPSILON {
        let theta = blade.direction();
        let width_dir = Vec3::new(theta.cos(), 0.0, theta.sin());
        if (view_flat / d_proj).dot(width_dir).abs() > params.orientation_threshold {
            return true;
        }
    }

    // Frustum: root, tip, and a point on the curve
    let v1 = blade.control_point();
    let v2 = blade.guide();
    let mid = v0 * 0.25 + v1 * 0.5 + v2 * 0.25;
    if ![v0, mid, v2].iter().any(|&p| in_frustum(p, params)) {
        return true;
    }

    // Distance: hard cutoff, then thin out farther buckets
    if d_proj > params.max_distance {
        return true;
    }
    let buckets = params.distance_buckets.max(1);
    let keep_level = (buckets as f32 * (1.0 - d_proj / params.max_distance)).floor();
    (index % buckets) as f32 > keep_level
}

fn in_frustum(point: Vec3, params: &SimulateParams) -> bool {
    params.frustum_planes.iter().all(|plane| {
        Vec3::new(plane[0], plane[1], plane[2]).dot(point) + plane[3] >= -params.frustum_tolerance
    })
}

/// CPU simulate-and-cull pass with a reusable output array.
pub struct SimulateCullPass {
    culled: Vec<Blade>,
    indirect: DrawIndirect,
}

impl SimulateCullPass {
    /// Output sized for `capacity` blades. Until the first run every blade
    /// counts as a survivor.
    pub fn new(capacity: u32) -> Self {
        Self {
            culled: Vec::with_capacity(capacity as usize),
            indirect: DrawIndirect::survivors(capacity),
        }
    }

    /// Simulate every blade of `field`, write the new curves back, and
    /// compact the survivors. Returns the survivor count.
    pub fn run(&mut self, field: &mut GrassField, params: &SimulateParams, time: &TimeUniform) -> u32 {
        let collision = field.collision();
        self.run_blades(field.blades_mut(), params, &collision, time)
    }

    pub fn run_blades(
        &mut self,
        blades: &mut [Blade],
        params: &SimulateParams,
        collision: &CollisionTransform,
        time: &TimeUniform,
    ) -> u32 {
        let counter = AtomicU32::new(0);

        let survivors: Vec<(u32, Blade)> = blades
            .par_iter_mut()
            .enumerate()
            .filter_map(|(index, blade)| {
                let (v1, v2) = simulate_blade(blade, params, collision, time);
                blade.set_curve(v1, v2);

                if is_culled(index as u32, blade, params) {
                    return None;
                }
                let slot = counter.fetch_add(1, Ordering::Relaxed);
                Some((slot, *blade))
            })
            .collect();

        let count = counter.load(Ordering::Acquire);
        self.culled.clear();
        self.culled.resize(count as usize, Blade::zeroed());
        for (slot, blade) in survivors {
            self.culled[slot as usize] = blade;
        }

        self.indirect = DrawIndirect::survivors(count);
        count
    }

    /// Survivors of the last run, in slot order
    pub fn culled(&self) -> &[Blade] {
        &self.culled
    }

    /// Indirect record of the last run; `vertex_count` is the survivor count
    pub fn indirect(&self) -> DrawIndirect {
        self.indirect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::camera::Camera;
    use crate::grass::config::GrassConfig;
    use crate::grass::generate::scatter_blades;
    use crate::grass::params::CullConfig;

    fn calm_params() -> SimulateParams {
        let config = CullConfig { wind_strength: 0.0, ..Default::default() };
        SimulateParams::new(&config, &Camera::default(), 0, 0)
    }

    fn frame() -> TimeUniform {
        TimeUniform { delta_time: 0.016, total_time: 1.0, _pad: [0.0; 2] }
    }

    fn blade_at(x: f32, z: f32, theta: f32) -> Blade {
        Blade::new(Vec3::new(x, 0.0, z), theta, 1.5, 0.12, 10.0, Vec3::Y)
    }

    fn horizontal_distance(p: Vec3, x: f32, z: f32) -> f32 {
        Vec2::new(p.x - x, p.z - z).length()
    }

    #[test]
    fn test_collision_pushes_nearby_blade_away() {
        let params = calm_params();
        let collision = CollisionTransform::new(Vec3::new(5.0, 2.0, 5.0), 1.25);
        let blade = blade_at(5.2, 5.1, 0.4);

        let (_, free) = simulate_blade(&blade, &params, &CollisionTransform::default(), &frame());
        let (_, pushed) = simulate_blade(&blade, &params, &collision, &frame());

        let d_free = horizontal_distance(free, 5.0, 5.0);
        let d_pushed = horizontal_distance(pushed, 5.0, 5.0);
        assert!(d_pushed > d_free + 0.5, "pushed {} vs free {}", d_pushed, d_free);
    }

    #[test]
    fn test_collision_ignores_distant_blade() {
        let params = calm_params();
        let collision = CollisionTransform::new(Vec3::new(5.0, 2.0, 5.0), 1.25);
        let blade = blade_at(50.0, 50.0, 1.0);

        let free = simulate_blade(&blade, &params, &CollisionTransform::default(), &frame());
        let pushed = simulate_blade(&blade, &params, &collision, &frame());
        assert_eq!(free, pushed);
    }

    #[test]
    fn test_curve_keeps_blade_height() {
        let params = SimulateParams::new(&CullConfig::default(), &Camera::default(), 0, 0);
        let collision = CollisionTransform::new(Vec3::new(0.0, 0.0, 0.0), 2.0);
        let mut blade = blade_at(0.5, 0.0, 0.0);

        for _ in 0..30 {
            let (v1, v2) = simulate_blade(&blade, &params, &collision, &frame());
            blade.set_curve(v1, v2);
        }

        let (v0, v1, v2) = (blade.position(), blade.control_point(), blade.guide());
        let length = (2.0 * v0.distance(v2) + v0.distance(v1) + v1.distance(v2)) / 3.0;
        assert!((length - blade.height()).abs() < 1e-3, "curve length {}", length);
        assert!(v2.y >= v0.y, "guide below ground");
        assert!(v1.y > v0.y, "control point below ground");
    }

    #[test]
    fn test_upright_blade_without_forces_stays_put() {
        let config = CullConfig { wind_strength: 0.0, gravity: 0.0, ..Default::default() };
        let params = SimulateParams::new(&config, &Camera::default(), 0, 0);
        let blade = blade_at(1.0, 1.0, 0.0);
        let (v1, v2) = simulate_blade(&blade, &params, &CollisionTransform::default(), &frame());
        assert!((v2 - blade.guide()).length() < 1e-4);
        assert!((v1 - blade.control_point()).length() < 1e-4);
    }

    #[test]
    fn test_orientation_cull() {
        let params = calm_params();
        // Camera looks down -Z, so a blade whose width axis is X faces it
        assert!(!is_culled(0, &blade_at(0.0, 0.0, 0.0), &params));
        assert!(is_culled(0, &blade_at(0.0, 0.0, std::f32::consts::FRAC_PI_2), &params));
    }

    #[test]
    fn test_frustum_cull() {
        let params = calm_params();
        assert!(is_culled(0, &blade_at(0.0, 20.0, 0.0), &params));
        assert!(is_culled(0, &blade_at(40.0, 0.0, std::f32::consts::FRAC_PI_2), &params));
    }

    #[test]
    fn test_distance_cull() {
        let params = calm_params();
        // 55 units away, past the cutoff
        assert!(is_culled(0, &blade_at(0.0, -45.0, 0.0), &params));
        // 10 units away keeps buckets 0..=8
        assert!(!is_culled(3, &blade_at(0.0, 0.0, 0.0), &params));
        assert!(is_culled(9, &blade_at(0.0, 0.0, 0.0), &params));
    }

    #[test]
    fn test_pass_counts_survivors() {
        let config = GrassConfig { blade_count: 4096, ..Default::default() };
        let blades = scatter_blades(&config, 15.0, (0.0, 0.0), 5);
        let mut field = GrassField::from_blades(blades, (0.0, 0.0), 15.0);
        let params = SimulateParams::new(&CullConfig::default(), &Camera::default(), 4096, 0);
        let mut pass = SimulateCullPass::new(4096);
        assert_eq!(pass.indirect().vertex_count, 4096);

        let first = pass.run(&mut field, &params, &frame());
        assert!(first > 0 && first <= 4096);
        assert_eq!(pass.indirect(), DrawIndirect::survivors(first));
        assert_eq!(pass.culled().len(), first as usize);

        // The counter restarts every run
        let second = pass.run(&mut field, &params, &frame());
        assert!(second <= 4096);
        assert_eq!(pass.indirect().vertex_count, second);
        assert_eq!(pass.culled().len(), second as usize);
    }

    #[test]
    fn test_pass_writes_curves_back() {
        let config = GrassConfig { blade_count: 64, ..Default::default() };
        let blades = scatter_blades(&config, 15.0, (0.0, 0.0), 5);
        let before = blades.clone();
        let mut field = GrassField::from_blades(blades, (0.0, 0.0), 15.0);
        let mut pass = SimulateCullPass::new(64);

        pass.run(&mut field, &calm_params(), &frame());

        for (old, new) in before.iter().zip(field.blades()) {
            assert_eq!(old.v0, new.v0);
            assert_eq!(old.up, new.up);
            assert_eq!(old.blade_type, new.blade_type);
            assert_eq!(old.height(), new.height());
        }
        assert!(before.iter().zip(field.blades()).any(|(a, b)| a.v2 != b.v2));
    }

    #[test]
    fn test_survivors_are_unique() {
        let config = GrassConfig { blade_count: 1024, ..Default::default() };
        let blades = scatter_blades(&config, 15.0, (0.0, 0.0), 11);
        let mut field = GrassField::from_blades(blades, (0.0, 0.0), 15.0);
        let mut pass = SimulateCullPass::new(1024);
        let params = SimulateParams::new(&CullConfig::default(), &Camera::default(), 1024, 0);
        pass.run(&mut field, &params, &frame());

        let mut roots: Vec<[u32; 3]> = pass
            .culled()
            .iter()
            .map(|b| [b.v0[0].to_bits(), b.v0[1].to_bits(), b.v0[2].to_bits()])
            .collect();
        let len = roots.len();
        roots.sort_unstable();
        roots.dedup();
        assert_eq!(roots.len(), len);
    }
}
