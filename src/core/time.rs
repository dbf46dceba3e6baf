//! Frame timing and simulation clock

use std::time::{Duration, Instant};
use bytemuck::{Pod, Zeroable};

/// Tracks frame timing and calculates FPS
pub struct FrameTimer {
    last_frame: Instant,
    delta: Duration,
    frame_count: u64,
    fps_timer: Instant,
    fps: f32,
    fps_frame_count: u32,
}

impl FrameTimer {
    /// Create a new frame timer
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            delta: Duration::ZERO,
            frame_count: 0,
            fps_timer: now,
            fps: 0.0,
            fps_frame_count: 0,
        }
    }

    /// Call once per frame to update timing.
    ///
    /// Returns true when the FPS estimate was refreshed this frame
    /// (roughly once per second).
    pub fn tick(&mut self) -> bool {
        let now = Instant::now();
        self.delta = now - self.last_frame;
        self.last_frame = now;
        self.frame_count += 1;
        self.fps_frame_count += 1;

        let fps_elapsed = now - self.fps_timer;
        if fps_elapsed >= Duration::from_secs(1) {
            self.fps = self.fps_frame_count as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = 0;
            self.fps_timer = now;
            return true;
        }
        false
    }

    /// Get delta time in seconds
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Get current FPS (updated every second)
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Get total frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Monotonic simulation clock read by the simulate-and-cull pass.
///
/// Written once per frame by the frame driver, before any GPU work for
/// that frame is encoded.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SimulationTime {
    /// Duration of the most recent frame in seconds
    pub delta_time: f32,
    /// Elapsed time since start in seconds
    pub total_time: f32,
}

impl SimulationTime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by one frame. Negative deltas are treated as zero
    /// so total time never runs backwards.
    pub fn advance(&mut self, delta_time: f32) {
        let dt = delta_time.max(0.0);
        self.delta_time = dt;
        self.total_time += dt;
    }

    pub fn to_uniform(&self) -> TimeUniform {
        TimeUniform {
            delta_time: self.delta_time,
            total_time: self.total_time,
            _pad: [0.0; 2],
        }
    }
}

/// GPU uniform for simulation time. Must match `Time` in simulate_cull.wgsl.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct TimeUniform {
    pub delta_time: f32,
    pub total_time: f32,
    pub _pad: [f32; 2],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulation_time_accumulates() {
        let mut time = SimulationTime::new();
        time.advance(0.5);
        time.advance(0.25);
        assert_eq!(time.delta_time, 0.25);
        assert_eq!(time.total_time, 0.75);
    }

    #[test]
    fn test_simulation_time_is_monotonic() {
        let mut time = SimulationTime::new();
        time.advance(1.0);
        time.advance(-3.0);
        assert_eq!(time.delta_time, 0.0);
        assert_eq!(time.total_time, 1.0);
    }

    #[test]
    fn test_time_uniform_size() {
        assert_eq!(std::mem::size_of::<TimeUniform>(), 16);
    }

    #[test]
    fn test_frame_timer_counts_frames() {
        let mut timer = FrameTimer::new();
        timer.tick();
        timer.tick();
        assert_eq!(timer.frame_count(), 2);
        assert!(timer.delta_secs() >= 0.0);
    }
}
