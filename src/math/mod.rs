//! Mathematical utilities and data structures

pub mod ray;
pub mod frustum;
pub mod noise;

pub use ray::Ray;
pub use frustum::{Plane, Frustum};
pub use noise::value_noise;
