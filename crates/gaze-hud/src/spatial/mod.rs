//! Spatial primitives for gaze projection and scene probing
//!
//! Uses a right-handed coordinate system:
//! - X: Right (+) / Left (-)
//! - Y: Up (+) / Down (-)
//! - Z: Forward (+) / Backward (-)

mod point3d;
mod quaternion;
mod ray;
mod transform;
mod vector3d;

pub use point3d::Point3D;
pub use quaternion::Quaternion;
pub use ray::Ray;
pub use transform::Transform;
pub use vector3d::Vector3D;
