//! Math utilities and types
//!
//! Provides fundamental math types for 3D simulation.

pub use nalgebra::{Quaternion, Unit, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Apply this transform to a model-space point (scale, rotate, translate)
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation * point.component_mul(&self.scale) + self.position
    }

    /// Apply this transform to a direction vector (scale and rotate only)
    pub fn transform_vector(&self, vector: Vec3) -> Vec3 {
        self.rotation * vector.component_mul(&self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn transform_point_applies_scale_rotation_translation() {
        let transform = Transform {
            position: Vec3::new(1.0, 0.0, 0.0),
            rotation: Quat::from_axis_angle(&Vec3::z_axis(), std::f32::consts::FRAC_PI_2),
            scale: Vec3::new(2.0, 2.0, 2.0),
        };

        // (1, 0, 0) scaled to (2, 0, 0), rotated 90 deg about Z to (0, 2, 0),
        // then translated by (1, 0, 0)
        let result = transform.transform_point(Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(result.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(result.y, 2.0, epsilon = 1e-5);
        assert_relative_eq!(result.z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn identity_transform_is_noop() {
        let point = Vec3::new(3.0, -2.0, 7.5);
        assert_eq!(Transform::identity().transform_point(point), point);
    }
}
