//! Math utilities and types
//!
//! Provides the 2D math types used by the scene graph.

pub use nalgebra::{Vector2, Matrix3};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3x3 matrix type (2D homogeneous coordinates)
pub type Mat3 = Matrix3<f32>;

/// 2D transform made of a position and a non-uniform scale
///
/// Composition applies scale first, then translation. Rotation is not
/// supported yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    /// Translation
    pub position: Vec2,

    /// Scale factors
    pub scale: Vec2,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            scale: Vec2::new(1.0, 1.0),
        }
    }
}

impl Transform2D {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform from position and scale
    pub fn new(position: Vec2, scale: Vec2) -> Self {
        Self { position, scale }
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Express `local` (relative to `self`) in the space `self` lives in
    ///
    /// Equivalent to `self.to_matrix() * local.to_matrix()`.
    pub fn compose(&self, local: &Transform2D) -> Transform2D {
        Transform2D {
            position: self.position + self.scale.component_mul(&local.position),
            scale: self.scale.component_mul(&local.scale),
        }
    }

    /// Convert to a homogeneous transformation matrix
    pub fn to_matrix(&self) -> Mat3 {
        Mat3::new_translation(&self.position) * Mat3::new_nonuniform_scaling(&self.scale)
    }

    /// Apply this transform to a point
    pub fn transform_point(&self, point: Vec2) -> Vec2 {
        self.position + self.scale.component_mul(&point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_identity_is_neutral() {
        let t = Transform2D::new(Vec2::new(3.0, -2.0), Vec2::new(2.0, 4.0));

        assert_eq!(Transform2D::identity().compose(&t), t);
        assert_eq!(t.compose(&Transform2D::identity()), t);
    }

    #[test]
    fn test_compose_scales_then_translates() {
        let parent = Transform2D::new(Vec2::new(10.0, 0.0), Vec2::new(2.0, 3.0));
        let local = Transform2D::new(Vec2::new(1.0, 1.0), Vec2::new(0.5, 0.5));

        let world = parent.compose(&local);

        assert_relative_eq!(world.position, Vec2::new(12.0, 3.0), epsilon = EPSILON);
        assert_relative_eq!(world.scale, Vec2::new(1.0, 1.5), epsilon = EPSILON);
    }

    #[test]
    fn test_compose_matches_matrix_product() {
        let parent = Transform2D::new(Vec2::new(-4.0, 7.5), Vec2::new(150.0, 0.25));
        let local = Transform2D::new(Vec2::new(0.3, -2.0), Vec2::new(3.0, 8.0));

        let composed = parent.compose(&local).to_matrix();
        let product = parent.to_matrix() * local.to_matrix();

        assert_relative_eq!(composed, product, epsilon = 1e-4);
    }

    #[test]
    fn test_transform_point() {
        let t = Transform2D::new(Vec2::new(1.0, 2.0), Vec2::new(10.0, -1.0));
        assert_relative_eq!(t.transform_point(Vec2::new(0.5, 0.5)), Vec2::new(6.0, 1.5), epsilon = EPSILON);
    }
}
