use std::ops::Mul;

use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// A 4x4 local-to-parent placement matrix.
///
/// Column-vector convention: a point in child space maps to parent space as
/// `parent * child * p`, so composing a chain root→A→B yields `Tr * Ta * Tb`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform(Mat4);

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self(Mat4::IDENTITY);

    pub fn from_matrix(matrix: Mat4) -> Self {
        Self(matrix)
    }

    pub fn from_translation(x: f32, y: f32, z: f32) -> Self {
        Self(Mat4::from_translation(Vec3::new(x, y, z)))
    }

    pub fn from_scale(x: f32, y: f32, z: f32) -> Self {
        Self(Mat4::from_scale(Vec3::new(x, y, z)))
    }

    /// Rotation about the z axis, in radians.
    pub fn from_rotation_z(angle: f32) -> Self {
        Self(Mat4::from_rotation_z(angle))
    }

    pub fn matrix(&self) -> &Mat4 {
        &self.0
    }

    pub fn to_cols_array(&self) -> [f32; 16] {
        self.0.to_cols_array()
    }

    /// Compose `child` beneath `self`: the result maps child space into the
    /// space `self` maps into.
    pub fn compose(&self, child: &Transform) -> Transform {
        Transform(self.0 * child.0)
    }

    /// General 4x4 inverse. Returns `None` for a singular matrix, or when
    /// the inverse overflows `f32`.
    pub fn inverse(&self) -> Option<Transform> {
        let det = self.0.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inverse = self.0.inverse();
        inverse.is_finite().then_some(Transform(inverse))
    }

    /// The x/y scale components of the diagonal.
    pub fn scale_xy(&self) -> (f32, f32) {
        (self.0.x_axis.x, self.0.y_axis.y)
    }

    /// Overwrite the x/y scale components of the diagonal, leaving every
    /// other entry untouched.
    pub fn set_scale_xy(&mut self, x: f32, y: f32) {
        self.0.x_axis.x = x;
        self.0.y_axis.y = y;
    }

    pub fn translation_xy(&self) -> (f32, f32) {
        (self.0.w_axis.x, self.0.w_axis.y)
    }

    pub fn set_translation(&mut self, x: f32, y: f32, z: f32) {
        self.0.w_axis = Vec4::new(x, y, z, self.0.w_axis.w);
    }

    /// True when the upper 3x3 block carries any rotation or shear, i.e. a
    /// non-zero entry off its diagonal.
    pub fn has_off_diagonal(&self) -> bool {
        let m = &self.0;
        [
            m.x_axis.y, m.x_axis.z, m.y_axis.x, m.y_axis.z, m.z_axis.x, m.z_axis.y,
        ]
        .iter()
        .any(|v| *v != 0.0)
    }

    /// The same placement with every basis axis normalised to unit length.
    /// Rotation and translation survive; scale and mirroring magnitude do not.
    pub fn without_scale(&self) -> Transform {
        let mut m = self.0;
        for axis in [&mut m.x_axis, &mut m.y_axis, &mut m.z_axis] {
            let len = axis.truncate().length();
            if len > 0.0 {
                *axis = (axis.truncate() / len).extend(axis.w);
            }
        }
        Transform(m)
    }

    pub fn approx_eq(&self, other: &Transform, tolerance: f32) -> bool {
        self.0.abs_diff_eq(other.0, tolerance)
    }
}

impl Mul for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        self.compose(&rhs)
    }
}

impl From<Mat4> for Transform {
    fn from(matrix: Mat4) -> Self {
        Self(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_applies_child_first() {
        let parent = Transform::from_translation(10.0, 0.0, 0.0);
        let child = Transform::from_scale(2.0, 2.0, 1.0);
        let m = parent.compose(&child);
        let p = m.matrix().transform_point3(Vec3::new(1.0, 1.0, 0.0));
        assert!((p.x - 12.0).abs() < 1e-6);
        assert!((p.y - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_inverse_with_nonuniform_scale() {
        let t = Transform::from_translation(3.0, -4.0, 1.0)
            * Transform::from_rotation_z(0.7)
            * Transform::from_scale(2.0, 0.5, 3.0);
        let inv = t.inverse().unwrap();
        assert!((inv * t).approx_eq(&Transform::IDENTITY, 1e-5));
        assert!((t * inv).approx_eq(&Transform::IDENTITY, 1e-5));
    }

    #[test]
    fn test_singular_inverse() {
        let t = Transform::from_scale(1.0, 0.0, 1.0);
        assert!(t.inverse().is_none());
        assert!(Transform::from_translation(f32::NAN, 0.0, 0.0).inverse().is_none());
    }

    #[test]
    fn test_inverse_of_tiny_uniform_scale() {
        let t = Transform::from_scale(1e-4, 1e-4, 1e-4);
        let inv = t.inverse().unwrap();
        assert!(inv.approx_eq(&Transform::from_scale(1e4, 1e4, 1e4), 1e-1));
        assert!((t * inv).approx_eq(&Transform::IDENTITY, 1e-5));
    }

    #[test]
    fn test_scale_and_translation_accessors() {
        let mut t = Transform::IDENTITY;
        t.set_scale_xy(800.0, 600.0);
        t.set_translation(10.0, 20.0, 0.0);
        assert_eq!(t.scale_xy(), (800.0, 600.0));
        assert_eq!(t.translation_xy(), (10.0, 20.0));
        assert!(!t.has_off_diagonal());
    }

    #[test]
    fn test_rotation_is_off_diagonal() {
        assert!(Transform::from_rotation_z(0.1).has_off_diagonal());
        assert!(!Transform::from_scale(3.0, 4.0, 5.0).has_off_diagonal());
    }

    #[test]
    fn test_without_scale_keeps_rotation() {
        let rot = Transform::from_rotation_z(0.5);
        let t = Transform::from_translation(1.0, 2.0, 0.0) * rot * Transform::from_scale(4.0, 4.0, 4.0);
        let stripped = t.without_scale();
        let expected = Transform::from_translation(1.0, 2.0, 0.0) * rot;
        assert!(stripped.approx_eq(&expected, 1e-5));
    }
}
