use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::transform::Transform;

/// How a camera maps its view space onto normalised device coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Projection {
    Identity,
    Matrix(Transform),
    /// Viewport pixels to NDC with the origin in the upper left.
    Pixel,
    /// A 2D view `fov` units wide and high, y pointing down.
    TwoD { fov: (f32, f32) },
    Orthographic {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    },
    Perspective {
        fov_y: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
}

impl Default for Projection {
    fn default() -> Self {
        Projection::Identity
    }
}

impl Projection {
    /// The projection matrix for a viewport of the given pixel resolution.
    pub fn matrix(&self, resolution: (u32, u32)) -> Transform {
        match *self {
            Projection::Identity => Transform::IDENTITY,
            Projection::Matrix(m) => m,
            Projection::Pixel => {
                let w = resolution.0.max(1) as f32;
                let h = resolution.1.max(1) as f32;
                Transform::from_scale(1.0, -1.0, 1.0)
                    * Transform::from_translation(-1.0, -1.0, 0.0)
                    * Transform::from_scale(2.0 / w, 2.0 / h, 1.0)
            }
            Projection::TwoD { fov: (w, h) } => {
                let w = if w == 0.0 { 1.0 } else { w };
                let h = if h == 0.0 { 1.0 } else { h };
                Transform::from_scale(2.0 / w, -2.0 / h, 1.0)
            }
            Projection::Orthographic {
                left,
                right,
                bottom,
                top,
                near,
                far,
            } => Mat4::orthographic_rh_gl(left, right, bottom, top, near, far).into(),
            Projection::Perspective {
                fov_y,
                aspect,
                near,
                far,
            } => Mat4::perspective_rh_gl(fov_y, aspect, near, far).into(),
        }
    }
}

/// Orientation of a camera that circles a target point, in degrees.
///
/// Elevation 90 looks straight down the z axis; elevation 0 looks along the
/// horizon toward +y when azimuth is 0. Azimuth turns about the z axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orbit {
    pub target: (f32, f32, f32),
    pub distance: f32,
    pub azimuth: f32,
    pub elevation: f32,
    pub roll: f32,
}

impl Default for Orbit {
    fn default() -> Self {
        Self {
            target: (0.0, 0.0, 0.0),
            distance: 0.0,
            azimuth: -10.0,
            elevation: 30.0,
            roll: 0.0,
        }
    }
}

impl Orbit {
    /// Turn by the given angle deltas. Azimuth wraps into [-180, 180] and
    /// elevation is clamped to [-90, 90].
    pub fn rotate(&mut self, d_azimuth: f32, d_elevation: f32) {
        let mut azimuth = self.azimuth + d_azimuth;
        while azimuth < -180.0 {
            azimuth += 360.0;
        }
        while azimuth > 180.0 {
            azimuth -= 360.0;
        }
        self.azimuth = azimuth;
        self.elevation = (self.elevation + d_elevation).clamp(-90.0, 90.0);
    }

    /// Camera-to-parent placement: back off `distance` along the view axis,
    /// roll, tilt, turn, then move to the target.
    pub fn transform(&self) -> Transform {
        let (x, y, z) = self.target;
        let m = Mat4::from_translation(Vec3::new(x, y, z))
            * Mat4::from_rotation_z(self.azimuth.to_radians())
            * Mat4::from_rotation_x((90.0 - self.elevation).to_radians())
            * Mat4::from_rotation_z(self.roll.to_radians())
            * Mat4::from_translation(Vec3::new(0.0, 0.0, self.distance));
        m.into()
    }
}

/// Camera payload of an entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraData {
    pub projection: Projection,
    /// Normalise the camera's own transform to unit scale before composing it
    /// with its ancestors. Ancestor scale still applies.
    pub strip_scale: bool,
    /// Set for cameras whose transform is driven by orbit angles.
    pub orbit: Option<Orbit>,
}

impl CameraData {
    pub fn new(projection: Projection) -> Self {
        Self {
            projection,
            strip_scale: false,
            orbit: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(t: &Transform, x: f32, y: f32) -> (f32, f32) {
        let p = t.matrix().transform_point3(Vec3::new(x, y, 0.0));
        (p.x, p.y)
    }

    #[test]
    fn test_pixel_projection_corners() {
        let m = Projection::Pixel.matrix((800, 600));
        let (x, y) = apply(&m, 0.0, 0.0);
        assert!((x + 1.0).abs() < 1e-6 && (y - 1.0).abs() < 1e-6);
        let (x, y) = apply(&m, 800.0, 600.0);
        assert!((x - 1.0).abs() < 1e-6 && (y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_pixel_projection_zero_resolution() {
        let m = Projection::Pixel.matrix((0, 0));
        assert!(m.inverse().is_some());
    }

    #[test]
    fn test_two_d_projection_flips_y() {
        let m = Projection::TwoD { fov: (4.0, 2.0) }.matrix((100, 100));
        let (x, y) = apply(&m, 2.0, 1.0);
        assert!((x - 1.0).abs() < 1e-6);
        assert!((y + 1.0).abs() < 1e-6);
    }

    fn position(t: &Transform) -> Vec3 {
        t.matrix().w_axis.truncate()
    }

    #[test]
    fn test_orbit_from_above_and_side() {
        let mut orbit = Orbit {
            target: (1.0, 2.0, 3.0),
            distance: 10.0,
            azimuth: 0.0,
            elevation: 90.0,
            roll: 0.0,
        };
        assert!(position(&orbit.transform()).abs_diff_eq(Vec3::new(1.0, 2.0, 13.0), 1e-4));

        orbit.elevation = 0.0;
        assert!(position(&orbit.transform()).abs_diff_eq(Vec3::new(1.0, -8.0, 3.0), 1e-4));

        orbit.azimuth = 90.0;
        assert!(position(&orbit.transform()).abs_diff_eq(Vec3::new(11.0, 2.0, 3.0), 1e-4));
    }

    #[test]
    fn test_orbit_looks_at_target() {
        let orbit = Orbit {
            target: (4.0, -1.0, 2.0),
            distance: 5.0,
            azimuth: 37.0,
            elevation: 12.0,
            roll: 20.0,
        };
        let view = orbit.transform().inverse().unwrap();
        let p = view.matrix().transform_point3(Vec3::new(4.0, -1.0, 2.0));
        assert!(p.abs_diff_eq(Vec3::new(0.0, 0.0, -5.0), 1e-4));
    }

    #[test]
    fn test_orbit_rotate_wraps_and_clamps() {
        let mut orbit = Orbit::default();
        orbit.rotate(200.0, 100.0);
        assert!((orbit.azimuth - -170.0).abs() < 1e-4);
        assert_eq!(orbit.elevation, 90.0);
        orbit.rotate(-20.0, -300.0);
        assert!((orbit.azimuth - 170.0).abs() < 1e-4);
        assert_eq!(orbit.elevation, -90.0);
    }

    #[test]
    fn test_identity_and_explicit() {
        assert_eq!(Projection::Identity.matrix((1, 1)), Transform::IDENTITY);
        let t = Transform::from_scale(2.0, 3.0, 4.0);
        assert_eq!(Projection::Matrix(t).matrix((10, 10)), t);
    }
}
