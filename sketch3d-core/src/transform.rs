/// Affine transform math for the planar (3x3) and spatial (4x4) pipelines
///
/// Every builder takes the accumulated matrix and returns `m * op`, so the
/// newest operation applies first in object space. Reading a chain of calls
/// left to right gives the usual model-matrix order: translate, rotate,
/// scale.
use nalgebra::{Matrix3, Matrix4, Point3, Vector2, Vector3};

use crate::error::MathError;

/// Rotation state around three axes (in degrees)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Rotate by delta amounts (in degrees)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees * std::f32::consts::PI / 180.0
}

pub fn rad_to_deg(radians: f32) -> f32 {
    radians * 180.0 / std::f32::consts::PI
}

/// Unit vector in the direction of `v`.
pub fn normalize(v: &Vector3<f32>) -> Result<Vector3<f32>, MathError> {
    v.try_normalize(f32::EPSILON)
        .ok_or(MathError::ZeroLengthVector)
}

/// Homogeneous 3x3 matrices for the planar pipeline.
pub mod m3 {
    use super::*;

    pub fn identity() -> Matrix3<f32> {
        Matrix3::identity()
    }

    /// Maps pixel space (origin top-left, Y down) to clip space (origin
    /// center, Y up). A zero width or height yields infinities.
    pub fn projection(width: f32, height: f32) -> Matrix3<f32> {
        Matrix3::new(
            2.0 / width, 0.0, -1.0,
            0.0, -2.0 / height, 1.0,
            0.0, 0.0, 1.0,
        )
    }

    pub fn translate(m: &Matrix3<f32>, tx: f32, ty: f32) -> Matrix3<f32> {
        m * Matrix3::new_translation(&Vector2::new(tx, ty))
    }

    pub fn rotate(m: &Matrix3<f32>, radians: f32) -> Matrix3<f32> {
        m * Matrix3::new_rotation(radians)
    }

    pub fn scale(m: &Matrix3<f32>, sx: f32, sy: f32) -> Matrix3<f32> {
        m * Matrix3::new_nonuniform_scaling(&Vector2::new(sx, sy))
    }

    /// `multiply(a, b) * v == a * (b * v)`
    pub fn multiply(a: &Matrix3<f32>, b: &Matrix3<f32>) -> Matrix3<f32> {
        a * b
    }

    pub fn inverse(m: &Matrix3<f32>) -> Result<Matrix3<f32>, MathError> {
        m.try_inverse().ok_or(MathError::SingularMatrix)
    }

    pub fn transpose(m: &Matrix3<f32>) -> Matrix3<f32> {
        m.transpose()
    }
}

/// Homogeneous 4x4 matrices for the spatial pipeline.
pub mod m4 {
    use super::*;

    pub fn identity() -> Matrix4<f32> {
        Matrix4::identity()
    }

    pub fn translate(m: &Matrix4<f32>, tx: f32, ty: f32, tz: f32) -> Matrix4<f32> {
        m * Matrix4::new_translation(&Vector3::new(tx, ty, tz))
    }

    pub fn x_rotate(m: &Matrix4<f32>, radians: f32) -> Matrix4<f32> {
        m * Matrix4::from_axis_angle(&Vector3::x_axis(), radians)
    }

    pub fn y_rotate(m: &Matrix4<f32>, radians: f32) -> Matrix4<f32> {
        m * Matrix4::from_axis_angle(&Vector3::y_axis(), radians)
    }

    pub fn z_rotate(m: &Matrix4<f32>, radians: f32) -> Matrix4<f32> {
        m * Matrix4::from_axis_angle(&Vector3::z_axis(), radians)
    }

    pub fn scale(m: &Matrix4<f32>, sx: f32, sy: f32, sz: f32) -> Matrix4<f32> {
        m * Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
    }

    /// Symmetric frustum perspective projection.
    pub fn perspective(
        fov_y_radians: f32,
        aspect: f32,
        z_near: f32,
        z_far: f32,
    ) -> Result<Matrix4<f32>, MathError> {
        if !fov_y_radians.is_finite() || fov_y_radians.abs() <= f32::EPSILON {
            return Err(MathError::DegenerateProjection {
                reason: "field of view is zero",
            });
        }
        if !aspect.is_finite() || aspect.abs() <= f32::EPSILON {
            return Err(MathError::DegenerateProjection {
                reason: "aspect ratio is zero",
            });
        }
        if (z_far - z_near).abs() <= f32::EPSILON {
            return Err(MathError::DegenerateProjection {
                reason: "near and far planes coincide",
            });
        }
        Ok(Matrix4::new_perspective(aspect, fov_y_radians, z_near, z_far))
    }

    pub fn orthographic(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        z_near: f32,
        z_far: f32,
    ) -> Result<Matrix4<f32>, MathError> {
        if (right - left).abs() <= f32::EPSILON || (top - bottom).abs() <= f32::EPSILON {
            return Err(MathError::DegenerateProjection {
                reason: "view volume has zero width or height",
            });
        }
        if (z_far - z_near).abs() <= f32::EPSILON {
            return Err(MathError::DegenerateProjection {
                reason: "near and far planes coincide",
            });
        }
        Ok(Matrix4::new_orthographic(left, right, bottom, top, z_near, z_far))
    }

    /// Camera matrix placed at `eye` and oriented so its +Z axis points away
    /// from `target`. This is the camera's world transform, not the view
    /// matrix; invert it to get the view.
    ///
    /// Fails when `eye == target` or when `up` is parallel to the forward axis.
    pub fn look_at(
        eye: &Point3<f32>,
        target: &Point3<f32>,
        up: &Vector3<f32>,
    ) -> Result<Matrix4<f32>, MathError> {
        let z_axis = normalize(&(eye - target))?;
        let x_axis = normalize(&up.cross(&z_axis))?;
        let y_axis = normalize(&z_axis.cross(&x_axis))?;

        Ok(Matrix4::new(
            x_axis.x, y_axis.x, z_axis.x, eye.x,
            x_axis.y, y_axis.y, z_axis.y, eye.y,
            x_axis.z, y_axis.z, z_axis.z, eye.z,
            0.0, 0.0, 0.0, 1.0,
        ))
    }

    /// `multiply(a, b) * v == a * (b * v)`
    pub fn multiply(a: &Matrix4<f32>, b: &Matrix4<f32>) -> Matrix4<f32> {
        a * b
    }

    pub fn inverse(m: &Matrix4<f32>) -> Result<Matrix4<f32>, MathError> {
        m.try_inverse().ok_or(MathError::SingularMatrix)
    }

    pub fn transpose(m: &Matrix4<f32>) -> Matrix4<f32> {
        m.transpose()
    }

    /// Origin of the frame encoded by `m`.
    pub fn translation(m: &Matrix4<f32>) -> Point3<f32> {
        Point3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)])
    }

    /// Third basis column of `m`, the direction a camera matrix looks away from.
    pub fn z_axis(m: &Matrix4<f32>) -> Vector3<f32> {
        Vector3::new(m[(0, 2)], m[(1, 2)], m[(2, 2)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_m4() -> Matrix4<f32> {
        let m = m4::translate(&m4::identity(), 3.0, -2.0, 7.5);
        let m = m4::x_rotate(&m, 0.4);
        let m = m4::y_rotate(&m, -1.1);
        let m = m4::z_rotate(&m, 2.3);
        m4::scale(&m, 2.0, 0.5, 3.0)
    }

    #[test]
    fn test_identity_laws() {
        let m = sample_m4();
        assert!((m4::multiply(&m4::identity(), &m) - m).norm() < 1e-6);
        assert!((m4::multiply(&m, &m4::identity()) - m).norm() < 1e-6);

        let p = m3::scale(&m3::rotate(&m3::translate(&m3::identity(), 4.0, 9.0), 0.7), 3.0, 2.0);
        assert!((m3::multiply(&m3::identity(), &p) - p).norm() < 1e-6);
        assert!((m3::multiply(&p, &m3::identity()) - p).norm() < 1e-6);
    }

    #[test]
    fn test_inverse_round_trip() {
        let m = sample_m4();
        let back = m4::inverse(&m4::inverse(&m).unwrap()).unwrap();
        assert!((back - m).norm() < 1e-4);

        let p = m3::scale(&m3::translate(&m3::identity(), 12.0, -4.0), 5.0, 0.25);
        let back = m3::inverse(&m3::inverse(&p).unwrap()).unwrap();
        assert!((back - p).norm() < 1e-4);
    }

    #[test]
    fn test_translate_then_inverse_translate_is_identity() {
        let m = m4::translate(&m4::identity(), 5.0, -3.0, 12.0);
        let m = m4::translate(&m, -5.0, 3.0, -12.0);
        assert!((m - m4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_singular_inverse_is_reported() {
        let flat = m4::scale(&m4::identity(), 1.0, 0.0, 1.0);
        assert_eq!(m4::inverse(&flat), Err(MathError::SingularMatrix));
        assert_eq!(m3::inverse(&Matrix3::zeros()), Err(MathError::SingularMatrix));
    }

    #[test]
    fn test_normalize_zero_vector_is_reported() {
        assert_eq!(normalize(&Vector3::zeros()), Err(MathError::ZeroLengthVector));
        let n = normalize(&Vector3::new(3.0, 0.0, 4.0)).unwrap();
        assert!((n - Vector3::new(0.6, 0.0, 0.8)).norm() < 1e-6);
    }

    #[test]
    fn test_composition_applies_newest_operation_first() {
        // translate then scale: the point is scaled in object space, then moved.
        let m = m3::scale(&m3::translate(&m3::identity(), 10.0, 0.0), 2.0, 2.0);
        let p = m * nalgebra::Vector3::new(1.0, 1.0, 1.0);
        assert!((p.x - 12.0).abs() < 1e-6);
        assert!((p.y - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_pixel_projection_maps_corners() {
        let m = m3::projection(400.0, 200.0);
        let top_left = m * nalgebra::Vector3::new(0.0, 0.0, 1.0);
        let bottom_right = m * nalgebra::Vector3::new(400.0, 200.0, 1.0);
        assert!((top_left.x + 1.0).abs() < 1e-6 && (top_left.y - 1.0).abs() < 1e-6);
        assert!((bottom_right.x - 1.0).abs() < 1e-6 && (bottom_right.y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_look_at_translation_is_eye() {
        let eye = Point3::new(5.0, 10.0, 45.0);
        let forward = Vector3::new(0.3, -0.2, -1.0);
        let m = m4::look_at(&eye, &(eye + forward), &Vector3::y()).unwrap();
        assert!((m4::translation(&m) - eye).norm() < 1e-6);
    }

    #[test]
    fn test_look_at_parallel_up_is_reported() {
        let eye = Point3::new(0.0, 10.0, 0.0);
        let target = Point3::origin();
        let result = m4::look_at(&eye, &target, &Vector3::y());
        assert_eq!(result, Err(MathError::ZeroLengthVector));
    }

    #[test]
    fn test_perspective_guards() {
        assert!(m4::perspective(deg_to_rad(70.0), 1.5, 1.0, 2000.0).is_ok());
        assert!(matches!(
            m4::perspective(0.0, 1.5, 1.0, 2000.0),
            Err(MathError::DegenerateProjection { .. })
        ));
        assert!(matches!(
            m4::perspective(1.0, 1.5, 5.0, 5.0),
            Err(MathError::DegenerateProjection { .. })
        ));
    }

    #[test]
    fn test_degree_conversion() {
        assert!((deg_to_rad(180.0) - std::f32::consts::PI).abs() < 1e-6);
        assert!((rad_to_deg(deg_to_rad(70.0)) - 70.0).abs() < 1e-4);
    }
}
