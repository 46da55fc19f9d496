/// Per-shape model-view-projection resolution
use nalgebra::{Matrix3, Matrix4, Vector3};

use crate::config::{Dimension, PipelineConfig};
use crate::error::MathError;
use crate::scene::{Scene, Shape};
use crate::transform::{deg_to_rad, m3, m4};

/// A shape's final transform, in the dimensionality of its pipeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformMatrix {
    Planar(Matrix3<f32>),
    Spatial(Matrix4<f32>),
}

impl TransformMatrix {
    /// Clip-space position of a local-space point, after the perspective divide.
    pub fn project(&self, x: f32, y: f32, z: f32) -> Option<Vector3<f32>> {
        match self {
            TransformMatrix::Planar(m) => {
                let p = m * Vector3::new(x, y, 1.0);
                if p.z.abs() < 1e-12 {
                    return None;
                }
                Some(Vector3::new(p.x / p.z, p.y / p.z, 0.0))
            }
            TransformMatrix::Spatial(m) => {
                let p = m * nalgebra::Vector4::new(x, y, z, 1.0);
                if p.w.abs() < 1e-6 {
                    return None;
                }
                Some(Vector3::new(p.x / p.w, p.y / p.w, p.z / p.w))
            }
        }
    }

    /// Column-major values, the layout GPU uniform uploads expect.
    pub fn to_column_major(&self) -> Vec<f32> {
        match self {
            TransformMatrix::Planar(m) => m.as_slice().to_vec(),
            TransformMatrix::Spatial(m) => m.as_slice().to_vec(),
        }
    }
}

/// Frame-wide state every shape transform starts from.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformResolver {
    base: TransformMatrix,
    normal_matrix: Option<Matrix4<f32>>,
}

impl TransformResolver {
    /// Builds the pixel projection (planar) or the camera view-projection
    /// (spatial), plus the normal matrix when lighting is enabled.
    pub fn new(config: &PipelineConfig, scene: &Scene) -> Result<Self, MathError> {
        let base = match config.dimension {
            Dimension::Planar => TransformMatrix::Planar(m3::projection(
                config.viewport.width,
                config.viewport.height,
            )),
            Dimension::Spatial => {
                let view_projection = scene.camera.view_projection(config)?;
                // World matrix is identity: normals are defined in world space.
                let world = m4::identity();
                TransformMatrix::Spatial(m4::multiply(&view_projection, &world))
            }
        };

        let normal_matrix = if config.lighting_enabled() {
            let world = m4::identity();
            Some(m4::transpose(&m4::inverse(&world)?))
        } else {
            None
        };

        Ok(Self {
            base,
            normal_matrix,
        })
    }

    pub fn base(&self) -> &TransformMatrix {
        &self.base
    }

    /// Inverse-transpose of the world matrix; present only when lit.
    pub fn normal_matrix(&self) -> Option<&Matrix4<f32>> {
        self.normal_matrix.as_ref()
    }

    /// base · translate · rotate · scale for one shape.
    pub fn resolve(&self, shape: &Shape) -> TransformMatrix {
        let t = &shape.translation;
        let r = &shape.rotation;
        let s = &shape.scale;
        match &self.base {
            TransformMatrix::Planar(base) => {
                let m = m3::translate(base, t.x, t.y);
                let m = m3::rotate(&m, deg_to_rad(r.z));
                TransformMatrix::Planar(m3::scale(&m, s.x, s.y))
            }
            TransformMatrix::Spatial(base) => {
                let m = m4::translate(base, t.x, t.y, t.z);
                let m = m4::x_rotate(&m, deg_to_rad(r.x));
                let m = m4::y_rotate(&m, deg_to_rad(r.y));
                let m = m4::z_rotate(&m, deg_to_rad(r.z));
                TransformMatrix::Spatial(m4::scale(&m, s.x, s.y, s.z))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::config::Viewport;
    use crate::scene::ShapeKind;
    use crate::transform::RotationState;

    #[test]
    fn test_planar_resolution_matches_manual_chain() {
        let config = PipelineConfig::planar(Viewport::new(400.0, 300.0));
        let scene = Scene::default_planar();
        let resolver = TransformResolver::new(&config, &scene).unwrap();
        assert!(resolver.normal_matrix().is_none());

        let shape = Shape::new(ShapeKind::Rectangle, Color::red())
            .with_translation(10.0, 20.0, 0.0)
            .with_rotation(RotationState::new(0.0, 0.0, 90.0))
            .with_scale(2.0, 3.0, 1.0);
        let expected = m3::scale(
            &m3::rotate(
                &m3::translate(&m3::projection(400.0, 300.0), 10.0, 20.0),
                std::f32::consts::FRAC_PI_2,
            ),
            2.0,
            3.0,
        );
        match resolver.resolve(&shape) {
            TransformMatrix::Planar(m) => assert!((m - expected).norm() < 1e-6),
            other => panic!("expected planar transform, got {:?}", other),
        }
    }

    #[test]
    fn test_spatial_resolution_starts_from_view_projection() {
        let config = PipelineConfig::default();
        let scene = Scene::default_spatial();
        let resolver = TransformResolver::new(&config, &scene).unwrap();
        let vp = scene.camera.view_projection(&config).unwrap();

        let identity_shape = Shape::new(ShapeKind::Cube, Color::red());
        match resolver.resolve(&identity_shape) {
            TransformMatrix::Spatial(m) => assert!((m - vp).norm() < 1e-5),
            other => panic!("expected spatial transform, got {:?}", other),
        }
    }

    #[test]
    fn test_spatial_rotation_order_is_x_then_y_then_z() {
        let config = PipelineConfig::default();
        let scene = Scene::default_spatial();
        let resolver = TransformResolver::new(&config, &scene).unwrap();
        let vp = scene.camera.view_projection(&config).unwrap();

        let shape = Shape::new(ShapeKind::Cube, Color::red())
            .with_translation(1.0, 2.0, 3.0)
            .with_rotation(RotationState::new(30.0, 45.0, 60.0))
            .with_scale(2.0, 2.0, 2.0);
        let m = m4::translate(&vp, 1.0, 2.0, 3.0);
        let m = m4::x_rotate(&m, deg_to_rad(30.0));
        let m = m4::y_rotate(&m, deg_to_rad(45.0));
        let m = m4::z_rotate(&m, deg_to_rad(60.0));
        let expected = m4::scale(&m, 2.0, 2.0, 2.0);

        match resolver.resolve(&shape) {
            TransformMatrix::Spatial(m) => assert!((m - expected).norm() < 1e-5),
            other => panic!("expected spatial transform, got {:?}", other),
        }
    }

    #[test]
    fn test_lit_resolver_has_identity_normal_matrix() {
        let resolver = TransformResolver::new(&PipelineConfig::default(), &Scene::default_spatial()).unwrap();
        let normal = resolver.normal_matrix().unwrap();
        assert!((normal - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_degenerate_camera_fails_resolution() {
        let mut scene = Scene::default_spatial();
        scene.camera.target = nalgebra::Point3::from(scene.camera.translation);
        assert!(TransformResolver::new(&PipelineConfig::default(), &scene).is_err());
    }

    #[test]
    fn test_project_planar_pixel_to_clip() {
        let m = TransformMatrix::Planar(m3::projection(200.0, 100.0));
        let clip = m.project(100.0, 50.0, 0.0).unwrap();
        assert!(clip.x.abs() < 1e-6 && clip.y.abs() < 1e-6);
    }
}
