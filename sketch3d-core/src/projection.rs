/// Camera, light and projection utilities for the spatial pipeline
use nalgebra::{Matrix4, Point3, Vector3};

use crate::config::PipelineConfig;
use crate::error::MathError;
use crate::transform::{deg_to_rad, m4, normalize, RotationState};

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// How the camera matrix is derived from the camera fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    /// Translate, then orient toward `target`. Rotation fields are ignored.
    LookAt,
    /// Translate, then rotate around z, x, y in that order.
    Free,
}

/// The single scene camera
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub translation: Vector3<f32>,
    pub rotation: RotationState,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub mode: CameraMode,
}

impl Camera {
    pub fn new(translation: Vector3<f32>, target: Point3<f32>) -> Self {
        Self {
            translation,
            rotation: RotationState::zero(),
            target,
            up: Vector3::new(0.0, 1.0, 0.0),
            mode: CameraMode::LookAt,
        }
    }

    pub fn toggle_mode(&mut self) -> CameraMode {
        self.mode = match self.mode {
            CameraMode::LookAt => CameraMode::Free,
            CameraMode::Free => CameraMode::LookAt,
        };
        log::debug!("camera mode switched to {:?}", self.mode);
        self.mode
    }

    /// Camera placement in world space (the inverse of the view matrix)
    pub fn matrix(&self) -> Result<Matrix4<f32>, MathError> {
        let t = &self.translation;
        let placed = m4::translate(&m4::identity(), t.x, t.y, t.z);
        match self.mode {
            CameraMode::LookAt => {
                let eye = m4::translation(&placed);
                m4::look_at(&eye, &self.target, &self.up)
            }
            CameraMode::Free => {
                let m = m4::z_rotate(&placed, deg_to_rad(self.rotation.z));
                let m = m4::x_rotate(&m, deg_to_rad(self.rotation.x));
                Ok(m4::y_rotate(&m, deg_to_rad(self.rotation.y)))
            }
        }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Result<Matrix4<f32>, MathError> {
        m4::inverse(&self.matrix()?)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self, config: &PipelineConfig) -> Result<Matrix4<f32>, MathError> {
        let aspect = config.viewport.aspect();
        match config.projection {
            ProjectionMode::Perspective => m4::perspective(
                deg_to_rad(config.field_of_view_degrees),
                aspect,
                config.z_near,
                config.z_far,
            ),
            ProjectionMode::Orthographic => {
                let eye = Point3::from(self.translation);
                let height = (eye - self.target).norm();
                let width = height * aspect;
                m4::orthographic(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    config.z_near,
                    config.z_far,
                )
            }
        }
    }

    /// `projection * view`, the base every shape transform builds on.
    pub fn view_projection(&self, config: &PipelineConfig) -> Result<Matrix4<f32>, MathError> {
        let projection = self.projection_matrix(config)?;
        Ok(m4::multiply(&projection, &self.view_matrix()?))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vector3::new(5.0, 10.0, 45.0), Point3::new(5.0, 10.0, 0.0))
    }
}

/// The single directional light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub direction: Vector3<f32>,
}

impl Light {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            direction: Vector3::new(x, y, z),
        }
    }

    /// Direction handed to the backend; always unit length.
    pub fn normalized_direction(&self) -> Result<Vector3<f32>, MathError> {
        normalize(&self.direction)
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::new(0.4, 0.3, 0.5)
    }
}
