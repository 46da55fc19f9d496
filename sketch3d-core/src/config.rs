/// Pipeline configuration shared by every front end
use crate::projection::ProjectionMode;
use crate::scene::SelectionPolicy;

/// Which matrix pipeline a frame runs through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    /// 3x3 matrices, pixel-space projection, z ignored.
    Planar,
    /// 4x4 matrices, camera and projection.
    Spatial,
}

/// Drawing surface size in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub dimension: Dimension,
    /// Only honored by the spatial pipeline.
    pub lighting: bool,
    pub viewport: Viewport,
    pub projection: ProjectionMode,
    pub field_of_view_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub selection_policy: SelectionPolicy,
}

impl PipelineConfig {
    pub fn planar(viewport: Viewport) -> Self {
        Self {
            dimension: Dimension::Planar,
            lighting: false,
            viewport,
            ..Self::default()
        }
    }

    pub fn spatial(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    pub fn lighting_enabled(&self) -> bool {
        self.lighting && self.dimension == Dimension::Spatial
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dimension: Dimension::Spatial,
            lighting: true,
            viewport: Viewport::default(),
            projection: ProjectionMode::Perspective,
            field_of_view_degrees: 70.0,
            z_near: 1.0,
            z_far: 2000.0,
            selection_policy: SelectionPolicy::ResetToFirst,
        }
    }
}
