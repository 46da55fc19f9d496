/// Sketch3D Core Library - Shared transform, scene and geometry logic
///
/// This library provides the stateless core of the shape editor: the affine
/// math for the planar and spatial pipelines, the scene model, per-shape
/// geometry generation and transform resolution, and the frame renderer that
/// drives a pluggable rendering backend.

pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod projection;
pub mod render;
pub mod resolver;
pub mod scene;
pub mod transform;

// Re-export commonly used types
pub use color::Color;
pub use config::{Dimension, PipelineConfig, Viewport};
pub use error::{ColorParseError, MathError, RenderError, SceneError};
pub use geometry::{Geometry, Primitive};
pub use projection::{Camera, CameraMode, Light, ProjectionMode};
pub use render::{CommandRecorder, FrameRenderer, FrameStats, RenderBackend, ShapeListView};
pub use resolver::{TransformMatrix, TransformResolver};
pub use scene::{Axis, Dimensions, Scene, SelectionPolicy, Shape, ShapeKind, ShapeListEntry};
pub use transform::RotationState;
