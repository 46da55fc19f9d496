/// Scene model: shapes, camera, light and the current selection
///
/// Shapes are identified purely by position in the sequence. Deleting shape
/// `i` shifts every later shape down by one, and the selection is
/// re-validated according to the scene's [`SelectionPolicy`].
use std::fmt;

use nalgebra::{Point3, Vector3};

use crate::color::Color;
use crate::config::{Dimension, Viewport};
use crate::error::SceneError;
use crate::projection::{Camera, Light};
use crate::transform::RotationState;

/// Closed set of drawable primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Rectangle,
    Triangle,
    Circle,
    Star,
    Cube,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 5] = [
        ShapeKind::Rectangle,
        ShapeKind::Triangle,
        ShapeKind::Circle,
        ShapeKind::Star,
        ShapeKind::Cube,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "RECTANGLE",
            ShapeKind::Triangle => "TRIANGLE",
            ShapeKind::Circle => "CIRCLE",
            ShapeKind::Star => "STAR",
            ShapeKind::Cube => "CUBE",
        }
    }

    /// Case-insensitive lookup by [`ShapeKind::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Local-space extent of a shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Dimensions {
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    pub fn unit() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::unit()
    }
}

/// One drawable item of the scene
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,
    pub position: Point3<f32>,
    pub dimensions: Dimensions,
    pub color: Color,
    pub translation: Vector3<f32>,
    /// Degrees. The planar pipeline reads only `z`.
    pub rotation: RotationState,
    pub scale: Vector3<f32>,
}

impl Shape {
    pub fn new(kind: ShapeKind, color: Color) -> Self {
        Self {
            kind,
            position: Point3::origin(),
            dimensions: Dimensions::unit(),
            color,
            translation: Vector3::zeros(),
            rotation: RotationState::zero(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn with_translation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.translation = Vector3::new(x, y, z);
        self
    }

    pub fn with_rotation(mut self, rotation: RotationState) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, x: f32, y: f32, z: f32) -> Self {
        self.scale = Vector3::new(x, y, z);
        self
    }

    pub fn with_uniform_scale(self, s: f32) -> Self {
        self.with_scale(s, s, s)
    }

    pub fn with_dimensions(mut self, dimensions: Dimensions) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn with_position(mut self, position: Point3<f32>) -> Self {
        self.position = position;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Component index into vectors and points.
    pub fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// What happens to the selection when a shape at or before it is deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionPolicy {
    /// Any deletion at or before the selected index selects the first shape.
    #[default]
    ResetToFirst,
    /// The selection follows its shape down one slot; deleting the selected
    /// shape selects its successor, or the new last shape.
    FollowShape,
}

/// Row of the shape list shown by a UI
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeListEntry {
    pub index: usize,
    pub kind: ShapeKind,
    pub translation: Vector3<f32>,
    pub selected: bool,
}

impl fmt::Display for ShapeListEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}; X: {}; Y: {}; Z: {};",
            self.kind, self.translation.x, self.translation.y, self.translation.z
        )
    }
}

/// Scale given to shapes placed with the pointer.
pub const POINTER_SHAPE_SCALE: f32 = 20.0;
/// Depth at which pointer-placed shapes land in the spatial pipeline.
pub const POINTER_SHAPE_DEPTH: f32 = -150.0;

/// Shapes plus the camera, light and selection that edit and light them
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    shapes: Vec<Shape>,
    selected: usize,
    policy: SelectionPolicy,
    pub camera: Camera,
    pub light: Light,
}

impl Scene {
    pub fn new() -> Self {
        Self::with_shapes(Vec::new())
    }

    pub fn with_shapes(shapes: Vec<Shape>) -> Self {
        Self {
            shapes,
            selected: 0,
            policy: SelectionPolicy::default(),
            camera: Camera::default(),
            light: Light::default(),
        }
    }

    /// Starting scene for the spatial pipeline: three cubes in a row.
    pub fn default_spatial() -> Self {
        Self::with_shapes(vec![
            Shape::new(ShapeKind::Cube, Color::blue()).with_uniform_scale(15.0),
            Shape::new(ShapeKind::Cube, Color::green())
                .with_translation(20.0, 0.0, 0.0)
                .with_uniform_scale(15.0),
            Shape::new(ShapeKind::Cube, Color::red())
                .with_translation(-20.0, 0.0, 0.0)
                .with_uniform_scale(15.0),
        ])
    }

    /// Starting scene for the planar pipeline: a rectangle and a triangle.
    pub fn default_planar() -> Self {
        Self::with_shapes(vec![
            Shape::new(ShapeKind::Rectangle, Color::blue())
                .with_translation(200.0, 100.0, 0.0)
                .with_scale(50.0, 50.0, 1.0),
            Shape::new(ShapeKind::Triangle, Color::red())
                .with_translation(300.0, 100.0, 0.0)
                .with_scale(50.0, 50.0, 1.0),
        ])
    }

    pub fn with_selection_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn selection_policy(&self) -> SelectionPolicy {
        self.policy
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn shape(&self, index: usize) -> Result<&Shape, SceneError> {
        let len = self.shapes.len();
        self.shapes
            .get(index)
            .ok_or(SceneError::IndexOutOfRange { index, len })
    }

    pub fn shape_mut(&mut self, index: usize) -> Result<&mut Shape, SceneError> {
        let len = self.shapes.len();
        self.shapes
            .get_mut(index)
            .ok_or(SceneError::IndexOutOfRange { index, len })
    }

    /// Appends a shape and returns its index. The selection is unchanged.
    pub fn add_shape(&mut self, shape: Shape) -> usize {
        log::debug!("adding {} at index {}", shape.kind, self.shapes.len());
        self.shapes.push(shape);
        self.shapes.len() - 1
    }

    /// Adds a default shape where the pointer was pressed, in viewport pixels.
    pub fn add_at_pointer(
        &mut self,
        kind: ShapeKind,
        color: Color,
        x: f32,
        y: f32,
        viewport: &Viewport,
        dimension: Dimension,
    ) -> usize {
        let shape = Shape::new(kind, color).with_uniform_scale(POINTER_SHAPE_SCALE);
        let shape = match dimension {
            Dimension::Planar => shape.with_translation(x, y, 0.0),
            Dimension::Spatial => shape
                .with_translation(
                    round_half_up(x - viewport.width / 2.0),
                    -round_half_up(y - viewport.height / 2.0),
                    POINTER_SHAPE_DEPTH,
                )
                .with_rotation(RotationState::new(0.0, 0.0, 180.0)),
        };
        self.add_shape(shape)
    }

    /// Removes the shape at `index`; later shapes shift down by one.
    pub fn delete_shape(&mut self, index: usize) -> Result<Shape, SceneError> {
        let len = self.shapes.len();
        if index >= len {
            return Err(SceneError::IndexOutOfRange { index, len });
        }
        let removed = self.shapes.remove(index);
        log::debug!("deleted {} at index {}", removed.kind, index);

        let previous = self.selected;
        if previous >= index {
            self.selected = match self.policy {
                SelectionPolicy::ResetToFirst => 0,
                SelectionPolicy::FollowShape if previous > index => previous - 1,
                SelectionPolicy::FollowShape => index.min(self.shapes.len().saturating_sub(1)),
            };
            if self.selected != previous {
                log::warn!(
                    "selection moved from {} to {} after deleting index {}",
                    previous,
                    self.selected,
                    index
                );
            }
        }
        Ok(removed)
    }

    pub fn select(&mut self, index: usize) -> Result<(), SceneError> {
        self.shape(index)?;
        log::debug!("selected index {}", index);
        self.selected = index;
        Ok(())
    }

    /// `None` only when the scene is empty.
    pub fn selected_index(&self) -> Option<usize> {
        if self.shapes.is_empty() {
            None
        } else {
            Some(self.selected)
        }
    }

    pub fn selected_shape(&self) -> Result<&Shape, SceneError> {
        let index = self.selected_index().ok_or(SceneError::EmptyScene)?;
        self.shape(index)
    }

    pub fn selected_shape_mut(&mut self) -> Result<&mut Shape, SceneError> {
        let index = self.selected_index().ok_or(SceneError::EmptyScene)?;
        self.shape_mut(index)
    }

    pub fn set_translation(&mut self, axis: Axis, value: f32) -> Result<(), SceneError> {
        self.selected_shape_mut()?.translation[axis.index()] = value;
        Ok(())
    }

    /// `degrees` replaces the current angle around `axis`.
    pub fn set_rotation(&mut self, axis: Axis, degrees: f32) -> Result<(), SceneError> {
        let rotation = &mut self.selected_shape_mut()?.rotation;
        match axis {
            Axis::X => rotation.x = degrees,
            Axis::Y => rotation.y = degrees,
            Axis::Z => rotation.z = degrees,
        }
        Ok(())
    }

    /// Adds the deltas (degrees) to the selected shape's rotation.
    pub fn rotate_selected(&mut self, dx: f32, dy: f32, dz: f32) -> Result<(), SceneError> {
        self.selected_shape_mut()?.rotation.rotate(dx, dy, dz);
        Ok(())
    }

    pub fn set_scale(&mut self, axis: Axis, value: f32) -> Result<(), SceneError> {
        self.selected_shape_mut()?.scale[axis.index()] = value;
        Ok(())
    }

    pub fn set_color(&mut self, color: Color) -> Result<(), SceneError> {
        self.selected_shape_mut()?.color = color;
        Ok(())
    }

    pub fn set_camera_translation(&mut self, axis: Axis, value: f32) {
        self.camera.translation[axis.index()] = value;
    }

    pub fn set_camera_rotation(&mut self, axis: Axis, degrees: f32) {
        let rotation = &mut self.camera.rotation;
        match axis {
            Axis::X => rotation.x = degrees,
            Axis::Y => rotation.y = degrees,
            Axis::Z => rotation.z = degrees,
        }
    }

    /// Adds the deltas (degrees) to the camera rotation used in free mode.
    pub fn rotate_camera(&mut self, dx: f32, dy: f32, dz: f32) {
        self.camera.rotation.rotate(dx, dy, dz);
    }

    pub fn set_camera_target(&mut self, axis: Axis, value: f32) {
        self.camera.target[axis.index()] = value;
    }

    pub fn set_light_direction(&mut self, axis: Axis, value: f32) {
        self.light.direction[axis.index()] = value;
    }

    /// Rows for a shape list, in draw order.
    pub fn list_entries(&self) -> Vec<ShapeListEntry> {
        let selected = self.selected_index();
        self.shapes
            .iter()
            .enumerate()
            .map(|(index, shape)| ShapeListEntry {
                index,
                kind: shape.kind,
                translation: shape.translation,
                selected: selected == Some(index),
            })
            .collect()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

/// Nearest integer with halves rounded toward positive infinity.
fn round_half_up(value: f32) -> f32 {
    (value + 0.5).floor()
}
