/// Frame orchestration and the backend seam it drives
use nalgebra::{Matrix4, Point3, Vector3};

use crate::config::PipelineConfig;
use crate::error::RenderError;
use crate::geometry::{self, Primitive};
use crate::resolver::{TransformMatrix, TransformResolver};
use crate::scene::{Scene, ShapeListEntry};

/// Immediate-mode drawing surface the frame renderer submits to.
///
/// Per-draw state (`set_*`) stays in effect until overwritten; `draw`
/// consumes the most recently submitted geometry.
pub trait RenderBackend {
    /// Clears color (and depth, for spatial frames) at frame start.
    fn clear(&mut self);
    fn submit_geometry(&mut self, vertices: &[Point3<f32>], primitive: Primitive);
    /// Same length as the last submitted vertex list. Only called when lit.
    fn submit_normals(&mut self, normals: &[Vector3<f32>]);
    fn set_color(&mut self, rgba: [f32; 4]);
    fn set_transform(&mut self, matrix: &TransformMatrix);
    fn set_normal_matrix(&mut self, matrix: &Matrix4<f32>);
    fn set_light_direction(&mut self, direction: &Vector3<f32>);
    fn draw(&mut self, primitive: Primitive, vertex_count: usize);
}

/// Receives the refreshed shape list after every frame.
pub trait ShapeListView {
    fn refresh(&mut self, entries: &[ShapeListEntry]);
}

/// Counts from one rendered frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub draw_calls: usize,
    pub vertices: usize,
}

/// Full redraw of a scene, one draw call per shape, in scene order.
pub struct FrameRenderer {
    config: PipelineConfig,
}

impl FrameRenderer {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut PipelineConfig {
        &mut self.config
    }

    /// Camera or projection degeneracy is detected before anything is
    /// submitted, so a failed frame leaves the backend untouched.
    pub fn render<B: RenderBackend + ?Sized>(
        &self,
        scene: &Scene,
        backend: &mut B,
    ) -> Result<FrameStats, RenderError> {
        let resolver = TransformResolver::new(&self.config, scene)?;
        let lighting = match resolver.normal_matrix() {
            Some(normal_matrix) => {
                Some((*normal_matrix, scene.light.normalized_direction()?))
            }
            None => None,
        };

        backend.clear();
        if let Some((normal_matrix, light_direction)) = &lighting {
            backend.set_normal_matrix(normal_matrix);
            backend.set_light_direction(light_direction);
        }

        let mut stats = FrameStats::default();
        for (index, shape) in scene.shapes().iter().enumerate() {
            let transform = resolver.resolve(shape);
            let geometry = geometry::generate(shape);
            log::trace!(
                "draw #{} {} with {} vertices",
                index,
                shape.kind,
                geometry.vertex_count()
            );

            backend.set_color(shape.color.to_rgba());
            backend.set_transform(&transform);
            backend.submit_geometry(&geometry.positions, geometry.primitive);
            if lighting.is_some() {
                backend.submit_normals(&geometry.normals);
            }
            backend.draw(geometry.primitive, geometry.vertex_count());

            stats.draw_calls += 1;
            stats.vertices += geometry.vertex_count();
        }
        Ok(stats)
    }

    /// [`FrameRenderer::render`] followed by a shape list refresh.
    pub fn render_with_list<B: RenderBackend + ?Sized, V: ShapeListView + ?Sized>(
        &self,
        scene: &Scene,
        backend: &mut B,
        list: &mut V,
    ) -> Result<FrameStats, RenderError> {
        let stats = self.render(scene, backend)?;
        list.refresh(&scene.list_entries());
        Ok(stats)
    }
}

/// One recorded backend call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Geometry {
        vertices: Vec<Point3<f32>>,
        primitive: Primitive,
    },
    Normals(Vec<Vector3<f32>>),
    Color([f32; 4]),
    Transform(TransformMatrix),
    NormalMatrix(Matrix4<f32>),
    LightDirection(Vector3<f32>),
    Draw {
        primitive: Primitive,
        vertex_count: usize,
    },
}

/// Everything needed to replay one draw call
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDraw {
    pub vertices: Vec<Point3<f32>>,
    pub normals: Option<Vec<Vector3<f32>>>,
    pub primitive: Primitive,
    pub vertex_count: usize,
    pub color: [f32; 4],
    pub transform: TransformMatrix,
}

/// Backend that keeps every call for later inspection or replay.
#[derive(Debug, Clone, Default)]
pub struct CommandRecorder {
    commands: Vec<DrawCommand>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Commands since the most recent clear.
    pub fn current_frame(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear))
            .map_or(0, |i| i + 1);
        &self.commands[start..]
    }

    /// Folds the current frame's state changes into one entry per draw.
    pub fn draws(&self) -> Vec<RecordedDraw> {
        let mut draws = Vec::new();
        let mut vertices = Vec::new();
        let mut normals = None;
        let mut color = [0.0; 4];
        let mut transform = None;

        for command in self.current_frame() {
            match command {
                DrawCommand::Geometry { vertices: v, .. } => {
                    vertices = v.clone();
                    normals = None;
                }
                DrawCommand::Normals(n) => normals = Some(n.clone()),
                DrawCommand::Color(c) => color = *c,
                DrawCommand::Transform(t) => transform = Some(*t),
                DrawCommand::Draw {
                    primitive,
                    vertex_count,
                } => {
                    if let Some(transform) = transform {
                        draws.push(RecordedDraw {
                            vertices: vertices.clone(),
                            normals: normals.clone(),
                            primitive: *primitive,
                            vertex_count: *vertex_count,
                            color,
                            transform,
                        });
                    }
                }
                DrawCommand::Clear | DrawCommand::NormalMatrix(_) | DrawCommand::LightDirection(_) => {}
            }
        }
        draws
    }

    pub fn light_direction(&self) -> Option<Vector3<f32>> {
        self.current_frame().iter().find_map(|c| match c {
            DrawCommand::LightDirection(d) => Some(*d),
            _ => None,
        })
    }

    pub fn reset(&mut self) {
        self.commands.clear();
    }
}

impl RenderBackend for CommandRecorder {
    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn submit_geometry(&mut self, vertices: &[Point3<f32>], primitive: Primitive) {
        self.commands.push(DrawCommand::Geometry {
            vertices: vertices.to_vec(),
            primitive,
        });
    }

    fn submit_normals(&mut self, normals: &[Vector3<f32>]) {
        self.commands.push(DrawCommand::Normals(normals.to_vec()));
    }

    fn set_color(&mut self, rgba: [f32; 4]) {
        self.commands.push(DrawCommand::Color(rgba));
    }

    fn set_transform(&mut self, matrix: &TransformMatrix) {
        self.commands.push(DrawCommand::Transform(*matrix));
    }

    fn set_normal_matrix(&mut self, matrix: &Matrix4<f32>) {
        self.commands.push(DrawCommand::NormalMatrix(*matrix));
    }

    fn set_light_direction(&mut self, direction: &Vector3<f32>) {
        self.commands.push(DrawCommand::LightDirection(*direction));
    }

    fn draw(&mut self, primitive: Primitive, vertex_count: usize) {
        self.commands.push(DrawCommand::Draw {
            primitive,
            vertex_count,
        });
    }
}

impl ShapeListView for Vec<ShapeListEntry> {
    fn refresh(&mut self, entries: &[ShapeListEntry]) {
        self.clear();
        self.extend_from_slice(entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::config::Viewport;
    use crate::scene::{Axis, Dimensions, Shape, ShapeKind};

    #[test]
    fn test_red_rectangle_scenario() {
        let config = PipelineConfig::planar(Viewport::new(400.0, 300.0));
        let renderer = FrameRenderer::new(config);
        let mut scene = Scene::new();
        scene.add_shape(
            Shape::new(ShapeKind::Rectangle, Color::from_hex("#FF0000").unwrap())
                .with_dimensions(Dimensions::new(50.0, 50.0, 1.0))
                .with_translation(200.0, 100.0, 0.0),
        );

        let mut recorder = CommandRecorder::new();
        let stats = renderer.render(&scene, &mut recorder).unwrap();
        assert_eq!(stats, FrameStats { draw_calls: 1, vertices: 6 });

        let draws = recorder.draws();
        assert_eq!(draws.len(), 1);
        let draw = &draws[0];
        assert_eq!(draw.vertex_count, 6);
        assert!((draw.color[0] - 0.996).abs() < 1e-3);
        assert_eq!(&draw.color[1..], &[0.0, 0.0, 1.0]);
        assert!(draw.normals.is_none());

        // Pixel-space corners after the shape's own transform
        let model = crate::transform::m3::translate(&crate::transform::m3::identity(), 200.0, 100.0);
        let pixels: Vec<_> = draw
            .vertices
            .iter()
            .map(|v| model * nalgebra::Vector3::new(v.x, v.y, 1.0))
            .collect();
        let min_x = pixels.iter().map(|p| p.x).fold(f32::INFINITY, f32::min);
        let max_x = pixels.iter().map(|p| p.x).fold(f32::NEG_INFINITY, f32::max);
        let min_y = pixels.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
        let max_y = pixels.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);
        assert_eq!((min_x, min_y, max_x, max_y), (175.0, 75.0, 225.0, 125.0));

        // And the submitted transform maps them into clip space accordingly
        let clip = draw.transform.project(-25.0, -25.0, 0.0).unwrap();
        assert!((clip.x - (175.0 / 200.0 - 1.0)).abs() < 1e-5);
        assert!((clip.y - (1.0 - 75.0 / 150.0)).abs() < 1e-5);
    }

    #[test]
    fn test_draw_order_follows_scene_order() {
        let renderer = FrameRenderer::new(PipelineConfig::default());
        let scene = Scene::default_spatial();
        let mut recorder = CommandRecorder::new();
        renderer.render(&scene, &mut recorder).unwrap();

        let colors: Vec<_> = recorder.draws().iter().map(|d| d.color).collect();
        let expected: Vec<_> = scene.shapes().iter().map(|s| s.color.to_rgba()).collect();
        assert_eq!(colors, expected);
    }

    #[test]
    fn test_lit_frame_submits_normals_and_light() {
        let renderer = FrameRenderer::new(PipelineConfig::default());
        let scene = Scene::default_spatial();
        let mut recorder = CommandRecorder::new();
        renderer.render(&scene, &mut recorder).unwrap();

        for draw in recorder.draws() {
            let normals = draw.normals.expect("lit draws carry normals");
            assert_eq!(normals.len(), draw.vertex_count);
        }
        let light = recorder.light_direction().unwrap();
        assert!((light.norm() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_light_edit_reaches_backend() {
        let renderer = FrameRenderer::new(PipelineConfig::default());
        let mut scene = Scene::default_spatial();
        let mut recorder = CommandRecorder::new();
        renderer.render(&scene, &mut recorder).unwrap();
        let before = recorder.light_direction().unwrap();

        scene.set_light_direction(Axis::X, -2.0);
        recorder.reset();
        renderer.render(&scene, &mut recorder).unwrap();
        let after = recorder.light_direction().unwrap();
        assert!((after - before).norm() > 1e-3);
        assert!(after.x < 0.0);
        assert!((after.norm() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_unlit_frame_skips_normals() {
        let mut config = PipelineConfig::default();
        config.lighting = false;
        let renderer = FrameRenderer::new(config);
        let mut recorder = CommandRecorder::new();
        renderer.render(&Scene::default_spatial(), &mut recorder).unwrap();

        assert!(recorder
            .commands()
            .iter()
            .all(|c| !matches!(c, DrawCommand::Normals(_) | DrawCommand::LightDirection(_))));
    }

    #[test]
    fn test_failed_frame_submits_nothing() {
        let renderer = FrameRenderer::new(PipelineConfig::default());
        let mut scene = Scene::default_spatial();
        scene.light = crate::projection::Light::new(0.0, 0.0, 0.0);
        let mut recorder = CommandRecorder::new();
        assert!(renderer.render(&scene, &mut recorder).is_err());
        assert!(recorder.commands().is_empty());
    }

    #[test]
    fn test_render_with_list_refreshes_rows() {
        let renderer = FrameRenderer::new(PipelineConfig::default());
        let mut scene = Scene::default_spatial();
        let mut recorder = CommandRecorder::new();
        let mut rows: Vec<ShapeListEntry> = Vec::new();

        renderer.render_with_list(&scene, &mut recorder, &mut rows).unwrap();
        assert_eq!(rows.len(), 3);

        scene.delete_shape(0).unwrap();
        renderer.render_with_list(&scene, &mut recorder, &mut rows).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].translation.x, 20.0);
        assert_eq!(recorder.draws().len(), 2);
    }
}
