/// ASCII rasterizer backend for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3, Vector3};
use std::io::Write;
use sketch3d_core::color::luma;
use sketch3d_core::{Primitive, RenderBackend, TransformMatrix};

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Light reaching faces turned away from the light.
const AMBIENT: f32 = 0.1;

/// Virtual pixels per character cell; cells are about twice as tall as wide.
pub const CELL_WIDTH: f32 = 8.0;
pub const CELL_HEIGHT: f32 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    glyph: char,
    rgb: (u8, u8, u8),
}

const EMPTY: Cell = Cell {
    glyph: ' ',
    rgb: (0, 0, 0),
};

/// ASCII renderer that rasterizes submitted triangles into terminal cells
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    cells: Vec<Cell>,
    vertices: Vec<Point3<f32>>,
    normals: Vec<Vector3<f32>>,
    color: [f32; 4],
    transform: Option<TransformMatrix>,
    normal_matrix: Matrix4<f32>,
    light_direction: Option<Vector3<f32>>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            cells: vec![EMPTY; size],
            vertices: Vec::new(),
            normals: Vec::new(),
            color: [1.0; 4],
            transform: None,
            normal_matrix: Matrix4::identity(),
            light_direction: None,
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Glyph at a cell, for inspection.
    pub fn glyph_at(&self, x: usize, y: usize) -> char {
        self.cells[y * self.width + x].glyph
    }

    pub fn filled_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.glyph != ' ').count()
    }

    fn triangles(&self, primitive: Primitive, count: usize) -> Vec<[usize; 3]> {
        let count = count.min(self.vertices.len());
        match primitive {
            Primitive::Triangles => (0..count / 3).map(|t| [3 * t, 3 * t + 1, 3 * t + 2]).collect(),
            Primitive::TriangleFan if count >= 3 => (1..count - 1).map(|i| [0, i, i + 1]).collect(),
            Primitive::TriangleFan => Vec::new(),
        }
    }

    /// Lambert term for a triangle, or full intensity when unlit.
    fn intensity(&self, corner: usize) -> f32 {
        let light = match self.light_direction {
            Some(light) => light,
            None => return 1.0,
        };
        let normal = match self.normals.get(corner) {
            Some(n) => self.normal_matrix.transform_vector(n),
            None => return 1.0,
        };
        match normal.try_normalize(f32::EPSILON) {
            Some(n) => n.dot(&light).max(AMBIENT),
            None => AMBIENT,
        }
    }

    fn render_triangle(&mut self, corners: [usize; 3], transform: &TransformMatrix) {
        // Project vertices to screen space
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (slot, &i) in screen_coords.iter_mut().zip(corners.iter()) {
            let v = self.vertices[i];
            let ndc = match transform.project(v.x, v.y, v.z) {
                Some(ndc) => ndc,
                None => return,
            };
            // Near/far clip
            if ndc.z < -1.0 || ndc.z > 1.0 {
                return;
            }
            let screen_x = (ndc.x + 1.0) * 0.5 * self.width as f32;
            let screen_y = (1.0 - ndc.y) * 0.5 * self.height as f32;
            *slot = (screen_x, screen_y, ndc.z);
        }

        let intensity = self.intensity(corners[0]);
        let brightness = luma(self.color[0], self.color[1], self.color[2]) * intensity;
        let glyph = ramp_glyph(brightness);
        let shade = |c: f32| (c * intensity * 255.0).clamp(0.0, 255.0) as u8;
        let cell = Cell {
            glyph,
            rgb: (shade(self.color[0]), shade(self.color[1]), shade(self.color[2])),
        };

        self.rasterize_triangle(&screen_coords, cell);
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], cell: Cell) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                if let Some((w0, w1, w2)) = barycentric(
                    (v0.0, v0.1),
                    (v1.0, v1.1),
                    (v2.0, v2.1),
                    (px, py),
                ) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;

                        // Ties go to the later draw so planar shapes overwrite in order.
                        let idx = y as usize * self.width + x as usize;
                        if depth <= self.depth_buffer[idx] {
                            self.depth_buffer[idx] = depth;
                            self.cells[idx] = cell;
                        }
                    }
                }
            }
        }
    }

    pub fn draw_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let cell = self.cells[y * self.width + x];
                let (r, g, b) = cell.rgb;
                writer.queue(SetForegroundColor(Color::Rgb { r, g, b }))?;
                writer.queue(Print(cell.glyph))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl RenderBackend for AsciiRenderer {
    fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.cells.fill(EMPTY);
        self.light_direction = None;
        self.normal_matrix = Matrix4::identity();
    }

    fn submit_geometry(&mut self, vertices: &[Point3<f32>], _primitive: Primitive) {
        self.vertices.clear();
        self.vertices.extend_from_slice(vertices);
        self.normals.clear();
    }

    fn submit_normals(&mut self, normals: &[Vector3<f32>]) {
        self.normals.clear();
        self.normals.extend_from_slice(normals);
    }

    fn set_color(&mut self, rgba: [f32; 4]) {
        self.color = rgba;
    }

    fn set_transform(&mut self, matrix: &TransformMatrix) {
        self.transform = Some(*matrix);
    }

    fn set_normal_matrix(&mut self, matrix: &Matrix4<f32>) {
        self.normal_matrix = *matrix;
    }

    fn set_light_direction(&mut self, direction: &Vector3<f32>) {
        self.light_direction = Some(*direction);
    }

    fn draw(&mut self, primitive: Primitive, vertex_count: usize) {
        let transform = match self.transform {
            Some(transform) => transform,
            None => {
                log::warn!("draw issued before any transform was set");
                return;
            }
        };
        for corners in self.triangles(primitive, vertex_count) {
            self.render_triangle(corners, &transform);
        }
    }
}

/// Ramp glyph for a brightness in `[0, 1]`. Covered cells never get the
/// blank glyph, so even black shapes stay visible.
fn ramp_glyph(brightness: f32) -> char {
    let steps = (LUMINOSITY_RAMP.len() - 2) as f32;
    let index = 1 + (brightness.clamp(0.0, 1.0) * steps).round() as usize;
    LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)]
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketch3d_core::{
        Color, Dimensions, FrameRenderer, PipelineConfig, Scene, Shape, ShapeKind, Viewport,
    };

    #[test]
    fn test_planar_rectangle_fills_expected_cells() {
        // 40x20 cells over a 400x200 pixel viewport: 10 pixels per cell.
        let mut backend = AsciiRenderer::new(40, 20);
        let renderer = FrameRenderer::new(PipelineConfig::planar(Viewport::new(400.0, 200.0)));
        let mut scene = Scene::new();
        scene.add_shape(
            Shape::new(ShapeKind::Rectangle, Color::red())
                .with_dimensions(Dimensions::new(100.0, 100.0, 1.0))
                .with_translation(200.0, 100.0, 0.0),
        );

        renderer.render(&scene, &mut backend).unwrap();
        // The box spans cells 15..25 horizontally and 5..15 vertically.
        assert_eq!(backend.glyph_at(15, 5), '-');
        assert_eq!(backend.glyph_at(24, 14), '-');
        assert_eq!(backend.glyph_at(14, 5), ' ');
        assert_eq!(backend.glyph_at(25, 14), ' ');
        assert_eq!(backend.glyph_at(20, 4), ' ');
        assert_eq!(backend.glyph_at(20, 15), ' ');
        let filled = backend.filled_cells();
        assert!((95..=100).contains(&filled), "filled {}", filled);
    }

    #[test]
    fn test_later_planar_shape_overwrites_earlier() {
        let mut backend = AsciiRenderer::new(20, 10);
        let renderer = FrameRenderer::new(PipelineConfig::planar(Viewport::new(200.0, 100.0)));
        let big = Shape::new(ShapeKind::Rectangle, Color::red())
            .with_dimensions(Dimensions::new(200.0, 100.0, 1.0))
            .with_translation(100.0, 50.0, 0.0);
        let small = Shape::new(ShapeKind::Rectangle, Color::blue())
            .with_dimensions(Dimensions::new(20.0, 20.0, 1.0))
            .with_translation(100.0, 50.0, 0.0);
        let scene = Scene::with_shapes(vec![big, small]);

        renderer.render(&scene, &mut backend).unwrap();
        let center = backend.cells[5 * 20 + 10];
        assert_eq!(center.rgb, (0, 0, 254));
    }

    #[test]
    fn test_unlit_glyph_follows_color_brightness() {
        let mut backend = AsciiRenderer::new(20, 10);
        let renderer = FrameRenderer::new(PipelineConfig::planar(Viewport::new(200.0, 100.0)));
        let bright = Shape::new(ShapeKind::Rectangle, Color::red())
            .with_dimensions(Dimensions::new(60.0, 60.0, 1.0))
            .with_translation(50.0, 50.0, 0.0);
        let dark = Shape::new(ShapeKind::Rectangle, Color::from_hex("#101010").unwrap())
            .with_dimensions(Dimensions::new(60.0, 60.0, 1.0))
            .with_translation(150.0, 50.0, 0.0);
        let scene = Scene::with_shapes(vec![bright, dark]);

        renderer.render(&scene, &mut backend).unwrap();
        let red_glyph = backend.glyph_at(5, 5);
        let dark_glyph = backend.glyph_at(15, 5);
        assert_ne!(red_glyph, dark_glyph);
        assert_ne!(dark_glyph, ' ');
        let rank = |g: char| LUMINOSITY_RAMP.iter().position(|&c| c == g).unwrap();
        assert!(rank(red_glyph) > rank(dark_glyph));
    }

    #[test]
    fn test_ramp_glyph_bounds() {
        assert_eq!(ramp_glyph(0.0), '.');
        assert_eq!(ramp_glyph(1.0), '@');
        assert_eq!(ramp_glyph(7.5), '@');
        assert_eq!(ramp_glyph(f32::NAN), '.');
    }

    #[test]
    fn test_spatial_cubes_are_visible() {
        let mut backend = AsciiRenderer::new(80, 40);
        let viewport = Viewport::new(80.0 * CELL_WIDTH, 40.0 * CELL_HEIGHT);
        let renderer = FrameRenderer::new(PipelineConfig::spatial(viewport));
        renderer.render(&Scene::default_spatial(), &mut backend).unwrap();
        assert!(backend.filled_cells() > 0);
    }

    #[test]
    fn test_barycentric_degenerate_triangle() {
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (0.5, 0.5)).is_none());
    }

    #[test]
    fn test_fan_expansion() {
        let mut backend = AsciiRenderer::new(4, 4);
        backend.submit_geometry(&[Point3::origin(); 5], Primitive::TriangleFan);
        assert_eq!(
            backend.triangles(Primitive::TriangleFan, 5),
            vec![[0, 1, 2], [0, 2, 3], [0, 3, 4]]
        );
    }
}
