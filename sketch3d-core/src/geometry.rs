/// Local-space vertex generation for every shape kind
///
/// Output is always a flat, non-indexed vertex list: consecutive triples for
/// [`Primitive::Triangles`], a shared first vertex for
/// [`Primitive::TriangleFan`].
use nalgebra::{Point3, Vector3};

use crate::scene::{Dimensions, Shape, ShapeKind};

/// Boundary samples of a circle: one per degree, 0 through 360 inclusive.
pub const CIRCLE_SEGMENTS: usize = 361;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Triangles,
    TriangleFan,
}

/// Positions with a parallel per-vertex normal array
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub primitive: Primitive,
    pub positions: Vec<Point3<f32>>,
    pub normals: Vec<Vector3<f32>>,
}

impl Geometry {
    /// Flat geometry in the z = 0 plane, facing +z.
    fn planar(primitive: Primitive, points: Vec<(f32, f32)>) -> Self {
        let positions: Vec<_> = points
            .into_iter()
            .map(|(x, y)| Point3::new(x, y, 0.0))
            .collect();
        let normals = vec![Vector3::z(); positions.len()];
        Self {
            primitive,
            positions,
            normals,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Expands fans into an explicit triangle list.
    pub fn triangles(&self) -> Vec<[Point3<f32>; 3]> {
        match self.primitive {
            Primitive::Triangles => self
                .positions
                .chunks_exact(3)
                .map(|t| [t[0], t[1], t[2]])
                .collect(),
            Primitive::TriangleFan => match self.positions.split_first() {
                Some((center, rim)) => rim
                    .windows(2)
                    .map(|edge| [*center, edge[0], edge[1]])
                    .collect(),
                None => Vec::new(),
            },
        }
    }
}

/// Vertices for `shape` in its local space.
pub fn generate(shape: &Shape) -> Geometry {
    let p = &shape.position;
    let d = &shape.dimensions;
    match shape.kind {
        ShapeKind::Rectangle => rectangle(p, d),
        ShapeKind::Triangle => triangle(p, d),
        ShapeKind::Circle => circle(p, d),
        ShapeKind::Star => star(p, d),
        ShapeKind::Cube => cube(p, d),
    }
}

/// Two triangles covering the box of `width` x `height` centered on `p`.
pub fn rectangle(p: &Point3<f32>, d: &Dimensions) -> Geometry {
    let x1 = p.x - d.width / 2.0;
    let y1 = p.y - d.height / 2.0;
    let x2 = p.x + d.width / 2.0;
    let y2 = p.y + d.height / 2.0;

    Geometry::planar(
        Primitive::Triangles,
        vec![(x1, y1), (x2, y1), (x1, y2), (x1, y2), (x2, y1), (x2, y2)],
    )
}

/// Isosceles triangle with its base at `-height / 2` and apex at `+height / 2`.
pub fn triangle(p: &Point3<f32>, d: &Dimensions) -> Geometry {
    Geometry::planar(
        Primitive::Triangles,
        vec![
            (p.x - d.width / 2.0, p.y - d.height / 2.0),
            (p.x + d.width / 2.0, p.y - d.height / 2.0),
            (p.x, p.y + d.height / 2.0),
        ],
    )
}

/// Two interleaved triangles spanning `±width` and `±height`.
///
/// Six vertices, drawn as a plain triangle list. This is the shape the
/// editor has always drawn for a star, not a five-pointed outline.
pub fn star(p: &Point3<f32>, d: &Dimensions) -> Geometry {
    let (w, h) = (d.width, d.height);
    Geometry::planar(
        Primitive::Triangles,
        vec![
            (p.x - w, p.y + h / 2.0),
            (p.x, p.y - h),
            (p.x + w, p.y + h / 2.0),
            (p.x - w, p.y - h / 2.0),
            (p.x + w, p.y - h / 2.0),
            (p.x, p.y + h),
        ],
    )
}

/// Fan of the center plus one rim point per degree; an ellipse when
/// `width != height`.
pub fn circle(p: &Point3<f32>, d: &Dimensions) -> Geometry {
    let mut points = Vec::with_capacity(CIRCLE_SEGMENTS + 1);
    points.push((p.x, p.y));
    for degree in 0..CIRCLE_SEGMENTS {
        let angle = (degree as f32).to_radians();
        points.push((
            p.x + d.width * angle.cos(),
            p.y + d.height * angle.sin(),
        ));
    }
    Geometry::planar(Primitive::TriangleFan, points)
}

/// Corner offsets (in units of the dimensions) per face. Each face is two
/// counter-clockwise triangles seen from outside.
const CUBE_FACES: [[[f32; 3]; 6]; 6] = [
    // Back face (z = 0)
    [[0., 0., 0.], [0., 1., 0.], [1., 0., 0.], [0., 1., 0.], [1., 1., 0.], [1., 0., 0.]],
    // Front face (z = 1)
    [[0., 0., 1.], [1., 0., 1.], [0., 1., 1.], [0., 1., 1.], [1., 0., 1.], [1., 1., 1.]],
    // Top face
    [[0., 1., 0.], [0., 1., 1.], [1., 1., 1.], [0., 1., 0.], [1., 1., 1.], [1., 1., 0.]],
    // Bottom face
    [[0., 0., 0.], [1., 0., 0.], [1., 0., 1.], [0., 0., 0.], [1., 0., 1.], [0., 0., 1.]],
    // Left face
    [[0., 0., 0.], [0., 0., 1.], [0., 1., 1.], [0., 0., 0.], [0., 1., 1.], [0., 1., 0.]],
    // Right face
    [[1., 0., 1.], [1., 0., 0.], [1., 1., 1.], [1., 1., 1.], [1., 0., 0.], [1., 1., 0.]],
];

/// Box from `p` to `p + (width, height, depth)`: 12 triangles, 36 vertices.
pub fn cube(p: &Point3<f32>, d: &Dimensions) -> Geometry {
    let mut positions = Vec::with_capacity(36);
    let mut normals = Vec::with_capacity(36);

    for corners in CUBE_FACES.iter() {
        // Taken on the unit box so flat or tiny boxes keep a unit normal.
        let unit = corners.map(|c| Point3::new(c[0], c[1], c[2]));
        let normal = face_normal(&unit[0], &unit[1], &unit[2]);

        for c in corners {
            positions.push(Point3::new(
                p.x + c[0] * d.width,
                p.y + c[1] * d.height,
                p.z + c[2] * d.depth,
            ));
            normals.push(normal);
        }
    }

    Geometry {
        primitive: Primitive::Triangles,
        positions,
        normals,
    }
}

/// Unit normal of a counter-clockwise triangle; zero when it is degenerate.
pub fn face_normal(a: &Point3<f32>, b: &Point3<f32>, c: &Point3<f32>) -> Vector3<f32> {
    let edge1 = b - a;
    let edge2 = c - a;
    edge1
        .cross(&edge2)
        .try_normalize(f32::EPSILON)
        .unwrap_or_else(Vector3::zeros)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    fn dims(width: f32, height: f32) -> Dimensions {
        Dimensions::new(width, height, 1.0)
    }

    #[test]
    fn test_rectangle_covers_box() {
        for (w, h) in [(1.0, 1.0), (50.0, 50.0), (12.0, 3.5)] {
            let center = Point3::new(7.0, -2.0, 0.0);
            let g = rectangle(&center, &dims(w, h));
            assert_eq!(g.primitive, Primitive::Triangles);
            assert_eq!(g.vertex_count(), 6);

            let area: f32 = g
                .triangles()
                .iter()
                .map(|t| ((t[1] - t[0]).cross(&(t[2] - t[0]))).norm() / 2.0)
                .sum();
            assert!((area - w * h).abs() < 1e-3);

            for v in &g.positions {
                assert!((v.x - center.x).abs() <= w / 2.0 + 1e-6);
                assert!((v.y - center.y).abs() <= h / 2.0 + 1e-6);
            }
        }
    }

    #[test]
    fn test_circle_vertex_count_is_fixed() {
        for r in [0.0, 1.0, 250.0] {
            let g = circle(&Point3::origin(), &dims(r, r));
            assert_eq!(g.primitive, Primitive::TriangleFan);
            assert_eq!(g.vertex_count(), 362);
            assert_eq!(g.normals.len(), 362);
        }
    }

    #[test]
    fn test_circle_is_elliptical_and_closed() {
        let g = circle(&Point3::new(1.0, 1.0, 0.0), &dims(4.0, 2.0));
        assert_eq!(g.positions[0], Point3::new(1.0, 1.0, 0.0));
        assert!((g.positions[1] - Point3::new(5.0, 1.0, 0.0)).norm() < 1e-5);
        // 90 degrees lands at +height
        assert!((g.positions[91] - Point3::new(1.0, 3.0, 0.0)).norm() < 1e-5);
        // 360 degrees closes onto the first rim point
        assert!((g.positions[361] - g.positions[1]).norm() < 1e-4);
        assert_eq!(g.triangles().len(), 360);
    }

    #[test]
    fn test_star_is_two_interleaved_triangles() {
        let g = star(&Point3::origin(), &dims(2.0, 4.0));
        let expected = [
            (-2.0, 2.0),
            (0.0, -4.0),
            (2.0, 2.0),
            (-2.0, -2.0),
            (2.0, -2.0),
            (0.0, 4.0),
        ];
        assert_eq!(g.vertex_count(), 6);
        for (v, (x, y)) in g.positions.iter().zip(expected) {
            assert_eq!((v.x, v.y, v.z), (x, y, 0.0));
        }
    }

    #[test]
    fn test_triangle_apex_up() {
        let g = triangle(&Point3::origin(), &dims(2.0, 2.0));
        assert_eq!(g.positions[2], Point3::new(0.0, 1.0, 0.0));
        assert_eq!(g.positions[0].y, -1.0);
    }

    #[test]
    fn test_cube_normals_point_outward() {
        let g = cube(&Point3::origin(), &Dimensions::unit());
        assert_eq!(g.vertex_count(), 36);
        assert_eq!(g.normals.len(), 36);

        for (t, n) in g.positions.chunks_exact(3).zip(g.normals.chunks_exact(3)) {
            let geometric = face_normal(&t[0], &t[1], &t[2]);
            assert!((geometric - n[0]).norm() < 1e-6);
            // outward: the normal points away from the cube center
            let centroid = (t[0].coords + t[1].coords + t[2].coords) / 3.0;
            let center = Vector3::new(0.5, 0.5, 0.5);
            assert!((centroid - center).dot(&n[0]) > 0.0);
        }
    }

    #[test]
    fn test_flat_cube_keeps_unit_normals() {
        let g = cube(&Point3::new(3.0, 4.0, 5.0), &Dimensions::new(2.0, 1e-6, 0.0));
        for n in &g.normals {
            assert!((n.norm() - 1.0).abs() < 1e-6);
        }
        assert_eq!(g.normals[0], Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(g.normals[6], Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_face_normal_of_degenerate_triangle_is_zero() {
        let a = Point3::new(1.0, 1.0, 1.0);
        assert_eq!(face_normal(&a, &a, &Point3::new(2.0, 2.0, 2.0)), Vector3::zeros());
    }

    #[test]
    fn test_generate_dispatches_on_kind() {
        let counts = [
            (ShapeKind::Rectangle, 6),
            (ShapeKind::Triangle, 3),
            (ShapeKind::Circle, 362),
            (ShapeKind::Star, 6),
            (ShapeKind::Cube, 36),
        ];
        for (kind, count) in counts {
            let g = generate(&Shape::new(kind, Color::red()));
            assert_eq!(g.vertex_count(), count, "{}", kind);
        }
    }
}
