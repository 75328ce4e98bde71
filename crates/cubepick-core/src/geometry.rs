//! Static cube geometry in two topologies.
//!
//! The picking set is a plain triangle list so one draw call yields primitive
//! indices `0..12`. The textured set is six independent four-vertex strips.
//! Triangles `2 * f` and `2 * f + 1` of the picking set cover the same face as
//! strip `f`.

use std::ops::Range;

use bytemuck::{Pod, Zeroable};

/// Number of triangles in the picking topology.
pub const TRIANGLE_COUNT: u32 = 12;

/// Number of vertices in the picking topology.
pub const PICKING_VERTEX_COUNT: u32 = TRIANGLE_COUNT * 3;

/// Number of cube faces.
pub const FACE_COUNT: usize = 6;

/// Vertices per textured strip.
pub const STRIP_VERTEX_COUNT: u32 = 4;

/// A face of the unit cube, in strip order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    /// `z = +1`
    Front,
    /// `z = -1`
    Back,
    /// `x = +1`
    Right,
    /// `x = -1`
    Left,
    /// `y = +1`
    Top,
    /// `y = -1`
    Bottom,
}

impl Face {
    /// All faces in strip order.
    pub const ALL: [Face; FACE_COUNT] = [
        Face::Front,
        Face::Back,
        Face::Right,
        Face::Left,
        Face::Top,
        Face::Bottom,
    ];

    /// Maps a primitive index to its face, two triangles per face.
    pub fn from_primitive(primitive_id: u32) -> Option<Face> {
        Self::ALL.get((primitive_id / 2) as usize).copied()
    }

    /// Position of this face in [`Face::ALL`] and in the strip buffer.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Outward unit normal.
    pub fn normal(self) -> [f32; 3] {
        match self {
            Face::Front => [0.0, 0.0, 1.0],
            Face::Back => [0.0, 0.0, -1.0],
            Face::Right => [1.0, 0.0, 0.0],
            Face::Left => [-1.0, 0.0, 0.0],
            Face::Top => [0.0, 1.0, 0.0],
            Face::Bottom => [0.0, -1.0, 0.0],
        }
    }

    /// Vertex range of this face's strip in [`STRIP_VERTICES`].
    pub fn strip_vertices(self) -> Range<u32> {
        let first = self.index() as u32 * STRIP_VERTEX_COUNT;
        first..first + STRIP_VERTEX_COUNT
    }

    /// Lowercase name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Face::Front => "front",
            Face::Back => "back",
            Face::Right => "right",
            Face::Left => "left",
            Face::Top => "top",
            Face::Bottom => "bottom",
        }
    }
}

/// Vertex range of one triangle in [`PICKING_VERTICES`].
pub fn triangle_vertices(primitive_id: u32) -> Range<u32> {
    let first = primitive_id * 3;
    first..first + 3
}

/// Position-only vertex of the picking topology.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PickingVertex {
    pub position: [f32; 3],
}

/// Position and texture coordinate of the textured topology.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct TexturedVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

const fn p(x: f32, y: f32, z: f32) -> PickingVertex {
    PickingVertex {
        position: [x, y, z],
    }
}

const fn t(x: f32, y: f32, z: f32, u: f32, v: f32) -> TexturedVertex {
    TexturedVertex {
        position: [x, y, z],
        uv: [u, v],
    }
}

/// Twelve counter-clockwise triangles, two per face, faces in strip order.
pub const PICKING_VERTICES: [PickingVertex; PICKING_VERTEX_COUNT as usize] = [
    // front
    p(1.0, -1.0, 1.0),
    p(1.0, 1.0, 1.0),
    p(-1.0, -1.0, 1.0),
    p(1.0, 1.0, 1.0),
    p(-1.0, 1.0, 1.0),
    p(-1.0, -1.0, 1.0),
    // back
    p(-1.0, -1.0, -1.0),
    p(-1.0, 1.0, -1.0),
    p(1.0, -1.0, -1.0),
    p(1.0, -1.0, -1.0),
    p(-1.0, 1.0, -1.0),
    p(1.0, 1.0, -1.0),
    // right
    p(1.0, 1.0, 1.0),
    p(1.0, -1.0, 1.0),
    p(1.0, -1.0, -1.0),
    p(1.0, 1.0, 1.0),
    p(1.0, -1.0, -1.0),
    p(1.0, 1.0, -1.0),
    // left
    p(-1.0, 1.0, 1.0),
    p(-1.0, -1.0, -1.0),
    p(-1.0, -1.0, 1.0),
    p(-1.0, 1.0, 1.0),
    p(-1.0, 1.0, -1.0),
    p(-1.0, -1.0, -1.0),
    // top
    p(-1.0, 1.0, 1.0),
    p(1.0, 1.0, 1.0),
    p(1.0, 1.0, -1.0),
    p(-1.0, 1.0, 1.0),
    p(1.0, 1.0, -1.0),
    p(-1.0, 1.0, -1.0),
    // bottom
    p(1.0, -1.0, 1.0),
    p(-1.0, -1.0, 1.0),
    p(-1.0, -1.0, -1.0),
    p(1.0, -1.0, 1.0),
    p(-1.0, -1.0, -1.0),
    p(1.0, -1.0, -1.0),
];

/// Six four-vertex strips. Each strip runs `(+u,-v) (+u,+v) (-u,-v) (-u,+v)`
/// across its face with texture coordinates `(1,0) (1,1) (0,0) (0,1)`.
pub const STRIP_VERTICES: [TexturedVertex; FACE_COUNT * STRIP_VERTEX_COUNT as usize] = [
    // front
    t(1.0, -1.0, 1.0, 1.0, 0.0),
    t(1.0, 1.0, 1.0, 1.0, 1.0),
    t(-1.0, -1.0, 1.0, 0.0, 0.0),
    t(-1.0, 1.0, 1.0, 0.0, 1.0),
    // back
    t(-1.0, -1.0, -1.0, 1.0, 0.0),
    t(-1.0, 1.0, -1.0, 1.0, 1.0),
    t(1.0, -1.0, -1.0, 0.0, 0.0),
    t(1.0, 1.0, -1.0, 0.0, 1.0),
    // right
    t(1.0, -1.0, -1.0, 1.0, 0.0),
    t(1.0, 1.0, -1.0, 1.0, 1.0),
    t(1.0, -1.0, 1.0, 0.0, 0.0),
    t(1.0, 1.0, 1.0, 0.0, 1.0),
    // left
    t(-1.0, -1.0, 1.0, 1.0, 0.0),
    t(-1.0, 1.0, 1.0, 1.0, 1.0),
    t(-1.0, -1.0, -1.0, 0.0, 0.0),
    t(-1.0, 1.0, -1.0, 0.0, 1.0),
    // top
    t(1.0, 1.0, 1.0, 1.0, 0.0),
    t(1.0, 1.0, -1.0, 1.0, 1.0),
    t(-1.0, 1.0, 1.0, 0.0, 0.0),
    t(-1.0, 1.0, -1.0, 0.0, 1.0),
    // bottom
    t(1.0, -1.0, -1.0, 1.0, 0.0),
    t(1.0, -1.0, 1.0, 1.0, 1.0),
    t(-1.0, -1.0, -1.0, 0.0, 0.0),
    t(-1.0, -1.0, 1.0, 0.0, 1.0),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    fn on_face(position: [f32; 3], face: Face) -> bool {
        let normal = face.normal();
        dot(position, normal) == 1.0
    }

    #[test]
    fn test_primitive_to_face_pairs() {
        let expected = [
            Face::Front,
            Face::Front,
            Face::Back,
            Face::Back,
            Face::Right,
            Face::Right,
            Face::Left,
            Face::Left,
            Face::Top,
            Face::Top,
            Face::Bottom,
            Face::Bottom,
        ];
        for (primitive_id, face) in expected.iter().enumerate() {
            assert_eq!(Face::from_primitive(primitive_id as u32), Some(*face));
        }
        assert_eq!(Face::from_primitive(TRIANGLE_COUNT), None);
    }

    #[test]
    fn test_picking_triangles_lie_on_matching_strip_face() {
        for primitive_id in 0..TRIANGLE_COUNT {
            let face = Face::from_primitive(primitive_id).unwrap();
            for vertex in triangle_vertices(primitive_id) {
                let position = PICKING_VERTICES[vertex as usize].position;
                assert!(on_face(position, face), "triangle {primitive_id} off {face:?}");
            }
            for vertex in face.strip_vertices() {
                assert!(on_face(STRIP_VERTICES[vertex as usize].position, face));
            }
        }
    }

    #[test]
    fn test_picking_triangles_wind_outward() {
        for primitive_id in 0..TRIANGLE_COUNT {
            let range = triangle_vertices(primitive_id);
            let [a, b, c] = [range.start, range.start + 1, range.start + 2]
                .map(|i| PICKING_VERTICES[i as usize].position);
            let normal = cross(sub(b, a), sub(c, a));
            let face = Face::from_primitive(primitive_id).unwrap();
            assert!(dot(normal, face.normal()) > 0.0, "triangle {primitive_id}");
        }
    }

    #[test]
    fn test_strips_wind_outward() {
        // Odd strip triangles swap their first two vertices, as the rasterizer does.
        for face in Face::ALL {
            let first = face.strip_vertices().start as usize;
            for k in 0..2 {
                let mut tri = [first + k, first + k + 1, first + k + 2]
                    .map(|i| STRIP_VERTICES[i].position);
                if k % 2 == 1 {
                    tri.swap(0, 1);
                }
                let [a, b, c] = tri;
                let normal = cross(sub(b, a), sub(c, a));
                assert!(dot(normal, face.normal()) > 0.0, "{face:?} triangle {k}");
            }
        }
    }

    #[test]
    fn test_face_pairs_cover_whole_face() {
        // Two triangles of a face together touch all four corners.
        for face in Face::ALL {
            let first = face.index() as u32 * 2;
            let mut corners: Vec<[i32; 3]> = (first * 3..first * 3 + 6)
                .map(|i| PICKING_VERTICES[i as usize].position.map(|c| c as i32))
                .collect();
            corners.sort_unstable();
            corners.dedup();
            assert_eq!(corners.len(), 4, "{face:?}");
        }
    }

    #[test]
    fn test_strip_uv_pattern() {
        for face in Face::ALL {
            let uvs: Vec<[f32; 2]> = face
                .strip_vertices()
                .map(|i| STRIP_VERTICES[i as usize].uv)
                .collect();
            assert_eq!(uvs, vec![[1.0, 0.0], [1.0, 1.0], [0.0, 0.0], [0.0, 1.0]]);
        }
    }

    #[test]
    fn test_highlight_range_for_primitive_four() {
        assert_eq!(triangle_vertices(4), 12..15);
        assert_eq!(Face::Right.strip_vertices(), 8..12);
    }

    #[test]
    fn test_vertex_layouts_are_tightly_packed() {
        assert_eq!(std::mem::size_of::<PickingVertex>(), 12);
        assert_eq!(std::mem::size_of::<TexturedVertex>(), 20);
    }
}
