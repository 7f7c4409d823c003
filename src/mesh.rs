//! Mesh value types
//!
//! `SourceMesh` is what the importer hands us; `FragmentMesh` is the
//! three-vertex shard each fragment owns. Both are plain data the host
//! renderer can upload directly (`Vertex` is `Pod`).

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Position + normal vertex
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

impl Vertex {
    pub const fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }

    /// Vertex halfway between `self` and `other`, normal re-normalized
    pub fn midpoint(&self, other: &Vertex) -> Vertex {
        Vertex {
            position: (self.position + other.position) * 0.5,
            normal: ((self.normal + other.normal) * 0.5).normalize_or_zero(),
        }
    }
}

/// Area of the triangle (a, b, c)
#[inline]
pub fn triangle_area(a: Vec3, b: Vec3, c: Vec3) -> f32 {
    0.5 * (b - a).cross(c - a).length()
}

/// A triangle as three owned vertices
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub const fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    pub fn area(&self) -> f32 {
        let [a, b, c] = self.vertices;
        triangle_area(a.position, b.position, c.position)
    }

    /// The standard 1-to-4 midpoint split: three corner triangles, then the center one
    pub fn split4(&self) -> [Triangle; 4] {
        let [v0, v1, v2] = self.vertices;
        let m01 = v0.midpoint(&v1);
        let m12 = v1.midpoint(&v2);
        let m20 = v2.midpoint(&v0);
        [
            Triangle::new(v0, m01, m20),
            Triangle::new(v1, m12, m01),
            Triangle::new(v2, m20, m12),
            Triangle::new(m01, m12, m20),
        ]
    }
}

/// Immutable triangle soup supplied by the asset importer
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SourceMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl SourceMesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Number of complete index triples (a trailing partial triple is ignored)
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.triangle_count() == 0
    }

    /// Iterate triangles; `Err(i)` for a triple whose indices fall outside the vertex list
    pub fn triangles(&self) -> impl Iterator<Item = Result<Triangle, usize>> + '_ {
        self.indices.chunks_exact(3).enumerate().map(|(i, idx)| {
            let fetch = |k: u32| self.vertices.get(k as usize).copied();
            match (fetch(idx[0]), fetch(idx[1]), fetch(idx[2])) {
                (Some(a), Some(b), Some(c)) => Ok(Triangle::new(a, b, c)),
                _ => Err(i),
            }
        })
    }
}

/// Index list of every fragment mesh
pub const FRAGMENT_INDICES: [u32; 3] = [0, 1, 2];

/// The three-vertex mesh owned by one fragment
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FragmentMesh {
    vertices: [Vertex; 3],
}

impl FragmentMesh {
    pub fn vertices(&self) -> &[Vertex; 3] {
        &self.vertices
    }

    pub fn indices(&self) -> &'static [u32; 3] {
        &FRAGMENT_INDICES
    }
}

impl From<Triangle> for FragmentMesh {
    fn from(tri: Triangle) -> Self {
        Self {
            vertices: tri.vertices,
        }
    }
}

/// Square ground plane at y = 0 spanning ±`half_extent` on X and Z
pub fn ground_plane(half_extent: f32) -> SourceMesh {
    let up = Vec3::Y;
    let h = half_extent;
    SourceMesh::new(
        vec![
            Vertex::new(Vec3::new(-h, 0.0, -h), up),
            Vertex::new(Vec3::new(h, 0.0, -h), up),
            Vertex::new(Vec3::new(h, 0.0, h), up),
            Vertex::new(Vec3::new(-h, 0.0, h), up),
        ],
        // Counter-clockwise seen from above
        vec![0, 2, 1, 0, 3, 2],
    )
}

/// Small camera-agnostic quad used for each dust particle
pub fn dust_quad(half_size: f32) -> SourceMesh {
    let n = Vec3::Z;
    let s = half_size;
    SourceMesh::new(
        vec![
            Vertex::new(Vec3::new(-s, s, 0.0), n),
            Vertex::new(Vec3::new(s, -s, 0.0), n),
            Vertex::new(Vec3::new(-s, -s, 0.0), n),
            Vertex::new(Vec3::new(s, s, 0.0), n),
        ],
        vec![0, 1, 2, 0, 3, 1],
    )
}
