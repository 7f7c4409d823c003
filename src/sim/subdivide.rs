//! Area-bounded recursive triangle subdivision
//!
//! A triangle larger than the threshold is split 1-to-4 through its edge
//! midpoints until every piece fits. Leaves get a small random jitter per
//! vertex so shard edges don't line up into a perfect grid.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{JITTER_AMPLITUDE, MAX_SUBDIVISION_DEPTH, MIN_TRIANGLE_AREA};
use crate::mesh::{Triangle, Vertex};

/// Subdivision parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Subdivision {
    /// Leaves have at most this area
    pub area_threshold: f32,
    /// Per-axis jitter amplitude for leaf vertices
    pub jitter: f32,
    /// Recursion floor; triangles at this depth are emitted as-is.
    /// Never exceeds `MAX_SUBDIVISION_DEPTH`.
    pub max_depth: u32,
}

impl Default for Subdivision {
    fn default() -> Self {
        Self {
            area_threshold: 0.01,
            jitter: JITTER_AMPLITUDE,
            max_depth: MAX_SUBDIVISION_DEPTH,
        }
    }
}

impl Subdivision {
    pub fn with_threshold(area_threshold: f32) -> Self {
        Self {
            area_threshold,
            ..Default::default()
        }
    }

    /// Split `tri` into leaves, appending them to `out`
    pub fn split_into<R: Rng>(&self, tri: &Triangle, rng: &mut R, out: &mut Vec<Triangle>) {
        self.split_recursive(tri, 0, rng, out);
    }

    /// Split `tri` into a fresh list of leaves
    pub fn split<R: Rng>(&self, tri: &Triangle, rng: &mut R) -> Vec<Triangle> {
        let mut out = Vec::with_capacity(self.estimate_leaves(tri.area()));
        self.split_into(tri, rng, &mut out);
        out
    }

    /// Number of leaves a triangle of `area` produces (jitter aside)
    pub fn estimate_leaves(&self, area: f32) -> usize {
        let mut area = area;
        let mut depth = 0;
        while !self.is_leaf(area, depth) {
            area /= 4.0;
            depth += 1;
        }
        4usize.saturating_pow(depth)
    }

    fn is_leaf(&self, area: f32, depth: u32) -> bool {
        // NaN/inf areas and needle triangles are emitted unsplit
        !area.is_finite()
            || area <= self.area_threshold
            || area < MIN_TRIANGLE_AREA
            || depth >= self.max_depth.min(MAX_SUBDIVISION_DEPTH)
    }

    fn split_recursive<R: Rng>(
        &self,
        tri: &Triangle,
        depth: u32,
        rng: &mut R,
        out: &mut Vec<Triangle>,
    ) {
        if self.is_leaf(tri.area(), depth) {
            out.push(self.jittered(tri, rng));
            return;
        }
        for child in tri.split4() {
            self.split_recursive(&child, depth + 1, rng, out);
        }
    }

    fn jittered<R: Rng>(&self, tri: &Triangle, rng: &mut R) -> Triangle {
        if self.jitter <= 0.0 || !self.jitter.is_finite() {
            return *tri;
        }
        let a = self.jitter;
        let mut jitter = |v: Vertex| Vertex {
            position: v.position
                + Vec3::new(
                    rng.random_range(-a..=a),
                    rng.random_range(-a..=a),
                    rng.random_range(-a..=a),
                ),
            normal: v.normal,
        };
        let [v0, v1, v2] = tri.vertices;
        Triangle::new(jitter(v0), jitter(v1), jitter(v2))
    }
}

/// Subdivide (v0, v1, v2) until every piece is at most `area_threshold`
pub fn subdivide<R: Rng>(
    v0: Vertex,
    v1: Vertex,
    v2: Vertex,
    area_threshold: f32,
    rng: &mut R,
) -> Vec<Triangle> {
    Subdivision::with_threshold(area_threshold).split(&Triangle::new(v0, v1, v2), rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn v(x: f32, y: f32, z: f32) -> Vertex {
        Vertex::new(Vec3::new(x, y, z), Vec3::Z)
    }

    fn unit_tri() -> Triangle {
        // Area 0.5
        Triangle::new(v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(0.0, 1.0, 0.0))
    }

    #[test]
    fn test_small_triangle_is_single_leaf() {
        let mut rng = Pcg32::seed_from_u64(1);
        let out = subdivide(v(0.0, 0.0, 0.0), v(0.1, 0.0, 0.0), v(0.0, 0.1, 0.0), 0.01, &mut rng);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_leaf_count_is_power_of_four() {
        let mut rng = Pcg32::seed_from_u64(2);
        let sub = Subdivision {
            area_threshold: 0.05,
            jitter: 0.0,
            ..Default::default()
        };
        // 0.5 -> 0.125 -> 0.03125: two levels
        let out = sub.split(&unit_tri(), &mut rng);
        assert_eq!(out.len(), 16);
        assert_eq!(sub.estimate_leaves(0.5), 16);
        assert!(out.iter().all(|t| t.area() <= 0.05));
    }

    #[test]
    fn test_area_conserved_without_jitter() {
        let mut rng = Pcg32::seed_from_u64(3);
        let sub = Subdivision {
            area_threshold: 0.001,
            jitter: 0.0,
            ..Default::default()
        };
        let total: f32 = sub.split(&unit_tri(), &mut rng).iter().map(Triangle::area).sum();
        assert!((total - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_jitter_is_bounded() {
        let mut rng = Pcg32::seed_from_u64(4);
        let tri = Triangle::new(v(0.0, 0.0, 0.0), v(0.05, 0.0, 0.0), v(0.0, 0.05, 0.0));
        let out = subdivide(tri.vertices[0], tri.vertices[1], tri.vertices[2], 1.0, &mut rng);
        assert_eq!(out.len(), 1);
        for (orig, moved) in tri.vertices.iter().zip(out[0].vertices.iter()) {
            let d = (moved.position - orig.position).abs();
            assert!(d.max_element() <= JITTER_AMPLITUDE);
            assert_eq!(moved.normal, orig.normal);
        }
    }

    #[test]
    fn test_degenerate_collinear_triangle() {
        let mut rng = Pcg32::seed_from_u64(5);
        let out = subdivide(v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(2.0, 0.0, 0.0), 0.01, &mut rng);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_zero_threshold_hits_depth_floor() {
        let mut rng = Pcg32::seed_from_u64(6);
        let sub = Subdivision {
            area_threshold: 0.0,
            jitter: 0.0,
            max_depth: 3,
        };
        assert_eq!(sub.split(&unit_tri(), &mut rng).len(), 64);
    }

    #[test]
    fn test_configured_depth_cannot_exceed_hard_floor() {
        let sub = Subdivision {
            area_threshold: 0.0,
            jitter: 0.0,
            max_depth: 40,
        };
        assert_eq!(sub.estimate_leaves(1.0), 4usize.pow(MAX_SUBDIVISION_DEPTH));
    }

    #[test]
    fn test_non_finite_triangle_emitted_once() {
        let mut rng = Pcg32::seed_from_u64(7);
        let out = subdivide(v(f32::NAN, 0.0, 0.0), v(1.0, 0.0, 0.0), v(0.0, 1.0, 0.0), 0.01, &mut rng);
        assert_eq!(out.len(), 1);
        let out = subdivide(v(f32::INFINITY, 0.0, 0.0), v(1.0, 0.0, 0.0), v(0.0, 1.0, 0.0), 0.01, &mut rng);
        assert_eq!(out.len(), 1);
    }
}
