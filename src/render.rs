//! Renderer seam
//!
//! The simulation never talks to a graphics API. Each frame it emits a list
//! of `DrawCall`s (mesh + model/view/projection) and the host decides how to
//! put them on screen.

use glam::{Mat4, Vec3};

use crate::error::ShatterError;
use crate::mesh::Vertex;

/// What a draw call depicts, so hosts can pick materials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawKind {
    Ground,
    /// The intact object while falling
    Object,
    Fragment,
    Dust,
}

/// One mesh to draw this frame
#[derive(Debug, Clone, Copy)]
pub struct DrawCall<'a> {
    pub kind: DrawKind,
    pub vertices: &'a [Vertex],
    pub indices: &'a [u32],
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
}

/// Host-side drawing backend
pub trait Renderer {
    /// A failed draw is reported back; the frame carries on with the next call
    fn draw(&mut self, call: &DrawCall<'_>) -> Result<(), ShatterError>;
}

/// Model matrix for the intact object at `position`
pub fn object_transform(position: Vec3) -> Mat4 {
    Mat4::from_translation(position)
}

/// Model matrix for a dust mote; the quad is scaled down as its life runs out
pub fn dust_transform(position: Vec3, life_fraction: f32) -> Mat4 {
    let scale = life_fraction.clamp(0.0, 1.0);
    Mat4::from_translation(position) * Mat4::from_scale(Vec3::splat(scale))
}

/// Renderer that records every call it receives
///
/// Useful for headless runs and tests.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<RecordedCall>,
}

/// Owned copy of the interesting parts of a `DrawCall`
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub kind: DrawKind,
    pub vertex_count: usize,
    pub index_count: usize,
    pub model: Mat4,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, kind: DrawKind) -> usize {
        self.calls.iter().filter(|c| c.kind == kind).count()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Renderer for RecordingRenderer {
    fn draw(&mut self, call: &DrawCall<'_>) -> Result<(), ShatterError> {
        self.calls.push(RecordedCall {
            kind: call.kind,
            vertex_count: call.vertices.len(),
            index_count: call.indices.len(),
            model: call.model,
        });
        Ok(())
    }
}
