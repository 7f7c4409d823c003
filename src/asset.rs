//! Model import
//!
//! The simulation only needs triangle soups with positions and normals.
//! `AssetImporter` is the seam; `ObjImporter` reads Wavefront OBJ files and
//! `MemoryImporter` hands back meshes built in code.

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec3;
use wavefront_obj::obj;

use crate::error::ShatterError;
use crate::mesh::{SourceMesh, Vertex};

/// Loads a model as one or more source meshes
pub trait AssetImporter {
    /// Fails on missing files, unparsable data, or a scene without triangles
    fn import(&self, path: &Path) -> Result<Vec<SourceMesh>, ShatterError>;
}

/// Wavefront OBJ importer
///
/// Each geometry group of each object becomes one `SourceMesh`. Polygons
/// are fan-triangulated, missing normals become zero vectors.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjImporter;

impl ObjImporter {
    pub fn parse_str(&self, source: &str, path: &Path) -> Result<Vec<SourceMesh>, ShatterError> {
        let obj_set = obj::parse(fan_triangulate(source)).map_err(|e| ShatterError::ObjParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut meshes = Vec::new();
        for object in &obj_set.objects {
            for geometry in &object.geometry {
                let mesh = geometry_to_mesh(object, geometry);
                if !mesh.is_empty() {
                    meshes.push(mesh);
                }
            }
        }

        if meshes.is_empty() {
            return Err(ShatterError::EmptyScene(path.to_path_buf()));
        }
        log::info!(
            "Loaded {}: {} meshes, {} triangles",
            path.display(),
            meshes.len(),
            meshes.iter().map(SourceMesh::triangle_count).sum::<usize>()
        );
        Ok(meshes)
    }
}

impl AssetImporter for ObjImporter {
    fn import(&self, path: &Path) -> Result<Vec<SourceMesh>, ShatterError> {
        let source = fs::read_to_string(path)?;
        self.parse_str(&source, path)
    }
}

fn geometry_to_mesh(object: &obj::Object, geometry: &obj::Geometry) -> SourceMesh {
    let position = |i: usize| object.vertices.get(i).map(|v| Vec3::new(v.x as f32, v.y as f32, v.z as f32));
    let normal = |i: Option<usize>| {
        i.and_then(|i| object.normals.get(i))
            .map(|n| Vec3::new(n.x as f32, n.y as f32, n.z as f32))
            .unwrap_or(Vec3::ZERO)
    };

    let mut vertices = Vec::new();
    for shape in &geometry.shapes {
        let obj::Primitive::Triangle(a, b, c) = &shape.primitive else {
            continue;
        };
        let corners = [*a, *b, *c].map(|(v, _, n)| position(v).map(|p| Vertex::new(p, normal(n))));
        match corners {
            [Some(a), Some(b), Some(c)] => vertices.extend([a, b, c]),
            _ => log::warn!("Object {} references a missing vertex, face skipped", object.name),
        }
    }

    let indices = (0..vertices.len() as u32).collect();
    SourceMesh::new(vertices, indices)
}

/// Split every `f` line with more than three corners into a triangle fan
fn fan_triangulate(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 4);
    for line in input.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("f ") || trimmed.starts_with("f\t") {
            let corners: Vec<&str> = trimmed.split_whitespace().skip(1).collect();
            if corners.len() > 3 {
                for pair in corners[1..].windows(2) {
                    out.push_str(&format!("f {} {} {}\n", corners[0], pair[0], pair[1]));
                }
                continue;
            }
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Importer that returns meshes already in memory, whatever the path
#[derive(Debug, Clone, Default)]
pub struct MemoryImporter {
    meshes: Vec<SourceMesh>,
}

impl MemoryImporter {
    pub fn new(meshes: Vec<SourceMesh>) -> Self {
        Self { meshes }
    }
}

impl AssetImporter for MemoryImporter {
    fn import(&self, path: &Path) -> Result<Vec<SourceMesh>, ShatterError> {
        if self.meshes.iter().all(SourceMesh::is_empty) {
            return Err(ShatterError::EmptyScene(PathBuf::from(path)));
        }
        Ok(self.meshes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TETRA: &str = "\
o tetra
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
v 0.0 0.0 1.0
vn 0.0 0.0 -1.0
f 1//1 3//1 2//1
f 1 2 4
f 1 4 3
f 2 3 4
";

    #[test]
    fn test_parse_triangles() {
        let meshes = ObjImporter.parse_str(TETRA, Path::new("tetra.obj")).unwrap();
        assert_eq!(meshes.len(), 1);
        assert_eq!(meshes[0].triangle_count(), 4);
        assert_eq!(meshes[0].vertices[0].normal, Vec3::new(0.0, 0.0, -1.0));
        // Faces without normals get zero normals
        assert_eq!(meshes[0].vertices[3].normal, Vec3::ZERO);
    }

    #[test]
    fn test_quad_is_fan_triangulated() {
        let quad = "\
o quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
";
        let meshes = ObjImporter.parse_str(quad, Path::new("quad.obj")).unwrap();
        assert_eq!(meshes[0].triangle_count(), 2);
        let area: f32 = meshes[0].triangles().map(|t| t.unwrap().area()).sum();
        assert!((area - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_scene_is_an_error() {
        let err = ObjImporter.parse_str("v 0 0 0\n", Path::new("empty.obj")).unwrap_err();
        assert!(matches!(err, ShatterError::EmptyScene(_)));
        assert!(err.is_resource_load_failure());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ObjImporter.import(Path::new("definitely/not/here.obj")).unwrap_err();
        assert!(matches!(err, ShatterError::Io(_)));
        assert!(err.is_resource_load_failure());
    }

    #[test]
    fn test_memory_importer() {
        assert!(MemoryImporter::default().import(Path::new("x")).is_err());
        let mesh = crate::mesh::ground_plane(1.0);
        let meshes = MemoryImporter::new(vec![mesh.clone()]).import(Path::new("x")).unwrap();
        assert_eq!(meshes, vec![mesh]);
    }
}
