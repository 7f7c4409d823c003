//! Error types
//!
//! Only loaders and the renderer collaborator can fail. The host-facing
//! `GlassSimulation` absorbs every error into a log line.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShatterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("OBJ parse error in {}: {message}", .path.display())]
    ObjParse { path: PathBuf, message: String },
    #[error("model {} contains no triangles", .0.display())]
    EmptyScene(PathBuf),
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
    #[error("render error: {0}")]
    Render(String),
}

impl ShatterError {
    /// True for failures that leave a drawable absent (asset could not be loaded)
    pub fn is_resource_load_failure(&self) -> bool {
        matches!(
            self,
            ShatterError::Io(_) | ShatterError::ObjParse { .. } | ShatterError::EmptyScene(_)
        )
    }
}
