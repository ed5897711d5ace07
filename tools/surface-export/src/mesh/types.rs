//! Types produced by the mesh loader

use std::path::PathBuf;
use std::sync::Arc;

/// Source-space position
pub type Vertex = [f64; 3];

/// A polygon as written in the source file
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    /// 1-based vertex indices, negative indices already made absolute.
    /// Not range-checked; the triangulator validates them.
    pub indices: Vec<i64>,
    /// Material active when the face was declared (`usemtl`)
    pub tag: Option<Arc<str>>,
    /// 1-based source line
    pub line: usize,
}

/// Result of loading one OBJ file
#[derive(Debug, Clone, Default)]
pub struct ObjMesh {
    /// Source path, used in diagnostics
    pub path: PathBuf,
    /// Vertices in file order; face index `n` refers to `vertices[n - 1]`
    pub vertices: Vec<Vertex>,
    /// Faces in file order
    pub faces: Vec<Face>,
    /// Faces dropped for having fewer than three indices
    pub skipped_faces: usize,
    /// Malformed vertex records dropped under the `skip` policy
    pub skipped_vertices: usize,
}
