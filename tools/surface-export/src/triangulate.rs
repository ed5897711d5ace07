//! Fan triangulation of OBJ faces

use std::sync::Arc;

use crate::error::ConversionError;
use crate::mesh::{Face, ObjMesh, Vertex};

/// Three resolved source-space vertices plus the face's material
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
    pub tag: Option<Arc<str>>,
}

/// Split a face into triangles anchored at its first vertex.
///
/// A triangle comes back unchanged; an n-gon yields `n - 2` triangles
/// `(v0, v[i], v[i+1])`. Non-convex polygons produce overlapping slivers,
/// which is acceptable for collision data.
pub fn triangulate_face(
    face: &Face,
    mesh: &ObjMesh,
) -> Result<Vec<Triangle>, ConversionError> {
    let resolved = face
        .indices
        .iter()
        .map(|&index| resolve_vertex(index, face, mesh))
        .collect::<Result<Vec<Vertex>, ConversionError>>()?;

    Ok((1..resolved.len().saturating_sub(1))
        .map(|i| Triangle {
            vertices: [resolved[0], resolved[i], resolved[i + 1]],
            tag: face.tag.clone(),
        })
        .collect())
}

/// Triangulate every face of a mesh, preserving face order.
pub fn triangulate_mesh(mesh: &ObjMesh) -> Result<Vec<Triangle>, ConversionError> {
    let mut triangles = Vec::with_capacity(mesh.faces.len());
    for face in &mesh.faces {
        triangles.extend(triangulate_face(face, mesh)?);
    }
    Ok(triangles)
}

fn resolve_vertex(index: i64, face: &Face, mesh: &ObjMesh) -> Result<Vertex, ConversionError> {
    let slot = usize::try_from(index)
        .ok()
        .and_then(|i| i.checked_sub(1))
        .and_then(|i| mesh.vertices.get(i));

    slot.copied().ok_or_else(|| ConversionError::Index {
        path: mesh.path.clone(),
        line: face.line,
        index,
        vertex_count: mesh.vertices.len(),
    })
}
