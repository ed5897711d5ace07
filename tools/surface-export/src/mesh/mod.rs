//! Mesh loader (OBJ -> vertices + tagged faces)

mod obj;
mod types;

// Re-export public API
pub use obj::{load_obj, parse_obj};
pub use types::{Face, ObjMesh, Vertex};
