//! OBJ parsing

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use super::types::{Face, ObjMesh, Vertex};
use crate::config::MalformedVertexPolicy;
use crate::error::ConversionError;

/// Load an OBJ file from disk
pub fn load_obj(input: &Path, policy: MalformedVertexPolicy) -> Result<ObjMesh, ConversionError> {
    let file = File::open(input).map_err(|e| ConversionError::io(input, e))?;
    parse_obj(BufReader::new(file), input, policy)
}

/// Parse OBJ text.
///
/// Only `v`, `f` and `usemtl` records are interpreted; everything else
/// (normals, UVs, groups, smoothing, `mtllib`, comments) is ignored.
/// `path` is only used for diagnostics.
pub fn parse_obj<R: BufRead>(
    reader: R,
    path: &Path,
    policy: MalformedVertexPolicy,
) -> Result<ObjMesh, ConversionError> {
    let mut mesh = ObjMesh {
        path: path.to_path_buf(),
        ..Default::default()
    };
    let mut current_tag: Option<Arc<str>> = None;

    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line.map_err(|e| ConversionError::io(path, e))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };

        match keyword {
            "v" => match parse_vertex(parts) {
                Ok(v) => mesh.vertices.push(v),
                Err(reason) => match policy {
                    MalformedVertexPolicy::Fail => {
                        return Err(parse_error(path, line_no, line, reason));
                    }
                    MalformedVertexPolicy::Skip => {
                        tracing::warn!(
                            "{}:{}: skipping malformed vertex ({}): `{}`",
                            path.display(),
                            line_no,
                            reason,
                            line
                        );
                        mesh.skipped_vertices += 1;
                    }
                },
            },
            "f" => {
                let indices = parts
                    .map(|token| resolve_face_token(token, mesh.vertices.len()))
                    .collect::<Result<Vec<i64>, String>>()
                    .map_err(|reason| parse_error(path, line_no, line, reason))?;

                if indices.len() < 3 {
                    tracing::warn!(
                        "{}:{}: skipping degenerate face with {} vertices",
                        path.display(),
                        line_no,
                        indices.len()
                    );
                    mesh.skipped_faces += 1;
                    continue;
                }

                mesh.faces.push(Face {
                    indices,
                    tag: current_tag.clone(),
                    line: line_no,
                });
            }
            "usemtl" => {
                let name = line[keyword.len()..].trim();
                if name.is_empty() {
                    return Err(parse_error(
                        path,
                        line_no,
                        line,
                        "usemtl without a material name".to_string(),
                    ));
                }
                tracing::debug!("{}:{}: using material {}", path.display(), line_no, name);
                current_tag = Some(Arc::from(name));
            }
            _ => {}
        }
    }

    Ok(mesh)
}

/// Parse the fields after `v`: three coordinates, then optional `w` or
/// vertex colour components which are validated and ignored.
fn parse_vertex<'a>(fields: impl Iterator<Item = &'a str>) -> Result<Vertex, String> {
    let values = fields
        .map(|f| {
            f.parse::<f64>()
                .map_err(|_| format!("invalid vertex coordinate `{}`", f))
        })
        .collect::<Result<Vec<f64>, String>>()?;

    match values[..] {
        [x, y, z, ..] => Ok([x, y, z]),
        _ => Err(format!(
            "vertex needs 3 coordinates, found {}",
            values.len()
        )),
    }
}

/// Parse a face token (`v`, `v/vt`, `v/vt/vn` or `v//vn`) into an absolute
/// 1-based vertex index. Negative indices count back from the vertices
/// declared so far: `-1` is the most recent one.
fn resolve_face_token(token: &str, vertex_count: usize) -> Result<i64, String> {
    let lead = token.split('/').next().unwrap_or(token);
    let index: i64 = lead
        .parse()
        .map_err(|_| format!("invalid face index `{}`", token))?;

    if index < 0 {
        Ok(vertex_count as i64 + index + 1)
    } else {
        Ok(index)
    }
}

fn parse_error(path: &Path, line: usize, content: &str, reason: String) -> ConversionError {
    ConversionError::Parse {
        path: path.to_path_buf(),
        line,
        content: content.to_string(),
        reason,
    }
}
