//! JSON triangle interchange
//!
//! Two-stage export: OBJ -> JSON list of scaled (not yet quantized)
//! triangles, and JSON -> C source. Useful when triangles are edited or
//! produced by other tools between the two steps.

use std::path::Path;

use crate::codegen::c::{generate_surface_source, SurfaceArray};
use crate::codegen::{build_records, symbol_for};
use crate::config::ConvertConfig;
use crate::convert::OutputArtifact;
use crate::error::ConversionError;
use crate::mesh::load_obj;
use crate::output::write_atomic;
use crate::transform::{quantize_point, scale_point, ClampStats, TransformedTriangle};
use crate::triangulate::triangulate_mesh;

/// Three collision-space points, scaled but not truncated
pub type JsonTriangle = [[f64; 3]; 3];

/// Load, triangulate, remap and scale an OBJ file.
pub fn obj_to_triangles(
    input: &Path,
    config: &ConvertConfig,
) -> Result<Vec<JsonTriangle>, ConversionError> {
    config.validate()?;
    let mesh = load_obj(input, config.on_malformed_vertex)?;
    let triangles = triangulate_mesh(&mesh)?;
    if triangles.is_empty() {
        return Err(ConversionError::NoFaces {
            path: input.to_path_buf(),
        });
    }

    Ok(triangles
        .iter()
        .map(|tri| tri.vertices.map(|v| scale_point(v, config).map(finite_or_saturated)))
        .collect())
}

/// Stand-in for an infinite coordinate; far outside the collision range and
/// still exact when read back from JSON
const SATURATED: f64 = 1e300;

/// JSON has no infinities or NaN: infinities saturate so they still clamp
/// on the way back in, NaN becomes 0.
fn finite_or_saturated(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else if value.is_infinite() {
        SATURATED.copysign(value)
    } else {
        value
    }
}

/// Write the scaled triangles of an OBJ file as pretty-printed JSON.
///
/// Returns the number of triangles written.
pub fn export_triangles_json(
    input: &Path,
    output: &Path,
    config: &ConvertConfig,
) -> Result<usize, ConversionError> {
    let triangles = obj_to_triangles(input, config)?;
    let json = serde_json::to_string_pretty(&triangles).map_err(|source| ConversionError::Json {
        path: output.to_path_buf(),
        source,
    })?;
    write_atomic(output, json.as_bytes())?;

    tracing::info!("Exported {} triangles to {:?}", triangles.len(), output);
    Ok(triangles.len())
}

/// Read a JSON triangle list; every triangle must have exactly three points
/// of three coordinates.
pub fn load_triangles_json(path: &Path) -> Result<Vec<JsonTriangle>, ConversionError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConversionError::io(path, e))?;
    serde_json::from_str(&content).map_err(|source| ConversionError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Quantize a JSON triangle list and write it as C source.
///
/// The list carries no materials, so every record uses the configured
/// default surface and terrain.
pub fn convert_triangles_json(
    input: &Path,
    output: &Path,
    config: &ConvertConfig,
) -> Result<OutputArtifact, ConversionError> {
    config.validate()?;
    let triangles = load_triangles_json(input)?;
    if triangles.is_empty() {
        return Err(ConversionError::NoFaces {
            path: input.to_path_buf(),
        });
    }

    let mut stats = ClampStats::default();
    let transformed: Vec<TransformedTriangle> = triangles
        .iter()
        .map(|tri| TransformedTriangle {
            vertices: tri.map(|v| quantize_point(v, &mut stats)),
            tag: None,
        })
        .collect();
    let records = build_records(&transformed, config);

    let symbol = symbol_for(input, config);
    let source_name = input.file_name().map(|n| n.to_string_lossy().into_owned());
    let source = generate_surface_source(&SurfaceArray {
        symbol: &symbol,
        source_name: source_name.as_deref(),
        includes: &config.includes,
        records: &records,
    })?;
    write_atomic(output, source.as_bytes())?;

    tracing::info!(
        "Converted {:?} -> {:?}: {} surfaces, {} clamped components",
        input,
        output,
        records.len(),
        stats.clamped_components
    );

    Ok(OutputArtifact {
        path: output.to_path_buf(),
        symbol,
        record_count: records.len(),
        clamped_components: stats.clamped_components,
        skipped_faces: 0,
        skipped_vertices: 0,
    })
}
