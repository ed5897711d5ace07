//! OBJ -> SM64Surface C source conversion
//!
//! Loader -> triangulator -> transformer -> serializer. Each call is
//! independent and holds no shared state, so callers may run conversions
//! for distinct files concurrently.

use std::path::{Path, PathBuf};

use crate::codegen::c::{generate_surface_source, SurfaceArray};
use crate::codegen::{array_name, build_records, symbol_for, SurfaceRecord};
use crate::config::ConvertConfig;
use crate::error::ConversionError;
use crate::mesh::{load_obj, ObjMesh};
use crate::output::write_atomic;
use crate::transform::{transform_triangle, ClampStats};
use crate::triangulate::triangulate_mesh;

/// Result of a conversion written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    /// Generated source file
    pub path: PathBuf,
    /// Base identifier used for the array and count names
    pub symbol: String,
    /// Number of surfaces emitted
    pub record_count: usize,
    /// Coordinate components saturated to the 16-bit range
    pub clamped_components: usize,
    /// Faces skipped for having fewer than three vertices
    pub skipped_faces: usize,
    /// Malformed vertices skipped (only under the `skip` policy)
    pub skipped_vertices: usize,
}

/// Result of in-memory conversion
#[derive(Debug, Clone)]
pub struct ConvertedSurfaces {
    pub symbol: String,
    pub records: Vec<SurfaceRecord>,
    /// Complete generated C source
    pub source: String,
    pub clamp_stats: ClampStats,
    pub skipped_faces: usize,
    pub skipped_vertices: usize,
}

/// Run triangulation, transform and tag resolution over a loaded mesh.
pub fn mesh_to_records(
    mesh: &ObjMesh,
    config: &ConvertConfig,
) -> Result<(Vec<SurfaceRecord>, ClampStats), ConversionError> {
    let triangles = triangulate_mesh(mesh)?;
    if triangles.is_empty() {
        return Err(ConversionError::NoFaces {
            path: mesh.path.clone(),
        });
    }

    let mut stats = ClampStats::default();
    let transformed: Vec<_> = triangles
        .iter()
        .map(|tri| transform_triangle(tri, config, &mut stats))
        .collect();

    Ok((build_records(&transformed, config), stats))
}

/// Convert an OBJ file to C source without touching the filesystem
/// beyond reading the input.
pub fn convert_to_source(
    input: &Path,
    config: &ConvertConfig,
) -> Result<ConvertedSurfaces, ConversionError> {
    config.validate()?;

    let mesh = load_obj(input, config.on_malformed_vertex)?;
    let (records, clamp_stats) = mesh_to_records(&mesh, config)?;

    let symbol = symbol_for(input, config);
    let source_name = input.file_name().map(|n| n.to_string_lossy().into_owned());
    let source = generate_surface_source(&SurfaceArray {
        symbol: &symbol,
        source_name: source_name.as_deref(),
        includes: &config.includes,
        records: &records,
    })?;

    Ok(ConvertedSurfaces {
        symbol,
        records,
        source,
        clamp_stats,
        skipped_faces: mesh.skipped_faces,
        skipped_vertices: mesh.skipped_vertices,
    })
}

/// Default location of the generated file: `<dir>/<symbol>_surfaces.c`,
/// where `dir` is the configured output directory or the input's directory.
pub fn output_path_for(input: &Path, config: &ConvertConfig) -> PathBuf {
    let dir = config
        .output_dir
        .clone()
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    dir.join(format!("{}.c", array_name(&symbol_for(input, config))))
}

/// Convert an OBJ file and write the result next to it (or into the
/// configured output directory).
pub fn convert(input: &Path, config: &ConvertConfig) -> Result<OutputArtifact, ConversionError> {
    convert_to(input, &output_path_for(input, config), config)
}

/// Convert an OBJ file and write the result to `output`.
///
/// Nothing is written unless the whole conversion succeeds.
pub fn convert_to(
    input: &Path,
    output: &Path,
    config: &ConvertConfig,
) -> Result<OutputArtifact, ConversionError> {
    let converted = convert_to_source(input, config)?;
    write_atomic(output, converted.source.as_bytes())?;

    tracing::info!(
        "Converted {:?} -> {:?}: {} surfaces, {} clamped components, {} skipped faces",
        input,
        output,
        converted.records.len(),
        converted.clamp_stats.clamped_components,
        converted.skipped_faces
    );

    Ok(OutputArtifact {
        path: output.to_path_buf(),
        symbol: converted.symbol,
        record_count: converted.records.len(),
        clamped_components: converted.clamp_stats.clamped_components,
        skipped_faces: converted.skipped_faces,
        skipped_vertices: converted.skipped_vertices,
    })
}
