//! surface-export library
//!
//! Converts OBJ meshes into static `SM64Surface` collision arrays (C source)
//! for libsm64. The pipeline is load -> fan triangulate -> axis remap, scale,
//! truncate and clamp -> serialize. Batch drivers, the CLI and the manifest
//! build all call [`convert()`] (or its in-memory variant) once per file.

pub mod batch;
pub mod codegen;
pub mod config;
pub mod convert;
pub mod error;
pub mod interchange;
pub mod manifest;
pub mod mesh;
pub mod output;
pub mod transform;
pub mod triangulate;

// Re-export key types for conversion
pub use batch::{collect_obj_files, convert_batch, BatchEntry, BatchReport};
pub use codegen::SurfaceRecord;
pub use config::{AxisMap, ConfigOverrides, ConvertConfig, MalformedVertexPolicy, TagBinding};
pub use convert::{convert, convert_to, convert_to_source, ConvertedSurfaces, OutputArtifact};
pub use error::ConversionError;
pub use transform::{ClampStats, TransformedTriangle, COORD_LIMIT};
pub use triangulate::Triangle;
