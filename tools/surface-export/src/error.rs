//! Conversion error taxonomy
//!
//! Structural problems (unparseable lines, dangling vertex references,
//! unreadable files) abort the conversion of a single file. Recoverable
//! conditions such as degenerate faces and clamped coordinates are not
//! errors; they are counted on [`crate::OutputArtifact`].

use std::path::PathBuf;

/// Error raised while converting one mesh into a surface array.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// A line of the source mesh could not be parsed.
    #[error("{}:{line}: {reason}: `{content}`", .path.display())]
    Parse {
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// Raw line content (trimmed)
        content: String,
        reason: String,
    },

    /// A face references a vertex outside `[1, vertex_count]`.
    #[error(
        "{}:{line}: face references vertex {index}, but only {vertex_count} vertices are defined",
        .path.display()
    )]
    Index {
        path: PathBuf,
        line: usize,
        /// The index after negative-index resolution
        index: i64,
        vertex_count: usize,
    },

    /// The mesh produced no triangles at all.
    #[error("{}: no faces found (is the model triangulated and exported with faces?)", .path.display())]
    NoFaces { path: PathBuf },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to format generated source: {0}")]
    Format(#[from] std::fmt::Error),

    #[error("{}: invalid triangle JSON: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ConversionError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
