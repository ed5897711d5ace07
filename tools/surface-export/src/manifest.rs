//! Manifest parsing and build orchestration
//!
//! Parses collision.toml and converts every listed mesh.

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::de::IgnoredAny;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::codegen::c::generate_extern_header;
use crate::codegen::{array_name, is_c_identifier};
use crate::config::{ConfigOverrides, ConvertConfig};
use crate::convert::{convert_to, OutputArtifact};
use crate::output::write_atomic;

/// Root manifest structure
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub output: OutputConfig,
    /// Settings shared by every mesh
    #[serde(default)]
    pub defaults: ConvertConfig,
    /// Symbol -> source mesh; sorted so builds are reproducible
    #[serde(default)]
    pub meshes: BTreeMap<String, MeshEntry>,
    /// Directory relative paths are resolved against (the manifest's own)
    #[serde(skip)]
    pub root: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    /// Combined extern header, relative to `dir`
    #[serde(default)]
    pub header: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            header: None,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("collision/")
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MeshEntry {
    Simple(PathBuf),
    Detailed {
        path: PathBuf,
        #[serde(flatten)]
        overrides: ConfigOverrides,
        /// Keys not consumed by `overrides`; rejected on load
        #[serde(flatten)]
        unknown: BTreeMap<String, IgnoredAny>,
    },
}

impl MeshEntry {
    pub fn path(&self) -> &Path {
        match self {
            MeshEntry::Simple(p) => p,
            MeshEntry::Detailed { path, .. } => path,
        }
    }

    /// Effective configuration for this entry
    pub fn config(&self, name: &str, defaults: &ConvertConfig) -> ConvertConfig {
        let mut config = match self {
            MeshEntry::Simple(_) => defaults.clone(),
            MeshEntry::Detailed { overrides, .. } => overrides.apply(defaults),
        };
        config.symbol = Some(name.to_string());
        config
    }
}

impl Manifest {
    /// Source path of an entry, resolved against the manifest directory
    pub fn source_path(&self, entry: &MeshEntry) -> PathBuf {
        self.root.join(entry.path())
    }

    /// Output directory, resolved against the manifest directory
    pub fn output_dir(&self, output_override: Option<&Path>) -> PathBuf {
        match output_override {
            Some(dir) => dir.to_path_buf(),
            None => self.root.join(&self.output.dir),
        }
    }
}

/// Load and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    let mut manifest: Manifest = toml::from_str(&content)
        .with_context(|| format!("Failed to parse manifest: {:?}", path))?;
    manifest.root = path.parent().map(Path::to_path_buf).unwrap_or_default();

    for (name, entry) in &manifest.meshes {
        if let MeshEntry::Detailed { unknown, .. } = entry {
            if let Some(key) = unknown.keys().next() {
                anyhow::bail!("Mesh '{}' has unknown key '{}' in {:?}", name, key, path);
            }
        }
    }
    Ok(manifest)
}

/// Validate a manifest without building
pub fn validate(manifest: &Manifest) -> Result<()> {
    if manifest.meshes.is_empty() {
        anyhow::bail!("Manifest lists no meshes");
    }

    for (name, entry) in &manifest.meshes {
        if !is_c_identifier(name) {
            anyhow::bail!("Mesh name '{}' is not a valid C identifier", name);
        }
        let source = manifest.source_path(entry);
        if !source.exists() {
            anyhow::bail!("Mesh '{}' source not found: {:?}", name, source);
        }
        entry
            .config(name, &manifest.defaults)
            .validate()
            .with_context(|| format!("Mesh '{}' has an invalid configuration", name))?;
    }
    Ok(())
}

/// Build all meshes from a manifest.
///
/// Entries are converted independently; one failing mesh does not stop the
/// rest. The combined header (if configured) lists the meshes that
/// succeeded, and the build as a whole fails if any mesh failed.
pub fn build_all(
    manifest: &Manifest,
    output_override: Option<&Path>,
) -> Result<Vec<OutputArtifact>> {
    let output_dir = manifest.output_dir(output_override);
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    let entries: Vec<(&String, &MeshEntry)> = manifest.meshes.iter().collect();
    let results: Vec<_> = entries
        .par_iter()
        .map(|(name, entry)| {
            let source = manifest.source_path(entry);
            let output = output_dir.join(format!("{}.c", array_name(name)));
            tracing::info!("Converting mesh: {} -> {:?}", name, output);
            let config = entry.config(name, &manifest.defaults);
            (name.as_str(), convert_to(&source, &output, &config))
        })
        .collect();

    let mut artifacts = Vec::new();
    let mut failures = Vec::new();
    for (name, result) in results {
        match result {
            Ok(artifact) => artifacts.push(artifact),
            Err(e) => {
                tracing::error!("Mesh '{}' failed: {}", name, e);
                failures.push(format!("{}: {}", name, e));
            }
        }
    }

    if let Some(header) = &manifest.output.header {
        let header_path = output_dir.join(header);
        let symbols: Vec<&str> = artifacts.iter().map(|a| a.symbol.as_str()).collect();
        let contents = generate_extern_header(&symbols).context("Failed to generate header")?;
        tracing::info!("Generating header: {:?}", header_path);
        write_atomic(&header_path, contents.as_bytes())?;
    }

    if !failures.is_empty() {
        anyhow::bail!(
            "{} of {} meshes failed:\n{}",
            failures.len(),
            manifest.meshes.len(),
            failures.join("\n")
        );
    }

    Ok(artifacts)
}
