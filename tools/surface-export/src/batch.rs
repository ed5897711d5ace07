//! Batch conversion
//!
//! A failure in one file never stops the others: every input gets its own
//! result, reported in input order.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::config::ConvertConfig;
use crate::convert::{convert_to, output_path_for, OutputArtifact};
use crate::error::ConversionError;

/// Outcome for one input file
#[derive(Debug)]
pub struct BatchEntry {
    pub input: PathBuf,
    pub result: Result<OutputArtifact, ConversionError>,
}

/// Outcome of a whole batch
#[derive(Debug, Default)]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &OutputArtifact> {
        self.entries.iter().filter_map(|e| e.result.as_ref().ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = (&Path, &ConversionError)> {
        self.entries
            .iter()
            .filter_map(|e| e.result.as_ref().err().map(|err| (e.input.as_path(), err)))
    }

    pub fn success_count(&self) -> usize {
        self.succeeded().count()
    }

    pub fn failure_count(&self) -> usize {
        self.failed().count()
    }

    pub fn is_success(&self) -> bool {
        self.failure_count() == 0
    }
}

/// Find `.obj` files (case-insensitive) under `dir`, sorted by path.
pub fn collect_obj_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>, ConversionError> {
    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).max_depth(max_depth) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            ConversionError::io(path, e.into())
        })?;

        let is_obj = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("obj"));

        if entry.file_type().is_file() && is_obj {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

/// Convert every input independently and in parallel.
///
/// Inputs that would write the same output file (`Level-1.obj` and
/// `Level_1.obj` both map to `Level_1_surfaces.c`) are not converted; each
/// of them gets an error naming the others.
pub fn convert_batch(inputs: &[PathBuf], config: &ConvertConfig) -> BatchReport {
    let outputs: Vec<PathBuf> = inputs
        .iter()
        .map(|input| output_path_for(input, config))
        .collect();

    let mut claims: HashMap<&Path, Vec<&Path>> = HashMap::new();
    for (input, output) in inputs.iter().zip(&outputs) {
        claims.entry(output.as_path()).or_default().push(input);
    }

    // Convert in parallel; collect() keeps input order
    let entries = inputs
        .par_iter()
        .zip(outputs.par_iter())
        .map(|(input, output)| {
            let result = match claims.get(output.as_path()) {
                Some(owners) if owners.len() > 1 => Err(output_collision(input, output, owners)),
                _ => convert_to(input, output, config),
            };
            BatchEntry {
                input: input.clone(),
                result,
            }
        })
        .collect();

    let report = BatchReport { entries };
    tracing::info!(
        "Batch complete: {} converted, {} failed",
        report.success_count(),
        report.failure_count()
    );
    report
}

fn output_collision(input: &Path, output: &Path, owners: &[&Path]) -> ConversionError {
    let others: Vec<String> = owners
        .iter()
        .filter(|owner| **owner != input)
        .map(|owner| format!("{:?}", owner))
        .collect();
    ConversionError::InvalidConfig(format!(
        "{:?} and {} would both be written to {:?}",
        input,
        others.join(", "),
        output
    ))
}
