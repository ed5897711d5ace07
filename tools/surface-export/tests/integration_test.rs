//! Integration tests for surface-export
//!
//! Tests the full pipeline: generate test assets -> convert -> verify output


use std::fs;
use std::path::{Path, PathBuf};
use surface_export::{
    convert, convert_batch, convert_to, AxisMap, ConversionError, ConvertConfig, COORD_LIMIT,
};
use tempfile::tempdir;

fn identity_config(scale: f64) -> ConvertConfig {
    ConvertConfig {
        scale,
        axis_map: AxisMap::IDENTITY,
        ..Default::default()
    }
}

/// Quad -> two fan triangles, scaled by 10
#[test]
fn test_quad_end_to_end() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("quad.obj");
    generate_test_assets::generate_quad_obj(&obj_path).expect("Failed to generate OBJ");

    let artifact = convert(&obj_path, &identity_config(10.0)).expect("Conversion failed");

    assert_eq!(artifact.path, dir.path().join("quad_surfaces.c"));
    assert_eq!(artifact.symbol, "quad");
    assert_eq!(artifact.record_count, 2);
    assert_eq!(artifact.clamped_components, 0);

    let source = fs::read_to_string(&artifact.path).expect("Failed to read output");
    let expected = "\
// GENERATED FILE - DO NOT EDIT
// Source: quad.obj
// Surfaces: 2

#include \"level.h\"
#include \"../src/decomp/include/surface_terrains.h\"

const struct SM64Surface quad_surfaces[] = {
    {SURFACE_DEFAULT,0,TERRAIN_STONE,{{0,0,0},{10,0,0},{0,10,0}}},
    {SURFACE_DEFAULT,0,TERRAIN_STONE,{{0,0,0},{0,10,0},{0,0,10}}}
};

const size_t quad_surfaces_count = sizeof(quad_surfaces) / sizeof(quad_surfaces[0]);
";
    assert_eq!(source, expected);
}

/// Bad vertex reference aborts and leaves no file behind
#[test]
fn test_bad_index_produces_no_output() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("broken.obj");
    generate_test_assets::generate_bad_index_obj(&obj_path).expect("Failed to generate OBJ");

    let err = convert(&obj_path, &ConvertConfig::default()).unwrap_err();
    match err {
        ConversionError::Index {
            line,
            index,
            vertex_count,
            ..
        } => {
            assert_eq!(line, 5);
            assert_eq!(index, 99);
            assert_eq!(vertex_count, 4);
        }
        other => panic!("Expected index error, got {other:?}"),
    }

    assert!(!dir.path().join("broken_surfaces.c").exists());
    let leftovers = fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(leftovers, 1, "Only the input should remain");
}

#[test]
fn test_missing_input_is_io_error() {
    let dir = tempdir().expect("Failed to create temp dir");
    let err = convert(&dir.path().join("nope.obj"), &ConvertConfig::default()).unwrap_err();
    assert!(matches!(err, ConversionError::Io { .. }));
}

/// Same input and config -> byte-identical output
#[test]
fn test_conversion_is_deterministic() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("cube.obj");
    generate_test_assets::generate_cube_obj(&obj_path).expect("Failed to generate OBJ");

    let first = dir.path().join("first.c");
    let second = dir.path().join("second.c");
    convert_to(&obj_path, &first, &ConvertConfig::default()).unwrap();
    convert_to(&obj_path, &second, &ConvertConfig::default()).unwrap();

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

/// Materials become per-face surface types, in face order
#[test]
fn test_cube_materials() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("cube.obj");
    generate_test_assets::generate_cube_obj(&obj_path).expect("Failed to generate OBJ");

    let converted =
        surface_export::convert_to_source(&obj_path, &identity_config(100.0)).unwrap();

    assert_eq!(converted.records.len(), 12);
    assert!(converted.records[..10].iter().all(|r| r.surface == "STONE"));
    assert!(converted.records[10..].iter().all(|r| r.surface == "GRASS_001"));
    assert!(converted.records.iter().all(|r| r.terrain == "TERRAIN_STONE"));

    // Top face sits at y = 0.5 * 100
    for record in &converted.records[10..] {
        assert!(record.vertices.iter().all(|v| v[1] == 50));
    }
}

/// Saturation is silent and counted
#[test]
fn test_huge_mesh_is_clamped() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("huge.obj");
    generate_test_assets::generate_huge_obj(&obj_path).expect("Failed to generate OBJ");

    let converted =
        surface_export::convert_to_source(&obj_path, &ConvertConfig::default()).unwrap();
    assert_eq!(converted.clamp_stats.clamped_components, 3);
    assert_eq!(
        converted.records[0].vertices[0],
        [COORD_LIMIT, COORD_LIMIT, COORD_LIMIT]
    );
    // Blender convention: (x, y, z) -> (x, z, -y)
    assert_eq!(converted.records[0].vertices[2], [50, 50, -50]);
}

fn write_batch_inputs(dir: &Path) -> Vec<PathBuf> {
    let a = dir.join("a.obj");
    let b = dir.join("b.obj");
    let c = dir.join("c.obj");
    generate_test_assets::generate_quad_obj(&a).unwrap();
    generate_test_assets::generate_bad_index_obj(&b).unwrap();
    generate_test_assets::generate_cube_obj(&c).unwrap();
    vec![a, b, c]
}

/// One broken file does not stop the others, whatever the order
#[test]
fn test_batch_collects_independent_results() {
    let dir = tempdir().expect("Failed to create temp dir");
    let inputs = write_batch_inputs(dir.path());

    for order in [inputs.clone(), inputs.iter().rev().cloned().collect()] {
        let report = convert_batch(&order, &ConvertConfig::default());
        assert_eq!(report.entries.len(), 3);
        assert_eq!(report.success_count(), 2);
        assert_eq!(report.failure_count(), 1);
        assert!(!report.is_success());

        let (failed, _) = report.failed().next().unwrap();
        assert_eq!(failed, dir.path().join("b.obj"));

        for (entry, input) in report.entries.iter().zip(&order) {
            assert_eq!(&entry.input, input);
        }
    }

    assert!(dir.path().join("a_surfaces.c").exists());
    assert!(!dir.path().join("b_surfaces.c").exists());
    assert!(dir.path().join("c_surfaces.c").exists());
}

/// CLI: convert a single file
#[test]
fn test_cli_convert() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("quad.obj");
    let out_path = dir.path().join("gen/level.c");
    generate_test_assets::generate_quad_obj(&obj_path).unwrap();

    let status = std::process::Command::new(env!("CARGO_BIN_EXE_surface-export"))
        .args([
            "convert",
            obj_path.to_str().unwrap(),
            "-o",
            out_path.to_str().unwrap(),
            "--scale",
            "10",
            "--axis",
            "identity",
            "--symbol",
            "village1",
            "--terrain",
            "TERRAIN_SNOW",
        ])
        .status()
        .expect("Failed to run surface-export");
    assert!(status.success(), "surface-export convert command failed");

    let source = fs::read_to_string(&out_path).unwrap();
    assert!(source.contains("const struct SM64Surface village1_surfaces[] = {"));
    assert!(source.contains("{SURFACE_DEFAULT,0,TERRAIN_SNOW,{{0,0,0},{10,0,0},{0,10,0}}}"));
}

/// CLI: a failing conversion exits non-zero
#[test]
fn test_cli_convert_failure() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("broken.obj");
    generate_test_assets::generate_bad_index_obj(&obj_path).unwrap();

    let output = std::process::Command::new(env!("CARGO_BIN_EXE_surface-export"))
        .args(["convert", obj_path.to_str().unwrap()])
        .output()
        .expect("Failed to run surface-export");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("vertex 99"));
}

/// CLI: batch over a directory reports the broken file and fails
#[test]
fn test_cli_malformed_vertex_policy() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("noisy.obj");
    std::fs::write(
        &obj_path,
        "v 0 0 0\nv 1 0 0\nv 0 1 0\nv nan? 0\nf 1 2 3\n",
    )
    .unwrap();
    let run = |policy: &str| {
        std::process::Command::new(env!("CARGO_BIN_EXE_surface-export"))
            .args(["convert", obj_path.to_str().unwrap(), "--on-malformed-vertex", policy])
            .output()
            .expect("Failed to run surface-export")
    };

    assert!(!run("fail").status.success());
    assert!(!dir.path().join("noisy_surfaces.c").exists());

    let output = run("skip");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("1 malformed vertices skipped"));
    assert!(dir.path().join("noisy_surfaces.c").exists());
}

#[test]
fn test_cli_batch() {
    let dir = tempdir().expect("Failed to create temp dir");
    let models = dir.path().join("models");
    fs::create_dir(&models).unwrap();
    write_batch_inputs(&models);
    let out_dir = dir.path().join("collision");

    let output = std::process::Command::new(env!("CARGO_BIN_EXE_surface-export"))
        .args([
            "batch",
            models.to_str().unwrap(),
            "-o",
            out_dir.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to run surface-export");

    assert!(!output.status.success());
    assert!(out_dir.join("a_surfaces.c").exists());
    assert!(out_dir.join("c_surfaces.c").exists());
    assert!(!out_dir.join("b_surfaces.c").exists());
}
