//! surface-export - OBJ to libsm64 collision export tool
//!
//! Converts OBJ meshes into `SM64Surface` C arrays.
//!
//! # Usage
//!
//! ```bash
//! # One mesh, written next to it as village1_surfaces.c
//! surface-export convert models/village1.obj
//!
//! # Every .obj in a folder
//! surface-export batch models/ --output collision/
//!
//! # Everything listed in collision.toml
//! surface-export build
//! ```

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use surface_export::{
    batch, convert, interchange, manifest, AxisMap, ConfigOverrides, ConvertConfig,
    MalformedVertexPolicy, OutputArtifact, TagBinding,
};

#[derive(Parser)]
#[command(name = "surface-export")]
#[command(about = "OBJ to SM64Surface collision export tool")]
#[command(version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a single OBJ file
    Convert {
        /// Input OBJ file
        input: PathBuf,

        /// Output .c file (default: <input dir>/<symbol>_surfaces.c)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Base identifier for the array (default: input file stem)
        #[arg(long)]
        symbol: Option<String>,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Convert every OBJ file in a directory
    Batch {
        /// Directory to scan
        dir: PathBuf,

        /// Output directory (default: next to each input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also scan subdirectories
        #[arg(short, long)]
        recursive: bool,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Build collision sources from a manifest file
    Build {
        /// Path to collision.toml manifest
        #[arg(default_value = "collision.toml")]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate manifest without building
    Check {
        /// Path to collision.toml manifest
        #[arg(default_value = "collision.toml")]
        manifest: PathBuf,
    },

    /// Export scaled triangles of an OBJ file as JSON
    Json {
        /// Input OBJ file
        input: PathBuf,

        /// Output .json file (default: input with .json extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Convert a JSON triangle list to C source
    FromJson {
        /// Input JSON file
        input: PathBuf,

        /// Output .c file (default: <input dir>/<symbol>_surfaces.c)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Base identifier for the array (default: input file stem)
        #[arg(long)]
        symbol: Option<String>,

        #[command(flatten)]
        config: ConfigArgs,
    },
}

/// Conversion options shared by the single-file and batch commands
#[derive(Args)]
struct ConfigArgs {
    /// Scale from source units to collision units [default: 50]
    #[arg(short, long)]
    scale: Option<f64>,

    /// Axis map: identity, blender, or e.g. "x,z,-y" [default: blender]
    #[arg(short, long)]
    axis: Option<AxisMap>,

    /// Surface type for faces without a material [default: SURFACE_DEFAULT]
    #[arg(long)]
    surface: Option<String>,

    /// Terrain type [default: TERRAIN_STONE]
    #[arg(long)]
    terrain: Option<String>,

    /// Which field usemtl materials feed [default: surface]
    #[arg(long, value_enum)]
    tag_binding: Option<TagBinding>,

    /// Prefix added to material identifiers
    #[arg(long)]
    tag_prefix: Option<String>,

    /// What to do with unparseable vertex records [default: fail]
    #[arg(long, value_enum)]
    on_malformed_vertex: Option<MalformedVertexPolicy>,
}

impl ConfigArgs {
    fn to_config(&self) -> ConvertConfig {
        let overrides = ConfigOverrides {
            scale: self.scale,
            axis_map: self.axis,
            default_tag: self.surface.clone(),
            default_terrain: self.terrain.clone(),
            on_malformed_vertex: self.on_malformed_vertex,
            tag_binding: self.tag_binding,
            tag_prefix: self.tag_prefix.clone(),
        };
        overrides.apply(&ConvertConfig::default())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    match cli.command {
        Commands::Convert {
            input,
            output,
            symbol,
            config,
        } => {
            let config = ConvertConfig {
                symbol,
                ..config.to_config()
            };
            let artifact = match output {
                Some(output) => convert::convert_to(&input, &output, &config)?,
                None => convert::convert(&input, &config)?,
            };
            print_artifact(&artifact);
        }

        Commands::Batch {
            dir,
            output,
            recursive,
            config,
        } => {
            let config = ConvertConfig {
                output_dir: output,
                ..config.to_config()
            };
            let inputs = batch::collect_obj_files(&dir, recursive)?;
            if inputs.is_empty() {
                tracing::warn!("No .obj files found in {:?}", dir);
                return Ok(());
            }

            let report = batch::convert_batch(&inputs, &config);
            for entry in &report.entries {
                match &entry.result {
                    Ok(artifact) => print_artifact(artifact),
                    Err(e) => eprintln!("  FAILED {}: {}", entry.input.display(), e),
                }
            }
            if !report.is_success() {
                anyhow::bail!(
                    "{} of {} files failed",
                    report.failure_count(),
                    report.entries.len()
                );
            }
        }

        Commands::Build { manifest, output } => {
            tracing::info!("Building collision from {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config)?;
            let artifacts = manifest::build_all(&config, output.as_deref())?;
            for artifact in &artifacts {
                print_artifact(artifact);
            }
            tracing::info!("Build complete!");
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config)?;
            tracing::info!("Manifest is valid!");
        }

        Commands::Json {
            input,
            output,
            config,
        } => {
            let output = output.unwrap_or_else(|| input.with_extension("json"));
            tracing::info!("Exporting {:?} -> {:?}", input, output);
            let count = interchange::export_triangles_json(&input, &output, &config.to_config())?;
            println!("  {} ({} triangles)", output.display(), count);
        }

        Commands::FromJson {
            input,
            output,
            symbol,
            config,
        } => {
            let config = ConvertConfig {
                symbol,
                ..config.to_config()
            };
            let output = output.unwrap_or_else(|| convert::output_path_for(&input, &config));
            let artifact = interchange::convert_triangles_json(&input, &output, &config)?;
            print_artifact(&artifact);
        }
    }

    Ok(())
}

fn print_artifact(artifact: &OutputArtifact) {
    print!(
        "  {} ({} surfaces",
        artifact.path.display(),
        artifact.record_count
    );
    if artifact.clamped_components > 0 {
        print!(", {} clamped components", artifact.clamped_components);
    }
    if artifact.skipped_faces > 0 {
        print!(", {} degenerate faces skipped", artifact.skipped_faces);
    }
    if artifact.skipped_vertices > 0 {
        print!(", {} malformed vertices skipped", artifact.skipped_vertices);
    }
    println!(")");
}
