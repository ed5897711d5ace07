//! Conversion configuration
//!
//! Scale, up-axis convention and surface/terrain naming for one run. All
//! fields have defaults matching the Blender -> libsm64 workflow.

use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ConversionError;

/// Default scale from Blender units to engine units
pub const DEFAULT_SCALE: f64 = 50.0;

/// Default surface type for faces without a material
pub const DEFAULT_SURFACE: &str = "SURFACE_DEFAULT";

/// Default terrain type
pub const DEFAULT_TERRAIN: &str = "TERRAIN_STONE";

/// Headers included at the top of every generated source file
pub const DEFAULT_INCLUDES: [&str; 2] = ["level.h", "../src/decomp/include/surface_terrains.h"];

/// Source coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    fn name(self) -> char {
        match self {
            Axis::X => 'x',
            Axis::Y => 'y',
            Axis::Z => 'z',
        }
    }
}

/// One target component: which source axis feeds it, and whether it is negated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisSource {
    pub axis: Axis,
    pub negate: bool,
}

impl AxisSource {
    pub const fn pos(axis: Axis) -> Self {
        Self {
            axis,
            negate: false,
        }
    }

    pub const fn neg(axis: Axis) -> Self {
        Self { axis, negate: true }
    }
}

/// Signed permutation mapping source space onto collision space.
///
/// Written as three comma-separated signed axis names, e.g. `x,z,-y`, or as
/// one of the presets `identity` and `blender`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct AxisMap {
    targets: [AxisSource; 3],
}

impl AxisMap {
    /// `x,y,z`: coordinates pass through unchanged
    pub const IDENTITY: AxisMap = AxisMap {
        targets: [
            AxisSource::pos(Axis::X),
            AxisSource::pos(Axis::Y),
            AxisSource::pos(Axis::Z),
        ],
    };

    /// `x,z,-y`: Blender's Z-up space to the engine's Y-up space
    pub const BLENDER: AxisMap = AxisMap {
        targets: [
            AxisSource::pos(Axis::X),
            AxisSource::pos(Axis::Z),
            AxisSource::neg(Axis::Y),
        ],
    };

    /// Build a map from the sources of target x, y and z.
    ///
    /// Fails unless every source axis is used exactly once.
    pub fn new(x: AxisSource, y: AxisSource, z: AxisSource) -> Result<Self, ConversionError> {
        let targets = [x, y, z];
        let mut seen = [false; 3];
        for source in &targets {
            let slot = &mut seen[source.axis.index()];
            if *slot {
                return Err(ConversionError::InvalidConfig(format!(
                    "axis map uses source axis '{}' more than once",
                    source.axis.name()
                )));
            }
            *slot = true;
        }
        Ok(Self { targets })
    }

    /// Remap a source-space point into target order.
    pub fn apply(&self, v: [f64; 3]) -> [f64; 3] {
        self.targets.map(|source| {
            let value = v[source.axis.index()];
            if source.negate {
                -value
            } else {
                value
            }
        })
    }
}

impl Default for AxisMap {
    fn default() -> Self {
        Self::BLENDER
    }
}

impl FromStr for AxisMap {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "identity" => return Ok(Self::IDENTITY),
            "blender" => return Ok(Self::BLENDER),
            _ => {}
        }

        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(ConversionError::InvalidConfig(format!(
                "axis map `{}` must name three axes (e.g. `x,z,-y`) or a preset (identity, blender)",
                s
            )));
        }

        let mut sources = [AxisSource::pos(Axis::X); 3];
        for (slot, part) in sources.iter_mut().zip(&parts) {
            *slot = parse_axis_source(part).ok_or_else(|| {
                ConversionError::InvalidConfig(format!(
                    "invalid axis `{}` in axis map `{}`",
                    part, s
                ))
            })?;
        }

        Self::new(sources[0], sources[1], sources[2])
    }
}

impl TryFrom<String> for AxisMap {
    type Error = ConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for AxisMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, source) in self.targets.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            if source.negate {
                write!(f, "-")?;
            }
            write!(f, "{}", source.axis.name())?;
        }
        Ok(())
    }
}

fn parse_axis_source(s: &str) -> Option<AxisSource> {
    let (negate, name) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let axis = match name.to_lowercase().as_str() {
        "x" => Axis::X,
        "y" => Axis::Y,
        "z" => Axis::Z,
        _ => return None,
    };
    Some(AxisSource { axis, negate })
}

/// What to do with a `v` record that cannot be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MalformedVertexPolicy {
    /// Abort the conversion; a dropped vertex would shift every later index
    #[default]
    Fail,
    /// Log a warning and drop the record
    Skip,
}

/// Which output field the `usemtl` material name feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TagBinding {
    /// Material becomes the surface type; terrain uses the default
    #[default]
    Surface,
    /// Material becomes the terrain type; surface uses the default
    Terrain,
    /// Materials are ignored
    None,
}

/// Options for one conversion run
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    /// Multiplier applied after axis remapping
    pub scale: f64,
    pub axis_map: AxisMap,
    /// Surface type for faces with no material (or when materials are not bound to it)
    pub default_tag: String,
    pub default_terrain: String,
    pub on_malformed_vertex: MalformedVertexPolicy,
    pub tag_binding: TagBinding,
    /// Prepended to sanitised material names
    pub tag_prefix: String,
    /// Base identifier for the emitted array; defaults to the input file stem
    pub symbol: Option<String>,
    /// Headers included at the top of the generated file
    pub includes: Vec<String>,
    /// Directory for the generated file; defaults to the input's directory
    pub output_dir: Option<PathBuf>,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            axis_map: AxisMap::default(),
            default_tag: DEFAULT_SURFACE.to_string(),
            default_terrain: DEFAULT_TERRAIN.to_string(),
            on_malformed_vertex: MalformedVertexPolicy::default(),
            tag_binding: TagBinding::default(),
            tag_prefix: String::new(),
            symbol: None,
            includes: DEFAULT_INCLUDES.iter().map(|s| s.to_string()).collect(),
            output_dir: None,
        }
    }
}

impl ConvertConfig {
    /// Reject configurations the pipeline cannot honour.
    pub fn validate(&self) -> Result<(), ConversionError> {
        if !self.scale.is_finite() {
            return Err(ConversionError::InvalidConfig(format!(
                "scale must be finite, got {}",
                self.scale
            )));
        }
        for (field, value) in [
            ("default_tag", &self.default_tag),
            ("default_terrain", &self.default_terrain),
        ] {
            if !crate::codegen::is_c_identifier(value) {
                return Err(ConversionError::InvalidConfig(format!(
                    "{} `{}` is not a valid C identifier",
                    field, value
                )));
            }
        }
        Ok(())
    }
}

/// Partial configuration layered on top of a base [`ConvertConfig`].
///
/// Used for per-mesh manifest entries and for CLI flags.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConfigOverrides {
    #[serde(default)]
    pub scale: Option<f64>,
    #[serde(default)]
    pub axis_map: Option<AxisMap>,
    #[serde(default)]
    pub default_tag: Option<String>,
    #[serde(default)]
    pub default_terrain: Option<String>,
    #[serde(default)]
    pub on_malformed_vertex: Option<MalformedVertexPolicy>,
    #[serde(default)]
    pub tag_binding: Option<TagBinding>,
    #[serde(default)]
    pub tag_prefix: Option<String>,
}

impl ConfigOverrides {
    pub fn apply(&self, base: &ConvertConfig) -> ConvertConfig {
        let mut config = base.clone();
        if let Some(scale) = self.scale {
            config.scale = scale;
        }
        if let Some(axis_map) = self.axis_map {
            config.axis_map = axis_map;
        }
        if let Some(tag) = &self.default_tag {
            config.default_tag = tag.clone();
        }
        if let Some(terrain) = &self.default_terrain {
            config.default_terrain = terrain.clone();
        }
        if let Some(policy) = self.on_malformed_vertex {
            config.on_malformed_vertex = policy;
        }
        if let Some(binding) = self.tag_binding {
            config.tag_binding = binding;
        }
        if let Some(prefix) = &self.tag_prefix {
            config.tag_prefix = prefix.clone();
        }
        config
    }
}
