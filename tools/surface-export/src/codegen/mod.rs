//! Surface serializer
//!
//! Turns transformed triangles into `SM64Surface` records and renders them
//! as C source. Output depends only on the input records, so identical
//! meshes always produce byte-identical files.

pub mod c;

use std::fmt;
use std::path::Path;

use crate::config::{ConvertConfig, TagBinding};
use crate::transform::TransformedTriangle;

/// Value of the reserved force/attribute field; the exporter never sets it
pub const SURFACE_ATTRIBUTE: i32 = 0;

/// One `SM64Surface` initializer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceRecord {
    pub surface: String,
    pub attribute: i32,
    pub terrain: String,
    pub vertices: [[i32; 3]; 3],
}

impl fmt::Display for SurfaceRecord {
    /// `{SURFACE,ATTR,TERRAIN,{{x0,y0,z0},{x1,y1,z1},{x2,y2,z2}}}`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{},{},{},{{", self.surface, self.attribute, self.terrain)?;
        for (i, [x, y, z]) in self.vertices.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{{{},{},{}}}", x, y, z)?;
        }
        write!(f, "}}}}")
    }
}

/// Build records in triangle order, resolving material tags per
/// [`TagBinding`].
pub fn build_records(triangles: &[TransformedTriangle], config: &ConvertConfig) -> Vec<SurfaceRecord> {
    triangles
        .iter()
        .map(|tri| {
            let material = tri
                .tag
                .as_deref()
                .map(|name| material_identifier(name, &config.tag_prefix))
                .filter(|ident| !ident.is_empty());

            let (surface, terrain) = match (config.tag_binding, material) {
                (TagBinding::Surface, Some(tag)) => (tag, config.default_terrain.clone()),
                (TagBinding::Terrain, Some(tag)) => (config.default_tag.clone(), tag),
                _ => (config.default_tag.clone(), config.default_terrain.clone()),
            };

            SurfaceRecord {
                surface,
                attribute: SURFACE_ATTRIBUTE,
                terrain,
                vertices: tri.vertices,
            }
        })
        .collect()
}

/// Replace every character that cannot appear in a C identifier with `_`,
/// and prefix `_` if the result would start with a digit.
pub fn sanitize_identifier(name: &str) -> String {
    let mut ident: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

/// Material name -> upper-case enum-style identifier, e.g.
/// `"grass.001"` with prefix `"SURFACE_"` -> `SURFACE_GRASS_001`.
pub fn material_identifier(name: &str, prefix: &str) -> String {
    if name.trim().is_empty() {
        return String::new();
    }
    sanitize_identifier(&format!("{}{}", prefix, name.trim())).to_uppercase()
}

/// Whether `s` is usable verbatim as a C identifier
pub fn is_c_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Base identifier for an input: the configured symbol, or the file stem.
pub fn symbol_for(input: &Path, config: &ConvertConfig) -> String {
    let raw = match &config.symbol {
        Some(symbol) => symbol.clone(),
        None => input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };

    let ident = sanitize_identifier(&raw);
    if ident.is_empty() {
        "level".to_string()
    } else {
        ident
    }
}

/// Name of the generated array for a symbol
pub fn array_name(symbol: &str) -> String {
    format!("{}_surfaces", symbol)
}

/// Name of the generated element-count constant for a symbol
pub fn count_name(symbol: &str) -> String {
    format!("{}_surfaces_count", symbol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn tri(tag: Option<&str>) -> TransformedTriangle {
        TransformedTriangle {
            vertices: [[0, 0, 0], [10, 0, 0], [0, 10, -5]],
            tag: tag.map(Arc::from),
        }
    }

    #[test]
    fn test_record_format() {
        let record = SurfaceRecord {
            surface: "SURFACE_DEFAULT".to_string(),
            attribute: 0,
            terrain: "TERRAIN_SNOW".to_string(),
            vertices: [[1, 2, 3], [-4, 5, 6], [7, 8, -32767]],
        };
        assert_eq!(
            record.to_string(),
            "{SURFACE_DEFAULT,0,TERRAIN_SNOW,{{1,2,3},{-4,5,6},{7,8,-32767}}}"
        );
    }

    #[test]
    fn test_sanitize_identifier() {
        assert_eq!(sanitize_identifier("Grass Top"), "Grass_Top");
        assert_eq!(sanitize_identifier("mat.001"), "mat_001");
        assert_eq!(sanitize_identifier("1st-floor"), "_1st_floor");
        assert_eq!(sanitize_identifier("snö"), "sn_");
        assert_eq!(sanitize_identifier("already_ok"), "already_ok");
    }

    #[test]
    fn test_material_identifier() {
        assert_eq!(material_identifier("grass.001", ""), "GRASS_001");
        assert_eq!(material_identifier("grass", "surface_"), "SURFACE_GRASS");
        assert_eq!(material_identifier("9lives", ""), "_9LIVES");
        assert_eq!(material_identifier("   ", "SURFACE_"), "");
    }

    #[test]
    fn test_is_c_identifier() {
        assert!(is_c_identifier("SURFACE_DEFAULT"));
        assert!(is_c_identifier("_x1"));
        assert!(!is_c_identifier(""));
        assert!(!is_c_identifier("1abc"));
        assert!(!is_c_identifier("a-b"));
    }

    #[test]
    fn test_symbol_for() {
        let config = ConvertConfig::default();
        assert_eq!(symbol_for(&PathBuf::from("models/village1.obj"), &config), "village1");
        assert_eq!(symbol_for(&PathBuf::from("3 bridges.obj"), &config), "_3_bridges");

        let config = ConvertConfig {
            symbol: Some("beach".to_string()),
            ..Default::default()
        };
        assert_eq!(symbol_for(&PathBuf::from("whatever.obj"), &config), "beach");
        assert_eq!(array_name("beach"), "beach_surfaces");
        assert_eq!(count_name("beach"), "beach_surfaces_count");
    }

    #[test]
    fn test_material_binds_to_surface_by_default() {
        let config = ConvertConfig::default();
        let records = build_records(&[tri(Some("ice")), tri(None)], &config);
        assert_eq!(records[0].surface, "ICE");
        assert_eq!(records[0].terrain, "TERRAIN_STONE");
        assert_eq!(records[1].surface, "SURFACE_DEFAULT");
        assert!(records.iter().all(|r| r.attribute == SURFACE_ATTRIBUTE));
    }

    #[test]
    fn test_material_binds_to_terrain() {
        let config = ConvertConfig {
            tag_binding: TagBinding::Terrain,
            tag_prefix: "TERRAIN_".to_string(),
            ..Default::default()
        };
        let records = build_records(&[tri(Some("snow"))], &config);
        assert_eq!(records[0].surface, "SURFACE_DEFAULT");
        assert_eq!(records[0].terrain, "TERRAIN_SNOW");
    }

    #[test]
    fn test_material_ignored() {
        let config = ConvertConfig {
            tag_binding: TagBinding::None,
            ..Default::default()
        };
        let records = build_records(&[tri(Some("snow"))], &config);
        assert_eq!(records[0].surface, "SURFACE_DEFAULT");
        assert_eq!(records[0].terrain, "TERRAIN_STONE");
    }
}
