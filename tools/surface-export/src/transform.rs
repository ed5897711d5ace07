//! Source space -> collision space
//!
//! Axis remap, scale, truncate toward zero, then saturate to the signed
//! 16-bit range the engine stores collision vertices in.

use std::sync::Arc;

use crate::config::ConvertConfig;
use crate::triangulate::Triangle;

/// Largest magnitude a collision coordinate may have
pub const COORD_LIMIT: i32 = 0x7FFF;

/// Triangle in integer collision space
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedTriangle {
    pub vertices: [[i32; 3]; 3],
    pub tag: Option<Arc<str>>,
}

/// Saturation counters for one conversion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClampStats {
    /// Components that fell outside `[-COORD_LIMIT, COORD_LIMIT]`
    pub clamped_components: usize,
}

/// Remap axes and scale, without quantizing.
pub fn scale_point(v: [f64; 3], config: &ConvertConfig) -> [f64; 3] {
    config.axis_map.apply(v).map(|c| c * config.scale)
}

/// Truncate toward zero and clamp into `[-COORD_LIMIT, COORD_LIMIT]`.
///
/// Returns the value and whether it had to be clamped. Truncates, never
/// rounds. NaN becomes 0.
pub fn to_fixed(value: f64) -> (i32, bool) {
    // `as` saturates at the i64 bounds and maps NaN to 0
    let truncated = value.trunc() as i64;
    let limit = i64::from(COORD_LIMIT);
    let clamped = truncated.clamp(-limit, limit);
    (clamped as i32, clamped != truncated)
}

/// Quantize an already scaled point, counting saturated components.
pub fn quantize_point(v: [f64; 3], stats: &mut ClampStats) -> [i32; 3] {
    v.map(|c| {
        let (value, clamped) = to_fixed(c);
        if clamped {
            stats.clamped_components += 1;
        }
        value
    })
}

/// Transform one triangle; vertex order and tag are preserved.
pub fn transform_triangle(
    triangle: &Triangle,
    config: &ConvertConfig,
    stats: &mut ClampStats,
) -> TransformedTriangle {
    TransformedTriangle {
        vertices: triangle
            .vertices
            .map(|v| quantize_point(scale_point(v, config), stats)),
        tag: triangle.tag.clone(),
    }
}
