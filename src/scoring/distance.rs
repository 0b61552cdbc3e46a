//! Sibling distance at the divergence point.

use crate::model::Layer;

/// Number of comparable fields; the marker is excluded.
const COMPARABLE_FIELDS: usize = 5;

/// Distance between the sibling positions of two layers at the first
/// field where they differ.
///
/// Numeric fields (levels 3 and 5) compare by value, so `"08"` and `"10"`
/// are 2 apart. Letter fields compare by code point, so `b` and `d` are 2
/// apart. Layers identical through level 5 are 0 apart.
pub fn sibling_distance(l1: &Layer<'_>, l2: &Layer<'_>) -> u32 {
    for idx in 0..COMPARABLE_FIELDS {
        let (f1, f2) = (l1.field(idx), l2.field(idx));
        if f1 == f2 {
            continue;
        }
        if Layer::is_numeric(idx) {
            return two_digit(f1).abs_diff(two_digit(f2));
        }
        let c1 = f1.chars().next().map_or(0, u32::from);
        let c2 = f2.chars().next().map_or(0, u32::from);
        return c1.abs_diff(c2);
    }
    0
}

/// Value of a two-digit field. Codes are validated, so both bytes are digits.
fn two_digit(field: &str) -> u32 {
    field
        .bytes()
        .fold(0, |acc, b| acc * 10 + u32::from(b.wrapping_sub(b'0')))
}
