//! Common hierarchical prefix of two codes.

use crate::model::Code;

/// Longest common prefix of `a` and `b`, cut back to a field boundary.
///
/// Levels 3 and 5 are two-digit fields: sharing only their first digit is
/// not agreement at that level, so a raw match of 3 or 6 characters is
/// truncated to 2 or 5. The result never has length 3 or 6.
pub fn common_prefix<'a>(a: &'a Code, b: &Code) -> &'a str {
    let matched = a
        .as_bytes()
        .iter()
        .zip(b.as_bytes())
        .take_while(|(x, y)| x == y)
        .count();

    let len = match matched {
        3 | 6 => matched - 1,
        n => n,
    };
    &a.as_str()[..len]
}

/// Divergence layer for a common prefix: the index of the first field the
/// two codes do not share.
///
/// | prefix length | layer |
/// |---------------|-------|
/// | 1 | 1 |
/// | 2 | 2 |
/// | 4 | 3 |
/// | 5 | 4 |
/// | 7 | 5 |
///
/// Every other length (0, 3, 6, 8) maps to 0; callers tell "nothing shared"
/// from "identical" by the prefix length itself.
pub fn layer_of(prefix: &str) -> usize {
    match prefix.len() {
        1 => 1,
        2 => 2,
        4 => 3,
        5 => 4,
        7 => 5,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> Code {
        Code::parse(s).unwrap()
    }

    #[test]
    fn prefix_stops_at_first_mismatch() {
        assert_eq!(common_prefix(&code("Hb08B04="), &code("Hd05A01=")), "H");
        assert_eq!(common_prefix(&code("Aa01A01="), &code("Ba01A01=")), "");
        assert_eq!(common_prefix(&code("Aa01A01="), &code("Aa01B01=")), "Aa01");
        assert_eq!(common_prefix(&code("Aa01A01="), &code("Aa01A01#")), "Aa01A01");
        assert_eq!(common_prefix(&code("Aa01A01="), &code("Aa01A01=")), "Aa01A01=");
    }

    #[test]
    fn half_matched_numeric_field_is_truncated() {
        // Shared "0" of "01" vs "02" does not count.
        assert_eq!(common_prefix(&code("Aa01A01="), &code("Aa02A01=")), "Aa");
        assert_eq!(common_prefix(&code("Aa01A01="), &code("Aa01A02=")), "Aa01A");
    }

    #[test]
    fn layer_table() {
        assert_eq!(layer_of(""), 0);
        assert_eq!(layer_of("A"), 1);
        assert_eq!(layer_of("Aa"), 2);
        assert_eq!(layer_of("Aa0"), 0);
        assert_eq!(layer_of("Aa01"), 3);
        assert_eq!(layer_of("Aa01A"), 4);
        assert_eq!(layer_of("Aa01A0"), 0);
        assert_eq!(layer_of("Aa01A01"), 5);
        assert_eq!(layer_of("Aa01A01="), 0);
    }
}
