//! Per-code-pair similarity.
//!
//! ```text
//! sim(c1, c2) = coef · cos(n·π/180) · (n − k + 1) / n
//! ```
//!
//! - `coef`: depth coefficient for the common prefix length (a, b, c, d)
//! - `n`: fanout, distinct sibling branches below the common prefix
//! - `k`: sibling distance between the two codes at the divergence point
//!
//! Wider branches attenuate the cosine term; closer siblings raise the
//! numerator. Codes that share nothing, or that belong to a self-closed
//! group, score the floor `f`. Codes identical through level 5 score by
//! their markers.

use std::f64::consts::PI;

use crate::index::CodeIndex;
use crate::model::{Code, Marker, Param};
use super::{common_prefix, sibling_distance};

/// Angle unit of the cosine term.
const DEGREES: f64 = 180.0;

/// Scores code pairs against one index snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Scorer<'a> {
    index: &'a CodeIndex,
    param: &'a Param,
}

impl<'a> Scorer<'a> {
    pub fn new(index: &'a CodeIndex, param: &'a Param) -> Self {
        Self { index, param }
    }

    /// Similarity of two codes in [0, 1].
    pub fn score(&self, c1: &Code, c2: &Code) -> f64 {
        let prefix = common_prefix(c1, c2);
        let (m1, m2) = (c1.marker(), c2.marker());

        // Evaluated first: a self-closed group has no siblings to compare,
        // even when the other code sits right next to it.
        if prefix.is_empty() || m1 == Marker::SelfClosed || m2 == Marker::SelfClosed {
            return self.param.f();
        }

        if prefix.len() >= 7 {
            return match (m1, m2) {
                (Marker::Synonym, Marker::Synonym) => 1.0,
                (Marker::Related, Marker::Related) => self.param.e(),
                _ => 0.0,
            };
        }

        // Lengths 3 and 6 are cut back by common_prefix; 0 and 7+ returned above.
        let coef = match prefix.len() {
            1 => self.param.a(),
            2 => self.param.b(),
            4 => self.param.c(),
            _ => self.param.d(),
        };

        let n = self.index.fanout(prefix);
        if n == 0 {
            tracing::warn!(
                %c1, %c2, prefix,
                "zero fanout below a shared prefix; codes are missing from the index"
            );
            return 0.0;
        }
        let k = sibling_distance(&c1.layer(), &c2.layer());

        formula(coef, n, k)
    }
}

/// `coef · cos(n·π/180) · (n − k + 1) / n`, floored at 0.
///
/// The raw value goes negative once `k > n + 1` or `n > 90`.
pub fn formula(coef: f64, n: usize, k: u32) -> f64 {
    let n = n as f64;
    let k = f64::from(k);
    let raw = coef * (n * PI / DEGREES).cos() * (n - k + 1.0) / n;
    raw.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> Code {
        Code::parse(s).unwrap()
    }

    /// Fourteen level-2 branches under H (a..n), mirroring the shape of
    /// the real taxonomy around Hb08B04= / Hn10C01=.
    fn h_index() -> CodeIndex {
        let mut entries: Vec<(Code, Vec<&str>)> = ('a'..='n')
            .map(|l2| (code(&format!("H{l2}01A01=")), vec!["占位"]))
            .collect();
        entries.push((code("Hb08B04="), vec!["抄袭", "剽窃"]));
        entries.push((code("Hn10C01="), vec!["抄袭", "照搬"]));
        entries.push((code("Hd05A01="), vec!["克隆", "复制"]));
        CodeIndex::from_entries(entries)
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn level_one_divergence_matches_reference_value() {
        let index = h_index();
        let param = Param::default();
        let scorer = Scorer::new(&index, &param);
        assert_eq!(index.fanout("H"), 14);
        let s = scorer.score(&code("Hb08B04="), &code("Hd05A01="));
        assert!(approx(s, 0.585643), "got {s}");
    }

    #[test]
    fn identical_synonym_codes_score_one() {
        let index = h_index();
        let param = Param::default();
        let scorer = Scorer::new(&index, &param);
        assert_eq!(scorer.score(&code("Hb08B04="), &code("Hb08B04=")), 1.0);
    }

    #[test]
    fn same_related_group_scores_e() {
        let index = CodeIndex::from_entries([(code("Aa01B03#"), ["良民", "顺民"])]);
        let param = Param::default();
        let scorer = Scorer::new(&index, &param);
        assert_eq!(scorer.score(&code("Aa01B03#"), &code("Aa01B03#")), 0.5);
    }

    #[test]
    fn mixed_markers_on_same_position_score_zero() {
        let index = CodeIndex::from_entries([
            (code("Aa01B03="), ["甲"]),
            (code("Aa01B03#"), ["乙"]),
        ]);
        let param = Param::default();
        let scorer = Scorer::new(&index, &param);
        assert_eq!(scorer.score(&code("Aa01B03="), &code("Aa01B03#")), 0.0);
    }

    #[test]
    fn nothing_shared_scores_f() {
        let index = CodeIndex::default();
        let param = Param::default();
        let scorer = Scorer::new(&index, &param);
        assert_eq!(scorer.score(&code("Aa01A01="), &code("Ba01A01=")), 0.1);
    }

    #[test]
    fn self_closed_short_circuits_before_marker_rules() {
        let index = CodeIndex::from_entries([(code("Aa01D01@"), ["他人"])]);
        let param = Param::default();
        let scorer = Scorer::new(&index, &param);
        let c = code("Aa01D01@");
        assert_eq!(scorer.score(&c, &c), 0.1);
        assert_eq!(scorer.score(&c, &code("Aa01D02=")), 0.1);
    }

    #[test]
    fn deeper_divergence_uses_deeper_coefficient() {
        let index = CodeIndex::from_entries([
            (code("Aa01A01="), ["一"]),
            (code("Aa01A02="), ["二"]),
        ]);
        let param = Param::default();
        let scorer = Scorer::new(&index, &param);
        // prefix "Aa01A" → d, n = 2, k = 1
        let expected = 0.96 * (2.0 * PI / 180.0).cos() * 2.0 / 2.0;
        let s = scorer.score(&code("Aa01A01="), &code("Aa01A02="));
        assert!(approx(s, expected), "got {s}, expected {expected}");
    }

    #[test]
    fn each_divergence_depth_uses_its_coefficient() {
        let index = CodeIndex::from_entries([
            (code("Aa01A01="), ["一"]),
            (code("Ab01A01="), ["二"]),
            (code("Aa02A01="), ["三"]),
            (code("Aa01B01="), ["四"]),
            (code("Aa01A02="), ["五"]),
        ]);
        // Distinct per-depth values make a wrong lookup visible.
        let param = Param::new(0.2, 0.4, 0.6, 0.8, 0.5, 0.1).unwrap();
        let scorer = Scorer::new(&index, &param);
        let a = code("Aa01A01=");
        // Every branch point here has n = 2 and k = 1.
        let unit = (2.0 * PI / 180.0).cos();
        for (other, coef) in [("Ab01A01=", 0.2), ("Aa02A01=", 0.4), ("Aa01B01=", 0.6), ("Aa01A02=", 0.8)] {
            let s = scorer.score(&a, &code(other));
            assert!(approx(s, coef * unit), "{other}: got {s}, expected {}", coef * unit);
        }
    }

    #[test]
    fn zero_fanout_returns_zero_score() {
        // Neither code is in the index.
        let index = CodeIndex::default();
        let param = Param::default();
        let scorer = Scorer::new(&index, &param);
        assert_eq!(scorer.score(&code("Aa01A01="), &code("Aa01A02=")), 0.0);
    }

    #[test]
    fn formula_is_floored_at_zero() {
        assert_eq!(formula(0.65, 2, 10), 0.0);
        assert_eq!(formula(0.65, 120, 1), 0.0);
    }

    #[test]
    fn formula_decreases_with_distance() {
        let mut last = f64::INFINITY;
        for k in 1..=15 {
            let s = formula(0.8, 14, k);
            assert!(s <= last);
            last = s;
        }
    }

    #[test]
    fn alternate_param_is_honoured() {
        let index = CodeIndex::default();
        let param = Param::new(0.65, 0.8, 0.9, 0.96, 0.5, 0.0).unwrap();
        let scorer = Scorer::new(&index, &param);
        assert_eq!(scorer.score(&code("Aa01A01="), &code("Ba01A01=")), 0.0);
    }
}
