//! Similarity coefficients.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The six coefficients of the similarity formula.
///
/// `a`..`d` weight a divergence at level 1, 2, 3 and 4 respectively
/// (common prefix length 1, 2, 4, 5). `e` is the score of two codes in the
/// same `#` group, `f` the floor for unrelated or self-closed codes.
///
/// Missing keys fall back to the defaults when decoded from JSON, so
/// `{"f": 0.05}` overrides only `f`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Param {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl Default for Param {
    fn default() -> Self {
        Self { a: 0.65, b: 0.8, c: 0.9, d: 0.96, e: 0.5, f: 0.1 }
    }
}

impl Param {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Result<Self> {
        Self { a, b, c, d, e, f }.validated()
    }

    /// Decode coefficients from a JSON object and validate them.
    pub fn from_json(json: &str) -> Result<Self> {
        let param: Param = serde_json::from_str(json)?;
        param.validated()
    }

    fn validated(self) -> Result<Self> {
        for (name, value) in [
            ("a", self.a), ("b", self.b), ("c", self.c),
            ("d", self.d), ("e", self.e), ("f", self.f),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidParam(format!(
                    "coefficient {name} = {value} is outside [0, 1]"
                )));
            }
        }
        Ok(self)
    }

    pub fn a(&self) -> f64 { self.a }
    pub fn b(&self) -> f64 { self.b }
    pub fn c(&self) -> f64 { self.c }
    pub fn d(&self) -> f64 { self.d }
    pub fn e(&self) -> f64 { self.e }
    pub fn f(&self) -> f64 { self.f }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let p = Param::default();
        assert_eq!((p.a(), p.b(), p.c(), p.d(), p.e(), p.f()), (0.65, 0.8, 0.9, 0.96, 0.5, 0.1));
    }

    #[test]
    fn partial_json_overrides_only_named_keys() {
        let p = Param::from_json(r#"{"f": 0.05, "e": 0.4}"#).unwrap();
        assert_eq!(p.f(), 0.05);
        assert_eq!(p.e(), 0.4);
        assert_eq!(p.a(), 0.65);
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(matches!(Param::new(1.5, 0.8, 0.9, 0.96, 0.5, 0.1), Err(Error::InvalidParam(_))));
        assert!(Param::new(f64::NAN, 0.8, 0.9, 0.96, 0.5, 0.1).is_err());
        assert!(matches!(Param::from_json(r#"{"d": -0.1}"#), Err(Error::InvalidParam(_))));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(Param::from_json("{not json"), Err(Error::Config(_))));
    }
}
