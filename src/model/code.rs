//! # Taxonomy Codes
//!
//! Every word sense in Cilin carries an 8-character code that pins it to a
//! leaf of a 5-level classification tree:
//!
//! ```text
//! position:   0    1    2 3    4    5 6    7
//!             H    b    0 8    B    0 4    =
//!           level1 level2 level3 level4 level5 marker
//!           letter letter  2dig letter  2dig
//! ```
//!
//! Levels 3 and 5 are two-digit numbers and must be compared atomically.
//! The marker distinguishes groups that share all five levels:
//!
//! | Marker | Meaning |
//! |--------|---------|
//! | `=` | synonym group, members are equivalent |
//! | `#` | related group, members are of the same kind |
//! | `@` | self-closed, the group has a single member |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Length of every taxonomy code in bytes.
pub const CODE_LEN: usize = 8;

/// Number of hierarchical fields in a [`Layer`] (five levels plus marker).
pub const LAYER_FIELDS: usize = 6;

/// Byte ranges of the six fields inside a code.
const FIELD_RANGES: [(usize, usize); LAYER_FIELDS] = [(0, 1), (1, 2), (2, 4), (4, 5), (5, 7), (7, 8)];

// ============================================================================
// Marker
// ============================================================================

/// Terminal marker: how the members of a finest-grained group relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Marker {
    /// `=`: members are synonyms.
    Synonym,
    /// `#`: members are related but not equivalent.
    Related,
    /// `@`: the group contains exactly one word.
    SelfClosed,
}

impl Marker {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'=' => Some(Marker::Synonym),
            b'#' => Some(Marker::Related),
            b'@' => Some(Marker::SelfClosed),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Marker::Synonym => '=',
            Marker::Related => '#',
            Marker::SelfClosed => '@',
        }
    }
}

// ============================================================================
// Code
// ============================================================================

/// A validated 8-character taxonomy code.
///
/// Construction goes through [`Code::parse`]; a `Code` value is always
/// well-formed ASCII, so field extraction can never read out of bounds.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Code([u8; CODE_LEN]);

impl Code {
    /// Validate and parse a code string such as `"Aa01A01="`.
    pub fn parse(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != CODE_LEN {
            return Err(malformed(s, "expected exactly 8 ASCII characters"));
        }
        if !bytes.is_ascii() {
            return Err(malformed(s, "non-ASCII character"));
        }
        for &pos in &[0usize, 1, 4] {
            if !bytes[pos].is_ascii_alphabetic() {
                return Err(malformed(s, "level 1, 2 and 4 must be letters"));
            }
        }
        for &pos in &[2usize, 3, 5, 6] {
            if !bytes[pos].is_ascii_digit() {
                return Err(malformed(s, "level 3 and 5 must be two-digit numbers"));
            }
        }
        if Marker::from_byte(bytes[7]).is_none() {
            return Err(malformed(s, "terminal marker must be one of '=', '#', '@'"));
        }

        let mut raw = [0u8; CODE_LEN];
        raw.copy_from_slice(bytes);
        Ok(Code(raw))
    }

    pub fn as_str(&self) -> &str {
        // Construction only admits ASCII, which is always valid UTF-8.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    pub fn as_bytes(&self) -> &[u8; CODE_LEN] {
        &self.0
    }

    pub fn marker(&self) -> Marker {
        match self.0[7] {
            b'=' => Marker::Synonym,
            b'#' => Marker::Related,
            _ => Marker::SelfClosed,
        }
    }

    /// Structured view of the six hierarchical fields.
    pub fn layer(&self) -> Layer<'_> {
        let s = self.as_str();
        Layer {
            fields: FIELD_RANGES.map(|(start, end)| &s[start..end]),
        }
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.as_str().starts_with(prefix)
    }
}

fn malformed(code: &str, reason: &'static str) -> Error {
    Error::MalformedCode { code: code.to_string(), reason }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Code({})", self.as_str())
    }
}

impl FromStr for Code {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Code::parse(s)
    }
}

impl TryFrom<String> for Code {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Code::parse(&s)
    }
}

impl TryFrom<&str> for Code {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Code::parse(s)
    }
}

impl From<Code> for String {
    fn from(code: Code) -> Self {
        code.as_str().to_string()
    }
}

// ============================================================================
// Layer
// ============================================================================

/// The six-field decomposition of a [`Code`], borrowed from it.
///
/// Index 0..=4 are the five hierarchical levels, index 5 is the marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layer<'a> {
    fields: [&'a str; LAYER_FIELDS],
}

impl<'a> Layer<'a> {
    /// Field at `idx`, or `None` past the marker.
    pub fn get(&self, idx: usize) -> Option<&'a str> {
        self.fields.get(idx).copied()
    }

    /// Callers inside the crate only pass indices below `LAYER_FIELDS`.
    pub(crate) fn field(&self, idx: usize) -> &'a str {
        self.fields[idx]
    }

    pub fn fields(&self) -> &[&'a str; LAYER_FIELDS] {
        &self.fields
    }

    /// Numeric fields (levels 3 and 5) hold two ASCII digits.
    pub fn is_numeric(idx: usize) -> bool {
        idx == 2 || idx == 4
    }
}
