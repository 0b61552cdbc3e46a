//! # Taxonomy Model
//!
//! Plain data shared by the index and the scorer: validated codes, their
//! hierarchical view, and the similarity coefficients.
//!
//! Design rule: no I/O, no state, no locking in this module.

pub mod code;
pub mod param;

pub use code::{Code, Layer, Marker, CODE_LEN, LAYER_FIELDS};
pub use param::Param;
