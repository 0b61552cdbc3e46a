//! # Similarity Scoring
//!
//! Pure functions over codes plus a [`Scorer`] bound to one index snapshot.
//!
//! ```text
//! c1, c2 ─► common_prefix ─► layer_of ─┐
//!        └► sibling_distance (k) ──────┼─► Scorer::score
//!   CodeIndex::fanout(prefix) (n) ─────┘
//! ```

pub mod distance;
pub mod prefix;
pub mod scorer;

pub use distance::sibling_distance;
pub use prefix::{common_prefix, layer_of};
pub use scorer::{formula, Scorer};
