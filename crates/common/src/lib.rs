//! Shared value types for the cityscape engine.
//!
//! # Invariants
//! - `GridCoord` compares and hashes exactly; it is never derived from a
//!   float except through `GridCoord::round_from`.

mod types;

pub use types::{GridCoord, Rgb, Transform, Viewpoint, planar};

pub fn crate_info() -> &'static str {
    "cityscape-common v0.1.0"
}
