//! Procedural field: deterministic noise and per-cell attributes.
//!
//! # Invariants
//! - Every function here is pure. The same coordinate and seeds give
//!   bit-identical output on every call, process and platform.
//! - `hash_u32` uses integer arithmetic only.

mod attributes;
mod color;
mod field;

pub use attributes::{AttributeGenerator, CellAttributes, PHI, PaletteConfig, PaletteError};
pub use color::{HUE_PERIOD, Theme, hsl_to_rgb};
pub use field::{BASE_NOISE_SCALE, BaseNoise, base_noise, hash_noise, hash_u32};

pub fn crate_info() -> &'static str {
    "cityscape-procgen v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("procgen"));
    }
}
