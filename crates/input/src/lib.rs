//! Viewpoint control: directional input bindings and motion integration.
//!
//! # Invariants
//! - The integrator only sees a resolved set of unit vectors, never raw
//!   key events.
//! - Velocity magnitude never exceeds the configured max speed.
//! - Smoothing is exponential in `dt`, so velocity response does not depend
//!   on how a span of time is split into ticks.

pub mod action;
pub mod motion;

pub use action::{ActiveInputs, BindingTable, InputKey, MoveInput};
pub use motion::{MotionConfig, MotionError, MotionIntegrator, direction_modifier};

pub fn crate_info() -> &'static str {
    "cityscape-input v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("input"));
    }
}
