//! Cityscape Kernel: configuration and the per-tick driver.
//!
//! # Invariants
//! - Configuration is validated once, at load time.
//! - Each tick advances the viewpoint first, then synchronizes the cell
//!   cache at the new position, then dispatches the resulting events.
//! - The driver is the only writer of both the viewpoint and the cache.

pub mod config;
pub mod driver;

pub use config::{CityscapeConfig, ConfigError};
pub use driver::{Cityscape, TickError, TickReport};

pub fn crate_info() -> &'static str {
    "cityscape-kernel v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("kernel"));
    }
}
