//! Streaming: the windowed cell cache.
//!
//! # Invariants
//! - After every synchronization pass that runs, a cell exists iff its
//!   coordinate is inside the window at that pass's viewpoint.
//! - A coordinate is never cached twice. Re-entering cells regenerate
//!   bit-identical attributes.
//! - Recomputation scales with viewpoint displacement, not call rate:
//!   moves below the hysteresis distance do nothing.

mod cache;
mod window;

pub use cache::{Cell, CellSink, SyncOutcome, SyncStats, WindowedCellCache};
pub use window::{MAX_WINDOW_EXTENT, Window, WindowConfig, WindowError, WindowPolicy};

pub fn crate_info() -> &'static str {
    "cityscape-stream v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("stream"));
    }
}
