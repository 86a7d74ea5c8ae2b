//! Rendering Adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers never mutate the cell cache; they consume its events.
//! - Every instance in a [`SceneMirror`] corresponds to exactly one live cell.
//! - A removed cell's instance is released before the next event is handled.

mod renderer;

pub use renderer::{
    CELL_FOOTPRINT, DebugTextRenderer, Instance, RenderView, Renderer, SceneMirror,
};

pub fn crate_info() -> &'static str {
    "cityscape-render v0.1.0"
}
