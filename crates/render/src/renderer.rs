use std::collections::BTreeMap;

use cityscape_common::{GridCoord, Rgb, Transform};
use cityscape_stream::{Cell, CellSink};
use glam::Vec3;

/// Edge length of a cell's box footprint, leaving a gap between neighbours.
pub const CELL_FOOTPRINT: f32 = 0.8;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Orthographic zoom factor.
    pub zoom: f32,
}

impl RenderView {
    /// Eye placement relative to the viewpoint for the isometric camera.
    pub const ISOMETRIC_OFFSET: Vec3 = Vec3::new(5.0, 5.0, 5.0);

    /// Isometric view trailing a viewpoint.
    pub fn following(viewpoint: Vec3) -> Self {
        Self {
            eye: viewpoint + Self::ISOMETRIC_OFFSET,
            target: viewpoint,
            zoom: 1.0,
        }
    }
}

impl Default for RenderView {
    fn default() -> Self {
        Self::following(Vec3::ZERO)
    }
}

/// Drawable state for one cell: a box standing on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instance {
    pub transform: Transform,
    /// Diffuse color.
    pub color: Rgb,
    /// Specular highlight color.
    pub specular: Rgb,
}

impl Instance {
    pub fn for_cell(cell: &Cell) -> Self {
        let height = cell.height();
        Self {
            transform: Transform {
                position: Vec3::new(cell.coord.x as f32, height / 2.0, cell.coord.z as f32),
                scale: Vec3::new(CELL_FOOTPRINT, height, CELL_FOOTPRINT),
            },
            color: cell.attributes.primary,
            specular: cell.attributes.secondary,
        }
    }
}

/// Renderer-side mirror of the cell cache: one [`Instance`] per live cell.
///
/// Allocates on create, rewrites on update and frees on remove, which is
/// the resource contract a GPU backend follows.
#[derive(Debug, Default)]
pub struct SceneMirror {
    instances: BTreeMap<GridCoord, Instance>,
    allocated: u64,
    released: u64,
}

impl SceneMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instance(&self, coord: GridCoord) -> Option<&Instance> {
        self.instances.get(&coord)
    }

    /// Live instances in coordinate order.
    pub fn instances(&self) -> &BTreeMap<GridCoord, Instance> {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Total instances allocated over the mirror's lifetime.
    pub fn allocated(&self) -> u64 {
        self.allocated
    }

    /// Total instances released over the mirror's lifetime.
    pub fn released(&self) -> u64 {
        self.released
    }
}

impl CellSink for SceneMirror {
    fn on_cell_created(&mut self, cell: &Cell) {
        let previous = self.instances.insert(cell.coord, Instance::for_cell(cell));
        debug_assert!(previous.is_none(), "duplicate create for {}", cell.coord);
        if previous.is_none() {
            self.allocated += 1;
        }
    }

    fn on_cell_updated(&mut self, cell: &Cell) {
        match self.instances.get_mut(&cell.coord) {
            Some(instance) => *instance = Instance::for_cell(cell),
            None => tracing::warn!(coord = %cell.coord, "update for unknown cell"),
        }
    }

    fn on_cell_removed(&mut self, coord: GridCoord) {
        if self.instances.remove(&coord).is_some() {
            self.released += 1;
        } else {
            tracing::warn!(%coord, "remove for unknown cell");
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the mirrored scene and a view, then produces output.
/// It never touches the cell cache.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, scene: &SceneMirror, view: &RenderView) -> Self::Output;
}

/// Text renderer for CLI output, logging and tests.
#[derive(Debug)]
pub struct DebugTextRenderer {
    /// Maximum number of instances listed per frame.
    pub max_listed: usize,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self { max_listed: 16 }
    }
}

impl Default for DebugTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &SceneMirror, view: &RenderView) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Cityscape (cells={}, allocated={}, released={}) ===\n",
            scene.len(),
            scene.allocated(),
            scene.released()
        ));
        out.push_str(&format!(
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) zoom={:.1}\n",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.zoom
        ));

        for (coord, instance) in scene.instances().iter().take(self.max_listed) {
            out.push_str(&format!(
                "  {coord} h={:.3} color=#{:06x} specular=#{:06x}\n",
                instance.transform.scale.y,
                instance.color.to_hex(),
                instance.specular.to_hex()
            ));
        }
        if scene.len() > self.max_listed {
            out.push_str(&format!("  ... {} more\n", scene.len() - self.max_listed));
        }

        out
    }
}
