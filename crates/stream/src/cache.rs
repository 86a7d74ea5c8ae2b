use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::time::{Duration, Instant};

use cityscape_common::{GridCoord, planar};
use cityscape_procgen::{AttributeGenerator, CellAttributes};
use glam::Vec3;

use crate::window::{Window, WindowConfig, WindowError, WindowPolicy};

/// A materialized cell. Owned by [`WindowedCellCache`]; renderers receive
/// copies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub coord: GridCoord,
    pub attributes: CellAttributes,
    /// Edge falloff in `(0, 1]`. Always 1 for hard windows.
    pub weight: f32,
}

impl Cell {
    /// Displayed height: generated height scaled by the falloff weight.
    pub fn height(&self) -> f32 {
        self.attributes.height * self.weight
    }
}

/// Receiver of cache lifecycle events, implemented by renderers.
///
/// On `on_cell_removed` the receiver must release whatever it allocated
/// for that coordinate before returning.
pub trait CellSink {
    fn on_cell_created(&mut self, cell: &Cell);
    fn on_cell_updated(&mut self, cell: &Cell);
    fn on_cell_removed(&mut self, coord: GridCoord);
}

/// Events produced by one synchronization pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncOutcome {
    pub created: Vec<Cell>,
    pub updated: Vec<Cell>,
    /// Sorted by coordinate.
    pub removed: Vec<GridCoord>,
}

impl SyncOutcome {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }

    pub fn event_count(&self) -> usize {
        self.created.len() + self.updated.len() + self.removed.len()
    }

    /// Deliver removals, then creations, then updates.
    pub fn dispatch<S: CellSink + ?Sized>(&self, sink: &mut S) {
        for coord in &self.removed {
            sink.on_cell_removed(*coord);
        }
        for cell in &self.created {
            sink.on_cell_created(cell);
        }
        for cell in &self.updated {
            sink.on_cell_updated(cell);
        }
    }
}

/// Statistics from the last call to [`WindowedCellCache::synchronize`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncStats {
    pub created: usize,
    pub updated: usize,
    pub removed: usize,
    pub total_cells: usize,
    /// The movement gate short-circuited the call.
    pub skipped: bool,
    pub elapsed: Duration,
}

/// The set of generated cells around the viewpoint.
///
/// After every pass that runs, a coordinate is cached iff it lies in the
/// window placed at that pass's viewpoint. Between passes the cache lags
/// the viewpoint by less than the hysteresis distance.
pub struct WindowedCellCache {
    config: WindowConfig,
    generator: AttributeGenerator,
    cells: HashMap<GridCoord, Cell>,
    last_synced: Option<Vec3>,
    stats: SyncStats,
}

impl WindowedCellCache {
    pub fn new(config: WindowConfig, generator: AttributeGenerator) -> Result<Self, WindowError> {
        config.validate()?;
        Ok(Self {
            config,
            generator,
            cells: HashMap::new(),
            last_synced: None,
            stats: SyncStats::default(),
        })
    }

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    pub fn generator(&self) -> &AttributeGenerator {
        &self.generator
    }

    /// Window placed at a viewpoint position under this cache's policy.
    pub fn window_at(&self, position: Vec3) -> Window {
        self.config.window_at(position)
    }

    /// Whether `coord` belongs to the window placed at `position`,
    /// independent of what is currently cached.
    pub fn contains_in_window(&self, position: Vec3, coord: GridCoord) -> bool {
        self.window_at(position).contains(coord)
    }

    /// Position of the last pass that ran.
    pub fn last_synchronized(&self) -> Option<Vec3> {
        self.last_synced
    }

    /// Whether a call to [`Self::synchronize`] at `position` would run.
    pub fn needs_sync(&self, position: Vec3) -> bool {
        let Some(last) = self.last_synced else {
            return true;
        };
        if planar(position).distance(planar(last)) < self.config.hysteresis {
            return false;
        }
        match self.config.policy {
            WindowPolicy::Hard { .. } => {
                self.window_at(position).anchor() != self.window_at(last).anchor()
            }
            WindowPolicy::SoftFalloff { .. } => true,
        }
    }

    /// Bring the cached set in line with the window at `position`.
    ///
    /// Returns an empty outcome without touching the cache when the
    /// viewpoint has not moved far enough since the last pass.
    pub fn synchronize(&mut self, position: Vec3) -> SyncOutcome {
        let _span = tracing::info_span!("cell_sync").entered();

        if !self.needs_sync(position) {
            tracing::trace!(x = position.x, z = position.z, "below hysteresis, skipping");
            self.stats = SyncStats {
                total_cells: self.cells.len(),
                skipped: true,
                ..SyncStats::default()
            };
            return SyncOutcome::default();
        }

        let start = Instant::now();
        let window = self.window_at(position);
        let mut outcome = SyncOutcome::default();

        for coord in window.candidates() {
            let Some(weight) = window.weight(coord) else {
                continue;
            };
            debug_assert!(
                weight > 0.0 && weight <= 1.0,
                "weight {weight} out of range"
            );
            match self.cells.entry(coord) {
                Entry::Vacant(slot) => {
                    let cell = Cell {
                        coord,
                        attributes: self.generator.attributes_for(coord),
                        weight,
                    };
                    debug_assert!(cell.height() >= 0.0, "negative height at {coord}");
                    slot.insert(cell);
                    outcome.created.push(cell);
                }
                Entry::Occupied(mut slot) => {
                    let cell = slot.get_mut();
                    if cell.weight != weight {
                        cell.weight = weight;
                        outcome.updated.push(*cell);
                    }
                }
            }
        }

        self.cells.retain(|coord, _| {
            let keep = window.contains(*coord);
            if !keep {
                outcome.removed.push(*coord);
            }
            keep
        });
        outcome.removed.sort_unstable();

        if !outcome.created.is_empty() || !outcome.removed.is_empty() {
            tracing::debug!(
                created = outcome.created.len(),
                removed = outcome.removed.len(),
                anchor = %window.anchor(),
                "window moved"
            );
        }

        self.last_synced = Some(position);
        self.stats = SyncStats {
            created: outcome.created.len(),
            updated: outcome.updated.len(),
            removed: outcome.removed.len(),
            total_cells: self.cells.len(),
            skipped: false,
            elapsed: start.elapsed(),
        };

        tracing::trace!(
            created = self.stats.created,
            updated = self.stats.updated,
            removed = self.stats.removed,
            total = self.stats.total_cells,
            "cell sync complete"
        );

        outcome
    }

    /// Evict every cell and forget the last viewpoint. Returns the evicted
    /// coordinates, sorted.
    pub fn clear(&mut self) -> Vec<GridCoord> {
        let mut removed: Vec<GridCoord> = self.cells.drain().map(|(coord, _)| coord).collect();
        removed.sort_unstable();
        self.last_synced = None;
        self.stats = SyncStats {
            removed: removed.len(),
            ..SyncStats::default()
        };
        tracing::debug!(removed = removed.len(), "cell cache cleared");
        removed
    }

    pub fn get(&self, coord: GridCoord) -> Option<&Cell> {
        self.cells.get(&coord)
    }

    pub fn contains(&self, coord: GridCoord) -> bool {
        self.cells.contains_key(&coord)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }
}
