use cityscape_common::Viewpoint;
use cityscape_input::{ActiveInputs, BindingTable, MotionIntegrator};
use cityscape_procgen::AttributeGenerator;
use cityscape_stream::{CellSink, WindowedCellCache};
use glam::Vec3;

use crate::config::{CityscapeConfig, ConfigError};

/// Errors from a single tick.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TickError {
    #[error("delta time must be finite and non-negative, got {0}")]
    InvalidDeltaTime(f32),
}

/// Summary of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Ticks completed, including this one.
    pub tick: u64,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Whether the cache ran a synchronization pass this tick.
    pub synchronized: bool,
    pub created: usize,
    pub updated: usize,
    pub removed: usize,
    pub total_cells: usize,
}

/// Owns the viewpoint and the cell cache and steps them together.
pub struct Cityscape {
    config: CityscapeConfig,
    bindings: BindingTable,
    motion: MotionIntegrator,
    cache: WindowedCellCache,
    ticks: u64,
}

impl Cityscape {
    /// Build a session at the origin with the default isometric bindings.
    pub fn new(config: CityscapeConfig) -> Result<Self, ConfigError> {
        Self::with_start(config, Vec3::ZERO)
    }

    pub fn with_start(config: CityscapeConfig, start: Vec3) -> Result<Self, ConfigError> {
        config.validate()?;
        let generator = AttributeGenerator::new(config.palette.clone())?;
        let cache = WindowedCellCache::new(config.window.clone(), generator)?;
        let motion = MotionIntegrator::new(config.motion.clone(), start)?;
        tracing::info!(
            policy = ?config.window.policy,
            x = start.x,
            z = start.z,
            "cityscape initialized"
        );
        Ok(Self {
            config,
            bindings: BindingTable::default(),
            motion,
            cache,
            ticks: 0,
        })
    }

    pub fn with_bindings(mut self, bindings: BindingTable) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn config(&self) -> &CityscapeConfig {
        &self.config
    }

    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }

    pub fn viewpoint(&self) -> &Viewpoint {
        self.motion.viewpoint()
    }

    pub fn cache(&self) -> &WindowedCellCache {
        &self.cache
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advance the viewpoint by `dt`, resynchronize the cache at the new
    /// position and deliver the resulting events to `sink`.
    ///
    /// An invalid `dt` leaves all state untouched.
    pub fn tick<S: CellSink + ?Sized>(
        &mut self,
        dt: f32,
        inputs: &ActiveInputs,
        sink: &mut S,
    ) -> Result<TickReport, TickError> {
        if !(dt.is_finite() && dt >= 0.0) {
            return Err(TickError::InvalidDeltaTime(dt));
        }
        let _span = tracing::info_span!("cityscape_tick", tick = self.ticks + 1).entered();

        let position = self.motion.tick(dt, inputs.directions(&self.bindings));
        let outcome = self.cache.synchronize(position);
        outcome.dispatch(sink);
        self.ticks += 1;

        let stats = self.cache.stats();
        Ok(TickReport {
            tick: self.ticks,
            position,
            velocity: self.motion.velocity(),
            synchronized: !stats.skipped,
            created: outcome.created.len(),
            updated: outcome.updated.len(),
            removed: outcome.removed.len(),
            total_cells: self.cache.len(),
        })
    }

    /// Evict every cell, notifying `sink` of each removal. The next tick
    /// repopulates from scratch.
    pub fn shutdown<S: CellSink + ?Sized>(&mut self, sink: &mut S) -> usize {
        let removed = self.cache.clear();
        for coord in &removed {
            sink.on_cell_removed(*coord);
        }
        let removed = removed.len();
        tracing::info!(removed, ticks = self.ticks, "cityscape shut down");
        removed
    }
}
