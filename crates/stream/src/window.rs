use cityscape_common::{GridCoord, planar};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Largest hard bound or falloff radius a window may have, in cells.
pub const MAX_WINDOW_EXTENT: i32 = 4096;

/// How the visible region around the viewpoint is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WindowPolicy {
    /// Axis-aligned rectangle around the rounded viewpoint. Every member
    /// has weight 1.
    Hard { bound_x: i32, bound_z: i32 },
    /// Disc around the continuous viewpoint. Height fades toward the rim
    /// by `(R² - d²) / R²`.
    SoftFalloff { radius: f32 },
}

impl Default for WindowPolicy {
    fn default() -> Self {
        WindowPolicy::Hard {
            bound_x: 6,
            bound_z: 6,
        }
    }
}

/// Window shape plus the movement gate between synchronization passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub policy: WindowPolicy,
    /// Planar shift from the viewpoint to the window center, biasing the
    /// window ahead of the camera.
    pub forward_offset: Vec2,
    /// Minimum planar displacement since the last pass before another pass
    /// runs.
    pub hysteresis: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            policy: WindowPolicy::default(),
            forward_offset: Vec2::ZERO,
            hysteresis: 0.2,
        }
    }
}

/// Errors from window configuration.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum WindowError {
    #[error("hard window bounds must be positive, got {bound_x}x{bound_z}")]
    NonPositiveBound { bound_x: i32, bound_z: i32 },
    #[error("falloff radius must be positive and finite, got {0}")]
    NonPositiveRadius(f32),
    /// The larger of the two bounds, then the limit.
    #[error("hard window bound must be at most {1}, got {0}")]
    BoundTooLarge(i32, i32),
    #[error("falloff radius must be at most {1}, got {0}")]
    RadiusTooLarge(f32, f32),
    #[error("hysteresis must be positive and finite, got {0}")]
    InvalidHysteresis(f32),
    #[error("forward offset must be finite, got {0}")]
    NonFiniteOffset(Vec2),
}

impl WindowConfig {
    pub fn validate(&self) -> Result<(), WindowError> {
        match self.policy {
            WindowPolicy::Hard { bound_x, bound_z } => {
                if bound_x <= 0 || bound_z <= 0 {
                    return Err(WindowError::NonPositiveBound { bound_x, bound_z });
                }
                let largest = bound_x.max(bound_z);
                if largest > MAX_WINDOW_EXTENT {
                    return Err(WindowError::BoundTooLarge(largest, MAX_WINDOW_EXTENT));
                }
            }
            WindowPolicy::SoftFalloff { radius } => {
                if !(radius.is_finite() && radius > 0.0) {
                    return Err(WindowError::NonPositiveRadius(radius));
                }
                let limit = MAX_WINDOW_EXTENT as f32;
                if radius > limit {
                    return Err(WindowError::RadiusTooLarge(radius, limit));
                }
            }
        }
        if !(self.hysteresis.is_finite() && self.hysteresis > 0.0) {
            return Err(WindowError::InvalidHysteresis(self.hysteresis));
        }
        if !self.forward_offset.is_finite() {
            return Err(WindowError::NonFiniteOffset(self.forward_offset));
        }
        Ok(())
    }

    /// Place the window for a viewpoint position.
    pub fn window_at(&self, position: Vec3) -> Window {
        let center = planar(position) + self.forward_offset;
        match self.policy {
            WindowPolicy::Hard { bound_x, bound_z } => Window::Hard {
                anchor: GridCoord::round_from(center),
                bound_x,
                bound_z,
            },
            WindowPolicy::SoftFalloff { radius } => Window::Soft { center, radius },
        }
    }
}

/// A window placed at a concrete viewpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Window {
    Hard {
        anchor: GridCoord,
        bound_x: i32,
        bound_z: i32,
    },
    Soft {
        center: Vec2,
        radius: f32,
    },
}

impl Window {
    /// Falloff weight in `(0, 1]` for members, `None` outside.
    ///
    /// Hard membership is half-open per axis:
    /// `anchor - bound <= x < anchor + bound + 1`.
    pub fn weight(&self, coord: GridCoord) -> Option<f32> {
        match *self {
            Window::Hard {
                anchor,
                bound_x,
                bound_z,
            } => {
                let in_x = within(coord.x, anchor.x, bound_x);
                let in_z = within(coord.z, anchor.z, bound_z);
                (in_x && in_z).then_some(1.0)
            }
            Window::Soft { center, radius } => {
                let dx = coord.x as f32 - center.x;
                let dz = coord.z as f32 - center.y;
                let r2 = radius * radius;
                let weight = (r2 - dx * dx - dz * dz) / r2;
                (weight > 0.0).then_some(weight)
            }
        }
    }

    pub fn contains(&self, coord: GridCoord) -> bool {
        self.weight(coord).is_some()
    }

    /// Inclusive bounding rectangle `(min, max)` of every possible member,
    /// clipped to the `i32` grid.
    pub fn bounding_rect(&self) -> (GridCoord, GridCoord) {
        match *self {
            Window::Hard {
                anchor,
                bound_x,
                bound_z,
            } => {
                let min_x = anchor.x.saturating_sub(bound_x);
                let min_z = anchor.z.saturating_sub(bound_z);
                let max_x = anchor.x.saturating_add(bound_x);
                let max_z = anchor.z.saturating_add(bound_z);
                (GridCoord::new(min_x, min_z), GridCoord::new(max_x, max_z))
            }
            Window::Soft { center, radius } => (
                GridCoord::new(
                    (center.x - radius).ceil() as i32,
                    (center.y - radius).ceil() as i32,
                ),
                GridCoord::new(
                    (center.x + radius).floor() as i32,
                    (center.y + radius).floor() as i32,
                ),
            ),
        }
    }

    /// Candidate coordinates in row-major order (x outer, z inner). Soft
    /// windows yield the bounding square; filter with [`Window::weight`].
    pub fn candidates(&self) -> impl Iterator<Item = GridCoord> {
        let (min, max) = self.bounding_rect();
        (min.x..=max.x).flat_map(move |x| (min.z..=max.z).map(move |z| GridCoord::new(x, z)))
    }

    /// Anchor coordinate used by the movement gate. Soft windows round
    /// their continuous center.
    pub fn anchor(&self) -> GridCoord {
        match *self {
            Window::Hard { anchor, .. } => anchor,
            Window::Soft { center, .. } => GridCoord::round_from(center),
        }
    }
}

/// One axis of hard membership, widened so anchors near the edge of the
/// grid cannot overflow.
fn within(value: i32, anchor: i32, bound: i32) -> bool {
    let offset = i64::from(value) - i64::from(anchor);
    let bound = i64::from(bound);
    -bound <= offset && offset <= bound
}
