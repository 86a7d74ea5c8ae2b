use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Integer grid coordinate on the XZ plane. Identity key for a cell.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct GridCoord {
    pub x: i32,
    pub z: i32,
}

impl GridCoord {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Round a planar point to the nearest grid coordinate.
    ///
    /// Halves round toward positive infinity, so `-0.5` maps to `0` and
    /// `0.5` maps to `1`.
    pub fn round_from(point: Vec2) -> Self {
        Self {
            x: (point.x + 0.5).floor() as i32,
            z: (point.y + 0.5).floor() as i32,
        }
    }

    /// Round the XZ components of a world position.
    pub fn from_position(position: Vec3) -> Self {
        Self::round_from(planar(position))
    }
}

impl std::fmt::Display for GridCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Project a world position onto the XZ plane.
pub fn planar(position: Vec3) -> Vec2 {
    Vec2::new(position.x, position.z)
}

/// Linear RGB color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Pack into `0xRRGGBB`.
    pub fn to_hex(self) -> u32 {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }
}

/// Spatial transform for a drawable: position and non-uniform scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

/// The moving reference point: where the camera is and how fast it travels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewpoint {
    pub position: Vec3,
    /// Distance per tick.
    pub velocity: Vec3,
}

impl Viewpoint {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_coord_equality_is_componentwise() {
        assert_eq!(GridCoord::new(3, 4), GridCoord::new(3, 4));
        assert_ne!(GridCoord::new(3, 4), GridCoord::new(4, 3));
    }

    #[test]
    fn rounding_breaks_halves_upward() {
        let round = |x, z| GridCoord::round_from(Vec2::new(x, z));
        assert_eq!(round(0.5, -0.5), GridCoord::new(1, 0));
        assert_eq!(round(-1.5, 2.49), GridCoord::new(-1, 2));
        assert_eq!(round(-0.51, 0.0), GridCoord::new(-1, 0));
    }

    #[test]
    fn from_position_ignores_height() {
        let coord = GridCoord::from_position(Vec3::new(6.8, 100.0, -3.2));
        assert_eq!(coord, GridCoord::new(7, -3));
    }

    #[test]
    fn rgb_hex_packing() {
        assert_eq!(Rgb::new(1.0, 0.0, 0.0).to_hex(), 0xff0000);
        assert_eq!(Rgb::new(0.0, 1.0, 1.0).to_hex(), 0x00ffff);
        assert_eq!(Rgb::BLACK.to_hex(), 0);
    }

    #[test]
    fn transform_default_is_unit() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn viewpoint_starts_at_rest() {
        let v = Viewpoint::at(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(v.velocity, Vec3::ZERO);
    }
}
