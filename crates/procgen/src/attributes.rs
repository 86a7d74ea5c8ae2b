use cityscape_common::{GridCoord, Rgb};
use serde::{Deserialize, Serialize};

use crate::color::{Theme, hsl_to_rgb};
use crate::field::{BaseNoise, hash_noise};

/// Golden ratio, used as the hue offset between primary and secondary colors.
pub const PHI: f64 = 1.618;

/// Seeds and tuning for per-cell height and color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub height_seed: u32,
    pub color_seed: u32,
    /// Weight of the hash jitter in the primary hue.
    pub noise_ratio: f64,
    /// Hue offset of the secondary color.
    pub hue_offset: f64,
    pub saturation: f32,
    pub lightness: f32,
    /// Preset tone; overrides `saturation` and `lightness` when set.
    pub theme: Option<Theme>,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        let (saturation, lightness) = Theme::Vivid.tone();
        Self {
            height_seed: 29,
            color_seed: 47,
            noise_ratio: 0.05,
            hue_offset: PHI,
            saturation,
            lightness,
            theme: None,
        }
    }
}

/// Errors from palette validation.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PaletteError {
    #[error("palette parameter `{0}` must be finite")]
    NonFiniteParameter(&'static str),
}

impl PaletteConfig {
    /// Use a preset tone.
    pub fn themed(theme: Theme) -> Self {
        Self {
            theme: Some(theme),
            ..Self::default()
        }
    }

    /// Effective `(saturation, lightness)`.
    pub fn tone(&self) -> (f32, f32) {
        self.theme
            .map(Theme::tone)
            .unwrap_or((self.saturation, self.lightness))
    }

    /// Out-of-range tones are clamped at sampling time; only non-finite
    /// values are rejected.
    pub fn validate(&self) -> Result<(), PaletteError> {
        let checks: [(&'static str, bool); 4] = [
            ("noise_ratio", self.noise_ratio.is_finite()),
            ("hue_offset", self.hue_offset.is_finite()),
            ("saturation", self.saturation.is_finite()),
            ("lightness", self.lightness.is_finite()),
        ];
        match checks.into_iter().find(|&(_, ok)| !ok) {
            Some((name, _)) => Err(PaletteError::NonFiniteParameter(name)),
            None => Ok(()),
        }
    }
}

/// Generated shape of one grid cell. A pure function of the coordinate
/// and the palette seeds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellAttributes {
    /// Unscaled height in `[0, 1)`.
    pub height: f32,
    pub primary: Rgb,
    pub secondary: Rgb,
}

/// Maps grid coordinates to [`CellAttributes`].
#[derive(Debug, Clone)]
pub struct AttributeGenerator {
    palette: PaletteConfig,
    color_base: BaseNoise,
}

impl AttributeGenerator {
    pub fn new(palette: PaletteConfig) -> Result<Self, PaletteError> {
        palette.validate()?;
        tracing::debug!(
            height_seed = palette.height_seed,
            color_seed = palette.color_seed,
            "attribute generator ready"
        );
        Ok(Self {
            color_base: BaseNoise::new(palette.color_seed),
            palette,
        })
    }

    pub fn palette(&self) -> &PaletteConfig {
        &self.palette
    }

    pub fn height_at(&self, coord: GridCoord) -> f32 {
        hash_noise(coord.x, coord.z, self.palette.height_seed)
    }

    pub fn attributes_for(&self, coord: GridCoord) -> CellAttributes {
        let base = self.color_base.sample(coord.x as f64, coord.z as f64);
        let jitter = f64::from(hash_noise(coord.x, coord.z, self.palette.color_seed));
        let (saturation, lightness) = self.palette.tone();

        let primary_hue = base + jitter * self.palette.noise_ratio;
        let secondary_hue = base + jitter + self.palette.hue_offset;

        CellAttributes {
            height: self.height_at(coord),
            primary: hsl_to_rgb(primary_hue, saturation, lightness),
            secondary: hsl_to_rgb(secondary_hue, saturation, lightness),
        }
    }
}
