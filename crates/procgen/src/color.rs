use cityscape_common::Rgb;
use serde::{Deserialize, Serialize};

/// Hue period: hues are fractions of a full turn.
pub const HUE_PERIOD: f64 = 1.0;

/// Saturation/lightness presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Vivid,
    Gothic,
    Pastel,
    Cyberpunk,
    Evening,
}

impl Theme {
    pub const ALL: [Theme; 5] = [
        Theme::Vivid,
        Theme::Gothic,
        Theme::Pastel,
        Theme::Cyberpunk,
        Theme::Evening,
    ];

    /// `(saturation, lightness)` for this preset.
    pub fn tone(self) -> (f32, f32) {
        match self {
            Theme::Vivid => (1.0, 0.5),
            Theme::Gothic => (0.2, 0.2),
            Theme::Pastel => (0.2, 0.8),
            Theme::Cyberpunk => (0.8, 0.8),
            Theme::Evening => (0.8, 0.2),
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|t| format!("{t:?}").eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown theme '{s}'"))
    }
}

/// Build a color from a hue (any real, wrapped into one period) and
/// saturation/lightness (clamped to `[0, 1]`).
pub fn hsl_to_rgb(hue: f64, saturation: f32, lightness: f32) -> Rgb {
    let h = (hue.rem_euclid(HUE_PERIOD) / HUE_PERIOD) as f32;
    let s = saturation.clamp(0.0, 1.0);
    let l = lightness.clamp(0.0, 1.0);

    if s == 0.0 {
        return Rgb::new(l, l, l);
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    let third = 1.0 / 3.0;
    let channel = |t: f32| hue_to_channel(p, q, t).clamp(0.0, 1.0);
    Rgb::new(channel(h + third), channel(h), channel(h - third))
}

fn hue_to_channel(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 0.5 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}
