//! Hex colors and the additive shading used for atom gradients.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a color string is not `#rgb` or `#rrggbb`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("color `{0}` must start with '#'")]
    MissingHash(String),
    #[error("color `{0}` must have 3 or 6 hex digits")]
    BadLength(String),
    #[error("color `{0}` contains a non-hex digit")]
    BadDigit(String),
}

/// Opaque 8-bit sRGB color. Serialized as a `#rrggbb` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Self = Self::new(0xff, 0xff, 0xff);
    pub const BLACK: Self = Self::new(0x00, 0x00, 0x00);
    /// Slate gray used for bonds unless a step overrides it.
    pub const BOND_GRAY: Self = Self::new(0x94, 0xa3, 0xb8);

    // CPK-style element fills used by most diagrams
    pub const CARBON: Self = Self::new(0x47, 0x55, 0x69);
    pub const HYDROGEN: Self = Self::new(0xcb, 0xd5, 0xe1);
    pub const OXYGEN: Self = Self::new(0xef, 0x44, 0x44);
    pub const NITROGEN: Self = Self::new(0x3b, 0x82, 0xf6);
    pub const BORON: Self = Self::new(0xf5, 0x9e, 0x0b);
    pub const CHLORINE: Self = Self::new(0x22, 0xc5, 0x5e);
    pub const BROMINE: Self = Self::new(0xa1, 0x62, 0x07);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or the short `#rgb` form.
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let digits = hex
            .strip_prefix('#')
            .ok_or_else(|| ColorError::MissingHash(hex.to_string()))?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::BadDigit(hex.to_string()));
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| ColorError::BadDigit(hex.to_string()));
        match digits.len() {
            6 => Ok(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                let r = channel(&digits[0..1])?;
                let g = channel(&digits[1..2])?;
                let b = channel(&digits[2..3])?;
                Ok(Self::new(r * 17, g * 17, b * 17))
            }
            _ => Err(ColorError::BadLength(hex.to_string())),
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// CSS `rgba(...)` string with the given alpha.
    pub fn to_css_rgba(self, alpha: f32) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, alpha.clamp(0.0, 1.0))
    }

    /// Lighten (positive) or darken (negative) by `percent`.
    ///
    /// Each channel moves by `round(2.55 * percent)` and clamps to `[0, 255]`.
    pub fn shade(self, percent: f32) -> Self {
        // anything past ±100% already saturates every channel
        let amount = (2.55 * percent.clamp(-100.0, 100.0)).round() as i32;
        let adjust = |c: u8| (c as i32 + amount).clamp(0, 255) as u8;
        Self::new(adjust(self.r), adjust(self.g), adjust(self.b))
    }

    /// Linear blend toward `other` (`t = 0` keeps `self`).
    pub fn mix(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let blend = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self::new(blend(self.r, other.r), blend(self.g, other.g), blend(self.b, other.b))
    }

    /// Parse content-supplied color text, warning and using `fallback`
    /// when it is not a valid hex color.
    pub fn parse_or(hex: &str, fallback: Rgb) -> Rgb {
        match Self::from_hex(hex) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("{}; using {}", e, fallback);
                fallback
            }
        }
    }

    /// Channels as 0.0..=1.0 floats.
    pub fn to_unit(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_hex()
    }
}

/// Color with a separate opacity, used for shadows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f32,
}

impl Rgba {
    pub const fn new(rgb: Rgb, alpha: f32) -> Self {
        Self { rgb, alpha }
    }

    pub fn to_css(self) -> String {
        self.rgb.to_css_rgba(self.alpha)
    }
}

/// Shade a hex color string by a signed percentage.
pub fn shade_color(hex: &str, percent: f32) -> Result<String, ColorError> {
    Ok(Rgb::from_hex(hex)?.shade(percent).to_hex())
}
