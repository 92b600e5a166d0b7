//! Fixed chart colors: the series palette, the muscle-group colors and a small
//! RGB type that deserializes from `#rrggbb` strings.

use plotters::style::{RGBAColor, RGBColor};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (leading `#` optional, case-insensitive).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let h = hex.trim().trim_start_matches('#');
        if h.len() != 6 || !h.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&h[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn rgb(self) -> RGBColor {
        RGBColor(self.r, self.g, self.b)
    }

    /// Translucent variant, used for stacked segments that share one hue.
    pub fn alpha(self, a: f64) -> RGBAColor {
        RGBAColor(self.r, self.g, self.b, a.clamp(0.0, 1.0))
    }
}

impl TryFrom<String> for Rgb8 {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Rgb8::from_hex(&s).ok_or_else(|| format!("invalid color '{s}', expected #rrggbb"))
    }
}

impl From<Rgb8> for String {
    fn from(c: Rgb8) -> Self {
        c.to_hex()
    }
}

// Series palette: light blue, orange, brown, blue, green, purple, red, gray.
pub const LIGHT_BLUE: Rgb8 = Rgb8::new(0x9e, 0xca, 0xe1);
pub const ORANGE: Rgb8 = Rgb8::new(0xff, 0x7f, 0x0e);
pub const BROWN: Rgb8 = Rgb8::new(0x8c, 0x56, 0x4b);
pub const BLUE: Rgb8 = Rgb8::new(0x1f, 0x77, 0xb4);
pub const GREEN: Rgb8 = Rgb8::new(0x2c, 0xa0, 0x2c);
pub const PURPLE: Rgb8 = Rgb8::new(0x94, 0x67, 0xbd);
pub const RED: Rgb8 = Rgb8::new(0xd6, 0x27, 0x28);
pub const GRAY: Rgb8 = Rgb8::new(0x7f, 0x7f, 0x7f);

/// Surplus/deficit segments and total annotations.
pub const NEUTRAL: Rgb8 = Rgb8::new(0x9e, 0x9e, 0x9e);

/// Values printed inside stacked segments.
pub const WHITE: Rgb8 = Rgb8::new(0xff, 0xff, 0xff);

pub const PALETTE: [Rgb8; 8] = [LIGHT_BLUE, ORANGE, BROWN, BLUE, GREEN, PURPLE, RED, GRAY];

/// Palette color by index, wrapping around.
#[inline]
pub fn palette_color(idx: usize) -> Rgb8 {
    PALETTE[idx % PALETTE.len()]
}
