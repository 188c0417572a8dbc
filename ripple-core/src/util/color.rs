//! RGB Color
//!
//! A small value type for key colors. Every channel is a byte, so the
//! clamping contract of the lighting pipeline is carried by the type itself:
//! constructors that accept wider integers clamp into `0..=255`, and every
//! arithmetic helper saturates instead of wrapping.

use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// An RGB triple with each channel in `0..=255`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// No light.
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    /// Full white.
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Create a color from byte channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from arbitrary integers, clamping each channel.
    pub fn from_ints(r: i32, g: i32, b: i32) -> Self {
        Self::rgb(clamp_channel(r), clamp_channel(g), clamp_channel(b))
    }

    /// Whether this color contributes no light.
    pub fn is_black(&self) -> bool {
        *self == Self::BLACK
    }

    /// Scale every channel by `intensity / 256`.
    ///
    /// `scale(204)` is roughly 80% brightness and `scale(102)` roughly 40%.
    /// Note that `scale(255)` is not the identity: a full channel of 255
    /// comes out as 254.
    pub fn scale(self, intensity: u8) -> Self {
        let scale = |c: u8| ((u16::from(c) * u16::from(intensity)) >> 8) as u8;
        Self::rgb(scale(self.r), scale(self.g), scale(self.b))
    }

    /// Channel-wise add, saturating at 255.
    pub fn saturating_add(self, other: Color) -> Self {
        Self::rgb(
            self.r.saturating_add(other.r),
            self.g.saturating_add(other.g),
            self.b.saturating_add(other.b),
        )
    }

    /// Move toward white by `factor` (clamped to `0.0..=1.0`).
    pub fn lighten(self, factor: f32) -> Self {
        self.blend(Self::WHITE, factor)
    }

    /// Linear interpolation toward `other` by `factor` (clamped to `0.0..=1.0`).
    pub fn blend(self, other: Color, factor: f32) -> Self {
        let factor = if factor.is_nan() { 0.0 } else { factor.clamp(0.0, 1.0) };
        let mix = |from: u8, to: u8| {
            let from = f32::from(from);
            (from + (f32::from(to) - from) * factor) as i32
        };
        Self::from_ints(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }

    /// Uppercase `#RRGGBB` form.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, rhs: Color) -> Color {
        self.saturating_add(rhs)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

fn clamp_channel(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_ints_clamps() {
        assert_eq!(Color::from_ints(-20, 128, 999), Color::rgb(0, 128, 255));
    }

    #[test]
    fn scale_uses_shift_by_eight() {
        let red = Color::rgb(255, 0, 0);
        assert_eq!(red.scale(204), Color::rgb(203, 0, 0));
        assert_eq!(red.scale(102), Color::rgb(101, 0, 0));
        assert_eq!(red.scale(0), Color::BLACK);
    }

    #[test]
    fn add_saturates() {
        let a = Color::rgb(100, 10, 250);
        let b = Color::rgb(200, 20, 10);
        assert_eq!(a + b, Color::rgb(255, 30, 255));
    }

    #[test]
    fn blend_and_lighten() {
        let black = Color::BLACK;
        assert_eq!(black.blend(Color::rgb(200, 100, 50), 0.5), Color::rgb(100, 50, 25));
        assert_eq!(black.lighten(1.0), Color::WHITE);
        // Out-of-range factors clamp rather than overshoot.
        assert_eq!(black.lighten(4.0), Color::WHITE);
        assert_eq!(Color::rgb(10, 10, 10).blend(Color::WHITE, -1.0), Color::rgb(10, 10, 10));
    }

    #[test]
    fn hex_formatting() {
        assert_eq!(Color::rgb(255, 8, 171).to_hex(), "#FF08AB");
        assert_eq!(format!("{}", Color::BLACK), "#000000");
    }
}
