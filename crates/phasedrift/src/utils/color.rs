//! Velocity-to-colour mapping for trajectory points.
//!
//! Speed is mapped onto the hue wheel: slow segments are red, and the hue
//! advances by a full turn every 10 units of speed. Saturation and lightness
//! are fixed so every point stays equally vivid.

use crate::physics::math::Scalar;
use bevy::prelude::*;

/// Hue turns per unit of speed
pub const HUE_PER_SPEED: Scalar = 0.1;

const SATURATION: f32 = 1.0;
const LIGHTNESS: f32 = 0.5;

/// Plain sRGB triple with components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::srgb(rgb.r, rgb.g, rgb.b)
    }
}

/// Hue in turns, `(speed · 0.1) mod 1`
///
/// Non-finite speeds map to hue zero.
#[must_use]
pub fn velocity_hue(speed: Scalar) -> Scalar {
    let hue = (speed * HUE_PER_SPEED).rem_euclid(1.0);
    if hue.is_finite() { hue } else { 0.0 }
}

/// Colour for a trajectory point moving at `speed`
#[must_use]
pub fn velocity_color(speed: Scalar) -> Rgb {
    let hue_degrees = (velocity_hue(speed) * 360.0) as f32;

    // Bevy's HSL conversion, taken back to sRGB for storage
    let srgba = Color::hsl(hue_degrees, SATURATION, LIGHTNESS).to_srgba();
    Rgb::new(srgba.red, srgba.green, srgba.blue)
}
