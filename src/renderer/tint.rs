//! Tint colors for faces with a tint index.

use crate::error::{RenderError, Result};
use std::collections::HashMap;

/// RGBA multiplier applied to tinted faces, channel by channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tint(pub [u8; 4]);

impl Default for Tint {
    fn default() -> Self {
        Tint::WHITE
    }
}

impl Tint {
    /// Leaves colors unchanged.
    pub const WHITE: Tint = Tint([255, 255, 255, 255]);

    /// Default plains foliage color, #77AB2F.
    pub const FOLIAGE: Tint = Tint([0x77, 0xAB, 0x2F, 255]);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Tint([r, g, b, 255])
    }

    /// Parse `RRGGBB` or `RRGGBBAA`, with or without a leading `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
            return None;
        }

        let mut channels = [255u8; 4];
        for (i, channel) in channels.iter_mut().enumerate().take(digits.len() / 2) {
            *channel = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16).ok()?;
        }

        Some(Tint(channels))
    }

    /// Redstone wire color for a power level, from dark red at 0 to bright
    /// red at 15. Levels above 15 are clamped.
    pub fn redstone(power: u8) -> Self {
        let level = f64::from(power.min(15)) / 15.0;
        let red = if power == 0 { 0.3 } else { level * 0.6 + 0.4 };
        let green = (level * level * 0.7 - 0.5).max(0.0);
        let blue = (level * level * 0.6 - 0.7).max(0.0);

        let to_byte = |c: f64| (c.clamp(0.0, 1.0) * 255.0) as u8;
        Tint::rgb(to_byte(red), to_byte(green), to_byte(blue))
    }

    /// Multiply a color by the tint; results truncate toward zero.
    pub fn apply(self, color: [u8; 4]) -> [u8; 4] {
        let mut out = color;
        for (channel, tint) in out.iter_mut().zip(self.0) {
            *channel = (u16::from(*channel) * u16::from(tint) / 255) as u8;
        }
        out
    }
}

/// Where the tint of one block state comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TintSource {
    /// The same tint for every state.
    Fixed(Tint),
    /// [`Tint::redstone`] of the state's `power` property.
    RedstonePower,
}

impl From<Tint> for TintSource {
    fn from(tint: Tint) -> Self {
        TintSource::Fixed(tint)
    }
}

impl TintSource {
    pub fn tint_for(&self, properties: &HashMap<String, String>) -> Result<Tint> {
        match self {
            TintSource::Fixed(tint) => Ok(*tint),
            TintSource::RedstonePower => {
                let power = properties.get("power").ok_or_else(|| {
                    RenderError::InvalidStateSpec("redstone tint needs a power property".into())
                })?;
                power.parse::<u8>().map(Tint::redstone).map_err(|_| {
                    RenderError::InvalidStateSpec(format!("power '{}' is not a number", power))
                })
            }
        }
    }
}
