// SPDX-License-Identifier: GPL-3.0-or-later
//! Toolkit-agnostic color value type.
//!
//! Colors travel through the crate as 8-bit RGB triples and cross every
//! boundary (settings files, sync envelopes, palette catalogs) as `#rrggbb`
//! hex strings. Brightness adjustment goes through an HSV round trip so
//! hue and saturation are preserved while only the value channel moves.

use crate::defaults::{DARKEN_FACTOR, LIGHTEN_FACTOR};
use crate::error::{Error, Result};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from a packed `0xRRGGBB` literal.
    #[must_use]
    pub const fn from_u32(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
        }
    }

    /// Parses a `#rrggbb` hex color string.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` if the string is not exactly seven
    /// characters starting with `#`, or contains non-hex digits.
    pub fn from_hex(hex: &str) -> Result<Self> {
        // ASCII check keeps the byte-range slices below on char boundaries.
        if hex.len() != 7 || !hex.is_ascii() || !hex.starts_with('#') {
            return Err(Error::Validation(format!(
                "invalid color '{}': expected a #rrggbb hex string",
                hex
            )));
        }

        let parse = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| {
                Error::Validation(format!(
                    "invalid color '{}': expected a #rrggbb hex string",
                    hex
                ))
            })
        };

        Ok(Self {
            r: parse(1..3)?,
            g: parse(3..5)?,
            b: parse(5..7)?,
        })
    }

    /// Formats the color as a lowercase `#rrggbb` string.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Scales the HSV value channel by `factor`, clamping into [0, 1].
    /// Hue and saturation are unchanged.
    #[must_use]
    pub fn adjust_brightness(self, factor: f32) -> Self {
        let (h, s, v) = self.to_hsv();
        Self::from_hsv(h, s, (v * factor).clamp(0.0, 1.0))
    }

    /// Darkens the color by the default factor (pressed/active shades).
    #[must_use]
    pub fn darken(self) -> Self {
        self.adjust_brightness(DARKEN_FACTOR)
    }

    /// Lightens the color by the default factor (hover/highlight shades).
    #[must_use]
    pub fn lighten(self) -> Self {
        self.adjust_brightness(LIGHTEN_FACTOR)
    }

    fn to_hsv(self) -> (f32, f32, f32) {
        let r = f32::from(self.r) / 255.0;
        let g = f32::from(self.g) / 255.0;
        let b = f32::from(self.b) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let hue = if delta == 0.0 {
            0.0
        } else if max == r {
            60.0 * (((g - b) / delta).rem_euclid(6.0))
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };

        let saturation = if max == 0.0 { 0.0 } else { delta / max };
        (hue, saturation, max)
    }

    fn from_hsv(hue: f32, saturation: f32, value: f32) -> Self {
        let c = value * saturation;
        let x = c * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
        let m = value - c;

        let (r, g, b) = match hue {
            h if h < 60.0 => (c, x, 0.0),
            h if h < 120.0 => (x, c, 0.0),
            h if h < 180.0 => (0.0, c, x),
            h if h < 240.0 => (0.0, x, c),
            h if h < 300.0 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        Self {
            r: ((r + m) * 255.0).round() as u8,
            g: ((g + m) * 255.0).round() as u8,
            b: ((b + m) * 255.0).round() as u8,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        struct HexVisitor;

        impl Visitor<'_> for HexVisitor {
            type Value = Color;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a #rrggbb hex color string")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<Color, E> {
                Color::from_hex(value).map_err(|e| E::custom(e.to_string()))
            }
        }

        deserializer.deserialize_str(HexVisitor)
    }
}
