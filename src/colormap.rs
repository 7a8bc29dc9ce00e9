//! Colormap registry.
//!
//! Each map is a short list of color stops sampled from the matplotlib
//! originals and linearly interpolated in sRGB.

use crate::error::{RenderError, Result};
use serde::{Deserialize, Serialize};

/// Built-in colormap names (case-sensitive).
pub const SUPPORTED: [&str; 6] = ["viridis", "magma", "inferno", "plasma", "hot", "gray"];

type Stop = (f64, [u8; 3]);

const VIRIDIS: &[Stop] = &[
    (0.000, [0x44, 0x01, 0x54]),
    (0.125, [0x47, 0x2d, 0x7b]),
    (0.250, [0x3b, 0x52, 0x8b]),
    (0.375, [0x2c, 0x72, 0x8e]),
    (0.500, [0x21, 0x91, 0x8c]),
    (0.625, [0x28, 0xae, 0x80]),
    (0.750, [0x5e, 0xc9, 0x62]),
    (0.875, [0xad, 0xdc, 0x30]),
    (1.000, [0xfd, 0xe7, 0x25]),
];

const MAGMA: &[Stop] = &[
    (0.000, [0x00, 0x00, 0x04]),
    (0.125, [0x1c, 0x10, 0x44]),
    (0.250, [0x4f, 0x12, 0x7b]),
    (0.375, [0x81, 0x25, 0x81]),
    (0.500, [0xb5, 0x36, 0x7a]),
    (0.625, [0xe5, 0x50, 0x64]),
    (0.750, [0xfb, 0x87, 0x61]),
    (0.875, [0xfe, 0xc2, 0x87]),
    (1.000, [0xfc, 0xfd, 0xbf]),
];

const INFERNO: &[Stop] = &[
    (0.000, [0x00, 0x00, 0x04]),
    (0.125, [0x1f, 0x0c, 0x48]),
    (0.250, [0x55, 0x0f, 0x6d]),
    (0.375, [0x88, 0x22, 0x6a]),
    (0.500, [0xba, 0x36, 0x55]),
    (0.625, [0xe3, 0x59, 0x33]),
    (0.750, [0xf9, 0x8e, 0x09]),
    (0.875, [0xf9, 0xcb, 0x35]),
    (1.000, [0xfc, 0xff, 0xa4]),
];

const PLASMA: &[Stop] = &[
    (0.000, [0x0d, 0x08, 0x87]),
    (0.125, [0x4c, 0x02, 0xa1]),
    (0.250, [0x7e, 0x03, 0xa8]),
    (0.375, [0xa9, 0x23, 0x95]),
    (0.500, [0xcc, 0x47, 0x78]),
    (0.625, [0xe5, 0x6b, 0x5d]),
    (0.750, [0xf8, 0x95, 0x40]),
    (0.875, [0xfd, 0xc5, 0x27]),
    (1.000, [0xf0, 0xf9, 0x21]),
];

const HOT: &[Stop] = &[
    (0.000, [0x0b, 0x00, 0x00]),
    (0.365, [0xff, 0x00, 0x00]),
    (0.746, [0xff, 0xff, 0x00]),
    (1.000, [0xff, 0xff, 0xff]),
];

const GRAY: &[Stop] = &[(0.0, [0x00, 0x00, 0x00]), (1.0, [0xff, 0xff, 0xff])];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    #[default]
    Viridis,
    Magma,
    Inferno,
    Plasma,
    Hot,
    Gray,
}

impl Colormap {
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "viridis" => Ok(Colormap::Viridis),
            "magma" => Ok(Colormap::Magma),
            "inferno" => Ok(Colormap::Inferno),
            "plasma" => Ok(Colormap::Plasma),
            "hot" => Ok(Colormap::Hot),
            "gray" => Ok(Colormap::Gray),
            _ => Err(RenderError::UnknownColormap {
                name: name.to_string(),
                supported: SUPPORTED.join(", "),
            }),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Colormap::Viridis => "viridis",
            Colormap::Magma => "magma",
            Colormap::Inferno => "inferno",
            Colormap::Plasma => "plasma",
            Colormap::Hot => "hot",
            Colormap::Gray => "gray",
        }
    }

    fn stops(self) -> &'static [Stop] {
        match self {
            Colormap::Viridis => VIRIDIS,
            Colormap::Magma => MAGMA,
            Colormap::Inferno => INFERNO,
            Colormap::Plasma => PLASMA,
            Colormap::Hot => HOT,
            Colormap::Gray => GRAY,
        }
    }

    /// Color at position `t` of the scale; `t` is clamped to `[0, 1]`.
    pub fn sample(self, t: f64) -> [u8; 3] {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let stops = self.stops();
        let upper = stops
            .iter()
            .position(|&(pos, _)| pos >= t)
            .unwrap_or(stops.len() - 1);
        if upper == 0 {
            return stops[0].1;
        }
        let (p0, c0) = stops[upper - 1];
        let (p1, c1) = stops[upper];
        let f = (t - p0) / (p1 - p0);
        let mut out = [0u8; 3];
        for ch in 0..3 {
            let v = c0[ch] as f64 + (c1[ch] as f64 - c0[ch] as f64) * f;
            out[ch] = v.round().clamp(0.0, 255.0) as u8;
        }
        out
    }
}

/// Parse `#rrggbb` (leading `#` optional).
pub fn parse_hex_color(hex: &str) -> Result<[u8; 3]> {
    let digits = hex.trim().trim_start_matches('#');
    let invalid = || RenderError::InvalidParameter(format!("'{}' is not a #rrggbb color", hex));
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(invalid());
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
    Ok([channel(0)?, channel(2)?, channel(4)?])
}
