// Named colors used by the chart styles

use anyhow::{anyhow, Result};
use plotters::style::RGBColor;

/// CSS color names the chart configuration may refer to
const NAMED_COLORS: &[(&str, (u8, u8, u8))] = &[
    ("black", (0, 0, 0)),
    ("white", (255, 255, 255)),
    ("grey", (128, 128, 128)),
    ("gray", (128, 128, 128)),
    ("lightgrey", (211, 211, 211)),
    ("lightgray", (211, 211, 211)),
    ("darkgrey", (169, 169, 169)),
    ("darkgray", (169, 169, 169)),
    ("lightskyblue", (135, 206, 250)),
    ("skyblue", (135, 206, 235)),
    ("steelblue", (70, 130, 180)),
    ("blue", (0, 0, 255)),
    ("orange", (255, 165, 0)),
    ("green", (0, 128, 0)),
    ("red", (255, 0, 0)),
    ("purple", (128, 0, 128)),
    ("brown", (165, 42, 42)),
    ("pink", (255, 192, 203)),
    ("olive", (128, 128, 0)),
    ("cyan", (0, 255, 255)),
];

/// Resolve a CSS color name or `#rrggbb` string
pub fn parse_color(spec: &str) -> Result<RGBColor> {
    let spec = spec.trim();
    if let Some(hex) = spec.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| anyhow!("Invalid hex color '{}'", spec));
    }

    NAMED_COLORS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(spec))
        .map(|&(_, (r, g, b))| RGBColor(r, g, b))
        .ok_or_else(|| anyhow!("Unknown color '{}'", spec))
}

fn parse_hex(hex: &str) -> Option<RGBColor> {
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}
