//! Hex formatting, luma brightness and the style derived from the dominant color.

use palette::Srgb;
use serde::Serialize;

/// Text color used on dark backgrounds.
pub const WHITE_TEXT: &str = "#ffffff";
/// Text color used on light backgrounds.
pub const BLACK_TEXT: &str = "#000000";

/// Luma below this switches text to white.
pub const BRIGHTNESS_THRESHOLD: f64 = 128.0;

/// Lowercase `#rrggbb`.
pub fn rgb_to_hex(color: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

/// Perceptual brightness: `0.299 R + 0.587 G + 0.114 B`, in 0..=255.
pub fn brightness(color: Srgb<u8>) -> f64 {
    // Integer weights keep exact values such as 128 exact.
    let weighted = 299 * u32::from(color.red) + 587 * u32::from(color.green) + 114 * u32::from(color.blue);
    f64::from(weighted) / 1000.0
}

/// Legible text color for content drawn on `background`.
pub fn text_color(background: Srgb<u8>) -> &'static str {
    if brightness(background) < BRIGHTNESS_THRESHOLD {
        WHITE_TEXT
    } else {
        BLACK_TEXT
    }
}

/// Page-level colors, derived purely from the dominant color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleConfig {
    pub background: String,
    pub text_color: String,
}

impl StyleConfig {
    pub fn for_dominant(dominant: Srgb<u8>) -> Self {
        Self {
            background: rgb_to_hex(dominant),
            text_color: text_color(dominant).to_string(),
        }
    }
}
