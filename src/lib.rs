//! # color_picker
//!
//! Pull the dominant colors out of an image and present them as a palette.
//!
//! The pipeline is linear: [`loader`] decodes JPEG/PNG bytes, [`extract`]
//! reduces the pixels to `k` colors ordered by prevalence, [`format`] turns
//! those into hex codes and a legible text color, and [`present`] renders the
//! result.
//!
//! ```rust,no_run
//! use color_picker::{analyze_bytes, ExtractOptions};
//!
//! let bytes = std::fs::read("photo.png")?;
//! let report = analyze_bytes(&bytes, 5, &ExtractOptions::default())?;
//! println!("{} on {}", report.text_color, report.dominant);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use js_sys::{Array, Object, Reflect};
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod extract;
pub mod format;
pub mod loader;
pub mod present;

pub use config::{DEFAULT_SEED, ExtractOptions, MAX_COLORS, MIN_COLORS};
pub use error::{PaletteError, Result};
pub use extract::{Cluster, Palette, cluster, dominant_colors};
pub use format::{StyleConfig, brightness, rgb_to_hex, text_color};
pub use loader::{decode_image, load_image_file};
pub use present::{BarChartPng, HtmlPage, Render, TerminalText};

/// One palette entry as handed to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwatchEntry {
    /// 1-based prevalence rank
    pub rank: usize,
    pub hex: String,
    pub rgb: [u8; 3],
    pub count: usize,
    pub share: f64,
}

/// Everything a presentation layer needs from one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteReport {
    pub swatches: Vec<SwatchEntry>,
    pub dominant: String,
    pub text_color: String,
    pub style: StyleConfig,
}

impl PaletteReport {
    pub fn new(palette: &Palette) -> Self {
        let style = StyleConfig::for_dominant(palette.dominant());
        let swatches = palette
            .clusters()
            .iter()
            .enumerate()
            .map(|(i, c)| SwatchEntry {
                rank: i + 1,
                hex: rgb_to_hex(c.color),
                rgb: [c.color.red, c.color.green, c.color.blue],
                count: c.count,
                share: palette.share(i),
            })
            .collect();

        Self {
            swatches,
            dominant: style.background.clone(),
            text_color: style.text_color.clone(),
            style,
        }
    }

    pub fn hex_colors(&self) -> Vec<&str> {
        self.swatches.iter().map(|s| s.hex.as_str()).collect()
    }
}

/// Decode, extract and format in one call.
pub fn analyze_bytes(input: &[u8], n_colors: usize, options: &ExtractOptions) -> Result<PaletteReport> {
    let (_, report) = analyze_bytes_with_palette(input, n_colors, options)?;
    Ok(report)
}

/// As [`analyze_bytes`], also returning the palette for renderers.
pub fn analyze_bytes_with_palette(
    input: &[u8],
    n_colors: usize,
    options: &ExtractOptions,
) -> Result<(Palette, PaletteReport)> {
    config::validate_color_count(n_colors)?;
    let img = decode_image(input)?;
    analyze_image(&img, n_colors, options)
}

/// Extract and format an already decoded image.
pub fn analyze_image(
    image: &image::RgbImage,
    n_colors: usize,
    options: &ExtractOptions,
) -> Result<(Palette, PaletteReport)> {
    let palette = dominant_colors(image, n_colors, options)?;
    let report = PaletteReport::new(&palette);
    Ok((palette, report))
}

/// Extract a palette from image bytes in the browser.
///
/// Returns `{ palette: string[], counts: number[], dominant, textColor, background }`.
#[wasm_bindgen(js_name = extractPalette)]
pub fn extract_palette(input: Vec<u8>, n_colors: usize) -> std::result::Result<Object, JsValue> {
    let report = analyze_bytes(&input, n_colors, &ExtractOptions::default())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let palette_js = Array::new();
    let counts_js = Array::new();
    for swatch in &report.swatches {
        palette_js.push(&JsValue::from_str(&swatch.hex));
        counts_js.push(&JsValue::from_f64(swatch.count as f64));
    }

    let result = Object::new();
    Reflect::set(&result, &JsValue::from_str("palette"), &palette_js)?;
    Reflect::set(&result, &JsValue::from_str("counts"), &counts_js)?;
    Reflect::set(&result, &JsValue::from_str("dominant"), &JsValue::from_str(&report.dominant))?;
    Reflect::set(&result, &JsValue::from_str("textColor"), &JsValue::from_str(&report.text_color))?;
    Reflect::set(&result, &JsValue::from_str("background"), &JsValue::from_str(&report.style.background))?;

    Ok(result)
}

/// Render the palette as a standalone HTML page for the browser.
#[wasm_bindgen(js_name = renderPaletteHtml)]
pub fn render_palette_html(input: Vec<u8>, n_colors: usize) -> std::result::Result<String, JsValue> {
    let (image, palette, report) = config::validate_color_count(n_colors)
        .and_then(|_| decode_image(&input))
        .and_then(|img| {
            let (palette, report) = analyze_image(&img, n_colors, &ExtractOptions::default())?;
            Ok((img, palette, report))
        })
        .map_err(|e| JsValue::from_str(&e.user_message()))?;
    HtmlPage::default()
        .with_source_image(image)
        .render(&palette, &report.style)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

    fn png(img: RgbImage) -> Vec<u8> {
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut std::io::Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn report_ranks_and_shares() {
        let img = RgbImage::from_fn(4, 1, |x, _| {
            if x == 0 { Rgb([255, 255, 255]) } else { Rgb([18, 52, 86]) }
        });
        let report = analyze_bytes(&png(img), 2, &ExtractOptions::default()).unwrap();

        assert_eq!(report.hex_colors(), vec!["#123456", "#ffffff"]);
        assert_eq!(report.swatches[0].rank, 1);
        assert_eq!(report.swatches[0].count, 3);
        assert_eq!(report.swatches[1].share, 0.25);
        assert_eq!(report.dominant, "#123456");
        assert_eq!(report.text_color, "#ffffff");
    }

    #[test]
    fn report_serializes_camel_case() {
        let img = RgbImage::from_pixel(2, 2, Rgb([250, 250, 250]));
        let report = analyze_bytes(&png(img), 1, &ExtractOptions::default()).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["textColor"], "#000000");
        assert_eq!(json["style"]["background"], "#fafafa");
        assert_eq!(json["swatches"][0]["rgb"], serde_json::json!([250, 250, 250]));
    }

    #[test]
    fn bad_k_reported_before_decoding() {
        let err = analyze_bytes(b"not an image", 0, &ExtractOptions::default()).unwrap_err();
        assert!(matches!(err, PaletteError::InvalidParameter { .. }));
    }
}
