//! Presentation of a computed palette.
//!
//! Nothing here feeds back into extraction; each renderer turns a finished
//! [`Palette`] plus its [`StyleConfig`] into some output.

use std::fmt::Write as _;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{ImageFormat, Rgb, RgbImage};

use crate::error::{PaletteError, Result};
use crate::extract::Palette;
use crate::format::{StyleConfig, rgb_to_hex};

/// Turns a palette into a displayable artifact.
pub trait Render {
    type Output;

    fn render(&self, palette: &Palette, style: &StyleConfig) -> Result<Self::Output>;
}

/// Standalone HTML document with swatches, hex labels and a palette strip.
#[derive(Debug, Clone)]
pub struct HtmlPage {
    pub title: String,
    /// Uploaded image shown above the palette, inlined as a PNG data URI
    pub source_image: Option<RgbImage>,
}

impl Default for HtmlPage {
    fn default() -> Self {
        Self {
            title: "Color Picker".to_string(),
            source_image: None,
        }
    }
}

impl HtmlPage {
    pub fn with_source_image(mut self, image: RgbImage) -> Self {
        self.source_image = Some(image);
        self
    }
}

impl Render for HtmlPage {
    type Output = String;

    fn render(&self, palette: &Palette, style: &StyleConfig) -> Result<String> {
        let mut html = String::new();
        // Writing into a String cannot fail.
        let _ = write!(
            html,
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: 'Segoe UI', sans-serif; background-color: {bg}; color: {fg}; }}
h1, h2 {{ text-align: center; color: {fg}; }}
.swatches {{ text-align: center; }}
.swatch {{ display: inline-block; text-align: center; margin: 10px; }}
.color-box {{ width: 100px; height: 100px; margin: auto; border-radius: 16px; box-shadow: 0 4px 15px rgba(0,0,0,0.1); }}
.hex-code {{ font-weight: bold; margin-top: 8px; font-family: monospace; color: {fg}; }}
.strip {{ display: flex; height: 80px; max-width: 800px; margin: 0 auto; }}
.strip div {{ flex: 1; }}
.upload {{ text-align: center; }}
.upload img {{ max-width: 100%; border-radius: 16px; }}
</style>
</head>
<body>
<h1>{title}</h1>
"#,
            title = escape(&self.title),
            bg = style.background,
            fg = style.text_color,
        );

        if let Some(image) = &self.source_image {
            let png = encode_png(image)?;
            let _ = writeln!(
                html,
                r#"<figure class="upload"><img src="data:image/png;base64,{}" alt="Uploaded image"><figcaption>Uploaded image</figcaption></figure>"#,
                STANDARD.encode(png)
            );
        }

        html.push_str("<h2>Dominant Palette</h2>\n<div class=\"swatches\">\n");

        for cluster in palette.clusters() {
            let hex = rgb_to_hex(cluster.color);
            let _ = writeln!(
                html,
                r#"<div class="swatch"><div class="color-box" style="background-color:{hex};"></div><div class="hex-code">{hex}</div></div>"#
            );
        }

        html.push_str("</div>\n<h2>Palette Strip</h2>\n<div class=\"strip\">\n");
        for cluster in palette.clusters() {
            let _ = writeln!(
                html,
                r#"<div style="background-color:{};"></div>"#,
                rgb_to_hex(cluster.color)
            );
        }
        html.push_str("</div>\n</body>\n</html>\n");
        Ok(html)
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// PNG bar chart: one equal-width cell per palette entry, in rank order.
#[derive(Debug, Clone, Copy)]
pub struct BarChartPng {
    pub cell_width: u32,
    pub height: u32,
}

impl Default for BarChartPng {
    fn default() -> Self {
        Self {
            cell_width: 100,
            height: 100,
        }
    }
}

impl Render for BarChartPng {
    type Output = Vec<u8>;

    fn render(&self, palette: &Palette, _style: &StyleConfig) -> Result<Vec<u8>> {
        if self.cell_width == 0 || self.height == 0 {
            return Err(PaletteError::invalid("bar size", format!("{}x{}", self.cell_width, self.height), "non-zero"));
        }
        let colors = palette.colors();
        let width = u32::try_from(colors.len())
            .ok()
            .and_then(|n| self.cell_width.checked_mul(n))
            .filter(|w| w.checked_mul(self.height).is_some())
            .ok_or_else(|| PaletteError::Render {
                message: format!(
                    "bar chart of {} cells at {}x{} is too large",
                    colors.len(),
                    self.cell_width,
                    self.height
                ),
                source: None,
            })?;
        let img = RgbImage::from_fn(width, self.height, |x, _| {
            let c = colors[(x / self.cell_width) as usize];
            Rgb([c.red, c.green, c.blue])
        });

        encode_png(&img)
    }
}

fn encode_png(img: &RgbImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    {
        let mut cursor = std::io::Cursor::new(&mut buf);
        img.write_to(&mut cursor, ImageFormat::Png).map_err(|e| PaletteError::Render {
            message: "PNG encode error".to_string(),
            source: Some(e),
        })?;
    }
    Ok(buf)
}

/// Plain listing for terminals: rank, hex, pixel count and share.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalText;

impl Render for TerminalText {
    type Output = String;

    fn render(&self, palette: &Palette, style: &StyleConfig) -> Result<String> {
        let mut out = String::new();
        for (rank, cluster) in palette.clusters().iter().enumerate() {
            let _ = writeln!(
                out,
                "{:>2}. {}  {:>8} px  {:>5.1}%",
                rank + 1,
                rgb_to_hex(cluster.color),
                cluster.count,
                palette.share(rank) * 100.0
            );
        }
        let _ = writeln!(out, "background {}  text {}", style.background, style.text_color);
        Ok(out)
    }
}
