//! End-to-end tests: encoded upload in, palette report out.
//!
//! Fixtures are generated in memory with the `image` crate.

use std::io::Cursor;

use color_picker::{
    BarChartPng, ExtractOptions, HtmlPage, PaletteError, Render, analyze_bytes,
    analyze_bytes_with_palette, analyze_image, load_image_file,
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format).unwrap();
    buf
}

/// Left 3/4 dark navy, right 1/4 pale yellow.
fn two_tone(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, _| {
        if x < width * 3 / 4 {
            Rgb([20, 30, 70])
        } else {
            Rgb([250, 240, 180])
        }
    })
}

fn stripes() -> RgbImage {
    let bands: [[u8; 3]; 5] = [
        [230, 57, 70],
        [241, 250, 238],
        [168, 218, 220],
        [69, 123, 157],
        [29, 53, 87],
    ];
    RgbImage::from_fn(50, 20, |x, y| {
        let band = bands[(x / 10) as usize];
        // small per-pixel jitter so clustering has real work to do
        let j = ((x + y) % 3) as u8;
        Rgb([band[0].saturating_add(j), band[1].saturating_sub(j), band[2]])
    })
}

// ============================================================================
// Palette contents
// ============================================================================

#[test]
fn png_two_tone_palette() {
    let bytes = encode(DynamicImage::ImageRgb8(two_tone(8, 4)), ImageFormat::Png);
    let report = analyze_bytes(&bytes, 2, &ExtractOptions::default()).unwrap();

    assert_eq!(report.hex_colors(), vec!["#141e46", "#faf0b4"]);
    assert_eq!(report.swatches[0].count, 24);
    assert_eq!(report.swatches[1].count, 8);
    assert_eq!(report.dominant, "#141e46");
    assert_eq!(report.text_color, "#ffffff");
}

#[test]
fn light_dominant_gets_black_text() {
    let img = RgbImage::from_fn(4, 4, |x, y| {
        if x == 0 && y == 0 { Rgb([0, 0, 0]) } else { Rgb([240, 240, 240]) }
    });
    let bytes = encode(DynamicImage::ImageRgb8(img), ImageFormat::Png);
    let report = analyze_bytes(&bytes, 1, &ExtractOptions::default()).unwrap();

    assert_eq!(report.hex_colors(), vec!["#f0f0f0"]);
    assert_eq!(report.text_color, "#000000");
    assert_eq!(report.style.background, "#f0f0f0");
}

#[test]
fn rgba_upload_ignores_alpha() {
    let img = RgbaImage::from_fn(3, 3, |x, _| Rgba([10, 200, 30, (x * 100) as u8]));
    let bytes = encode(DynamicImage::ImageRgba8(img), ImageFormat::Png);
    let report = analyze_bytes(&bytes, 1, &ExtractOptions::default()).unwrap();

    assert_eq!(report.hex_colors(), vec!["#0ac81e"]);
    assert_eq!(report.swatches[0].count, 9);
}

#[test]
fn jpeg_upload_yields_every_requested_color() {
    let bytes = encode(DynamicImage::ImageRgb8(stripes()), ImageFormat::Jpeg);
    for k in 1..=10 {
        let report = analyze_bytes(&bytes, k, &ExtractOptions::default()).unwrap();
        assert_eq!(report.swatches.len(), k);
        for s in &report.swatches {
            assert_eq!(s.hex.len(), 7);
            assert!(s.hex.starts_with('#'));
            assert!(s.hex[1..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
        let counts: Vec<usize> = report.swatches.iter().map(|s| s.count).collect();
        assert!(counts.windows(2).all(|w| w[0] >= w[1]), "k={k}: {counts:?}");
    }
}

#[test]
fn same_upload_same_palette() {
    let bytes = encode(DynamicImage::ImageRgb8(stripes()), ImageFormat::Png);
    let opts = ExtractOptions::default();
    for k in [2, 5, 10] {
        let a = analyze_bytes(&bytes, k, &opts).unwrap();
        let b = analyze_bytes(&bytes, k, &opts).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn downsampled_run_still_finds_dominant() {
    let bytes = encode(DynamicImage::ImageRgb8(two_tone(400, 100)), ImageFormat::Png);
    let opts = ExtractOptions {
        max_side: Some(40),
        ..Default::default()
    };
    let report = analyze_bytes(&bytes, 2, &opts).unwrap();
    assert_eq!(report.dominant, "#141e46");
    let total: usize = report.swatches.iter().map(|s| s.count).sum();
    assert_eq!(total, 40 * 10);
}

// ============================================================================
// Presentation
// ============================================================================

#[test]
fn renders_page_and_bar_chart() {
    let bytes = encode(DynamicImage::ImageRgb8(two_tone(8, 4)), ImageFormat::Png);
    let (palette, report) = analyze_bytes_with_palette(&bytes, 3, &ExtractOptions::default()).unwrap();

    let html = HtmlPage::default().render(&palette, &report.style).unwrap();
    assert!(html.contains("background-color: #141e46; color: #ffffff;"));
    assert_eq!(html.matches("class=\"color-box\"").count(), 3);

    let png = BarChartPng::default().render(&palette, &report.style).unwrap();
    let chart = image::load_from_memory(&png).unwrap();
    assert_eq!((chart.width(), chart.height()), (300, 100));
}

#[test]
fn file_upload_page_shows_image() {
    let path = std::env::temp_dir().join(format!("color_picker_upload_{}.png", std::process::id()));
    std::fs::write(
        &path,
        encode(DynamicImage::ImageRgb8(two_tone(8, 4)), ImageFormat::Png),
    )
    .unwrap();
    let img = load_image_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let (palette, report) = analyze_image(&img, 2, &ExtractOptions::default()).unwrap();
    assert_eq!(report.hex_colors(), vec!["#141e46", "#faf0b4"]);

    let html = HtmlPage::default()
        .with_source_image(img)
        .render(&palette, &report.style)
        .unwrap();
    assert!(html.contains("<img src=\"data:image/png;base64,"));
}

// ============================================================================
// Error handling
// ============================================================================

#[test]
fn invalid_bytes_are_decode_errors() {
    let err = analyze_bytes(&[0u8; 32], 3, &ExtractOptions::default()).unwrap_err();
    assert!(matches!(err, PaletteError::Decode { .. }));
}

#[test]
fn k_bounds_are_enforced() {
    let bytes = encode(DynamicImage::ImageRgb8(two_tone(8, 4)), ImageFormat::Png);
    for k in [0, 11] {
        let err = analyze_bytes(&bytes, k, &ExtractOptions::default()).unwrap_err();
        assert!(matches!(err, PaletteError::InvalidParameter { .. }), "k={k}");
    }
}

#[test]
fn bad_options_are_rejected() {
    let bytes = encode(DynamicImage::ImageRgb8(two_tone(8, 4)), ImageFormat::Png);
    let opts = ExtractOptions {
        max_iterations: 0,
        ..Default::default()
    };
    let err = analyze_bytes(&bytes, 3, &opts).unwrap_err();
    assert!(matches!(
        err,
        PaletteError::InvalidParameter { parameter: "max_iterations", .. }
    ));
}
