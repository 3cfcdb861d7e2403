//! Image decoding.
//!
//! Uploads are sniffed from their bytes rather than trusted by extension, and
//! only JPEG and PNG are accepted. Alpha is dropped on the way in.

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, ImageReader, RgbImage};
use log::debug;

use crate::error::{PaletteError, Result};

/// Decode JPEG or PNG bytes into an RGB pixel grid.
pub fn decode_image(input: &[u8]) -> Result<RgbImage> {
    let reader = ImageReader::new(Cursor::new(input))
        .with_guessed_format()
        .map_err(|e| PaletteError::decode("could not sniff format", e.into()))?;

    match reader.format() {
        Some(ImageFormat::Jpeg | ImageFormat::Png) => {}
        Some(other) => {
            return Err(PaletteError::Decode {
                message: format!("unsupported format {other:?}, expected JPEG or PNG"),
                source: None,
            });
        }
        None => {
            return Err(PaletteError::Decode {
                message: "unrecognised image data".to_string(),
                source: None,
            });
        }
    }

    let img = reader
        .decode()
        .map_err(|e| PaletteError::decode("corrupt image data", e))?;
    let rgb = img.to_rgb8();
    debug!("decoded {}x{} image", rgb.width(), rgb.height());
    Ok(rgb)
}

/// Read an image from disk and decode it.
pub fn load_image_file(path: &Path) -> Result<RgbImage> {
    let bytes = std::fs::read(path).map_err(|source| PaletteError::Io {
        path: path.display().to_string(),
        source,
    })?;
    decode_image(&bytes)
}
