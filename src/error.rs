//! Error types for palette extraction

use thiserror::Error;

/// Result type alias for color_picker operations
pub type Result<T> = std::result::Result<T, PaletteError>;

/// Every way a palette request can fail. All of them end the request.
#[derive(Error, Debug)]
pub enum PaletteError {
    /// Bytes are not a readable JPEG or PNG
    #[error("Unable to decode image: {message}")]
    Decode {
        message: String,
        #[source]
        source: Option<image::ImageError>,
    },

    /// Image decoded fine but has no pixels
    #[error("Image contains no pixels")]
    EmptyImage,

    /// Input parameter outside its accepted range
    #[error("Invalid parameter: {parameter} = {value} ({expected})")]
    InvalidParameter {
        parameter: &'static str,
        value: String,
        expected: &'static str,
    },

    /// Reading the input file failed
    #[error("Unable to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Presentation output could not be produced
    #[error("Render error: {message}")]
    Render {
        message: String,
        #[source]
        source: Option<image::ImageError>,
    },
}

impl PaletteError {
    pub(crate) fn decode(message: impl Into<String>, source: image::ImageError) -> Self {
        Self::Decode {
            message: message.into(),
            source: Some(source),
        }
    }

    pub(crate) fn invalid(parameter: &'static str, value: impl ToString, expected: &'static str) -> Self {
        Self::InvalidParameter {
            parameter,
            value: value.to_string(),
            expected,
        }
    }

    /// Short message suitable for showing to the person who uploaded the image.
    pub fn user_message(&self) -> String {
        match self {
            PaletteError::Decode { .. } => {
                "Could not read the image. Please upload a JPG or PNG file.".to_string()
            }
            PaletteError::EmptyImage => "The uploaded image has no pixels.".to_string(),
            PaletteError::InvalidParameter { parameter, expected, .. } => {
                format!("The {parameter} setting must be {expected}.")
            }
            PaletteError::Io { path, .. } => format!("Could not open {path}."),
            PaletteError::Render { .. } => "Could not draw the palette.".to_string(),
        }
    }
}
