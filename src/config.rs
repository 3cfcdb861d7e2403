//! Tunable parameters for palette extraction.
//!
//! Options serialize to JSON so a run can be reproduced from a file:
//!
//! ```
//! use color_picker::ExtractOptions;
//!
//! let opts: ExtractOptions = serde_json::from_str(r#"{ "seed": 7 }"#)?;
//! assert_eq!(opts.seed, 7);
//! assert_eq!(opts.max_iterations, ExtractOptions::default().max_iterations);
//! # Ok::<(), serde_json::Error>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{PaletteError, Result};

/// Smallest palette a request may ask for.
pub const MIN_COLORS: usize = 1;
/// Largest palette a request may ask for.
pub const MAX_COLORS: usize = 10;
/// Seed used for k-means initialisation unless overridden.
pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// k-means initialisation seed
    pub seed: u64,

    /// Upper bound on Lloyd iterations
    pub max_iterations: usize,

    /// Stop once the k-means score changes by less than this
    pub converge: f32,

    /// Downsample so the longest side is at most this many pixels before
    /// extracting. Counts then describe the downsampled image.
    pub max_side: Option<u32>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            max_iterations: 300,
            converge: 1e-4,
            max_side: None,
        }
    }
}

impl ExtractOptions {
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(PaletteError::invalid("max_iterations", 0, "at least 1"));
        }
        if !(self.converge.is_finite() && self.converge >= 0.0) {
            return Err(PaletteError::invalid(
                "converge",
                self.converge,
                "a finite non-negative number",
            ));
        }
        if self.max_side == Some(0) {
            return Err(PaletteError::invalid("max_side", 0, "at least 1"));
        }
        Ok(())
    }
}

/// Check a requested palette size.
pub fn validate_color_count(k: usize) -> Result<()> {
    if (MIN_COLORS..=MAX_COLORS).contains(&k) {
        Ok(())
    } else {
        Err(PaletteError::invalid("k", k, "between 1 and 10"))
    }
}
