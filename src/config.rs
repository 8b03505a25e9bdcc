//! Run configuration.
//!
//! Can be deserialized from JSON; every field has a default, so a partial
//! document (or `{}`) is a valid configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::basics::{DEFAULT_PRECISION, DEFAULT_RASTER_SIZE, MAX_RASTER_PIXELS};
use crate::error::{Error, Result};
use crate::polyline::precision_factor;

/// What to do with a polyline that fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPolicy {
    /// Log a warning and leave the path out of the raster.
    #[default]
    Skip,
    /// Stop the run with the first decoding error.
    Abort,
}

/// Settings for one rasterization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterConfig {
    /// Raster width in pixels.
    pub width: u32,
    /// Raster height in pixels.
    pub height: u32,
    /// Decimal places of the polyline encoding (5 for Google, 6 for OSRM).
    pub precision: u32,
    pub on_malformed: MalformedPolicy,
    /// Spread decoding and burning over the rayon pool when available.
    pub parallel: bool,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_RASTER_SIZE,
            height: DEFAULT_RASTER_SIZE,
            precision: DEFAULT_PRECISION,
            on_malformed: MalformedPolicy::Skip,
            parallel: cfg!(feature = "multithreading"),
        }
    }
}

impl RasterConfig {
    /// Default configuration with the given raster size.
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Read a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: RasterConfig = serde_json::from_str(&text)?;
        Ok(config)
    }

    /// Check the raster size and precision.
    ///
    /// Both dimensions must be non-zero and the grid at most
    /// [`MAX_RASTER_PIXELS`] cells.
    pub fn validate(&self) -> Result<()> {
        let too_large = !(self.width as usize)
            .checked_mul(self.height as usize)
            .is_some_and(|n| n <= MAX_RASTER_PIXELS);
        if self.width == 0 || self.height == 0 || too_large {
            return Err(Error::InvalidRasterSize {
                width: self.width,
                height: self.height,
            });
        }
        precision_factor(self.precision)?;
        Ok(())
    }
}
