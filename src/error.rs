//! Error type shared by every stage of the pipeline.
//!
//! Decoding failures are reported per path and carry the byte offset at which
//! the encoded stream went wrong. Extent and transform failures are fatal to a
//! run. I/O failures come from the input loader and the raster sinks.

use std::fmt;

use thiserror::Error;

/// Why an encoded polyline could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    /// The stream ended while the continuation bit of the last chunk was set.
    TruncatedValue,
    /// A latitude delta was decoded but the stream ended before its longitude.
    MissingLongitude,
    /// A byte outside the polyline alphabet (`'?'..='~'`).
    InvalidCharacter(u8),
    /// More than seven chunks for a single value; it cannot fit in 32 bits.
    ValueOverflow,
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::TruncatedValue => write!(f, "input ends in the middle of a value"),
            MalformedReason::MissingLongitude => write!(f, "latitude without a matching longitude"),
            MalformedReason::InvalidCharacter(b) => write!(f, "invalid character 0x{:02x}", b),
            MalformedReason::ValueOverflow => write!(f, "value does not fit in 32 bits"),
        }
    }
}

/// Errors produced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The encoded byte stream is not a valid polyline.
    #[error("malformed polyline at byte {offset}: {reason}")]
    MalformedEncoding {
        offset: usize,
        reason: MalformedReason,
    },

    /// A decoding error attributed to one entry of the input collection.
    #[error("polyline #{index}: {source}")]
    Path {
        index: usize,
        #[source]
        source: Box<Error>,
    },

    /// No geographic point is available to compute an extent from.
    #[error("no points to compute a bounding box from")]
    EmptyInput,

    /// The bounding box has zero width or zero height.
    #[error(
        "degenerate extent: lon [{min_lon}, {max_lon}], lat [{min_lat}, {max_lat}]"
    )]
    DegenerateExtent {
        min_lon: f64,
        max_lon: f64,
        min_lat: f64,
        max_lat: f64,
    },

    /// Raster dimensions must both be non-zero and their product bounded.
    #[error("invalid raster size {width}x{height}")]
    InvalidRasterSize { width: u32, height: u32 },

    /// A geotransform with a non-positive or non-finite pixel size.
    #[error("invalid geotransform {0:?}")]
    InvalidTransform([f64; 6]),

    /// Polyline precision outside the supported range.
    #[error("unsupported polyline precision {0} (expected 1..=7)")]
    InvalidPrecision(u32),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    PngEncoding(#[from] png::EncodingError),
}

impl Error {
    /// Wrap a per-path error with the index of the offending input.
    pub fn at_path(self, index: usize) -> Self {
        Error::Path {
            index,
            source: Box::new(self),
        }
    }
}

/// Result alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_display() {
        let e = Error::MalformedEncoding {
            offset: 3,
            reason: MalformedReason::TruncatedValue,
        };
        assert_eq!(
            e.to_string(),
            "malformed polyline at byte 3: input ends in the middle of a value"
        );
    }

    #[test]
    fn test_path_wraps_source() {
        let e = Error::MalformedEncoding {
            offset: 0,
            reason: MalformedReason::InvalidCharacter(b' '),
        }
        .at_path(7);
        assert!(e.to_string().starts_with("polyline #7: "));
        assert!(std::error::Error::source(&e).is_some());
    }
}
