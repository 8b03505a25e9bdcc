//! Foundation types and constants.
//!
//! Geographic points and paths on one side, integer pixel points on the
//! other. Everything else in the crate is built from these.

// ============================================================================
// Constants
// ============================================================================

/// Value written into the grid for every pixel a line passes through.
pub const BURN_VALUE: u8 = 255;

/// Value of untouched pixels.
pub const BACKGROUND_VALUE: u8 = 0;

/// Decimal places of the standard Google polyline encoding.
pub const DEFAULT_PRECISION: u32 = 5;

/// Raster edge length used when no size is given.
pub const DEFAULT_RASTER_SIZE: u32 = 1000;

/// Largest accepted raster, in pixels (1 GiB of single-byte cells).
pub const MAX_RASTER_PIXELS: usize = 1 << 30;

/// Spatial reference of every raster produced by this crate (WGS 84).
pub const SPATIAL_REFERENCE_ID: &str = "EPSG:4326";

// ============================================================================
// Rounding
// ============================================================================

/// Floor toward negative infinity, saturating at the `i32` range.
///
/// NaN maps to 0.
#[inline]
pub fn ifloor(v: f64) -> i32 {
    v.floor() as i32
}

/// Round half away from zero to an `i64`.
#[inline]
pub fn iround(v: f64) -> i64 {
    if v < 0.0 {
        (v - 0.5).ceil() as i64
    } else {
        (v + 0.5).floor() as i64
    }
}

// ============================================================================
// Geographic points
// ============================================================================

/// A latitude/longitude pair in decimal degrees.
///
/// Values outside `[-90, 90]` / `[-180, 180]` are carried through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// True if both components are within `eps` of `other`.
    pub fn approx_eq(&self, other: &GeoPoint, eps: f64) -> bool {
        (self.lat - other.lat).abs() <= eps && (self.lon - other.lon).abs() <= eps
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self { lat, lon }
    }
}

/// An ordered sequence of points; consecutive points define segments.
pub type GeoPath = Vec<GeoPoint>;

// ============================================================================
// Pixel points
// ============================================================================

/// Integer pixel coordinate. `x` grows east, `y` grows south.
///
/// May lie outside the grid; writers clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for PixelPoint {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}
