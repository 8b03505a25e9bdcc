//! Georeferencing affine transform.
//!
//! Maps geographic degrees to integer pixel indices and back for a north-up
//! raster (no rotation or shear). The six coefficients follow the GDAL
//! ordering:
//!
//! ```text
//!   [ origin_lon, pixel_width, 0, origin_lat, 0, -pixel_height ]
//!
//!   lon = origin_lon + px * pixel_width
//!   lat = origin_lat - py * pixel_height
//! ```
//!
//! The origin is the north-west corner of the raster, so pixel rows grow
//! southward.

use crate::basics::{ifloor, GeoPoint, PixelPoint};
use crate::bounding_rect::BoundingBox;
use crate::error::{Error, Result};

/// Epsilon for transform comparisons.
pub const TRANSFORM_EPSILON: f64 = 1e-12;

/// North-up affine transform between degrees and pixels.
///
/// Both pixel sizes are strictly positive and finite, which keeps the
/// transform invertible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    origin_lon: f64,
    pixel_width: f64,
    origin_lat: f64,
    pixel_height: f64,
}

impl GeoTransform {
    // ====================================================================
    // Construction
    // ====================================================================

    /// Fit a `raster_width × raster_height` grid exactly over `bbox`.
    ///
    /// The box's north-west corner becomes the origin. Fails when either
    /// dimension is zero or when the box has no width or no height.
    pub fn from_bounding_box(bbox: &BoundingBox, raster_width: u32, raster_height: u32) -> Result<Self> {
        if raster_width == 0 || raster_height == 0 {
            return Err(Error::InvalidRasterSize {
                width: raster_width,
                height: raster_height,
            });
        }
        if bbox.is_degenerate() {
            return Err(Error::DegenerateExtent {
                min_lon: bbox.min_lon,
                max_lon: bbox.max_lon,
                min_lat: bbox.min_lat,
                max_lat: bbox.max_lat,
            });
        }

        let t = Self {
            origin_lon: bbox.min_lon,
            pixel_width: bbox.width() / raster_width as f64,
            origin_lat: bbox.max_lat,
            pixel_height: bbox.height() / raster_height as f64,
        };
        // Extents far below f64 resolution still divide down to zero.
        if !t.is_valid() {
            return Err(Error::DegenerateExtent {
                min_lon: bbox.min_lon,
                max_lon: bbox.max_lon,
                min_lat: bbox.min_lat,
                max_lat: bbox.max_lat,
            });
        }
        Ok(t)
    }

    /// Construct from GDAL-ordered coefficients.
    ///
    /// Only north-up transforms are accepted: both rotation terms must be zero,
    /// `m[1]` positive and `m[5]` negative.
    pub fn from_gdal(m: &[f64; 6]) -> Result<Self> {
        if m[2] != 0.0 || m[4] != 0.0 || !m[0].is_finite() || !m[3].is_finite() {
            return Err(Error::InvalidTransform(*m));
        }
        let t = Self {
            origin_lon: m[0],
            pixel_width: m[1],
            origin_lat: m[3],
            pixel_height: -m[5],
        };
        if !t.is_valid() {
            return Err(Error::InvalidTransform(*m));
        }
        Ok(t)
    }

    /// The six GDAL-ordered coefficients.
    pub fn to_gdal(&self) -> [f64; 6] {
        [
            self.origin_lon,
            self.pixel_width,
            0.0,
            self.origin_lat,
            0.0,
            -self.pixel_height,
        ]
    }

    // ====================================================================
    // Accessors
    // ====================================================================

    #[inline]
    pub fn origin_lon(&self) -> f64 {
        self.origin_lon
    }

    #[inline]
    pub fn origin_lat(&self) -> f64 {
        self.origin_lat
    }

    /// Degrees of longitude per pixel column.
    #[inline]
    pub fn pixel_width(&self) -> f64 {
        self.pixel_width
    }

    /// Degrees of latitude per pixel row (positive).
    #[inline]
    pub fn pixel_height(&self) -> f64 {
        self.pixel_height
    }

    /// True if both pixel sizes are positive and finite.
    pub fn is_valid(&self) -> bool {
        self.pixel_width.is_finite()
            && self.pixel_height.is_finite()
            && self.pixel_width > 0.0
            && self.pixel_height > 0.0
    }

    /// Compare two transforms within `epsilon` per coefficient.
    pub fn is_equal(&self, other: &GeoTransform, epsilon: f64) -> bool {
        self.to_gdal()
            .iter()
            .zip(other.to_gdal().iter())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }

    // ====================================================================
    // Transformations
    // ====================================================================

    /// Pixel containing `(lat, lon)`.
    ///
    /// Floors toward negative infinity. Points on the east or south border of
    /// the fitted box land one past the last column or row; callers clip.
    #[inline]
    pub fn project(&self, lat: f64, lon: f64) -> PixelPoint {
        PixelPoint {
            x: ifloor((lon - self.origin_lon) / self.pixel_width),
            y: ifloor((lat - self.origin_lat) / -self.pixel_height),
        }
    }

    #[inline]
    pub fn project_point(&self, p: GeoPoint) -> PixelPoint {
        self.project(p.lat, p.lon)
    }

    /// Continuous inverse: geographic position of pixel-space `(x, y)`.
    ///
    /// Integer arguments give the north-west corner of that pixel.
    #[inline]
    pub fn pixel_to_geo(&self, x: f64, y: f64) -> GeoPoint {
        GeoPoint {
            lat: self.origin_lat - y * self.pixel_height,
            lon: self.origin_lon + x * self.pixel_width,
        }
    }

    /// Geographic centre of pixel `p`.
    pub fn pixel_center(&self, p: PixelPoint) -> GeoPoint {
        self.pixel_to_geo(p.x as f64 + 0.5, p.y as f64 + 0.5)
    }

    /// Geographic extent covered by a `width × height` raster.
    pub fn raster_extent(&self, width: u32, height: u32) -> BoundingBox {
        let nw = self.pixel_to_geo(0.0, 0.0);
        let se = self.pixel_to_geo(width as f64, height as f64);
        BoundingBox {
            min_lat: se.lat,
            max_lat: nw.lat,
            min_lon: nw.lon,
            max_lon: se.lon,
        }
    }

    /// ESRI world file contents.
    ///
    /// Six lines: pixel width, row rotation, column rotation, negative pixel
    /// height, then the longitude and latitude of the centre of the upper-left
    /// pixel.
    pub fn world_file(&self) -> String {
        let ul = self.pixel_center(PixelPoint::new(0, 0));
        format!(
            "{}\n0\n0\n{}\n{}\n{}\n",
            self.pixel_width, -self.pixel_height, ul.lon, ul.lat
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
