//! Geographic bounding box calculation.
//!
//! Computes the axis-aligned latitude/longitude extent shared by every path
//! of a run. An extent over zero points is an error, never an infinite box.

use crate::basics::{GeoPath, GeoPoint};
use crate::error::{Error, Result};

/// Axis-aligned box in degrees.
///
/// Always satisfies `min_lat <= max_lat` and `min_lon <= max_lon`; there is no
/// empty box value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Box covering a single point.
    pub fn from_point(p: GeoPoint) -> Self {
        Self {
            min_lat: p.lat,
            max_lat: p.lat,
            min_lon: p.lon,
            max_lon: p.lon,
        }
    }

    /// Grow the box to include `p`.
    pub fn add_point(&mut self, p: GeoPoint) {
        if p.lat < self.min_lat {
            self.min_lat = p.lat;
        }
        if p.lat > self.max_lat {
            self.max_lat = p.lat;
        }
        if p.lon < self.min_lon {
            self.min_lon = p.lon;
        }
        if p.lon > self.max_lon {
            self.max_lon = p.lon;
        }
    }

    /// Smallest box containing both `self` and `other`.
    pub fn unite(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min_lat: self.min_lat.min(other.min_lat),
            max_lat: self.max_lat.max(other.max_lat),
            min_lon: self.min_lon.min(other.min_lon),
            max_lon: self.max_lon.max(other.max_lon),
        }
    }

    /// Longitude span in degrees.
    #[inline]
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Latitude span in degrees.
    #[inline]
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// True if `p` is inside or on the border.
    pub fn contains(&self, p: GeoPoint) -> bool {
        p.lat >= self.min_lat && p.lat <= self.max_lat && p.lon >= self.min_lon && p.lon <= self.max_lon
    }

    /// True if either span is zero, so no affine transform can be derived.
    pub fn is_degenerate(&self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }
}

/// Bounding box of a single path, `None` if it has no points.
pub fn path_bounding_box(path: &[GeoPoint]) -> Option<BoundingBox> {
    let (first, rest) = path.split_first()?;
    let mut bbox = BoundingBox::from_point(*first);
    for p in rest {
        bbox.add_point(*p);
    }
    Some(bbox)
}

/// Bounding box across every point of every path.
///
/// Empty paths are skipped. Fails with [`Error::EmptyInput`] when no point
/// exists at all. The result does not depend on path order or on duplicated
/// paths.
pub fn compute_bounding_box(paths: &[GeoPath]) -> Result<BoundingBox> {
    paths
        .iter()
        .filter_map(|path| path_bounding_box(path))
        .reduce(|a, b| a.unite(&b))
        .ok_or(Error::EmptyInput)
}
