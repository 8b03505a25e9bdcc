//! Polyline rasterizer.
//!
//! Projects every vertex through a [`GeoTransform`] and burns the Bresenham
//! line between each pair of consecutive vertices into a [`PixelGrid`]. All
//! burns write the same value, so the output depends only on the set of
//! segments: path order and path direction do not matter.

use log::debug;

use crate::basics::{GeoPath, GeoPoint, PixelPoint};
use crate::geo_transform::GeoTransform;
use crate::line_bresenham::BresenhamLine;
use crate::pixel_grid::PixelGrid;

// ============================================================================
// Outcodes
// ============================================================================

const CLIPPED_X2: u32 = 1;
const CLIPPED_Y2: u32 = 2;
const CLIPPED_X1: u32 = 4;
const CLIPPED_Y1: u32 = 8;

/// Cohen-Sutherland outcode of `p` against the pixel rectangle
/// `[0, width) × [0, height)`.
///
/// ```text
///  1100 | 1000 | 1001        bit 0: east  of the grid
/// ------+------+------       bit 1: south of the grid
///  0100 | 0000 | 0001        bit 2: west  of the grid
/// ------+------+------       bit 3: north of the grid
///  0110 | 0010 | 0011
/// ```
#[inline]
fn clipping_flags(p: PixelPoint, width: u32, height: u32) -> u32 {
    let (x, y) = (p.x as i64, p.y as i64);
    ((x >= width as i64) as u32 * CLIPPED_X2)
        | ((y >= height as i64) as u32 * CLIPPED_Y2)
        | ((x < 0) as u32 * CLIPPED_X1)
        | ((y < 0) as u32 * CLIPPED_Y1)
}

// ============================================================================
// Rasterizer
// ============================================================================

/// Counters collected while burning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RasterStats {
    /// Paths handed to [`Rasterizer::burn_path`].
    pub paths: usize,
    /// Segments walked.
    pub segments: usize,
    /// Segments skipped because they lie entirely to one side of the grid.
    pub rejected_segments: usize,
    /// Pixel writes that landed inside the grid (repeat writes included).
    pub pixels_written: usize,
}

impl RasterStats {
    /// Sum of two sets of counters.
    pub fn merge(self, other: RasterStats) -> RasterStats {
        RasterStats {
            paths: self.paths + other.paths,
            segments: self.segments + other.segments,
            rejected_segments: self.rejected_segments + other.rejected_segments,
            pixels_written: self.pixels_written + other.pixels_written,
        }
    }
}

/// Burns line segments into an owned grid.
pub struct Rasterizer {
    transform: GeoTransform,
    grid: PixelGrid,
    stats: RasterStats,
}

impl Rasterizer {
    /// Rasterizer over a fresh zero-filled `width × height` grid.
    pub fn new(transform: GeoTransform, width: u32, height: u32) -> Self {
        Self::with_grid(transform, PixelGrid::new(width, height))
    }

    /// Rasterizer that keeps burning into an existing grid.
    pub fn with_grid(transform: GeoTransform, grid: PixelGrid) -> Self {
        Self {
            transform,
            grid,
            stats: RasterStats::default(),
        }
    }

    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    pub fn grid(&self) -> &PixelGrid {
        &self.grid
    }

    pub fn stats(&self) -> RasterStats {
        self.stats
    }

    /// Burn the line between two pixel coordinates.
    ///
    /// The segment is walked from its smaller `(x, y)` endpoint so that `a→b`
    /// and `b→a` burn the same pixels, and only its in-grid run is visited.
    pub fn burn_segment(&mut self, a: PixelPoint, b: PixelPoint) {
        let (w, h) = (self.grid.width(), self.grid.height());
        if clipping_flags(a, w, h) & clipping_flags(b, w, h) != 0 {
            self.stats.rejected_segments += 1;
            return;
        }
        self.stats.segments += 1;
        for p in BresenhamLine::clipped(a, b, w, h) {
            if self.grid.burn(p) {
                self.stats.pixels_written += 1;
            }
        }
    }

    /// Burn every consecutive vertex pair of `path`.
    ///
    /// A path with fewer than two points has no segments and burns nothing.
    pub fn burn_path(&mut self, path: &[GeoPoint]) {
        self.stats.paths += 1;
        let t = self.transform;
        let mut vertices = path.iter().map(|p| t.project_point(*p));
        let mut prev = match vertices.next() {
            Some(p) => p,
            None => return,
        };
        for cur in vertices {
            self.burn_segment(prev, cur);
            prev = cur;
        }
    }

    /// Hand over the finished grid.
    pub fn finish(self) -> PixelGrid {
        self.grid
    }

    /// Finished grid together with the counters.
    pub fn finish_with_stats(self) -> (PixelGrid, RasterStats) {
        (self.grid, self.stats)
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// Rasterize every path into a new `width × height` grid.
pub fn rasterize(paths: &[GeoPath], transform: &GeoTransform, width: u32, height: u32) -> PixelGrid {
    let mut r = Rasterizer::new(*transform, width, height);
    for path in paths {
        r.burn_path(path);
    }
    let (grid, stats) = r.finish_with_stats();
    debug!("rasterized {:?}", stats);
    grid
}

/// Parallel [`rasterize`]: paths are split across the rayon pool, each worker
/// burns into its own grid, and the grids are merged.
///
/// Produces exactly the same grid as the sequential version.
#[cfg(feature = "multithreading")]
pub fn rasterize_parallel(
    paths: &[GeoPath],
    transform: &GeoTransform,
    width: u32,
    height: u32,
) -> PixelGrid {
    use rayon::prelude::*;

    let (grid, stats) = paths
        .par_iter()
        .fold(
            || Rasterizer::new(*transform, width, height),
            |mut r, path| {
                r.burn_path(path);
                r
            },
        )
        .map(Rasterizer::finish_with_stats)
        .reduce(
            || (PixelGrid::new(width, height), RasterStats::default()),
            |(mut grid, stats), (other, other_stats)| {
                grid.merge_max(&other);
                (grid, stats.merge(other_stats))
            },
        );
    debug!("rasterized in parallel {:?}", stats);
    grid
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounding_rect::{compute_bounding_box, BoundingBox};

    fn unit_transform(size: u32) -> GeoTransform {
        // One degree per pixel with the origin at lat = size, lon = 0.
        let b = BoundingBox {
            min_lat: 0.0,
            max_lat: size as f64,
            min_lon: 0.0,
            max_lon: size as f64,
        };
        GeoTransform::from_bounding_box(&b, size, size).unwrap()
    }

    fn path(points: &[(f64, f64)]) -> GeoPath {
        points.iter().map(|&p| GeoPoint::from(p)).collect()
    }

    fn sample_paths() -> Vec<GeoPath> {
        vec![
            path(&[(38.5, -120.2), (40.7, -120.95), (43.252, -126.453)]),
            path(&[(39.0, -125.0), (42.0, -121.0)]),
            path(&[(43.0, -120.5), (38.7, -126.0), (41.1, -123.3), (41.1, -123.3)]),
        ]
    }

    fn sample_raster(paths: &[GeoPath]) -> PixelGrid {
        let b = compute_bounding_box(&sample_paths()).unwrap();
        let t = GeoTransform::from_bounding_box(&b, 64, 48).unwrap();
        rasterize(paths, &t, 64, 48)
    }

    #[test]
    fn test_segment_pixels() {
        let mut r = Rasterizer::new(unit_transform(10), 10, 10);
        r.burn_segment(PixelPoint::new(0, 0), PixelPoint::new(4, 2));
        let grid = r.finish();
        let expected: Vec<PixelPoint> = [(0, 0), (1, 0), (2, 1), (3, 1), (4, 2)]
            .iter()
            .map(|&p| PixelPoint::from(p))
            .collect();
        let mut burned = grid.burned_pixels();
        burned.sort();
        assert_eq!(burned, expected);
        assert!(burned.iter().all(|p| grid.pixel(p.x, p.y) == Some(255)));
    }

    #[test]
    fn test_degenerate_segment_burns_one_pixel() {
        let mut r = Rasterizer::new(unit_transform(10), 10, 10);
        r.burn_segment(PixelPoint::new(6, 6), PixelPoint::new(6, 6));
        assert_eq!(r.grid().burned_pixels(), vec![PixelPoint::new(6, 6)]);
    }

    #[test]
    fn test_single_point_path_leaves_grid_empty() {
        let t = unit_transform(10);
        let grid = rasterize(&[path(&[(5.0, 5.0)])], &t, 10, 10);
        assert_eq!(grid.count_burned(), 0);
        let grid = rasterize(&[GeoPath::new()], &t, 10, 10);
        assert_eq!(grid.count_burned(), 0);
    }

    #[test]
    fn test_geo_segment_through_projection() {
        // lat 9.5 -> row 0, lat 7.5 -> row 2; lon 0.5 -> col 0, lon 4.5 -> col 4.
        let t = unit_transform(10);
        let grid = rasterize(&[path(&[(9.5, 0.5), (7.5, 4.5)])], &t, 10, 10);
        assert_eq!(grid.count_burned(), 5);
        assert_eq!(grid.pixel(0, 0), Some(255));
        assert_eq!(grid.pixel(4, 2), Some(255));
    }

    #[test]
    fn test_edge_pixels_are_clipped() {
        // The south-east corner projects to (10, 10), just outside the grid.
        let t = unit_transform(10);
        let grid = rasterize(&[path(&[(10.0, 0.0), (0.0, 10.0)])], &t, 10, 10);
        assert_eq!(grid.count_burned(), 10);
        assert_eq!(grid.pixel(0, 0), Some(255));
        assert_eq!(grid.pixel(9, 9), Some(255));
    }

    #[test]
    fn test_partially_outside_segment() {
        let mut r = Rasterizer::new(unit_transform(10), 10, 10);
        r.burn_segment(PixelPoint::new(-5, 3), PixelPoint::new(4, 3));
        assert_eq!(r.grid().count_burned(), 5);
        assert_eq!(r.stats().pixels_written, 5);
    }

    #[test]
    fn test_fully_outside_segment_rejected() {
        let mut r = Rasterizer::new(unit_transform(10), 10, 10);
        r.burn_segment(PixelPoint::new(-5, -3), PixelPoint::new(20, -1));
        r.burn_segment(PixelPoint::new(10, 0), PixelPoint::new(10, 9));
        assert_eq!(r.grid().count_burned(), 0);
        assert_eq!(r.stats().rejected_segments, 2);
        // Crossing a corner region without a shared outcode is still walked.
        r.burn_segment(PixelPoint::new(-2, 5), PixelPoint::new(5, -2));
        assert_eq!(r.stats().segments, 1);
        assert_eq!(r.grid().count_burned(), 4);
    }

    #[test]
    fn test_far_endpoints_with_unfitted_transform() {
        // Endpoints two billion pixels apart; only the in-grid run is visited.
        let mut r = Rasterizer::new(unit_transform(10), 10, 10);
        r.burn_segment(
            PixelPoint::new(-2_000_000_000, -2_000_000_000),
            PixelPoint::new(2_000_000_000, 2_000_000_000),
        );
        assert_eq!(r.stats().pixels_written, 10);
        for i in 0..10 {
            assert_eq!(r.grid().pixel(i, i), Some(255));
        }
    }

    #[test]
    fn test_order_invariance() {
        let paths = sample_paths();
        let base = sample_raster(&paths);
        let mut reordered = paths.clone();
        reordered.rotate_left(1);
        assert_eq!(sample_raster(&reordered), base);
        reordered.reverse();
        assert_eq!(sample_raster(&reordered), base);
        assert!(base.count_burned() > 0);
    }

    #[test]
    fn test_direction_invariance() {
        let paths = sample_paths();
        let base = sample_raster(&paths);
        let reversed: Vec<GeoPath> = paths
            .iter()
            .map(|p| p.iter().rev().copied().collect())
            .collect();
        assert_eq!(sample_raster(&reversed), base);
    }

    #[test]
    fn test_burning_twice_is_idempotent() {
        let paths = sample_paths();
        let base = sample_raster(&paths);
        let mut doubled = paths.clone();
        doubled.extend(paths);
        assert_eq!(sample_raster(&doubled), base);
    }

    #[cfg(feature = "multithreading")]
    #[test]
    fn test_parallel_matches_sequential() {
        let paths: Vec<GeoPath> = sample_paths().into_iter().cycle().take(40).collect();
        let b = compute_bounding_box(&paths).unwrap();
        let t = GeoTransform::from_bounding_box(&b, 200, 150).unwrap();
        assert_eq!(
            rasterize_parallel(&paths, &t, 200, 150),
            rasterize(&paths, &t, 200, 150)
        );
    }
}
