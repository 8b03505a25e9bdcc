//! Randomized checks of the laws the pipeline relies on.

use proptest::prelude::*;

use crate::basics::{GeoPath, GeoPoint, PixelPoint};
use crate::bounding_rect::compute_bounding_box;
use crate::geo_transform::GeoTransform;
use crate::line_bresenham::BresenhamLine;
use crate::polyline::{decode, encode};
use crate::rasterizer::rasterize;

fn geo_point() -> impl Strategy<Value = GeoPoint> {
    (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lon)| GeoPoint::new(lat, lon))
}

fn geo_path() -> impl Strategy<Value = GeoPath> {
    prop::collection::vec(geo_point(), 0..24)
}

fn geo_paths() -> impl Strategy<Value = Vec<GeoPath>> {
    prop::collection::vec(geo_path(), 1..6)
}

fn pixel_point() -> impl Strategy<Value = PixelPoint> {
    (-40i32..80, -40i32..80).prop_map(|(x, y)| PixelPoint::new(x, y))
}

/// Same paths in another order, each one reversed.
fn reordered(paths: &[GeoPath], rotate: usize) -> Vec<GeoPath> {
    let mut out: Vec<GeoPath> = paths
        .iter()
        .map(|p| p.iter().rev().copied().collect())
        .collect();
    let len = out.len();
    out.rotate_left(rotate % len);
    out.reverse();
    out
}

proptest! {
    #[test]
    fn encode_decode_round_trip(path in geo_path()) {
        let decoded = decode(&encode(&path)).unwrap();
        prop_assert_eq!(decoded.len(), path.len());
        for (p, q) in decoded.iter().zip(&path) {
            prop_assert!(p.approx_eq(q, 1e-5), "{:?} != {:?}", p, q);
        }
    }

    #[test]
    fn bounding_box_ignores_order_and_duplicates(paths in geo_paths(), rotate in 0usize..8) {
        let base = compute_bounding_box(&paths).ok();
        prop_assert_eq!(compute_bounding_box(&reordered(&paths, rotate)).ok(), base);

        let mut doubled = paths.clone();
        doubled.extend(paths.iter().cloned());
        prop_assert_eq!(compute_bounding_box(&doubled).ok(), base);

        if let Some(bbox) = base {
            prop_assert!(paths.iter().flatten().all(|p| bbox.contains(*p)));
        }
    }

    #[test]
    fn raster_ignores_order_and_direction(
        paths in geo_paths(),
        rotate in 0usize..8,
        width in 1u32..64,
        height in 1u32..64,
    ) {
        let transform = compute_bounding_box(&paths)
            .and_then(|bbox| GeoTransform::from_bounding_box(&bbox, width, height));
        prop_assume!(transform.is_ok());
        let transform = transform.unwrap();

        let base = rasterize(&paths, &transform, width, height);
        let other = rasterize(&reordered(&paths, rotate), &transform, width, height);
        prop_assert_eq!(other, base.clone());

        #[cfg(feature = "multithreading")]
        prop_assert_eq!(
            crate::rasterizer::rasterize_parallel(&paths, &transform, width, height),
            base
        );
    }

    #[test]
    fn normalized_line_is_symmetric(a in pixel_point(), b in pixel_point()) {
        let fwd: Vec<_> = BresenhamLine::normalized(a, b).collect();
        let bwd: Vec<_> = BresenhamLine::normalized(b, a).collect();
        prop_assert_eq!(fwd.len() as u64, BresenhamLine::normalized(a, b).pixel_count());
        prop_assert_eq!(fwd, bwd);
    }

    #[test]
    fn clipped_line_is_filtered_walk(
        a in pixel_point(),
        b in pixel_point(),
        width in 1u32..40,
        height in 1u32..40,
    ) {
        let (w, h) = (width as i32, height as i32);
        let expected: Vec<_> = BresenhamLine::normalized(a, b)
            .filter(|p| p.x >= 0 && p.y >= 0 && p.x < w && p.y < h)
            .collect();
        let clipped: Vec<_> = BresenhamLine::clipped(a, b, width, height).collect();
        prop_assert_eq!(clipped, expected);
    }
}
