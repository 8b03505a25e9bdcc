//! End-to-end run: encoded strings in, georeferenced raster out.
//!
//! ```text
//! encoded strings -> paths -> bounding box -> transform -> grid -> sink
//! ```
//!
//! Decoding errors are isolated per path according to
//! [`MalformedPolicy`]. Extent and transform errors end the run.

use log::{debug, info, warn};

use crate::basics::GeoPath;
use crate::bounding_rect::compute_bounding_box;
use crate::config::{MalformedPolicy, RasterConfig};
use crate::error::{Error, Result};
use crate::geo_transform::GeoTransform;
use crate::pixel_grid::PixelGrid;
use crate::polyline::decode_with_precision;
use crate::raster_sink::{RasterOutput, RasterSink};
use crate::rasterizer::rasterize;

/// Paths decoded from one input collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedPaths {
    /// Non-empty paths, in input order.
    pub paths: Vec<GeoPath>,
    /// Inputs dropped because they failed to decode.
    pub malformed: usize,
    /// Inputs that decoded to no points.
    pub empty: usize,
}

/// Counts reported after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub inputs: usize,
    pub paths: usize,
    pub malformed: usize,
    pub empty: usize,
    pub burned_pixels: usize,
}

fn decode_each<S: AsRef<str> + Sync>(encoded: &[S], precision: u32, parallel: bool) -> Vec<Result<GeoPath>> {
    #[cfg(feature = "multithreading")]
    if parallel {
        use rayon::prelude::*;
        return encoded
            .par_iter()
            .map(|s| decode_with_precision(s.as_ref(), precision))
            .collect();
    }
    #[cfg(not(feature = "multithreading"))]
    let _ = parallel;

    encoded
        .iter()
        .map(|s| decode_with_precision(s.as_ref(), precision))
        .collect()
}

/// Decode every input, applying the configured malformed-input policy and
/// dropping paths without points.
///
/// With [`MalformedPolicy::Abort`] the error of the first failing input is
/// returned, tagged with its index.
pub fn decode_all<S: AsRef<str> + Sync>(encoded: &[S], config: &RasterConfig) -> Result<DecodedPaths> {
    let mut out = DecodedPaths::default();
    for (index, result) in decode_each(encoded, config.precision, config.parallel)
        .into_iter()
        .enumerate()
    {
        match result {
            Ok(path) if path.is_empty() => out.empty += 1,
            Ok(path) => out.paths.push(path),
            Err(e) => match config.on_malformed {
                MalformedPolicy::Abort => return Err(e.at_path(index)),
                MalformedPolicy::Skip => {
                    warn!("skipping polyline #{}: {}", index, e);
                    out.malformed += 1;
                }
            },
        }
    }
    debug!(
        "decoded {} paths ({} malformed, {} empty)",
        out.paths.len(),
        out.malformed,
        out.empty
    );
    Ok(out)
}

fn burn(paths: &[GeoPath], transform: &GeoTransform, config: &RasterConfig) -> PixelGrid {
    #[cfg(feature = "multithreading")]
    if config.parallel {
        return crate::rasterizer::rasterize_parallel(paths, transform, config.width, config.height);
    }
    rasterize(paths, transform, config.width, config.height)
}

/// Build the raster for already decoded paths.
pub fn render_paths(paths: &[GeoPath], config: &RasterConfig) -> Result<RasterOutput> {
    config.validate()?;
    let bbox = compute_bounding_box(paths)?;
    debug!("extent {:?}", bbox);
    let transform = GeoTransform::from_bounding_box(&bbox, config.width, config.height)?;
    debug!("geotransform {:?}", transform.to_gdal());
    let grid = burn(paths, &transform, config);
    Ok(RasterOutput::new(grid, transform))
}

/// Decode and rasterize a collection of encoded polylines.
pub fn render<S: AsRef<str> + Sync>(encoded: &[S], config: &RasterConfig) -> Result<RasterOutput> {
    config.validate()?;
    let decoded = decode_all(encoded, config)?;
    render_paths(&decoded.paths, config)
}

/// Decode, rasterize and hand the result to `sink`.
pub fn run<S, K>(encoded: &[S], config: &RasterConfig, sink: &mut K) -> Result<RunSummary>
where
    S: AsRef<str> + Sync,
    K: RasterSink + ?Sized,
{
    config.validate()?;
    let decoded = decode_all(encoded, config)?;
    if decoded.paths.is_empty() {
        return Err(Error::EmptyInput);
    }
    let output = render_paths(&decoded.paths, config)?;
    sink.write(&output)?;

    let summary = RunSummary {
        inputs: encoded.len(),
        paths: decoded.paths.len(),
        malformed: decoded.malformed,
        empty: decoded.empty,
        burned_pixels: output.grid.count_burned(),
    };
    info!(
        "rasterized {} of {} polylines into {}x{}, {} pixels burned",
        summary.paths, summary.inputs, config.width, config.height, summary.burned_pixels
    );
    Ok(summary)
}
