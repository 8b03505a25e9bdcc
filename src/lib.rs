//! # polyline-raster
//!
//! Burns collections of Google-encoded polylines (GPS tracks, routes) into a
//! georeferenced single-band raster.
//!
//! - Decoding of the polyline algorithm at any precision from 1 to 7
//! - Extent computation over every decoded point
//! - North-up affine georeferencing in GDAL coefficient order
//! - Integer Bresenham line rasterization with exact grid clipping
//! - Parallel decoding and burning (feature `multithreading`)
//! - Grayscale PNG output with ESRI world file and WKT sidecars
//!
//! ## Architecture
//!
//! A run is a five-stage pipeline:
//!
//! 1. **Decoder**: encoded strings to paths of `(lat, lon)` points
//! 2. **Extent**: bounding box over all points of all paths
//! 3. **Projector**: bounding box and raster size to a geotransform
//! 4. **Rasterizer**: projected segments burned into a pixel grid
//! 5. **Sink**: grid, transform and spatial reference persisted
//!
//! ```no_run
//! use polyline_raster::{run, PngWorldFileSink, RasterConfig};
//!
//! let tracks = ["_p~iF~ps|U_ulLnnqC_mqNvxq`@"];
//! let mut sink = PngWorldFileSink::new("tracks.png");
//! run(&tracks, &RasterConfig::with_size(512, 512), &mut sink)?;
//! # Ok::<(), polyline_raster::Error>(())
//! ```

// Phase 1: Foundation Types
pub mod basics;
pub mod error;

// Phase 2: Decoding & Geometry
pub mod bounding_rect;
pub mod geo_transform;
pub mod polyline;

// Phase 3: Rasterization
pub mod line_bresenham;
pub mod pixel_grid;
pub mod rasterizer;

// Phase 4: Input, Output & Orchestration
pub mod config;
pub mod input;
pub mod pipeline;
pub mod raster_sink;

#[cfg(test)]
mod proptests;

pub use basics::{GeoPath, GeoPoint, PixelPoint, BACKGROUND_VALUE, BURN_VALUE};
pub use bounding_rect::{compute_bounding_box, BoundingBox};
pub use config::{MalformedPolicy, RasterConfig};
pub use error::{Error, MalformedReason, Result};
pub use geo_transform::GeoTransform;
pub use pipeline::{decode_all, render, render_paths, run, RunSummary};
pub use pixel_grid::PixelGrid;
pub use polyline::{decode, decode_with_precision, encode, encode_with_precision};
pub use raster_sink::{MemorySink, PngWorldFileSink, RasterOutput, RasterSink};
pub use rasterizer::{rasterize, Rasterizer};
