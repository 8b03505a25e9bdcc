//! Raster sinks: where finished grids go.
//!
//! A sink receives the grid, its georeferencing transform and the spatial
//! reference identifier, and persists them in some container. Two sinks are
//! provided: an in-memory one and an 8-bit grayscale PNG with ESRI world file
//! and `.prj` sidecars, which GIS tools read as a georeferenced image.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;

use crate::basics::SPATIAL_REFERENCE_ID;
use crate::error::Result;
use crate::geo_transform::GeoTransform;
use crate::pixel_grid::PixelGrid;

/// WKT for WGS 84 geographic coordinates, written to `.prj` sidecars.
pub const WGS84_WKT: &str = concat!(
    "GEOGCS[\"WGS 84\",DATUM[\"WGS_1984\",",
    "SPHEROID[\"WGS 84\",6378137,298.257223563,AUTHORITY[\"EPSG\",\"7030\"]],",
    "AUTHORITY[\"EPSG\",\"6326\"]],",
    "PRIMEM[\"Greenwich\",0,AUTHORITY[\"EPSG\",\"8901\"]],",
    "UNIT[\"degree\",0.0174532925199433,AUTHORITY[\"EPSG\",\"9122\"]],",
    "AUTHORITY[\"EPSG\",\"4326\"]]"
);

// ============================================================================
// RasterOutput
// ============================================================================

/// Everything a sink needs to persist one raster.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterOutput {
    pub grid: PixelGrid,
    pub transform: GeoTransform,
    /// Always 1: rasters are single-band masks.
    pub band_count: u32,
    pub spatial_reference_id: &'static str,
}

impl RasterOutput {
    pub fn new(grid: PixelGrid, transform: GeoTransform) -> Self {
        Self {
            grid,
            transform,
            band_count: 1,
            spatial_reference_id: SPATIAL_REFERENCE_ID,
        }
    }

    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    pub fn height(&self) -> u32 {
        self.grid.height()
    }
}

// ============================================================================
// Sinks
// ============================================================================

/// Destination for finished rasters.
pub trait RasterSink {
    fn write(&mut self, output: &RasterOutput) -> Result<()>;
}

impl<T: RasterSink + ?Sized> RasterSink for &mut T {
    fn write(&mut self, output: &RasterOutput) -> Result<()> {
        (**self).write(output)
    }
}

/// Keeps the last written raster in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    last: Option<RasterOutput>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&RasterOutput> {
        self.last.as_ref()
    }

    pub fn take(&mut self) -> Option<RasterOutput> {
        self.last.take()
    }
}

impl RasterSink for MemorySink {
    fn write(&mut self, output: &RasterOutput) -> Result<()> {
        self.last = Some(output.clone());
        Ok(())
    }
}

/// Grayscale PNG plus `.pgw` world file and `.prj` projection file.
///
/// The sidecars share the image's file stem: `out.png` produces `out.pgw`
/// and `out.prj` in the same directory.
#[derive(Debug, Clone)]
pub struct PngWorldFileSink {
    path: PathBuf,
}

impl PngWorldFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn image_path(&self) -> &Path {
        &self.path
    }

    pub fn world_file_path(&self) -> PathBuf {
        self.path.with_extension("pgw")
    }

    pub fn projection_path(&self) -> PathBuf {
        self.path.with_extension("prj")
    }

    fn write_png(&self, grid: &PixelGrid) -> Result<()> {
        let file = File::create(&self.path)?;
        let mut encoder = png::Encoder::new(BufWriter::new(file), grid.width(), grid.height());
        encoder.set_color(png::ColorType::Grayscale);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(grid.data())?;
        writer.finish()?;
        Ok(())
    }
}

impl RasterSink for PngWorldFileSink {
    fn write(&mut self, output: &RasterOutput) -> Result<()> {
        self.write_png(&output.grid)?;
        std::fs::write(self.world_file_path(), output.transform.world_file())?;

        let mut prj = BufWriter::new(File::create(self.projection_path())?);
        prj.write_all(WGS84_WKT.as_bytes())?;
        prj.flush()?;

        info!(
            "wrote {}x{} raster ({}) to {}",
            output.width(),
            output.height(),
            output.spatial_reference_id,
            self.path.display()
        );
        Ok(())
    }
}
