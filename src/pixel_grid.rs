//! Single-band 8-bit pixel grid.
//!
//! Row-major, top row first, one byte per pixel with no row padding, so the
//! stride equals the width. Created zero-filled; the rasterizer is the only
//! writer.

use crate::basics::{PixelPoint, BACKGROUND_VALUE, BURN_VALUE};

/// Owned `width × height` byte raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelGrid {
    /// Zero-filled grid.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![BACKGROUND_VALUE; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw pixel bytes, `width * height` long.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// True if `(x, y)` addresses a pixel of this grid.
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Row `y` as a slice.
    pub fn row_slice(&self, y: u32) -> &[u8] {
        assert!(
            y < self.height,
            "row {} out of bounds (height={})",
            y,
            self.height
        );
        let start = self.offset(0, y);
        &self.data[start..start + self.width as usize]
    }

    /// Iterator over all rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        // chunks_exact panics on a zero chunk size.
        self.data.chunks_exact(self.width.max(1) as usize)
    }

    /// Pixel value, or `None` outside the grid.
    pub fn pixel(&self, x: i32, y: i32) -> Option<u8> {
        if self.contains(x, y) {
            Some(self.data[self.offset(x as u32, y as u32)])
        } else {
            None
        }
    }

    /// Store `value` at `(x, y)` when inside the grid.
    ///
    /// Returns whether the write happened; outside coordinates are ignored.
    #[inline]
    pub fn copy_pixel(&mut self, x: i32, y: i32, value: u8) -> bool {
        if !self.contains(x, y) {
            return false;
        }
        let i = self.offset(x as u32, y as u32);
        self.data[i] = value;
        true
    }

    /// Mark `p` as part of a line, clipping silently.
    #[inline]
    pub fn burn(&mut self, p: PixelPoint) -> bool {
        self.copy_pixel(p.x, p.y, BURN_VALUE)
    }

    /// Reset every pixel to the background value.
    pub fn clear(&mut self) {
        self.data.fill(BACKGROUND_VALUE);
    }

    /// Number of pixels different from the background.
    pub fn count_burned(&self) -> usize {
        self.data.iter().filter(|&&v| v != BACKGROUND_VALUE).count()
    }

    /// Coordinates of every non-background pixel in row-major order.
    pub fn burned_pixels(&self) -> Vec<PixelPoint> {
        let w = self.width.max(1) as usize;
        self.data
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v != BACKGROUND_VALUE)
            .map(|(i, _)| PixelPoint::new((i % w) as i32, (i / w) as i32))
            .collect()
    }

    /// Combine with another grid of the same size, keeping the larger value.
    ///
    /// Grids built from disjoint sets of paths merge into exactly the grid
    /// built from all of them, since every burn stores the same value.
    pub fn merge_max(&mut self, other: &PixelGrid) {
        assert_eq!(
            (self.width, self.height),
            (other.width, other.height),
            "grid size mismatch"
        );
        for (d, &s) in self.data.iter_mut().zip(other.data.iter()) {
            if s > *d {
                *d = s;
            }
        }
    }
}
