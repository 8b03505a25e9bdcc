//! Bresenham line scan-conversion.
//!
//! Integer-only walk between two pixel centres that visits every pixel of an
//! 8-connected line, including both endpoints, for any slope and direction.

use crate::basics::PixelPoint;

// ============================================================================
// Bresenham line iterator
// ============================================================================

/// Iterator over the pixels of a line from `start` to `end`, inclusive.
///
/// Uses the single error accumulator form: `err = dx - dy`, step x when
/// `2*err > -dy`, step y when `2*err < dx`. Both may step in one iteration,
/// giving a diagonal move. A zero-length line yields its single pixel.
///
/// Arithmetic is done in `i64` so endpoints anywhere in the `i32` range
/// cannot overflow the error term.
#[derive(Debug, Clone)]
pub struct BresenhamLine {
    x0: i64,
    y0: i64,
    x: i64,
    y: i64,
    dx: i64,
    dy: i64,
    sx: i64,
    sy: i64,
    err: i64,
    step: i64,
    last: i64,
}

impl BresenhamLine {
    /// Walk from `start` to `end` exactly as given.
    pub fn new(start: PixelPoint, end: PixelPoint) -> Self {
        let (x1, y1) = (start.x as i64, start.y as i64);
        let (x2, y2) = (end.x as i64, end.y as i64);
        let dx = (x2 - x1).abs();
        let dy = (y2 - y1).abs();
        Self {
            x0: x1,
            y0: y1,
            x: x1,
            y: y1,
            dx,
            dy,
            sx: if x1 < x2 { 1 } else { -1 },
            sy: if y1 < y2 { 1 } else { -1 },
            err: dx - dy,
            step: 0,
            last: dx.max(dy),
        }
    }

    /// Walk between `a` and `b` starting from the smaller `(x, y)` endpoint.
    ///
    /// Error ties resolve differently depending on direction, so a plain walk
    /// from `b` to `a` can pick other pixels than one from `a` to `b`. This
    /// constructor yields the same pixels for either argument order.
    pub fn normalized(a: PixelPoint, b: PixelPoint) -> Self {
        if b < a {
            Self::new(b, a)
        } else {
            Self::new(a, b)
        }
    }

    /// [`normalized`](Self::normalized) restricted to the pixels inside
    /// `[0, width) × [0, height)`.
    ///
    /// Yields exactly the in-grid pixels of the full walk, in order, without
    /// visiting the ones outside. Both coordinates move monotonically, so the
    /// in-grid pixels form one contiguous run of steps; its ends are found by
    /// bisection over [`position`](Self::position).
    pub fn clipped(a: PixelPoint, b: PixelPoint, width: u32, height: u32) -> Self {
        let mut line = Self::normalized(a, b);
        let (w, h) = (width as i64, height as i64);
        let (sx, sy) = (line.sx, line.sy);
        let before = |(x, y): (i64, i64)| {
            (sx > 0 && x < 0) || (sx < 0 && x >= w) || (sy > 0 && y < 0) || (sy < 0 && y >= h)
        };
        let exited = |(x, y): (i64, i64)| {
            (sx > 0 && x >= w) || (sx < 0 && x < 0) || (sy > 0 && y >= h) || (sy < 0 && y < 0)
        };

        let end = line.last + 1;
        let first = partition_point(0, end, |k| before(line.position(k)));
        let last = partition_point(0, end, |k| !exited(line.position(k))) - 1;
        if first > last {
            line.step = 1;
            line.last = 0;
        } else {
            line.seek(first);
            line.last = last;
        }
        line
    }

    /// Number of pixels in the whole line: one per step of the major axis.
    pub fn pixel_count(&self) -> u64 {
        self.dx.max(self.dy) as u64 + 1
    }

    /// Pixel reached after `k` steps of the major axis.
    ///
    /// The minor offset after `k` steps is
    /// `floor((2*k*minor + major - 1) / (2*major))`, which reproduces the
    /// accumulator's tie breaking.
    pub fn position(&self, k: i64) -> (i64, i64) {
        let (x, y, _) = self.state_at(k);
        (x, y)
    }

    fn state_at(&self, k: i64) -> (i64, i64, i64) {
        let (steps_x, steps_y) = if self.dx >= self.dy {
            (k, minor_offset(k, self.dx, self.dy))
        } else {
            (minor_offset(k, self.dy, self.dx), k)
        };
        (
            self.x0 + self.sx * steps_x,
            self.y0 + self.sy * steps_y,
            self.dx - self.dy - steps_x * self.dy + steps_y * self.dx,
        )
    }

    fn seek(&mut self, k: i64) {
        let (x, y, err) = self.state_at(k);
        self.x = x;
        self.y = y;
        self.err = err;
        self.step = k;
    }
}

#[inline]
fn minor_offset(k: i64, major: i64, minor: i64) -> i64 {
    if major == 0 {
        return 0;
    }
    // Up to 2^65 for endpoints at opposite ends of the i32 range.
    ((2 * k as i128 * minor as i128 + major as i128 - 1) / (2 * major as i128)) as i64
}

/// First `k` in `[lo, hi)` for which `pred` is false, given that `pred` is
/// true on a prefix of the range; `hi` if it never is.
fn partition_point(mut lo: i64, mut hi: i64, pred: impl Fn(i64) -> bool) -> i64 {
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if pred(mid) {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

impl Iterator for BresenhamLine {
    type Item = PixelPoint;

    fn next(&mut self) -> Option<PixelPoint> {
        if self.step > self.last {
            return None;
        }
        // Every visited coordinate lies between the two i32 endpoints.
        let current = PixelPoint::new(self.x as i32, self.y as i32);
        self.step += 1;
        let e2 = 2 * self.err;
        if e2 > -self.dy {
            self.err -= self.dy;
            self.x += self.sx;
        }
        if e2 < self.dx {
            self.err += self.dx;
            self.y += self.sy;
        }
        Some(current)
    }
}

impl std::iter::FusedIterator for BresenhamLine {}

// ============================================================================
// Tests
// ============================================================================
