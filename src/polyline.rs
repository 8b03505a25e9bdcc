//! Encoded polyline codec.
//!
//! Implements the Google polyline algorithm: every coordinate is scaled to an
//! integer (`10^precision`), stored as a delta from the previous point,
//! zig-zag folded so the sign lives in bit 0, then split into 5-bit chunks,
//! least significant first. Each chunk is offset by 63 into printable ASCII
//! and all but the last carry the `0x20` continuation bit.
//!
//! Decoding follows 32-bit integer semantics for the chunk accumulator and the
//! zig-zag step, so deltas of `2^30` scaled units or more do not survive a
//! round trip. Running totals are kept in `i64` so long paths cannot wrap.

use crate::basics::{iround, GeoPath, GeoPoint, DEFAULT_PRECISION};
use crate::error::{Error, MalformedReason, Result};

/// Offset added to every chunk to make it printable.
const CHUNK_OFFSET: u8 = 63;
/// Continuation flag within a chunk.
const CONTINUATION_BIT: u32 = 0x20;
/// Payload bits within a chunk.
const PAYLOAD_MASK: u32 = 0x1f;
/// Seven chunks carry 35 bits; the eighth would start past bit 32.
const MAX_SHIFT: u32 = 30;

const MAX_PRECISION: u32 = 7;

/// Scale factor for a precision, validating the range.
pub fn precision_factor(precision: u32) -> Result<f64> {
    if precision == 0 || precision > MAX_PRECISION {
        return Err(Error::InvalidPrecision(precision));
    }
    Ok(10f64.powi(precision as i32))
}

// ============================================================================
// Decoding
// ============================================================================

/// Cursor over the encoded bytes that yields one signed value at a time.
struct ValueReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ValueReader<'a> {
    fn new(encoded: &'a str) -> Self {
        Self {
            bytes: encoded.as_bytes(),
            pos: 0,
        }
    }

    #[inline]
    fn is_at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn malformed(&self, reason: MalformedReason) -> Error {
        Error::MalformedEncoding {
            offset: self.pos,
            reason,
        }
    }

    /// Reassemble one unsigned value from its chunks.
    fn next_raw(&mut self) -> Result<u32> {
        let mut result = 0u32;
        let mut shift = 0u32;
        loop {
            let byte = match self.bytes.get(self.pos) {
                Some(&b) => b,
                None => return Err(self.malformed(MalformedReason::TruncatedValue)),
            };
            if !(CHUNK_OFFSET..=b'~').contains(&byte) {
                return Err(self.malformed(MalformedReason::InvalidCharacter(byte)));
            }
            if shift > MAX_SHIFT {
                return Err(self.malformed(MalformedReason::ValueOverflow));
            }
            let chunk = (byte - CHUNK_OFFSET) as u32;
            self.pos += 1;

            result |= (chunk & PAYLOAD_MASK) << shift;
            shift += 5;
            if chunk & CONTINUATION_BIT == 0 {
                return Ok(result);
            }
        }
    }

    /// Next zig-zag decoded delta.
    fn next_delta(&mut self) -> Result<i32> {
        // i32 reinterpretation with an arithmetic shift: bit 31 lands in the sign.
        let raw = self.next_raw()? as i32;
        Ok(if raw & 1 != 0 { !(raw >> 1) } else { raw >> 1 })
    }
}

/// Decode a standard (precision 5) encoded polyline.
///
/// An empty string decodes to an empty path.
pub fn decode(encoded: &str) -> Result<GeoPath> {
    decode_with_precision(encoded, DEFAULT_PRECISION)
}

/// Decode an encoded polyline whose coordinates were scaled by
/// `10^precision` (6 for OSRM/Valhalla style polylines).
pub fn decode_with_precision(encoded: &str, precision: u32) -> Result<GeoPath> {
    let factor = precision_factor(precision)?;
    let mut reader = ValueReader::new(encoded);
    // Short polylines average a little over 4 bytes per point.
    let mut path = GeoPath::with_capacity(encoded.len() / 4);
    let mut lat = 0i64;
    let mut lon = 0i64;

    while !reader.is_at_end() {
        lat += reader.next_delta()? as i64;
        if reader.is_at_end() {
            return Err(reader.malformed(MalformedReason::MissingLongitude));
        }
        lon += reader.next_delta()? as i64;
        path.push(GeoPoint::new(lat as f64 / factor, lon as f64 / factor));
    }

    Ok(path)
}

// ============================================================================
// Encoding
// ============================================================================

fn write_value(out: &mut String, delta: i64) {
    let mut v = if delta < 0 {
        !(delta << 1) as u64
    } else {
        (delta << 1) as u64
    };
    while v >= CONTINUATION_BIT as u64 {
        let chunk = (CONTINUATION_BIT as u64 | (v & PAYLOAD_MASK as u64)) as u8;
        out.push((chunk + CHUNK_OFFSET) as char);
        v >>= 5;
    }
    out.push((v as u8 + CHUNK_OFFSET) as char);
}

/// Encode a path at the standard precision of 5 decimal places.
pub fn encode(path: &[GeoPoint]) -> String {
    encode_scaled(path, 1e5)
}

/// Encode a path with coordinates scaled by `10^precision`.
///
/// Coordinates are rounded half away from zero onto the integer grid, so
/// decoding the result reproduces them within `0.5 / 10^precision`.
pub fn encode_with_precision(path: &[GeoPoint], precision: u32) -> Result<String> {
    Ok(encode_scaled(path, precision_factor(precision)?))
}

fn encode_scaled(path: &[GeoPoint], factor: f64) -> String {
    let mut out = String::with_capacity(path.len() * 8);
    let mut prev_lat = 0i64;
    let mut prev_lon = 0i64;
    for p in path {
        let lat = iround(p.lat * factor);
        let lon = iround(p.lon * factor);
        write_value(&mut out, lat - prev_lat);
        write_value(&mut out, lon - prev_lon);
        prev_lat = lat;
        prev_lon = lon;
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
