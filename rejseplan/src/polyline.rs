//! Delta/zig-zag polyline codec.
//!
//! Route geometry arrives as printable text: each coordinate axis is a signed
//! offset from the previous point, zig-zag folded and packed into 5-bit
//! groups (little-endian, continuation bit `0x20`), then shifted by 63 into
//! the printable range. Latitude comes first, then longitude. Values are
//! in units of 1e-5 degrees.
//!
//! # Examples
//!
//! ```
//! use rejseplan::polyline;
//!
//! let points = polyline::decode("_p~iF~ps|U_ulLnnqC");
//! assert_eq!(points, vec![(38.5, -120.2), (40.7, -120.95)]);
//!
//! assert_eq!(polyline::encode(&points), "_p~iF~ps|U_ulLnnqC");
//! ```

/// Scale between decoded integers and decimal degrees.
const PRECISION: f64 = 1e5;

/// Offset added to every 5-bit group to land in printable ASCII.
const CHAR_OFFSET: i64 = 63;

/// Continuation flag within one 5-bit group.
const CONTINUATION: i64 = 0x20;

const GROUP_MASK: i64 = 0x1f;

/// Decode an encoded polyline into `(lat, lon)` pairs in decimal degrees.
///
/// Decoding never fails. Characters are taken as code points and run through
/// the bit arithmetic without range checks, so out-of-range input produces
/// odd coordinates rather than an error. A trailing latitude without its
/// longitude is dropped.
pub fn decode(encoded: &str) -> Vec<(f64, f64)> {
    let mut chars = encoded.chars().peekable();
    let mut points = Vec::new();
    let mut lat: i64 = 0;
    let mut lon: i64 = 0;

    while chars.peek().is_some() {
        lat = lat.wrapping_add(read_value(&mut chars));

        if chars.peek().is_none() {
            break;
        }

        lon = lon.wrapping_add(read_value(&mut chars));
        points.push((lat as f64 / PRECISION, lon as f64 / PRECISION));
    }

    points
}

/// Read one zig-zag value, stopping at the first group without the
/// continuation bit or at end of input.
fn read_value(chars: &mut impl Iterator<Item = char>) -> i64 {
    let mut result: i64 = 0;
    let mut shift: u32 = 0;

    for c in chars.by_ref() {
        let group = c as i64 - CHAR_OFFSET;
        // Groups past bit 63 are discarded rather than overflowing the shift.
        result |= (group & GROUP_MASK).checked_shl(shift).unwrap_or(0);
        shift = shift.saturating_add(5);
        if group < CONTINUATION {
            break;
        }
    }

    if result & 1 == 1 {
        !(result >> 1)
    } else {
        result >> 1
    }
}

/// Encode `(lat, lon)` pairs, rounding each axis to five decimals.
pub fn encode(points: &[(f64, f64)]) -> String {
    let mut out = String::new();
    let mut prev_lat: i64 = 0;
    let mut prev_lon: i64 = 0;

    for &(lat, lon) in points {
        let lat = (lat * PRECISION).round() as i64;
        let lon = (lon * PRECISION).round() as i64;
        write_value(lat - prev_lat, &mut out);
        write_value(lon - prev_lon, &mut out);
        prev_lat = lat;
        prev_lon = lon;
    }

    out
}

fn write_value(delta: i64, out: &mut String) {
    let mut value = if delta < 0 { !(delta << 1) } else { delta << 1 };

    while value >= CONTINUATION {
        push_group((CONTINUATION | (value & GROUP_MASK)) + CHAR_OFFSET, out);
        value >>= 5;
    }
    push_group(value + CHAR_OFFSET, out);
}

fn push_group(code: i64, out: &mut String) {
    // Groups are at most 0x3f + 63, always ASCII.
    out.push(char::from(code as u8));
}
