//! Coordinates and decoded route geometry.

use crate::polyline;

use super::{DrawStyleIndex, LocationIndex};

/// Scale of the integer coordinates in location records (`crd.x`/`crd.y`).
const MICRODEGREES: f64 = 1e6;

/// A point in decimal degrees.
///
/// Always derived from wire integers: microdegrees for location records,
/// accumulated 1e-5 deltas for polylines.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
    /// Index into the response's layer list (`layerX`).
    pub layer_index: usize,
    /// Index into the response's coordinate system list (`crdSysX`).
    pub crd_sys_index: usize,
}

impl Coordinate {
    /// A coordinate in the default layer and coordinate system.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            layer_index: 0,
            crd_sys_index: 0,
        }
    }

    /// Build from microdegree integers as carried by location records.
    ///
    /// ```
    /// use rejseplan::domain::Coordinate;
    ///
    /// let c = Coordinate::from_microdegrees(12_565_562, 55_672_758);
    /// assert_eq!(c.lat, 55.672758);
    /// assert_eq!(c.lon, 12.565562);
    /// ```
    pub fn from_microdegrees(x: i64, y: i64) -> Self {
        Self::new(y as f64 / MICRODEGREES, x as f64 / MICRODEGREES)
    }

    /// Back to microdegrees, `(x, y)`, as request payloads expect.
    pub fn to_microdegrees(&self) -> (i64, i64) {
        (
            (self.lon * MICRODEGREES).round() as i64,
            (self.lat * MICRODEGREES).round() as i64,
        )
    }
}

/// Link from a polyline point to a location (`ppLocRefL` entry).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolylineLocationRef {
    /// Point index within the polyline.
    pub point_index: usize,
    pub location: LocationIndex,
}

/// Decoded route geometry.
///
/// Immutable once built. Several sections may share one polyline, either
/// through a `PolylineIndex` into the common table or, for walking routes,
/// through the same `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    /// The encoded text this polyline was decoded from. Empty when the
    /// table entry carried only styling.
    pub encoded: String,
    pub coordinates: Vec<Coordinate>,
    pub location_refs: Vec<PolylineLocationRef>,
    pub draw_style: Option<DrawStyleIndex>,
    /// Whether the encoding is delta based (`delta`).
    pub delta: bool,
    /// Coordinate dimension (`dim`).
    pub dimension: u8,
    /// `crdEncS`
    pub encoding_start: Option<String>,
    /// `crdEncF`
    pub encoding_format: Option<String>,
}

impl Polyline {
    /// Decode `encoded` into a polyline with default metadata.
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        let encoded = encoded.into();
        let coordinates = polyline::decode(&encoded)
            .into_iter()
            .map(|(lat, lon)| Coordinate::new(lat, lon))
            .collect();

        Self {
            encoded,
            coordinates,
            location_refs: Vec::new(),
            draw_style: None,
            delta: true,
            dimension: 2,
            encoding_start: None,
            encoding_format: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn microdegrees_roundtrip() {
        let c = Coordinate::from_microdegrees(12_565_562, 55_672_758);
        assert_eq!(c.to_microdegrees(), (12_565_562, 55_672_758));
        assert_eq!(c.layer_index, 0);
        assert_eq!(c.crd_sys_index, 0);
    }

    #[test]
    fn from_encoded_decodes_eagerly() {
        let poly = Polyline::from_encoded("kuzrIqyjkAmCzWoD`YqC`^");
        assert_eq!(poly.len(), 4);
        assert_eq!(poly.coordinates[0].lat, 55.68358);
        assert_eq!(poly.coordinates[0].lon, 12.51241);
        assert!(poly.delta);
        assert_eq!(poly.dimension, 2);
    }

    #[test]
    fn empty_encoding_is_empty_polyline() {
        let poly = Polyline::from_encoded("");
        assert!(poly.is_empty());
        assert_eq!(poly.encoded, "");
    }
}
