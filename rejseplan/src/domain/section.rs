//! Trip sections and their per-mode payloads.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::{Coordinate, IconIndex, Journey, LocationIndex, Polyline, ServiceMessage};

/// Advance notice assumed for dial-a-ride bookings. A client-side policy;
/// the wire format carries no deadline.
pub const DEFAULT_BOOKING_DEADLINE_MINUTES: u32 = 120;

/// Section mode tag (`type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportMode {
    Walk,
    /// Scheduled train, bus, metro or ferry.
    Journey,
    Bike,
    Car,
    Taxi,
    KissAndRide,
    ParkAndRide,
    /// Dial-a-ride (Plustur/Flextur).
    Teta,
}

impl TransportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Walk => "WALK",
            TransportMode::Journey => "JNY",
            TransportMode::Bike => "BIKE",
            TransportMode::Car => "CAR",
            TransportMode::Taxi => "TAXI",
            TransportMode::KissAndRide => "KISS",
            TransportMode::ParkAndRide => "PARK",
            TransportMode::Teta => "TETA",
        }
    }
}

impl FromStr for TransportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WALK" => Ok(TransportMode::Walk),
            "JNY" => Ok(TransportMode::Journey),
            "BIKE" => Ok(TransportMode::Bike),
            "CAR" => Ok(TransportMode::Car),
            "TAXI" => Ok(TransportMode::Taxi),
            "KISS" => Ok(TransportMode::KissAndRide),
            "PARK" => Ok(TransportMode::ParkAndRide),
            "TETA" => Ok(TransportMode::Teta),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Departure or arrival record of a section.
///
/// Only the location index is guaranteed. Keys this type doesn't name are
/// kept verbatim in `extra`.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub location: LocationIndex,
    /// `dTimeS`
    pub departure_time: Option<String>,
    /// `dTimeR`
    pub departure_realtime: Option<String>,
    /// `aTimeS`
    pub arrival_time: Option<String>,
    /// `aTimeR`
    pub arrival_realtime: Option<String>,
    pub departure_platform: Option<String>,
    pub arrival_platform: Option<String>,
    /// Call-ahead flag (`dCaS`); present on dial-a-ride departures.
    pub call_ahead: Option<bool>,
    pub extra: Map<String, Value>,
}

impl Endpoint {
    pub fn new(location: LocationIndex) -> Self {
        Self {
            location,
            departure_time: None,
            departure_realtime: None,
            arrival_time: None,
            arrival_realtime: None,
            departure_platform: None,
            arrival_platform: None,
            call_ahead: None,
            extra: Map::new(),
        }
    }
}

/// One turn-by-turn step of a walking route.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WalkingSegment {
    /// Street or path name.
    pub name: Option<String>,
    /// Manoeuvre text (`manTx`).
    pub instruction: Option<String>,
    pub orientation: Option<String>,
    pub route_type: Option<String>,
    /// Metres.
    pub distance: u32,
    /// First polyline point of this step (`polyS`).
    pub poly_start: usize,
    /// Last polyline point of this step, inclusive (`polyE`).
    pub poly_end: usize,
    pub icon: Option<IconIndex>,
}

impl WalkingSegment {
    /// The points of `polyline` this step covers, if the range fits.
    pub fn points<'a>(&self, polyline: &'a Polyline) -> Option<&'a [Coordinate]> {
        polyline.coordinates.get(self.poly_start..=self.poly_end)
    }
}

/// Fetched geometry for a walking relation, shared between every section
/// that carries the same route-context token.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkingRoute {
    pub polyline: Polyline,
    pub segments: Vec<WalkingSegment>,
}

/// Summary of a non-scheduled leg, plus fetched geometry once available.
#[derive(Debug, Clone, PartialEq)]
pub struct GisInfo {
    /// Metres.
    pub distance: u32,
    /// `HHMMSS`, as sent.
    pub duration: String,
    /// Route-context token (`ctx`) for fetching the detailed route.
    pub context: String,
    pub provider: String,
    pub route: Option<Arc<WalkingRoute>>,
}

impl GisInfo {
    pub fn polyline(&self) -> Option<&Polyline> {
        self.route.as_deref().map(|r| &r.polyline)
    }

    pub fn segments(&self) -> &[WalkingSegment] {
        self.route.as_deref().map_or(&[], |r| r.segments.as_slice())
    }
}

/// Dial-a-ride payload.
#[derive(Debug, Clone, PartialEq)]
pub struct DialARide {
    pub journey: Journey,
    pub call_ahead: bool,
    pub booking_required: bool,
    pub booking_deadline_minutes: Option<u32>,
}

/// Mode-specific payload of a section.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionKind {
    Walk(GisInfo),
    Journey(Journey),
    DialARide(DialARide),
    Bike,
    Car,
    Taxi,
    KissAndRide,
    ParkAndRide,
}

/// One leg of a trip.
#[derive(Debug, Clone, PartialEq)]
pub struct TripSection {
    pub departure: Endpoint,
    pub arrival: Endpoint,
    pub kind: SectionKind,
    /// Section-level messages, separate from any the journey carries.
    pub messages: Vec<ServiceMessage>,
}

impl TripSection {
    pub fn mode(&self) -> TransportMode {
        match &self.kind {
            SectionKind::Walk(_) => TransportMode::Walk,
            SectionKind::Journey(_) => TransportMode::Journey,
            SectionKind::DialARide(_) => TransportMode::Teta,
            SectionKind::Bike => TransportMode::Bike,
            SectionKind::Car => TransportMode::Car,
            SectionKind::Taxi => TransportMode::Taxi,
            SectionKind::KissAndRide => TransportMode::KissAndRide,
            SectionKind::ParkAndRide => TransportMode::ParkAndRide,
        }
    }

    /// The journey of a scheduled or dial-a-ride section.
    pub fn journey(&self) -> Option<&Journey> {
        match &self.kind {
            SectionKind::Journey(journey) => Some(journey),
            SectionKind::DialARide(ride) => Some(&ride.journey),
            _ => None,
        }
    }

    pub fn gis(&self) -> Option<&GisInfo> {
        match &self.kind {
            SectionKind::Walk(gis) => Some(gis),
            _ => None,
        }
    }

    pub fn gis_mut(&mut self) -> Option<&mut GisInfo> {
        match &mut self.kind {
            SectionKind::Walk(gis) => Some(gis),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_tags_roundtrip() {
        for tag in ["WALK", "JNY", "BIKE", "CAR", "TAXI", "KISS", "PARK", "TETA"] {
            let mode: TransportMode = tag.parse().unwrap();
            assert_eq!(mode.as_str(), tag);
        }
    }

    #[test]
    fn unknown_mode_tag() {
        assert_eq!("HOVERCRAFT".parse::<TransportMode>(), Err("HOVERCRAFT".into()));
        assert!("walk".parse::<TransportMode>().is_err());
    }

    #[test]
    fn segment_points_slice_inclusive_range() {
        let polyline = Polyline::from_encoded("kuzrIqyjkAmCzWoD`YqC`^");
        let seg = WalkingSegment {
            poly_start: 1,
            poly_end: 2,
            ..Default::default()
        };
        let points = seg.points(&polyline).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0], polyline.coordinates[1]);

        let out_of_range = WalkingSegment {
            poly_start: 3,
            poly_end: 9,
            ..Default::default()
        };
        assert!(out_of_range.points(&polyline).is_none());
    }

    #[test]
    fn gis_without_route_has_no_geometry() {
        let gis = GisInfo {
            distance: 250,
            duration: "000400".into(),
            context: "G|1|".into(),
            provider: "E".into(),
            route: None,
        };
        assert!(gis.polyline().is_none());
        assert!(gis.segments().is_empty());
    }
}
