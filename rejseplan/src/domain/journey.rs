//! Scheduled and dial-a-ride journeys and their stops.

use super::{
    CommonData, Coordinate, DomainError, LocationIndex, PolylineIndex, ProductIndex,
    ServiceMessage,
};

/// A stop along a journey.
///
/// Times are kept as sent. A stop without times is valid: the journey passes
/// it with no published schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stop {
    pub location: LocationIndex,
    pub arrival_time: Option<String>,
    pub departure_time: Option<String>,
    /// Realtime arrival (`aTimeR`), when the planner has a prognosis.
    pub arrival_realtime: Option<String>,
    pub departure_realtime: Option<String>,
    pub arrival_platform: Option<String>,
    pub departure_platform: Option<String>,
    pub arrival_delay: Option<i32>,
    pub departure_delay: Option<i32>,
    pub cancelled: bool,
    /// Stop not in the original timetable.
    pub additional: bool,
}

impl Stop {
    /// A stop with no times or flags.
    pub fn new(location: LocationIndex) -> Self {
        Self {
            location,
            arrival_time: None,
            departure_time: None,
            arrival_realtime: None,
            departure_realtime: None,
            arrival_platform: None,
            departure_platform: None,
            arrival_delay: None,
            departure_delay: None,
            cancelled: false,
            additional: false,
        }
    }

    /// Whether any schedule is published for this stop.
    pub fn has_schedule(&self) -> bool {
        self.arrival_time.is_some() || self.departure_time.is_some()
    }
}

/// One scheduled or dial-a-ride leg.
#[derive(Debug, Clone, PartialEq)]
pub struct Journey {
    pub jid: String,
    pub date: String,
    pub product: Option<ProductIndex>,
    pub direction_text: Option<String>,
    pub direction_flag: Option<String>,
    pub status: Option<String>,
    pub is_reachable: bool,
    pub stops: Vec<Stop>,
    /// Route geometry, in drawing order. Dereferenced through `CommonData`.
    pub polylines: Vec<PolylineIndex>,
    pub messages: Vec<ServiceMessage>,
    pub subscription: String,
    pub ctx_recon: Option<String>,
}

impl Journey {
    /// Concatenate the journey's polylines in index-list order.
    ///
    /// Fails on the first index the table doesn't have.
    pub fn route_coordinates(&self, common: &CommonData) -> Result<Vec<Coordinate>, DomainError> {
        let mut coordinates = Vec::new();
        for &idx in &self.polylines {
            coordinates.extend_from_slice(&common.polyline(idx)?.coordinates);
        }
        Ok(coordinates)
    }
}
