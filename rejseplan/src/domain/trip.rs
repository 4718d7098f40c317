//! Complete trips.

use chrono::Duration;
use serde_json::Value;

use super::{
    SectionKind, ServiceMessage, TimeError, TransportMode, TripSection, parse_duration,
};

/// Service day description (`sDays`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServiceDays {
    /// Regular days, e.g. "lør, søn".
    pub regular: Option<String>,
    /// Irregular days, e.g. "også 15. sep - 3. okt 2025".
    pub irregular: Option<String>,
    /// Hex day bitmask.
    pub bitmask: Option<String>,
}

/// Fare calculation result (`trfRes`).
///
/// Fare sets are not expanded; only the status code and the free-form parts
/// are kept.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TariffResult {
    pub status_code: String,
    pub external_content: Option<Value>,
    pub messages: Vec<Value>,
}

/// One itinerary from origin to destination.
///
/// Sections are contiguous: each arrival location is the next departure
/// location. This is taken on trust from the planner.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    /// Connection id (`cid`).
    pub id: String,
    pub date: String,
    /// `HHMMSS` or `DDHHMMSS`, as sent.
    pub duration: String,
    pub changes: u32,
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
    pub sections: Vec<TripSection>,
    pub service_days: Option<ServiceDays>,
    pub tariff: Option<TariffResult>,
    pub messages: Vec<ServiceMessage>,
    pub subscription: String,
    pub checksum: Option<String>,
    pub checksum_dti: Option<String>,
    pub ctx_recon: Option<String>,
    pub rec_state: String,
}

impl Trip {
    /// Parsed total duration.
    pub fn total_duration(&self) -> Result<Duration, TimeError> {
        parse_duration(&self.duration)
    }

    /// Whether any section is dial-a-ride that needs booking.
    pub fn requires_booking(&self) -> bool {
        self.sections.iter().any(|s| match &s.kind {
            SectionKind::DialARide(ride) => ride.booking_required,
            _ => false,
        })
    }

    /// Trip-level messages announcing that the trip must be booked.
    pub fn booking_notices(&self) -> impl Iterator<Item = &ServiceMessage> + '_ {
        self.messages.iter().filter(|m| m.is_teletaxi())
    }

    pub fn modes(&self) -> impl Iterator<Item = TransportMode> + '_ {
        self.sections.iter().map(TripSection::mode)
    }
}
