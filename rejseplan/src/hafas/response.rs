//! Response envelopes to decoded results.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::domain::{CommonData, Location, ServiceMessage, Trip};

use super::assembler::decode_trips;
use super::error::{DecodeError, HafasError};
use super::resolver::{convert_location, convert_message, resolve_value};
use super::types::{
    RawHimSearchResult, RawLocMatchResult, RawTripSearchResult, ResponseEnvelope,
};

/// Status code of a successful envelope or service result.
const OK: &str = "OK";

/// Decoded trip search: the trips plus the tables they point into.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TripSearchResult {
    pub trips: Vec<Trip>,
    pub common: CommonData,
    /// Context for `ScrollDirection::Earlier`.
    pub scroll_earlier: Option<String>,
    /// Context for `ScrollDirection::Later`.
    pub scroll_later: Option<String>,
    /// Start of the planning period (`fpB`).
    pub period_begin: Option<String>,
    /// End of the planning period (`fpE`).
    pub period_end: Option<String>,
    /// Realtime data timestamp (`planrtTS`).
    pub realtime_timestamp: Option<String>,
    /// Connection groups (`outConGrpL`), passed through undecoded.
    pub connection_groups: Vec<Value>,
}

/// Pull the `res` of `method` out of an envelope.
///
/// Any status other than `OK` on the matching service result is an error,
/// even if a result body came along with it.
pub fn find_result(envelope: ResponseEnvelope, method: &str) -> Result<Value, HafasError> {
    let Some(result) = envelope.results.into_iter().find(|r| r.meth == method) else {
        return Err(match envelope.err {
            Some(code) if code != OK => HafasError::Service {
                method: method.to_string(),
                code,
            },
            _ => HafasError::MissingResult(method.to_string()),
        });
    };

    if let Some(code) = result.err.filter(|c| c != OK) {
        debug!(method, %code, text = ?result.err_text, "service error");
        return Err(HafasError::Service {
            method: method.to_string(),
            code,
        });
    }

    result
        .res
        .ok_or_else(|| HafasError::MissingResult(method.to_string()))
}

/// Decode the `res` of a `TripSearch` or `Reconstruction` call.
///
/// Fails only if the response as a whole is unusable; bad connections are
/// dropped.
pub fn decode_trip_search(res: &Value) -> Result<TripSearchResult, DecodeError> {
    let raw = RawTripSearchResult::deserialize(res)
        .map_err(|e| DecodeError::malformed("trip search result", e))?;

    let common = match &raw.common {
        Some(common) => resolve_value(common)?,
        None => CommonData::default(),
    };
    let trips = decode_trips(&raw.connections, &common);

    debug!(
        trips = trips.len(),
        connections = raw.connections.len(),
        "decoded trip search"
    );

    Ok(TripSearchResult {
        trips,
        common,
        scroll_earlier: raw.scroll_earlier,
        scroll_later: raw.scroll_later,
        period_begin: raw.period_begin,
        period_end: raw.period_end,
        realtime_timestamp: raw.realtime_timestamp,
        connection_groups: raw.connection_groups,
    })
}

/// Decode the `res` of a `LocMatch` call.
pub fn decode_locations(res: &Value) -> Result<Vec<Location>, DecodeError> {
    let raw = RawLocMatchResult::deserialize(res)
        .map_err(|e| DecodeError::malformed("location match", e))?;
    Ok(raw.matches.locations.iter().map(convert_location).collect())
}

/// Decode the `res` of a `HimSearch` call.
pub fn decode_messages(res: &Value) -> Result<Vec<ServiceMessage>, DecodeError> {
    let raw = RawHimSearchResult::deserialize(res)
        .map_err(|e| DecodeError::malformed("message search", e))?;
    Ok(raw.messages.iter().map(convert_message).collect())
}
