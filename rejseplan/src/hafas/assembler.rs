//! Connection records to `Trip`s.
//!
//! Each connection is decoded on its own. A structural failure anywhere in a
//! connection fails that connection only; batch helpers hand back one result
//! per record or drop the failures with a warning.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::domain::{
    CommonData, DEFAULT_BOOKING_DEADLINE_MINUTES, DialARide, Endpoint, GisInfo, Journey,
    SectionKind, ServiceDays, Stop, TariffResult, TransportMode, Trip, TripSection,
};

use super::error::DecodeError;
use super::resolver::convert_message;
use super::types::{
    RawConnection, RawEndpoint, RawGis, RawJourney, RawSection, RawServiceDays, RawStop,
    RawTariffResult,
};

/// Default subscription flag of connections and journeys.
const NOT_SUBSCRIBED: &str = "N";
/// Default reconstruction state.
const REC_STATE_UNKNOWN: &str = "U";
/// Default GIS provider tag.
const DEFAULT_GIS_PROVIDER: &str = "E";

/// Decode one connection record against the tables of its response.
///
/// Every index the connection carries is checked against `common`, so a
/// trip that decodes here can be dereferenced through `common` safely.
pub fn assemble(connection: &Value, common: &CommonData) -> Result<Trip, DecodeError> {
    let raw = RawConnection::deserialize(connection)
        .map_err(|e| DecodeError::malformed("connection", e))?;
    assemble_raw(raw, common)
}

/// Decode every connection, keeping one result per record in input order.
pub fn assemble_all(connections: &[Value], common: &CommonData) -> Vec<Result<Trip, DecodeError>> {
    connections.iter().map(|c| assemble(c, common)).collect()
}

/// Decode every connection, dropping (and logging) the ones that fail.
pub fn decode_trips(connections: &[Value], common: &CommonData) -> Vec<Trip> {
    connections
        .iter()
        .zip(assemble_all(connections, common))
        .filter_map(|(raw, result)| match result {
            Ok(trip) => Some(trip),
            Err(e) => {
                let cid = raw.get("cid").and_then(Value::as_str).unwrap_or("?");
                warn!(cid, error = %e, "skipping connection");
                None
            }
        })
        .collect()
}

fn assemble_raw(raw: RawConnection, common: &CommonData) -> Result<Trip, DecodeError> {
    let sections = raw
        .sections
        .into_iter()
        .map(|s| convert_section(s, common))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Trip {
        id: raw.cid.unwrap_or_default(),
        date: raw.date.unwrap_or_default(),
        duration: raw.dur.unwrap_or_default(),
        changes: raw.chg.unwrap_or(0),
        departure_time: raw.dep.and_then(|t| t.dep_time),
        arrival_time: raw.arr.and_then(|t| t.arr_time),
        sections,
        service_days: raw.service_days.map(convert_service_days),
        tariff: raw.tariff.map(convert_tariff),
        messages: raw.messages.iter().map(convert_message).collect(),
        subscription: raw
            .subscription
            .unwrap_or_else(|| NOT_SUBSCRIBED.to_string()),
        checksum: raw.cksum,
        checksum_dti: raw.cksum_dti,
        ctx_recon: raw.ctx_recon,
        rec_state: raw
            .rec_state
            .unwrap_or_else(|| REC_STATE_UNKNOWN.to_string()),
    })
}

fn convert_section(raw: RawSection, common: &CommonData) -> Result<TripSection, DecodeError> {
    let mode: TransportMode = raw.mode.parse().map_err(DecodeError::UnknownMode)?;

    let departure = convert_endpoint(raw.dep, common)?;
    let arrival = convert_endpoint(raw.arr, common)?;

    let kind = match mode {
        TransportMode::Walk => {
            let gis = raw.gis.ok_or(DecodeError::MissingField("gis"))?;
            SectionKind::Walk(convert_gis(gis))
        }
        TransportMode::Journey => {
            let jny = raw.jny.ok_or(DecodeError::MissingField("jny"))?;
            SectionKind::Journey(convert_journey(jny, common)?)
        }
        TransportMode::Teta => {
            let jny = raw.jny.ok_or(DecodeError::MissingField("jny"))?;
            let journey = convert_journey(jny, common)?;
            // Booking is a client policy, keyed on the call-ahead flag being sent at all.
            SectionKind::DialARide(match departure.call_ahead {
                Some(call_ahead) => DialARide {
                    journey,
                    call_ahead,
                    booking_required: true,
                    booking_deadline_minutes: Some(DEFAULT_BOOKING_DEADLINE_MINUTES),
                },
                None => DialARide {
                    journey,
                    call_ahead: false,
                    booking_required: false,
                    booking_deadline_minutes: None,
                },
            })
        }
        TransportMode::Bike => SectionKind::Bike,
        TransportMode::Car => SectionKind::Car,
        TransportMode::Taxi => SectionKind::Taxi,
        TransportMode::KissAndRide => SectionKind::KissAndRide,
        TransportMode::ParkAndRide => SectionKind::ParkAndRide,
    };

    Ok(TripSection {
        departure,
        arrival,
        kind,
        messages: raw.messages.iter().map(convert_message).collect(),
    })
}

fn convert_endpoint(raw: RawEndpoint, common: &CommonData) -> Result<Endpoint, DecodeError> {
    common.location(raw.location)?;

    Ok(Endpoint {
        location: raw.location,
        departure_time: raw.dep_time,
        departure_realtime: raw.dep_time_realtime,
        arrival_time: raw.arr_time,
        arrival_realtime: raw.arr_time_realtime,
        departure_platform: raw.dep_platform,
        arrival_platform: raw.arr_platform,
        call_ahead: raw
            .call_ahead
            .map(|flag| flag.as_bool().unwrap_or(false)),
        extra: raw.extra,
    })
}

pub(crate) fn convert_gis(raw: RawGis) -> GisInfo {
    GisInfo {
        distance: raw.dist,
        duration: raw.duration,
        context: raw.ctx,
        provider: raw
            .provider
            .unwrap_or_else(|| DEFAULT_GIS_PROVIDER.to_string()),
        route: None,
    }
}

fn convert_journey(raw: RawJourney, common: &CommonData) -> Result<Journey, DecodeError> {
    if let Some(product) = raw.product {
        common.product(product)?;
    }

    let polylines = raw.poly_group.map(|g| g.polylines).unwrap_or_default();
    for &idx in &polylines {
        common.polyline(idx)?;
    }

    let stops = raw
        .stops
        .into_iter()
        .map(|s| convert_stop(s, common))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Journey {
        jid: raw.jid,
        date: raw.date,
        product: raw.product,
        direction_text: raw.direction_text,
        direction_flag: raw.direction_flag,
        status: raw.status,
        is_reachable: raw.is_reachable.unwrap_or(true),
        stops,
        polylines,
        messages: raw.messages.iter().map(convert_message).collect(),
        subscription: raw
            .subscription
            .unwrap_or_else(|| NOT_SUBSCRIBED.to_string()),
        ctx_recon: raw.ctx_recon,
    })
}

fn convert_stop(raw: RawStop, common: &CommonData) -> Result<Stop, DecodeError> {
    common.location(raw.location)?;

    Ok(Stop {
        location: raw.location,
        arrival_time: raw.arr_time,
        departure_time: raw.dep_time,
        arrival_realtime: raw.arr_time_realtime,
        departure_realtime: raw.dep_time_realtime,
        arrival_platform: raw.arr_platform,
        departure_platform: raw.dep_platform,
        arrival_delay: raw.arr_delay,
        departure_delay: raw.dep_delay,
        cancelled: raw.cancelled,
        additional: raw.additional,
    })
}

fn convert_service_days(raw: RawServiceDays) -> ServiceDays {
    ServiceDays {
        regular: raw.regular,
        irregular: raw.irregular,
        bitmask: raw.bitmask,
    }
}

fn convert_tariff(raw: RawTariffResult) -> TariffResult {
    TariffResult {
        status_code: raw.status_code,
        external_content: raw.external_content,
        messages: raw.messages,
    }
}
