//! Walking-route geometry, fetched lazily and shared per route context.
//!
//! Walking sections arrive with only a distance, a duration and an opaque
//! route-context token. `ensure_walking_geometry` fetches the turn-by-turn
//! route for each token once, stores it in the response's `CommonData`, and
//! hands every section with that token the same `Arc`.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{CommonData, Coordinate, Polyline, Trip, WalkingRoute, WalkingSegment};
use crate::hafas::types::{RawGisRouteResult, RawWalkingSegment};
use crate::hafas::{DecodeError, HafasError, resolve};

/// Parsed walking-route response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WalkingDetails {
    /// Every geometry point of the response, across all its polylines.
    pub coordinates: Vec<Coordinate>,
    pub segments: Vec<WalkingSegment>,
    /// The route polyline: the last entry that carried geometry.
    pub polyline: Option<Polyline>,
}

impl WalkingDetails {
    /// The shareable route, or `None` if the response had no geometry.
    pub fn into_route(self) -> Option<WalkingRoute> {
        let polyline = self.polyline.filter(|p| !p.is_empty())?;
        Some(WalkingRoute {
            polyline,
            segments: self.segments,
        })
    }
}

/// Something that can fetch walking details for a route-context token.
#[async_trait]
pub trait WalkingRouteSource: Send + Sync {
    async fn walking_details(&self, context: &str) -> Result<WalkingDetails, HafasError>;
}

#[async_trait]
impl<S: WalkingRouteSource + ?Sized> WalkingRouteSource for Arc<S> {
    async fn walking_details(&self, context: &str) -> Result<WalkingDetails, HafasError> {
        (**self).walking_details(context).await
    }
}

/// Parse the `res` of a walking-route response.
pub fn parse_walking_details(res: &Value) -> Result<WalkingDetails, DecodeError> {
    let raw = RawGisRouteResult::deserialize(res)
        .map_err(|e| DecodeError::malformed("walking route", e))?;

    let common = resolve(&raw.common);
    let coordinates = common
        .polylines
        .iter()
        .flat_map(|p| p.coordinates.iter().copied())
        .collect();
    let polyline = common.polylines.into_iter().rev().find(|p| !p.encoded.is_empty());

    let segments = raw
        .connections
        .iter()
        .flat_map(|c| &c.sections)
        .filter_map(|s| s.gis.as_ref())
        .flat_map(|g| &g.segments)
        .map(convert_segment)
        .collect();

    Ok(WalkingDetails {
        coordinates,
        segments,
        polyline,
    })
}

fn convert_segment(raw: &RawWalkingSegment) -> WalkingSegment {
    WalkingSegment {
        name: raw.name.clone(),
        instruction: raw.instruction.clone(),
        orientation: raw.ori.clone(),
        route_type: raw.route_type.clone(),
        distance: raw.dist,
        poly_start: raw.poly_start,
        poly_end: raw.poly_end,
        icon: raw.icon,
    }
}

/// Attach walking geometry to every walking section of `trip`.
///
/// Tokens already in `common` are attached without a fetch. Otherwise the
/// route is fetched from `source`, stored in `common` and attached. A failed
/// or empty fetch leaves the section with its summary only.
///
/// Returns the number of fetches issued.
pub async fn ensure_walking_geometry<S>(
    trip: &mut Trip,
    common: &mut CommonData,
    source: &S,
) -> usize
where
    S: WalkingRouteSource + ?Sized,
{
    let mut fetches = 0;

    for section in &mut trip.sections {
        let Some(gis) = section.gis_mut() else {
            continue;
        };
        if gis.context.is_empty() {
            continue;
        }

        if let Some(route) = common.walking_route(&gis.context) {
            debug!(ctx = %gis.context, "walking route already known");
            gis.route = Some(Arc::clone(route));
            continue;
        }

        fetches += 1;
        let details = match source.walking_details(&gis.context).await {
            Ok(details) => details,
            Err(e) => {
                warn!(ctx = %gis.context, error = %e, "walking route fetch failed");
                continue;
            }
        };

        let Some(route) = details.into_route() else {
            warn!(ctx = %gis.context, "walking route response had no geometry");
            continue;
        };

        let route = Arc::new(route);
        common
            .walking_routes
            .insert(gis.context.clone(), Arc::clone(&route));
        gis.route = Some(route);
    }

    fetches
}

/// Run `ensure_walking_geometry` over a result set, in trip order.
pub async fn ensure_walking_geometry_all<S>(
    trips: &mut [Trip],
    common: &mut CommonData,
    source: &S,
) -> usize
where
    S: WalkingRouteSource + ?Sized,
{
    let mut fetches = 0;
    for trip in trips {
        fetches += ensure_walking_geometry(trip, common, source).await;
    }
    fetches
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use crate::domain::{Endpoint, GisInfo, LocationIndex, SectionKind, TripSection};

    /// Serves fixed details per token and counts calls.
    #[derive(Default)]
    struct FakeSource {
        routes: HashMap<String, WalkingDetails>,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn with(mut self, context: &str, details: WalkingDetails) -> Self {
            self.routes.insert(context.to_string(), details);
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl WalkingRouteSource for FakeSource {
        async fn walking_details(&self, context: &str) -> Result<WalkingDetails, HafasError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.routes.get(context).cloned().ok_or(HafasError::Service {
                method: "GisRoute".into(),
                code: "H9220".into(),
            })
        }
    }

    fn details(encoded: &str) -> WalkingDetails {
        let polyline = Polyline::from_encoded(encoded);
        WalkingDetails {
            coordinates: polyline.coordinates.clone(),
            segments: vec![WalkingSegment {
                instruction: Some("Gå mod nord".into()),
                distance: 120,
                poly_start: 0,
                poly_end: 1,
                ..Default::default()
            }],
            polyline: Some(polyline),
        }
    }

    fn walk_section(context: &str) -> TripSection {
        TripSection {
            departure: Endpoint::new(LocationIndex(0)),
            arrival: Endpoint::new(LocationIndex(1)),
            kind: SectionKind::Walk(GisInfo {
                distance: 300,
                duration: "000500".into(),
                context: context.into(),
                provider: "E".into(),
                route: None,
            }),
            messages: Vec::new(),
        }
    }

    fn trip(id: &str, sections: Vec<TripSection>) -> Trip {
        Trip {
            id: id.into(),
            date: "20250915".into(),
            duration: "001000".into(),
            changes: 0,
            departure_time: None,
            arrival_time: None,
            sections,
            service_days: None,
            tariff: None,
            messages: Vec::new(),
            subscription: "N".into(),
            checksum: None,
            checksum_dti: None,
            ctx_recon: None,
            rec_state: "U".into(),
        }
    }

    #[tokio::test]
    async fn shared_token_is_fetched_once() {
        let source = FakeSource::default().with("G|shared", details("kuzrIqyjkAmCzWoD`YqC`^"));
        let mut common = CommonData::default();
        let mut trips = vec![
            trip("C-0", vec![walk_section("G|shared")]),
            trip("C-1", vec![walk_section("G|shared")]),
        ];

        let fetches = ensure_walking_geometry_all(&mut trips, &mut common, &source).await;

        assert_eq!(fetches, 1);
        assert_eq!(source.calls(), 1);

        let first = trips[0].sections[0].gis().unwrap().route.as_ref().unwrap();
        let second = trips[1].sections[0].gis().unwrap().route.as_ref().unwrap();
        assert!(Arc::ptr_eq(first, second));
        assert!(Arc::ptr_eq(first, common.walking_route("G|shared").unwrap()));
        assert_eq!(first.polyline.len(), 4);
        assert_eq!(trips[1].sections[0].gis().unwrap().segments().len(), 1);
    }

    #[tokio::test]
    async fn known_tokens_skip_the_fetch() {
        let source = FakeSource::default();
        let mut common = CommonData::default();
        let route = Arc::new(details("_p~iF~ps|U").into_route().unwrap());
        common
            .walking_routes
            .insert("G|known".into(), Arc::clone(&route));

        let mut t = trip("C-0", vec![walk_section("G|known")]);
        assert_eq!(ensure_walking_geometry(&mut t, &mut common, &source).await, 0);
        assert_eq!(source.calls(), 0);
        assert!(Arc::ptr_eq(t.sections[0].gis().unwrap().route.as_ref().unwrap(), &route));
    }

    #[tokio::test]
    async fn failed_fetch_keeps_the_summary() {
        let source = FakeSource::default();
        let mut common = CommonData::default();
        let mut t = trip("C-0", vec![walk_section("G|missing")]);

        ensure_walking_geometry(&mut t, &mut common, &source).await;

        let gis = t.sections[0].gis().unwrap();
        assert_eq!(gis.distance, 300);
        assert_eq!(gis.duration, "000500");
        assert!(gis.route.is_none());
        assert!(gis.polyline().is_none());
        assert!(common.walking_routes.is_empty());
    }

    #[tokio::test]
    async fn empty_geometry_is_not_stored() {
        let source = FakeSource::default().with("G|empty", WalkingDetails::default());
        let mut common = CommonData::default();
        let mut trips = vec![
            trip("C-0", vec![walk_section("G|empty")]),
            trip("C-1", vec![walk_section("G|empty")]),
        ];

        ensure_walking_geometry_all(&mut trips, &mut common, &source).await;

        // Nothing cached, so the second trip tries again.
        assert_eq!(source.calls(), 2);
        assert!(trips.iter().all(|t| t.sections[0].gis().unwrap().route.is_none()));
        assert!(common.walking_routes.is_empty());
    }

    #[tokio::test]
    async fn non_walking_sections_and_empty_tokens_are_ignored() {
        let source = FakeSource::default();
        let mut common = CommonData::default();
        let bike = TripSection {
            kind: SectionKind::Bike,
            ..walk_section("")
        };
        let mut t = trip("C-0", vec![bike, walk_section("")]);

        assert_eq!(ensure_walking_geometry(&mut t, &mut common, &source).await, 0);
        assert_eq!(source.calls(), 0);
    }

    #[test]
    fn parse_walking_route_response() {
        let res = json!({
            "common": {
                "polyL": [
                    { "lDrawStyleX": 0 },
                    { "crdEncYX": "_p~iF~ps|U", "delta": true, "dim": 2 },
                    { "crdEncYX": "kuzrIqyjkAmCzWoD`YqC`^", "crdEncS": "NNNN" }
                ]
            },
            "conL": [ {
                "secL": [ {
                    "type": "WALK",
                    "gis": {
                        "dist": 420,
                        "segL": [
                            { "name": "Vesterbrogade", "manTx": "Gå ligeud", "ori": "N",
                              "dist": 300, "polyS": 0, "polyE": 2 },
                            { "name": "Banegårdspladsen", "manTx": "Drej til venstre",
                              "dist": 120, "polyS": 2, "polyE": 3, "icoX": 4 }
                        ]
                    }
                } ]
            } ]
        });

        let details = parse_walking_details(&res).unwrap();

        assert_eq!(details.coordinates.len(), 5);
        let polyline = details.polyline.as_ref().unwrap();
        assert_eq!(polyline.encoded, "kuzrIqyjkAmCzWoD`YqC`^");
        assert_eq!(polyline.encoding_start.as_deref(), Some("NNNN"));

        assert_eq!(details.segments.len(), 2);
        assert_eq!(details.segments[0].orientation.as_deref(), Some("N"));
        assert_eq!(details.segments[1].instruction.as_deref(), Some("Drej til venstre"));
        assert_eq!(details.segments[1].points(polyline).map(<[_]>::len), Some(2));

        let route = details.into_route().unwrap();
        assert_eq!(route.segments.len(), 2);
    }

    #[test]
    fn parse_response_without_geometry() {
        let details = parse_walking_details(&json!({ "common": {}, "conL": [] })).unwrap();
        assert!(details.polyline.is_none());
        assert!(details.into_route().is_none());
    }
}
