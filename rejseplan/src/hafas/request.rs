//! Request payloads.
//!
//! The envelope is typed; the per-method `req` bodies are built as JSON
//! since each method takes a different, loosely specified shape.

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::{Coordinate, Location, product_class};

/// Request id sent with each service request.
const SERVICE_REQUEST_ID: &str = "1|1|";

/// Outer request envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestEnvelope {
    /// `req_<millis>_<counter>`
    pub id: String,
    pub ver: String,
    pub lang: String,
    pub auth: Auth,
    pub client: ClientInfo,
    pub formatted: bool,
    pub ext: String,
    #[serde(rename = "svcReqL")]
    pub requests: Vec<ServiceRequest>,
}

impl RequestEnvelope {
    /// Methods requested, in order.
    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.requests.iter().map(|r| r.meth.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Auth {
    #[serde(rename = "type")]
    pub kind: String,
    pub aid: String,
}

impl Auth {
    pub fn aid(aid: impl Into<String>) -> Self {
        Self {
            kind: "AID".to_string(),
            aid: aid.into(),
        }
    }
}

/// Client descriptor sent with every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientInfo {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub l: String,
    pub v: String,
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self {
            id: "DK".to_string(),
            kind: "WEB".to_string(),
            name: "rejseplanwebapp".to_string(),
            l: "vs_webapp".to_string(),
            v: "1.0.5".to_string(),
        }
    }
}

/// One method call within an envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceRequest {
    pub meth: String,
    pub req: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl ServiceRequest {
    pub fn new(meth: impl Into<String>, req: Value) -> Self {
        Self {
            meth: meth.into(),
            req,
            id: Some(SERVICE_REQUEST_ID.to_string()),
        }
    }

    /// Walking-route requests go without a request id.
    pub fn gis_route(context: &str) -> Self {
        Self {
            meth: "GisRoute".to_string(),
            req: json!({
                "gisCtx": context,
                "getDescription": true,
                "getPolyline": true,
            }),
            id: None,
        }
    }

    pub fn reconstruction(ctx_recon: &str) -> Self {
        Self::new(
            "Reconstruction",
            json!({
                "ctxRecon": ctx_recon,
                "getPolyline": true,
                "getPasslist": true,
                "getTariff": true,
            }),
        )
    }

    pub fn scroll(context: &str, direction: ScrollDirection, count: u32) -> Self {
        let mut req = json!({ "ctxScr": context });
        req[direction.count_key()] = json!(count);
        Self::new("TripSearch", req)
    }

    pub fn him_search(location_ids: &[String], him_ids: &[String]) -> Self {
        let mut req = json!({});
        if !location_ids.is_empty() {
            req["locL"] = location_ids.iter().map(|lid| json!({ "lid": lid })).collect();
        }
        if !him_ids.is_empty() {
            req["himIdL"] = json!(him_ids);
        }
        Self::new("HimSearch", req)
    }
}

/// Which way to page through trip results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    /// `outCtxScrB`
    Earlier,
    /// `outCtxScrF`
    Later,
}

impl ScrollDirection {
    fn count_key(self) -> &'static str {
        match self {
            ScrollDirection::Earlier => "numB",
            ScrollDirection::Later => "numF",
        }
    }
}

/// Location search category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocationKind {
    Station,
    Address,
    Poi,
    Coordinate,
    #[default]
    All,
}

impl LocationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationKind::Station => "S",
            LocationKind::Address => "A",
            LocationKind::Poi => "P",
            LocationKind::Coordinate => "C",
            LocationKind::All => "ALL",
        }
    }
}

/// A `LocMatch` query.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationQuery {
    pub name: String,
    pub kind: LocationKind,
    pub max_results: u32,
    /// Search radius in metres around `near`.
    pub radius: u32,
    pub near: Option<Coordinate>,
}

impl LocationQuery {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: LocationKind::All,
            max_results: 10,
            radius: 1000,
            near: None,
        }
    }

    pub fn with_kind(mut self, kind: LocationKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_max_results(mut self, n: u32) -> Self {
        self.max_results = n;
        self
    }

    pub fn near(mut self, centre: Coordinate, radius: u32) -> Self {
        self.near = Some(centre);
        self.radius = radius;
        self
    }

    pub fn to_request(&self) -> ServiceRequest {
        let mut loc = json!({
            "name": self.name,
            "type": self.kind.as_str(),
            "dist": self.radius,
        });
        if let Some(centre) = &self.near {
            let (x, y) = centre.to_microdegrees();
            loc["crd"] = json!({ "x": x, "y": y });
        }

        ServiceRequest::new(
            "LocMatch",
            json!({
                "input": {
                    "field": "S",
                    "loc": loc,
                    "maxLoc": self.max_results,
                }
            }),
        )
    }
}

/// Multimodal request group (`jnyFltrL` entry of type `GROUP`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportRequestType {
    WalkPublic,
    BikeDonkeyBack,
    BikeDonkeyFront,
    BikeDonkeyOnly,
    CarGomoreOnly,
    CarNabogoFront,
    CarNabogoBack,
    CarNabogoOnly,
    CarFdmFront,
    CarFdmBack,
    CarFdmOnly,
}

impl TransportRequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportRequestType::WalkPublic => "RQ_WALK_OEV",
            TransportRequestType::BikeDonkeyBack => "RQ_BIKESH_DONKEY_BACK",
            TransportRequestType::BikeDonkeyFront => "RQ_BIKESH_DONKEY_FRONT",
            TransportRequestType::BikeDonkeyOnly => "RQ_BIKESH_DONKEY_ONLY",
            TransportRequestType::CarGomoreOnly => "RQ_CARPO_GOMORE_ONLY",
            TransportRequestType::CarNabogoFront => "RQ_CARPO_NABOGO_FRONT",
            TransportRequestType::CarNabogoBack => "RQ_CARPO_NABOGO_BACK",
            TransportRequestType::CarNabogoOnly => "RQ_CARPO_NABOGO_ONLY",
            TransportRequestType::CarFdmFront => "RQ_CARPO_FDM_FRONT",
            TransportRequestType::CarFdmBack => "RQ_CARPO_FDM_BACK",
            TransportRequestType::CarFdmOnly => "RQ_CARPO_FDM_ONLY",
        }
    }
}

/// A `TripSearch` query.
#[derive(Debug, Clone, PartialEq)]
pub struct TripSearchRequest {
    pub origin: Location,
    pub destination: Location,
    pub via: Vec<Location>,
    pub time: NaiveDateTime,
    /// Whether `time` is the latest arrival rather than the earliest departure.
    pub arrive_by: bool,
    /// `product_class` bitmask.
    pub products: u32,
    pub max_changes: i32,
    /// Minutes; -1 leaves it to the planner.
    pub min_change_time: i32,
    /// Percent of normal walking speed.
    pub walk_speed: u32,
    /// Metres.
    pub max_walk_distance: u32,
    pub bike_carriage: bool,
    pub transport_modes: Vec<TransportRequestType>,
    pub get_polylines: bool,
    pub get_passlist: bool,
    pub get_tariff: bool,
    pub num_trips: Option<u32>,
}

impl TripSearchRequest {
    /// Depart from `origin` at or after `time`.
    pub fn new(origin: Location, destination: Location, time: NaiveDateTime) -> Self {
        Self {
            origin,
            destination,
            via: Vec::new(),
            time,
            arrive_by: false,
            products: product_class::ALL,
            max_changes: 1000,
            min_change_time: -1,
            walk_speed: 100,
            max_walk_distance: 2000,
            bike_carriage: false,
            transport_modes: vec![TransportRequestType::WalkPublic],
            get_polylines: true,
            get_passlist: true,
            get_tariff: true,
            num_trips: None,
        }
    }

    /// Arrive at `destination` no later than the request time.
    pub fn arrive_by(mut self) -> Self {
        self.arrive_by = true;
        self
    }

    pub fn via(mut self, location: Location) -> Self {
        self.via.push(location);
        self
    }

    pub fn with_products(mut self, products: u32) -> Self {
        self.products = products;
        self
    }

    pub fn with_max_changes(mut self, n: i32) -> Self {
        self.max_changes = n;
        self
    }

    pub fn with_min_change_time(mut self, minutes: i32) -> Self {
        self.min_change_time = minutes;
        self
    }

    pub fn with_walking(mut self, speed: u32, max_distance: u32) -> Self {
        self.walk_speed = speed;
        self.max_walk_distance = max_distance;
        self
    }

    pub fn with_bike_carriage(mut self, enabled: bool) -> Self {
        self.bike_carriage = enabled;
        self
    }

    pub fn with_transport_modes(mut self, modes: Vec<TransportRequestType>) -> Self {
        self.transport_modes = modes;
        self
    }

    pub fn with_polylines(mut self, enabled: bool) -> Self {
        self.get_polylines = enabled;
        self
    }

    pub fn with_num_trips(mut self, n: u32) -> Self {
        self.num_trips = Some(n);
        self
    }

    fn journey_filters(&self) -> Vec<Value> {
        let modes = if self.transport_modes.is_empty() {
            &[TransportRequestType::WalkPublic][..]
        } else {
            &self.transport_modes[..]
        };

        modes
            .iter()
            .map(|m| json!({ "type": "GROUP", "mode": "INC", "value": m.as_str() }))
            .chain(std::iter::once(
                json!({ "type": "PROD", "mode": "INC", "value": self.products }),
            ))
            .collect()
    }

    fn gis_filters(&self) -> Value {
        let maxdist = self.max_walk_distance.to_string();
        let speed = self.walk_speed.to_string();
        let profile = |mode: &str, kind: &str, enabled: bool| {
            json!({
                "type": "P",
                "mode": mode,
                "profile": { "type": kind, "maxdist": maxdist, "speed": speed, "enabled": enabled },
            })
        };

        json!([[
            profile("F", "F", true),
            profile("F", "B", self.bike_carriage),
            profile("B", "F", true),
            profile("B", "B", self.bike_carriage),
            { "type": "P", "mode": "T", "profile": { "type": "F", "speed": speed } },
        ]])
    }

    pub fn to_request(&self) -> ServiceRequest {
        let mut req = json!({
            "getConGroups": true,
            "jnyFltrL": self.journey_filters(),
            "getPolyline": self.get_polylines,
            "getPasslist": self.get_passlist,
            "depLocL": [location_request(&self.origin)],
            "arrLocL": [location_request(&self.destination)],
            "outFrwd": !self.arrive_by,
            "outTime": self.time.format("%H%M%S").to_string(),
            "outDate": self.time.format("%Y%m%d").to_string(),
            "liveSearch": false,
            "maxChg": self.max_changes.to_string(),
            "minChgTime": self.min_change_time.to_string(),
            "gisFltrL": self.gis_filters(),
            "getIV": true,
            "getTariff": self.get_tariff,
        });

        if !self.via.is_empty() {
            req["viaLocL"] = self.via.iter().map(location_request).collect();
        }
        if let Some(n) = self.num_trips {
            req["numF"] = json!(n);
        }

        ServiceRequest::new("TripSearch", req)
    }
}

/// A resolved location as request payloads carry it.
pub fn location_request(location: &Location) -> Value {
    let (x, y) = location.coordinate.to_microdegrees();
    json!({
        "lid": location.lid,
        "type": location.kind,
        "name": location.name,
        "icoX": location.icon.map_or(0, |i| i.0),
        "extId": location.ext_id.as_deref().unwrap_or(""),
        "state": location.state,
        "crd": {
            "x": x,
            "y": y,
            "layerX": location.coordinate.layer_index,
            "crdSysX": location.coordinate.crd_sys_index,
        },
        "pCls": location.product_classes,
        "pRefL": location.product_refs,
        "wt": location.weight,
        "isMainMast": location.is_main_mast,
    })
}
