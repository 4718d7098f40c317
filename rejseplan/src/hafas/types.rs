//! Planner response DTOs.
//!
//! These types map directly to the JSON the planner sends. Fields are
//! `Option` liberally because the planner omits keys rather than sending
//! nulls. The few required fields are the ones decoding can't do without:
//! a section's mode tag and the location index of every endpoint and stop.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::{
    DrawStyleIndex, IconIndex, LocationIndex, OperatorIndex, PolylineIndex, ProductIndex,
    RemarkIndex,
};

/// Outer response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseEnvelope {
    /// Envelope-level status, `OK` on success.
    pub err: Option<String>,
    #[serde(rename = "svcResL", default)]
    pub results: Vec<ServiceResult>,
}

/// Result of one service request within the envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceResult {
    pub meth: String,
    pub err: Option<String>,
    #[serde(rename = "errTxt")]
    pub err_text: Option<String>,
    pub res: Option<Value>,
}

/// The common block of a response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCommon {
    #[serde(rename = "locL")]
    pub locations: Vec<RawLocation>,
    #[serde(rename = "prodL")]
    pub products: Vec<RawProduct>,
    #[serde(rename = "polyL")]
    pub polylines: Vec<RawPolyline>,
    #[serde(rename = "opL")]
    pub operators: Vec<RawOperator>,
    #[serde(rename = "remL")]
    pub remarks: Vec<RawMessage>,
    #[serde(rename = "icoL")]
    pub icons: Vec<RawIcon>,
    #[serde(rename = "dirL")]
    pub directions: Vec<RawDirection>,
    #[serde(rename = "lDrawStyleL")]
    pub draw_styles: Vec<RawDrawStyle>,
    #[serde(rename = "layerL")]
    pub layers: Vec<Value>,
    #[serde(rename = "crdSysL")]
    pub coordinate_systems: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCoordinate {
    #[serde(default)]
    pub x: i64,
    #[serde(default)]
    pub y: i64,
    #[serde(rename = "layerX", default)]
    pub layer: usize,
    #[serde(rename = "crdSysX", default)]
    pub crd_sys: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawLocation {
    pub lid: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub crd: Option<RawCoordinate>,
    #[serde(rename = "extId")]
    pub ext_id: Option<String>,
    pub state: Option<String>,
    pub wt: u32,
    #[serde(rename = "isMainMast")]
    pub is_main_mast: bool,
    #[serde(rename = "pCls")]
    pub product_classes: u32,
    #[serde(rename = "pRefL")]
    pub product_refs: Vec<ProductIndex>,
    #[serde(rename = "icoX")]
    pub icon: Option<IconIndex>,
    #[serde(rename = "H")]
    pub house_number: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawProductContext {
    pub num: Option<String>,
    pub line: Option<String>,
    #[serde(rename = "lineId")]
    pub line_id: Option<String>,
    #[serde(rename = "catIn")]
    pub cat_in: Option<String>,
    #[serde(rename = "catOut")]
    pub cat_out: Option<String>,
    #[serde(rename = "catCode")]
    pub cat_code: Option<String>,
    pub admin: Option<String>,
    #[serde(rename = "matchId")]
    pub match_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawProduct {
    pub pid: Option<String>,
    pub name: String,
    #[serde(rename = "nameS")]
    pub name_short: Option<String>,
    pub number: Option<String>,
    #[serde(rename = "prodCtx")]
    pub context: Option<RawProductContext>,
    pub cls: u32,
    #[serde(rename = "oprX")]
    pub operator: Option<OperatorIndex>,
    #[serde(rename = "icoX")]
    pub icon: Option<IconIndex>,
    #[serde(rename = "himIdL")]
    pub him_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPolylineLocationRef {
    #[serde(rename = "ppIdx")]
    pub point_index: usize,
    #[serde(rename = "locX")]
    pub location: LocationIndex,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPolyline {
    /// Encoded geometry. Absent on style-only entries.
    #[serde(rename = "crdEncYX")]
    pub encoded: Option<String>,
    #[serde(rename = "ppLocRefL")]
    pub location_refs: Vec<RawPolylineLocationRef>,
    #[serde(rename = "lDrawStyleX")]
    pub draw_style: Option<DrawStyleIndex>,
    pub delta: Option<bool>,
    pub dim: Option<u8>,
    #[serde(rename = "crdEncS")]
    pub encoding_start: Option<String>,
    #[serde(rename = "crdEncF")]
    pub encoding_format: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawOperator {
    pub name: String,
    #[serde(rename = "icoX")]
    pub icon: Option<IconIndex>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RawColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawIcon {
    pub res: String,
    pub txt: Option<String>,
    pub fg: Option<RawColor>,
    pub bg: Option<RawColor>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawDrawStyle {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(rename = "sIcoX")]
    pub icon: Option<IconIndex>,
    pub bg: Option<RawColor>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawDirection {
    pub txt: String,
    pub flg: Option<String>,
}

/// A remark or message, whether in `remL` or a `msgL` list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub code: Option<String>,
    pub prio: i32,
    #[serde(rename = "txtN")]
    pub text: Option<String>,
    #[serde(rename = "txtS")]
    pub text_short: Option<String>,
    #[serde(rename = "icoX")]
    pub icon: Option<IconIndex>,
    pub sty: Option<String>,
    #[serde(rename = "fLocX")]
    pub from_location: Option<LocationIndex>,
    #[serde(rename = "tLocX")]
    pub to_location: Option<LocationIndex>,
    #[serde(rename = "tagL")]
    pub tags: Vec<String>,
    pub sort: i64,
    #[serde(rename = "remX")]
    pub remark: Option<RemarkIndex>,
}

/// One candidate trip (`outConL` entry).
#[derive(Debug, Clone, Deserialize)]
pub struct RawConnection {
    pub cid: Option<String>,
    pub date: Option<String>,
    pub dur: Option<String>,
    pub chg: Option<u32>,
    pub dep: Option<RawConnectionTime>,
    pub arr: Option<RawConnectionTime>,
    #[serde(rename = "secL", default)]
    pub sections: Vec<RawSection>,
    #[serde(rename = "sDays")]
    pub service_days: Option<RawServiceDays>,
    #[serde(rename = "trfRes")]
    pub tariff: Option<RawTariffResult>,
    #[serde(rename = "msgL", default)]
    pub messages: Vec<RawMessage>,
    #[serde(rename = "conSubscr")]
    pub subscription: Option<String>,
    pub cksum: Option<String>,
    #[serde(rename = "cksumDti")]
    pub cksum_dti: Option<String>,
    #[serde(rename = "ctxRecon")]
    pub ctx_recon: Option<String>,
    #[serde(rename = "recState")]
    pub rec_state: Option<String>,
}

/// Header times of a connection. Only the scheduled time is read.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConnectionTime {
    #[serde(rename = "dTimeS")]
    pub dep_time: Option<String>,
    #[serde(rename = "aTimeS")]
    pub arr_time: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawServiceDays {
    #[serde(rename = "sDaysR")]
    pub regular: Option<String>,
    #[serde(rename = "sDaysI")]
    pub irregular: Option<String>,
    #[serde(rename = "sDaysB")]
    pub bitmask: Option<String>,
}

/// Fare result. `fareSetL` is deliberately not modelled.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawTariffResult {
    #[serde(rename = "statusCode")]
    pub status_code: String,
    #[serde(rename = "extCont")]
    pub external_content: Option<Value>,
    #[serde(rename = "msgL")]
    pub messages: Vec<Value>,
}

/// One leg of a connection (`secL` entry).
#[derive(Debug, Clone, Deserialize)]
pub struct RawSection {
    /// Mode tag. Required: a section without one can't be classified.
    #[serde(rename = "type")]
    pub mode: String,
    pub dep: RawEndpoint,
    pub arr: RawEndpoint,
    pub gis: Option<RawGis>,
    pub jny: Option<RawJourney>,
    #[serde(rename = "msgL", default)]
    pub messages: Vec<RawMessage>,
}

/// Departure or arrival bundle of a section.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEndpoint {
    #[serde(rename = "locX")]
    pub location: LocationIndex,
    #[serde(rename = "dTimeS")]
    pub dep_time: Option<String>,
    #[serde(rename = "dTimeR")]
    pub dep_time_realtime: Option<String>,
    #[serde(rename = "aTimeS")]
    pub arr_time: Option<String>,
    #[serde(rename = "aTimeR")]
    pub arr_time_realtime: Option<String>,
    #[serde(rename = "dPlatfS")]
    pub dep_platform: Option<String>,
    #[serde(rename = "aPlatfS")]
    pub arr_platform: Option<String>,
    /// Call-ahead flag of dial-a-ride departures, kept raw. `Some` whenever
    /// the key is sent, even as `null`.
    #[serde(rename = "dCaS", default, deserialize_with = "present")]
    pub call_ahead: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Deserialize any value, so that a present `null` is still `Some`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// GIS summary of a walking leg.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawGis {
    pub dist: u32,
    #[serde(rename = "durS")]
    pub duration: String,
    pub ctx: String,
    #[serde(rename = "gisPrvr")]
    pub provider: Option<String>,
    /// Turn-by-turn steps, only present in walking-route responses.
    #[serde(rename = "segL")]
    pub segments: Vec<RawWalkingSegment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawWalkingSegment {
    pub name: Option<String>,
    #[serde(rename = "manTx")]
    pub instruction: Option<String>,
    pub ori: Option<String>,
    #[serde(rename = "rType")]
    pub route_type: Option<String>,
    pub dist: u32,
    #[serde(rename = "polyS")]
    pub poly_start: usize,
    #[serde(rename = "polyE")]
    pub poly_end: usize,
    #[serde(rename = "icoX")]
    pub icon: Option<IconIndex>,
}

/// Journey payload of a scheduled or dial-a-ride section.
#[derive(Debug, Clone, Deserialize)]
pub struct RawJourney {
    #[serde(default)]
    pub jid: String,
    #[serde(default)]
    pub date: String,
    #[serde(rename = "prodX")]
    pub product: Option<ProductIndex>,
    #[serde(rename = "dirTxt")]
    pub direction_text: Option<String>,
    #[serde(rename = "dirFlg")]
    pub direction_flag: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "isRchbl")]
    pub is_reachable: Option<bool>,
    #[serde(rename = "stopL", default)]
    pub stops: Vec<RawStop>,
    #[serde(rename = "polyG")]
    pub poly_group: Option<RawPolyGroup>,
    #[serde(rename = "msgL", default)]
    pub messages: Vec<RawMessage>,
    #[serde(rename = "subscr")]
    pub subscription: Option<String>,
    #[serde(rename = "ctxRecon")]
    pub ctx_recon: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPolyGroup {
    #[serde(rename = "polyXL")]
    pub polylines: Vec<PolylineIndex>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawStop {
    #[serde(rename = "locX")]
    pub location: LocationIndex,
    #[serde(rename = "aTimeS")]
    pub arr_time: Option<String>,
    #[serde(rename = "dTimeS")]
    pub dep_time: Option<String>,
    #[serde(rename = "aTimeR")]
    pub arr_time_realtime: Option<String>,
    #[serde(rename = "dTimeR")]
    pub dep_time_realtime: Option<String>,
    #[serde(rename = "aPlatfS")]
    pub arr_platform: Option<String>,
    #[serde(rename = "dPlatfS")]
    pub dep_platform: Option<String>,
    #[serde(rename = "aDelayS")]
    pub arr_delay: Option<i32>,
    #[serde(rename = "dDelayS")]
    pub dep_delay: Option<i32>,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default)]
    pub additional: bool,
}

/// `res` of a `TripSearch` or `Reconstruction` request.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTripSearchResult {
    pub common: Option<Value>,
    /// Connections stay untyped here so one bad record fails only itself.
    #[serde(rename = "outConL", default)]
    pub connections: Vec<Value>,
    #[serde(rename = "outCtxScrB")]
    pub scroll_earlier: Option<String>,
    #[serde(rename = "outCtxScrF")]
    pub scroll_later: Option<String>,
    #[serde(rename = "fpB")]
    pub period_begin: Option<String>,
    #[serde(rename = "fpE")]
    pub period_end: Option<String>,
    #[serde(rename = "planrtTS")]
    pub realtime_timestamp: Option<String>,
    #[serde(rename = "outConGrpL", default)]
    pub connection_groups: Vec<Value>,
}

/// `res` of a `GisRoute` request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawGisRouteResult {
    pub common: RawCommon,
    #[serde(rename = "conL")]
    pub connections: Vec<RawGisConnection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawGisConnection {
    #[serde(rename = "secL")]
    pub sections: Vec<RawGisSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawGisSection {
    pub gis: Option<RawGis>,
}

/// `res` of a `LocMatch` request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawLocMatchResult {
    #[serde(rename = "match")]
    pub matches: RawLocMatch,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawLocMatch {
    #[serde(rename = "locL")]
    pub locations: Vec<RawLocation>,
}

/// `res` of a `HimSearch` request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawHimSearchResult {
    #[serde(rename = "msgL")]
    pub messages: Vec<RawMessage>,
}
