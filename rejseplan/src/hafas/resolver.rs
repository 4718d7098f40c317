//! Common block to `CommonData`.
//!
//! Every list becomes a table whose positions are the wire indices. Lists are
//! never reordered, filtered or deduplicated, and an absent list is an empty
//! table. Polylines are decoded here, eagerly.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;
use tracing::trace;

use crate::domain::{
    Color, CommonData, Coordinate, Direction, DrawStyle, Icon, Location, Operator, Polyline,
    PolylineLocationRef, Product, ServiceMessage,
};

use super::error::DecodeError;
use super::types::{
    RawColor, RawCommon, RawDirection, RawDrawStyle, RawIcon, RawLocation, RawMessage,
    RawOperator, RawPolyline, RawProduct,
};

/// Build the shared tables from a typed common block.
pub fn resolve(common: &RawCommon) -> CommonData {
    let data = CommonData {
        locations: common.locations.iter().map(convert_location).collect(),
        products: common.products.iter().map(convert_product).collect(),
        polylines: common.polylines.iter().map(convert_polyline).collect(),
        operators: common.operators.iter().map(convert_operator).collect(),
        remarks: common.remarks.iter().map(convert_message).collect(),
        icons: common.icons.iter().map(convert_icon).collect(),
        directions: common.directions.iter().map(convert_direction).collect(),
        draw_styles: common.draw_styles.iter().map(convert_draw_style).collect(),
        layers: common.layers.clone(),
        coordinate_systems: common.coordinate_systems.clone(),
        walking_routes: HashMap::new(),
    };

    trace!(
        locations = data.locations.len(),
        products = data.products.len(),
        polylines = data.polylines.len(),
        "resolved common block"
    );

    data
}

/// Build the shared tables straight from the JSON common block.
///
/// Fails only if a present list has entries of the wrong shape.
pub fn resolve_value(common: &Value) -> Result<CommonData, DecodeError> {
    let raw = RawCommon::deserialize(common)
        .map_err(|e| DecodeError::malformed("common block", e))?;
    Ok(resolve(&raw))
}

pub(crate) fn convert_location(raw: &RawLocation) -> Location {
    let coordinate = raw.crd.as_ref().map_or_else(Coordinate::default, |crd| Coordinate {
        layer_index: crd.layer,
        crd_sys_index: crd.crd_sys,
        ..Coordinate::from_microdegrees(crd.x, crd.y)
    });

    Location {
        lid: raw.lid.clone(),
        name: raw.name.clone(),
        kind: raw.kind.clone(),
        coordinate,
        ext_id: raw.ext_id.clone(),
        state: raw.state.clone().unwrap_or_else(|| "F".to_string()),
        weight: raw.wt,
        is_main_mast: raw.is_main_mast,
        product_classes: raw.product_classes,
        product_refs: raw.product_refs.clone(),
        icon: raw.icon,
        house_number: raw.house_number.clone(),
    }
}

fn convert_product(raw: &RawProduct) -> Product {
    let ctx = raw.context.clone().unwrap_or_default();

    Product {
        pid: raw.pid.clone(),
        name: raw.name.clone(),
        name_short: raw.name_short.clone(),
        // Some feeds only put the number in the product context.
        number: raw.number.clone().or(ctx.num),
        line: ctx.line,
        line_id: ctx.line_id,
        category: ctx.cat_in,
        category_out: ctx.cat_out,
        category_code: ctx.cat_code,
        class: raw.cls,
        operator: raw.operator,
        admin: ctx.admin,
        match_id: ctx.match_id,
        icon: raw.icon,
        him_ids: raw.him_ids.clone(),
    }
}

/// Decode one polyline entry. Style-only entries give an empty polyline.
pub(crate) fn convert_polyline(raw: &RawPolyline) -> Polyline {
    Polyline {
        location_refs: raw
            .location_refs
            .iter()
            .map(|r| PolylineLocationRef {
                point_index: r.point_index,
                location: r.location,
            })
            .collect(),
        draw_style: raw.draw_style,
        delta: raw.delta.unwrap_or(true),
        dimension: raw.dim.unwrap_or(2),
        encoding_start: raw.encoding_start.clone(),
        encoding_format: raw.encoding_format.clone(),
        ..Polyline::from_encoded(raw.encoded.clone().unwrap_or_default())
    }
}

fn convert_operator(raw: &RawOperator) -> Operator {
    Operator {
        name: raw.name.clone(),
        icon: raw.icon,
    }
}

pub(crate) fn convert_message(raw: &RawMessage) -> ServiceMessage {
    ServiceMessage {
        kind: raw.kind.clone(),
        code: raw.code.clone(),
        priority: raw.prio,
        text: raw.text.clone(),
        text_short: raw.text_short.clone(),
        icon: raw.icon,
        style: raw.sty.clone(),
        from_location: raw.from_location,
        to_location: raw.to_location,
        tags: raw.tags.clone(),
        sort_order: raw.sort,
        remark: raw.remark,
    }
}

fn convert_color(raw: &RawColor) -> Color {
    Color {
        r: raw.r,
        g: raw.g,
        b: raw.b,
    }
}

fn convert_icon(raw: &RawIcon) -> Icon {
    Icon {
        resource: raw.res.clone(),
        text: raw.txt.clone(),
        foreground: raw.fg.as_ref().map(convert_color),
        background: raw.bg.as_ref().map(convert_color),
    }
}

fn convert_draw_style(raw: &RawDrawStyle) -> DrawStyle {
    DrawStyle {
        kind: raw.kind.clone().unwrap_or_else(|| "SOLID".to_string()),
        icon: raw.icon,
        background: raw.bg.as_ref().map(convert_color),
    }
}

fn convert_direction(raw: &RawDirection) -> Direction {
    Direction {
        text: raw.txt.clone(),
        flag: raw.flg.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DrawStyleIndex, LocationIndex, OperatorIndex, PolylineIndex};
    use serde_json::json;

    fn sample_common() -> Value {
        json!({
            "locL": [
                {
                    "lid": "A=1@O=København H@X=12565562@Y=55672758@L=8600626@",
                    "type": "S",
                    "name": "København H",
                    "crd": { "x": 12565562, "y": 55672758, "layerX": 0, "crdSysX": 0 },
                    "extId": "8600626",
                    "pCls": 1535
                },
                {
                    "lid": "A=2@O=Vesterbrogade 1@",
                    "type": "A",
                    "name": "Vesterbrogade 1",
                    "crd": { "x": 12563000, "y": 55674000 }
                },
                { "lid": "A=1@O=Nørreport St.@", "type": "S", "name": "Nørreport St." }
            ],
            "prodL": [
                {
                    "name": "Re 1234",
                    "cls": 8,
                    "oprX": 0,
                    "prodCtx": { "num": "1234", "catOut": "Re      ", "line": "Re" }
                },
                { "name": "Bus 5C", "number": "5C", "cls": 32, "oprX": 1 }
            ],
            "polyL": [
                { "crdEncYX": "kuzrIqyjkAmCzWoD`YqC`^", "delta": true, "dim": 2,
                  "lDrawStyleX": 0, "ppLocRefL": [ { "ppIdx": 0, "locX": 0 } ] },
                { "lDrawStyleX": 1 },
                { "crdEncYX": "_p~iF~ps|U" }
            ],
            "opL": [ { "name": "DSB", "icoX": 0 }, { "name": "Movia" } ],
            "remL": [ { "type": "A", "code": "BE", "txtN": "Barrierefri" } ],
            "icoL": [ { "res": "prod_reg", "fg": { "r": 255, "g": 255, "b": 255 },
                        "bg": { "r": 0, "g": 0, "b": 255 } } ],
            "dirL": [ { "txt": "Helsingør St.", "flg": "1" } ],
            "lDrawStyleL": [ { "type": "SOLID", "bg": { "r": 0, "g": 0, "b": 255 } },
                             { "sIcoX": 0 } ],
            "layerL": [ { "id": "standard", "name": "standard", "index": 0 } ],
            "crdSysL": [ { "id": "standard", "type": "WGS84" } ]
        })
    }

    #[test]
    fn indices_follow_input_order() {
        let common = resolve_value(&sample_common()).unwrap();

        assert_eq!(common.locations.len(), 3);
        assert_eq!(common.location(LocationIndex(0)).unwrap().name, "København H");
        assert_eq!(common.location(LocationIndex(1)).unwrap().name, "Vesterbrogade 1");
        assert_eq!(common.location(LocationIndex(2)).unwrap().name, "Nørreport St.");

        assert_eq!(common.products[0].name, "Re 1234");
        assert_eq!(common.products[1].name, "Bus 5C");
        assert_eq!(common.operators[1].name, "Movia");
    }

    #[test]
    fn resolving_twice_gives_equal_tables() {
        let value = sample_common();
        assert_eq!(resolve_value(&value).unwrap(), resolve_value(&value).unwrap());
    }

    #[test]
    fn location_coordinates_in_degrees() {
        let common = resolve_value(&sample_common()).unwrap();
        let cph = &common.locations[0];
        assert_eq!(cph.coordinate.lat, 55.672758);
        assert_eq!(cph.coordinate.lon, 12.565562);
        assert_eq!(cph.state, "F");
        assert_eq!(cph.ext_id.as_deref(), Some("8600626"));

        // No crd: origin, not an error.
        assert_eq!(common.locations[2].coordinate, Coordinate::default());
    }

    #[test]
    fn polylines_decoded_eagerly_and_style_only_entries_kept() {
        let common = resolve_value(&sample_common()).unwrap();
        assert_eq!(common.polylines.len(), 3);

        let first = common.polyline(PolylineIndex(0)).unwrap();
        assert_eq!(first.len(), 4);
        assert_eq!(first.draw_style, Some(DrawStyleIndex(0)));
        assert_eq!(first.location_refs[0].location, LocationIndex(0));

        let style_only = common.polyline(PolylineIndex(1)).unwrap();
        assert!(style_only.is_empty());
        assert_eq!(style_only.encoded, "");
        assert_eq!(style_only.draw_style, Some(DrawStyleIndex(1)));

        // Position 2 stays at index 2 even though index 1 had no geometry.
        assert_eq!(common.polyline(PolylineIndex(2)).unwrap().coordinates[0].lat, 38.5);
    }

    #[test]
    fn product_number_falls_back_to_context() {
        let common = resolve_value(&sample_common()).unwrap();
        assert_eq!(common.products[0].number.as_deref(), Some("1234"));
        assert_eq!(common.products[0].category_out.as_deref(), Some("Re      "));
        assert_eq!(common.products[0].operator, Some(OperatorIndex(0)));
        assert_eq!(common.products[1].number.as_deref(), Some("5C"));
    }

    #[test]
    fn remaining_tables() {
        let common = resolve_value(&sample_common()).unwrap();
        assert_eq!(common.remarks[0].code.as_deref(), Some("BE"));
        assert_eq!(common.icons[0].background.unwrap().to_hex(), "#0000ff");
        assert_eq!(common.directions[0].text, "Helsingør St.");
        assert_eq!(common.draw_styles[0].kind, "SOLID");
        assert_eq!(common.draw_styles[1].kind, "SOLID");
        assert_eq!(common.layers.len(), 1);
        assert_eq!(common.coordinate_systems.len(), 1);
        assert!(common.walking_routes.is_empty());
    }

    #[test]
    fn empty_block_gives_empty_tables() {
        let common = resolve_value(&json!({})).unwrap();
        assert_eq!(common, CommonData::default());
    }

    #[test]
    fn wrong_shape_is_a_decode_error() {
        let err = resolve_value(&json!({ "locL": "not a list" })).unwrap_err();
        assert!(matches!(err, DecodeError::Malformed { what: "common block", .. }));
    }
}
