//! The shared tables of one response.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use super::{
    Direction, DomainError, DrawStyle, DrawStyleIndex, Icon, IconIndex, Location, LocationIndex,
    Operator, OperatorIndex, Polyline, PolylineIndex, Product, ProductIndex, RemarkIndex,
    ServiceMessage, WalkingRoute,
};

/// Resolved common block: the arena every trip of a response points into.
///
/// Table positions are the wire indices, in input order. Trips hold indices,
/// never copies; look them up here, through the same instance the trips were
/// decoded against.
///
/// `walking_routes` is filled lazily after decoding, keyed by route-context
/// token. Tokens are only promised stable within one response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommonData {
    pub locations: Vec<Location>,
    pub products: Vec<Product>,
    pub polylines: Vec<Polyline>,
    pub operators: Vec<Operator>,
    pub remarks: Vec<ServiceMessage>,
    pub icons: Vec<Icon>,
    pub directions: Vec<Direction>,
    pub draw_styles: Vec<DrawStyle>,
    pub layers: Vec<Value>,
    pub coordinate_systems: Vec<Value>,
    pub walking_routes: HashMap<String, Arc<WalkingRoute>>,
}

fn lookup<'a, T>(table: &'a [T], name: &'static str, index: usize) -> Result<&'a T, DomainError> {
    table.get(index).ok_or(DomainError::DanglingIndex {
        table: name,
        index,
        len: table.len(),
    })
}

impl CommonData {
    pub fn location(&self, idx: LocationIndex) -> Result<&Location, DomainError> {
        lookup(&self.locations, LocationIndex::TABLE, idx.0)
    }

    pub fn product(&self, idx: ProductIndex) -> Result<&Product, DomainError> {
        lookup(&self.products, ProductIndex::TABLE, idx.0)
    }

    pub fn polyline(&self, idx: PolylineIndex) -> Result<&Polyline, DomainError> {
        lookup(&self.polylines, PolylineIndex::TABLE, idx.0)
    }

    pub fn operator(&self, idx: OperatorIndex) -> Result<&Operator, DomainError> {
        lookup(&self.operators, OperatorIndex::TABLE, idx.0)
    }

    pub fn icon(&self, idx: IconIndex) -> Result<&Icon, DomainError> {
        lookup(&self.icons, IconIndex::TABLE, idx.0)
    }

    pub fn remark(&self, idx: RemarkIndex) -> Result<&ServiceMessage, DomainError> {
        lookup(&self.remarks, RemarkIndex::TABLE, idx.0)
    }

    pub fn draw_style(&self, idx: DrawStyleIndex) -> Result<&DrawStyle, DomainError> {
        lookup(&self.draw_styles, DrawStyleIndex::TABLE, idx.0)
    }

    /// Cached walking route for a route-context token.
    pub fn walking_route(&self, context: &str) -> Option<&Arc<WalkingRoute>> {
        self.walking_routes.get(context)
    }

    /// Carry over walking routes fetched for an earlier response.
    ///
    /// Routes already present here are kept. Returns how many were added.
    /// The planner doesn't promise tokens stay valid across responses, so
    /// carried routes may be stale.
    pub fn adopt_walking_routes(&mut self, previous: &CommonData) -> usize {
        let mut added = 0;
        for (context, route) in &previous.walking_routes {
            if !self.walking_routes.contains_key(context) {
                self.walking_routes
                    .insert(context.clone(), Arc::clone(route));
                added += 1;
            }
        }
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinate, Journey, WalkingSegment};

    fn operator(name: &str) -> Operator {
        Operator {
            name: name.into(),
            icon: None,
        }
    }

    fn route(encoded: &str) -> Arc<WalkingRoute> {
        Arc::new(WalkingRoute {
            polyline: Polyline::from_encoded(encoded),
            segments: vec![WalkingSegment::default()],
        })
    }

    fn journey(polylines: Vec<PolylineIndex>) -> Journey {
        Journey {
            jid: "1|100|0|86|15092025".into(),
            date: "20250915".into(),
            product: Some(ProductIndex(0)),
            direction_text: None,
            direction_flag: None,
            status: None,
            is_reachable: true,
            stops: Vec::new(),
            polylines,
            messages: Vec::new(),
            subscription: "N".into(),
            ctx_recon: None,
        }
    }

    #[test]
    fn checked_lookup_in_bounds() {
        let common = CommonData {
            operators: vec![operator("DSB"), operator("Movia")],
            ..Default::default()
        };
        assert_eq!(common.operator(OperatorIndex(1)).unwrap().name, "Movia");
    }

    #[test]
    fn dangling_index_is_reported() {
        let common = CommonData {
            operators: vec![operator("DSB")],
            ..Default::default()
        };
        let err = common.operator(OperatorIndex(4)).unwrap_err();
        assert_eq!(
            err,
            DomainError::DanglingIndex {
                table: "operators",
                index: 4,
                len: 1,
            }
        );
        assert!(common.location(LocationIndex(0)).is_err());
    }

    #[test]
    fn route_coordinates_concatenate_in_list_order() {
        let common = CommonData {
            polylines: vec![
                Polyline::from_encoded("_p~iF~ps|U"),
                Polyline::from_encoded("kuzrIqyjkA"),
            ],
            ..Default::default()
        };

        let coords = journey(vec![PolylineIndex(1), PolylineIndex(0)])
            .route_coordinates(&common)
            .unwrap();
        assert_eq!(
            coords,
            vec![Coordinate::new(55.68358, 12.51241), Coordinate::new(38.5, -120.2)]
        );
    }

    #[test]
    fn route_coordinates_fail_on_foreign_index() {
        let common = CommonData::default();
        let err = journey(vec![PolylineIndex(0)])
            .route_coordinates(&common)
            .unwrap_err();
        assert!(matches!(err, DomainError::DanglingIndex { table: "polylines", .. }));
    }

    #[test]
    fn adopt_keeps_existing_routes() {
        let mut previous = CommonData::default();
        previous.walking_routes.insert("a".into(), route("_p~iF~ps|U"));
        previous.walking_routes.insert("b".into(), route("kuzrIqyjkA"));

        let mut current = CommonData::default();
        let own = route("??");
        current.walking_routes.insert("a".into(), Arc::clone(&own));

        assert_eq!(current.adopt_walking_routes(&previous), 1);
        assert!(Arc::ptr_eq(current.walking_route("a").unwrap(), &own));
        assert!(Arc::ptr_eq(
            current.walking_route("b").unwrap(),
            previous.walking_route("b").unwrap()
        ));
    }
}
