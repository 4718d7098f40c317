//! Integer handles into the shared tables of a response.
//!
//! A response defines every location, product and polyline once, in the
//! common block, and refers to them by list position. These handles keep
//! that position typed so a product index can't be used to look up a
//! location. They are only meaningful against the `CommonData` they were
//! decoded alongside.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! table_index {
    ($(#[$meta:meta])* $name:ident, $table:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub usize);

        impl $name {
            /// Name of the table this index points into.
            pub const TABLE: &'static str = $table;
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<usize> for $name {
            fn from(value: usize) -> Self {
                $name(value)
            }
        }

        impl From<$name> for usize {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

table_index!(
    /// Position in the location table (`locX`).
    ///
    /// ```
    /// use rejseplan::domain::LocationIndex;
    ///
    /// let idx: LocationIndex = serde_json::from_str("3").unwrap();
    /// assert_eq!(idx, LocationIndex(3));
    /// assert_eq!(usize::from(idx), 3);
    /// ```
    LocationIndex,
    "locations"
);
table_index!(
    /// Position in the product table (`prodX`).
    ProductIndex,
    "products"
);
table_index!(
    /// Position in the polyline table (`polyXL` entries).
    PolylineIndex,
    "polylines"
);
table_index!(
    /// Position in the operator table (`oprX`).
    OperatorIndex,
    "operators"
);
table_index!(
    /// Position in the icon table (`icoX`).
    IconIndex,
    "icons"
);
table_index!(
    /// Position in the remark table (`remX`).
    RemarkIndex,
    "remarks"
);
table_index!(
    /// Position in the line draw style table (`lDrawStyleX`).
    DrawStyleIndex,
    "draw styles"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_bare_number() {
        assert_eq!(ProductIndex(12).to_string(), "12");
    }

    #[test]
    fn deserializes_from_plain_integer() {
        let idx: Vec<PolylineIndex> = serde_json::from_str("[0, 4, 2]").unwrap();
        assert_eq!(idx, vec![PolylineIndex(0), PolylineIndex(4), PolylineIndex(2)]);
    }

    #[test]
    fn negative_index_is_rejected() {
        assert!(serde_json::from_str::<LocationIndex>("-1").is_err());
    }

    #[test]
    fn table_names() {
        assert_eq!(LocationIndex::TABLE, "locations");
        assert_eq!(DrawStyleIndex::TABLE, "draw styles");
    }
}
