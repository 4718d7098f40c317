//! Entries of the shared tables: locations, products, operators, icons and
//! drawing styles.

use super::{Coordinate, IconIndex, OperatorIndex, ProductIndex};

/// Product class bits (`pCls`, `cls`, and the `PROD` journey filter).
pub mod product_class {
    pub const HIGH_SPEED_TRAIN: u32 = 1;
    pub const INTERCITY_TRAIN: u32 = 2;
    pub const INTER_REGIONAL: u32 = 4;
    pub const REGIONAL: u32 = 8;
    pub const METRO: u32 = 16;
    pub const BUS: u32 = 32;
    pub const BOAT: u32 = 64;
    pub const SUBWAY: u32 = 128;
    pub const TRAM: u32 = 256;
    /// Dial-a-ride shares the tram bit.
    pub const FLEXTUR: u32 = 256;
    pub const TAXI: u32 = 512;
    pub const ALL: u32 = 4095;
}

/// A stop, address or point of interest.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    /// Opaque identity token (`lid`), echoed back in requests.
    pub lid: String,
    pub name: String,
    /// Category tag: `S` station, `A` address, `P` POI, `C` coordinate.
    pub kind: String,
    pub coordinate: Coordinate,
    pub ext_id: Option<String>,
    pub state: String,
    pub weight: u32,
    pub is_main_mast: bool,
    /// Bitmask of `product_class` values served here.
    pub product_classes: u32,
    pub product_refs: Vec<ProductIndex>,
    pub icon: Option<IconIndex>,
    pub house_number: Option<String>,
}

impl Location {
    /// Whether any of `classes` stops here.
    pub fn serves(&self, classes: u32) -> bool {
        self.product_classes & classes != 0
    }
}

/// A line or service descriptor.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Product {
    pub pid: Option<String>,
    pub name: String,
    pub name_short: Option<String>,
    pub number: Option<String>,
    pub line: Option<String>,
    pub line_id: Option<String>,
    pub category: Option<String>,
    pub category_out: Option<String>,
    pub category_code: Option<String>,
    /// Single `product_class` bit.
    pub class: u32,
    pub operator: Option<OperatorIndex>,
    pub admin: Option<String>,
    pub match_id: Option<String>,
    pub icon: Option<IconIndex>,
    pub him_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator {
    pub name: String,
    pub icon: Option<IconIndex>,
}

/// RGB colour as used by icons and draw styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// ```
    /// use rejseplan::domain::Color;
    ///
    /// assert_eq!(Color { r: 255, g: 204, b: 0 }.to_hex(), "#ffcc00");
    /// ```
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    pub resource: String,
    pub text: Option<String>,
    pub foreground: Option<Color>,
    pub background: Option<Color>,
}

/// Map styling for a polyline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawStyle {
    /// `SOLID`, `DOT` or `DASH`.
    pub kind: String,
    pub icon: Option<IconIndex>,
    pub background: Option<Color>,
}

/// Direction text table entry (`dirL`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Direction {
    pub text: String,
    pub flag: Option<String>,
}
