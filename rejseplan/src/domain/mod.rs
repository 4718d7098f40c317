//! Domain types for decoded planner responses.
//!
//! `CommonData` is the arena of one response; everything else refers into
//! it through the typed indices in `index`. Per-mode section payloads are a
//! closed enum, so which fields exist for which mode is fixed by the type.

mod common;
mod error;
mod geo;
mod index;
mod journey;
mod message;
mod section;
mod tables;
mod time;
mod trip;

pub use common::CommonData;
pub use error::DomainError;
pub use geo::{Coordinate, Polyline, PolylineLocationRef};
pub use index::{
    DrawStyleIndex, IconIndex, LocationIndex, OperatorIndex, PolylineIndex, ProductIndex,
    RemarkIndex,
};
pub use journey::{Journey, Stop};
pub use message::{ServiceMessage, TELETAXI_CODE};
pub use section::{
    DEFAULT_BOOKING_DEADLINE_MINUTES, DialARide, Endpoint, GisInfo, SectionKind, TransportMode,
    TripSection, WalkingRoute, WalkingSegment,
};
pub use tables::{Color, Direction, DrawStyle, Icon, Location, Operator, Product, product_class};
pub use time::{ServiceTime, TimeError, parse_duration, parse_service_date};
pub use trip::{ServiceDays, TariffResult, Trip};
