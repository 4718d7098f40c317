//! Journey planner protocol.
//!
//! `types` mirrors the wire JSON. `resolve` turns a common block into
//! `CommonData`, `assemble` turns connections into `Trip`s against it, and
//! `client` ties both to a `Transport`.

mod assembler;
mod client;
mod error;
pub mod mock;
mod request;
mod resolver;
mod response;
mod transport;
pub mod types;

pub use assembler::{assemble, assemble_all, decode_trips};
pub use client::{HafasClient, HafasConfig};
pub use error::{DecodeError, HafasError};
pub use mock::MockTransport;
pub use request::{
    Auth, ClientInfo, LocationKind, LocationQuery, RequestEnvelope, ScrollDirection,
    ServiceRequest, TransportRequestType, TripSearchRequest, location_request,
};
pub use resolver::{resolve, resolve_value};
pub use response::{
    TripSearchResult, decode_locations, decode_messages, decode_trip_search, find_result,
};
pub use transport::{HttpTransport, Transport};
