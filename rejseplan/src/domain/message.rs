//! Service messages: remarks, disruption notices and attributes.

use super::{IconIndex, LocationIndex, RemarkIndex};

/// Message code marking a dial-a-ride booking notice.
pub const TELETAXI_CODE: &str = "teletaxi";

/// A remark or disruption record.
///
/// Appears in the common remark table, on connections, on sections and on
/// journeys. Entries in `msgL` lists are often thin references whose text
/// lives in the remark table, reached through `remark`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ServiceMessage {
    /// `REM`, `HIM`, `A`, `H` or `I`.
    pub kind: String,
    pub code: Option<String>,
    pub priority: i32,
    pub text: Option<String>,
    pub text_short: Option<String>,
    pub icon: Option<IconIndex>,
    pub style: Option<String>,
    pub from_location: Option<LocationIndex>,
    pub to_location: Option<LocationIndex>,
    pub tags: Vec<String>,
    pub sort_order: i64,
    pub remark: Option<RemarkIndex>,
}

impl ServiceMessage {
    /// Whether this message announces a booking requirement.
    pub fn is_teletaxi(&self) -> bool {
        self.code.as_deref() == Some(TELETAXI_CODE)
    }
}
