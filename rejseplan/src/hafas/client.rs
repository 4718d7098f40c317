//! Journey planner client.
//!
//! Builds request envelopes, sends them through a `Transport`, and decodes
//! the results into domain types.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::domain::{CommonData, Location, ServiceMessage, Trip};
use crate::walking::{
    WalkingDetails, WalkingRouteSource, ensure_walking_geometry_all, parse_walking_details,
};

use super::assembler::assemble;
use super::error::{DecodeError, HafasError};
use super::request::{
    Auth, ClientInfo, LocationQuery, RequestEnvelope, ScrollDirection, ServiceRequest,
    TripSearchRequest,
};
use super::resolver::resolve_value;
use super::response::{
    TripSearchResult, decode_locations, decode_messages, decode_trip_search, find_result,
};
use super::transport::Transport;
use super::types::RawTripSearchResult;

/// Default endpoint of the planner.
const DEFAULT_BASE_URL: &str = "https://rejseplanen.dk/bin/iphone.exe";

/// Access id of the public web client.
const DEFAULT_AID: &str = "j1sa92pcj72ksh0-web";

const DEFAULT_API_VERSION: &str = "1.24";
const DEFAULT_LANGUAGE: &str = "dan";
const DEFAULT_EXTENSION: &str = "DK.11";

/// Configuration for the planner client.
#[derive(Debug, Clone)]
pub struct HafasConfig {
    /// Endpoint URL (defaults to production)
    pub base_url: String,
    /// Access id sent in the `auth` block
    pub aid: String,
    pub client: ClientInfo,
    pub api_version: String,
    /// Response language: `dan`, `eng` or `deu`
    pub language: String,
    pub extension: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Fetch walking geometry for every trip a search returns
    pub auto_fetch_walking: bool,
}

impl Default for HafasConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            aid: DEFAULT_AID.to_string(),
            client: ClientInfo::default(),
            api_version: DEFAULT_API_VERSION.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
            timeout_secs: 30,
            auto_fetch_walking: true,
        }
    }
}

impl HafasConfig {
    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_aid(mut self, aid: impl Into<String>) -> Self {
        self.aid = aid.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_auto_fetch_walking(mut self, enabled: bool) -> Self {
        self.auto_fetch_walking = enabled;
        self
    }
}

/// Journey planner client over any transport.
pub struct HafasClient<T> {
    transport: T,
    config: HafasConfig,
    counter: AtomicU64,
}

impl<T: Transport> HafasClient<T> {
    pub fn new(transport: T, config: HafasConfig) -> Self {
        Self {
            transport,
            config,
            counter: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &HafasConfig {
        &self.config
    }

    /// Access the transport, e.g. to inspect a mock.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn envelope(&self, requests: Vec<ServiceRequest>) -> RequestEnvelope {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        RequestEnvelope {
            id: format!("req_{}_{}", Utc::now().timestamp_millis(), n),
            ver: self.config.api_version.clone(),
            lang: self.config.language.clone(),
            auth: Auth::aid(&self.config.aid),
            client: self.config.client.clone(),
            formatted: false,
            ext: self.config.extension.clone(),
            requests,
        }
    }

    /// Send one service request and return its `res`.
    async fn call(&self, request: ServiceRequest) -> Result<Value, HafasError> {
        let method = request.meth.clone();
        let envelope = self.envelope(vec![request]);
        debug!(%method, id = %envelope.id, "service request");

        let response = self.transport.send(&envelope).await?;
        find_result(response, &method)
    }

    /// Look up stations, addresses and points of interest.
    #[instrument(skip(self), fields(name = %query.name))]
    pub async fn search_location(&self, query: &LocationQuery) -> Result<Vec<Location>, HafasError> {
        let res = self.call(query.to_request()).await?;
        Ok(decode_locations(&res)?)
    }

    /// Plan trips.
    ///
    /// With `auto_fetch_walking` set and polylines requested, walking
    /// geometry is fetched for every walking section before returning.
    #[instrument(skip(self, request), fields(origin = %request.origin.name, destination = %request.destination.name))]
    pub async fn plan_trip(
        &self,
        request: &TripSearchRequest,
    ) -> Result<TripSearchResult, HafasError> {
        let res = self.call(request.to_request()).await?;
        let mut result = decode_trip_search(&res)?;

        if self.config.auto_fetch_walking && request.get_polylines {
            self.attach_walking(&mut result).await;
        }

        Ok(result)
    }

    /// Page through results of an earlier search.
    #[instrument(skip(self, context))]
    pub async fn scroll_trips(
        &self,
        context: &str,
        direction: ScrollDirection,
        count: u32,
    ) -> Result<TripSearchResult, HafasError> {
        let res = self
            .call(ServiceRequest::scroll(context, direction, count))
            .await?;
        let mut result = decode_trip_search(&res)?;

        if self.config.auto_fetch_walking {
            self.attach_walking(&mut result).await;
        }

        Ok(result)
    }

    /// Re-fetch one trip from its reconstruction context.
    ///
    /// Returns `None` if the response holds no connection or the first one
    /// doesn't decode.
    #[instrument(skip(self, ctx_recon))]
    pub async fn trip_details(
        &self,
        ctx_recon: &str,
    ) -> Result<Option<(Trip, CommonData)>, HafasError> {
        let res = self.call(ServiceRequest::reconstruction(ctx_recon)).await?;

        let raw = RawTripSearchResult::deserialize(&res)
            .map_err(|e| DecodeError::malformed("reconstruction result", e))?;
        let Some(connection) = raw.connections.first() else {
            return Ok(None);
        };

        let common = match &raw.common {
            Some(common) => resolve_value(common)?,
            None => CommonData::default(),
        };

        match assemble(connection, &common) {
            Ok(trip) => Ok(Some((trip, common))),
            Err(e) => {
                warn!(error = %e, "reconstructed connection did not decode");
                Ok(None)
            }
        }
    }

    /// Fetch the turn-by-turn route for a route-context token.
    #[instrument(skip(self))]
    pub async fn walking_details(&self, gis_ctx: &str) -> Result<WalkingDetails, HafasError> {
        let res = self.call(ServiceRequest::gis_route(gis_ctx)).await?;
        Ok(parse_walking_details(&res)?)
    }

    /// Current disruption messages, optionally filtered by location ids or
    /// message ids.
    #[instrument(skip(self))]
    pub async fn service_messages(
        &self,
        location_ids: &[String],
        him_ids: &[String],
    ) -> Result<Vec<ServiceMessage>, HafasError> {
        let res = self
            .call(ServiceRequest::him_search(location_ids, him_ids))
            .await?;
        Ok(decode_messages(&res)?)
    }

    async fn attach_walking(&self, result: &mut TripSearchResult) {
        let fetches = ensure_walking_geometry_all(&mut result.trips, &mut result.common, self).await;
        debug!(
            fetches,
            routes = result.common.walking_routes.len(),
            "walking geometry attached"
        );
    }
}

#[async_trait]
impl<T: Transport> WalkingRouteSource for HafasClient<T> {
    async fn walking_details(&self, context: &str) -> Result<WalkingDetails, HafasError> {
        HafasClient::walking_details(self, context).await
    }
}
