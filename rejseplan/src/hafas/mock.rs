//! Mock transport for testing without network access.
//!
//! Serves canned `res` bodies per method, and per route-context token for
//! walking-route requests, and records every envelope it is sent.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::error::HafasError;
use super::request::{RequestEnvelope, ServiceRequest};
use super::transport::Transport;
use super::types::{ResponseEnvelope, ServiceResult};

/// Error code returned for methods with no canned result.
pub const NO_FIXTURE: &str = "NO_FIXTURE";

const GIS_ROUTE: &str = "GisRoute";

/// Transport that answers from memory.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    results: HashMap<String, Value>,
    /// `GisRoute` results keyed by `gisCtx`.
    walking_routes: HashMap<String, Value>,
    sent: Arc<RwLock<Vec<RequestEnvelope>>>,
    count: Arc<AtomicUsize>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method` with `res`.
    pub fn with_result(mut self, method: impl Into<String>, res: Value) -> Self {
        self.results.insert(method.into(), res);
        self
    }

    /// Answer walking-route requests for `context` with `res`.
    pub fn with_walking_route(mut self, context: impl Into<String>, res: Value) -> Self {
        self.walking_routes.insert(context.into(), res);
        self
    }

    /// Load canned results from a directory.
    ///
    /// Expects files named `{Method}.json` (e.g. `TripSearch.json`), each
    /// holding the `res` body. `GisRoute.json`, if present, is an object
    /// mapping route-context tokens to `res` bodies.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, HafasError> {
        let dir = dir.as_ref();
        let mut mock = Self::new();

        let entries = std::fs::read_dir(dir).map_err(|e| fixture_error(format!(
            "Failed to read mock data directory: {}",
            e
        )))?;

        for entry in entries {
            let entry = entry
                .map_err(|e| fixture_error(format!("Failed to read directory entry: {}", e)))?;

            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let method = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| fixture_error(format!("Invalid filename: {:?}", path)))?
                .to_string();

            let json = std::fs::read_to_string(&path)
                .map_err(|e| fixture_error(format!("Failed to read {:?}: {}", path, e)))?;

            let res: Value = serde_json::from_str(&json)
                .map_err(|e| fixture_error(format!("Failed to parse {:?}: {}", path, e)))?;

            if method == GIS_ROUTE {
                let Value::Object(routes) = res else {
                    return Err(fixture_error(format!(
                        "{:?} must map route contexts to results",
                        path
                    )));
                };
                mock.walking_routes.extend(routes);
            } else {
                mock.results.insert(method, res);
            }
        }

        Ok(mock)
    }

    /// Number of envelopes sent so far.
    pub fn request_count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Every envelope sent so far, in order.
    pub async fn requests(&self) -> Vec<RequestEnvelope> {
        self.sent.read().await.clone()
    }

    /// Methods of every service request sent so far, in order.
    pub async fn methods(&self) -> Vec<String> {
        self.sent
            .read()
            .await
            .iter()
            .flat_map(|e| e.methods().map(str::to_string))
            .collect()
    }

    fn answer(&self, request: &ServiceRequest) -> ServiceResult {
        let res = if request.meth == GIS_ROUTE {
            request
                .req
                .get("gisCtx")
                .and_then(Value::as_str)
                .and_then(|ctx| self.walking_routes.get(ctx))
        } else {
            self.results.get(&request.meth)
        };

        match res {
            Some(res) => ServiceResult {
                meth: request.meth.clone(),
                err: Some("OK".to_string()),
                err_text: None,
                res: Some(res.clone()),
            },
            None => ServiceResult {
                meth: request.meth.clone(),
                err: Some(NO_FIXTURE.to_string()),
                err_text: Some(format!("no canned result for {}", request.meth)),
                res: None,
            },
        }
    }
}

fn fixture_error(message: String) -> HafasError {
    HafasError::Api { status: 0, message }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, envelope: &RequestEnvelope) -> Result<ResponseEnvelope, HafasError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.sent.write().await.push(envelope.clone());

        Ok(ResponseEnvelope {
            err: Some("OK".to_string()),
            results: envelope.requests.iter().map(|r| self.answer(r)).collect(),
        })
    }
}
