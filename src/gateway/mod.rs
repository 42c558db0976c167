//! Access to the upstream optimization service.

mod http;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::GatewayError;
use crate::payload::{FilterParams, Payload};

pub use http::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, HttpGateway};

/// Producer of dashboard payloads.
///
/// Every call may fail; the controller treats each failure as recoverable.
#[async_trait]
pub trait DataGateway: Send + Sync + 'static {
    /// Fetches the payload for the run selected by `filters`.
    async fn fetch_payload(&self, filters: &FilterParams) -> Result<Payload, GatewayError>;

    /// Asks the upstream to recompute the plan. Completes once the upstream
    /// acknowledges the request.
    async fn trigger_recompute(&self) -> Result<(), GatewayError>;

    /// Downloads the CSV export for the run selected by `filters`.
    async fn fetch_export_blob(&self, filters: &FilterParams) -> Result<Vec<u8>, GatewayError>;

    /// Reads the upstream's runtime settings as served, without decoding.
    async fn fetch_settings(&self) -> Result<String, GatewayError>;

    /// Submits new runtime settings. Completes once the upstream accepts them;
    /// the acknowledgement body is not interpreted.
    async fn update_settings(&self, settings: &Value) -> Result<(), GatewayError>;
}
