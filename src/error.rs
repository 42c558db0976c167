//! Error types for the gateway and the controller.

use thiserror::Error;

/// Failure of one call to the upstream service.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Recoverable failure surfaced by the dashboard controller.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("failed to load data: {0}")]
    Fetch(#[source] GatewayError),

    #[error("failed to start optimization: {0}")]
    Recompute(#[source] GatewayError),

    #[error("failed to download CSV: {0}")]
    Export(#[source] GatewayError),

    #[error("failed to save CSV: {0}")]
    Save(#[from] std::io::Error),

    #[error("settings request failed: {0}")]
    Settings(#[source] GatewayError),
}
