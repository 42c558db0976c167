//! API response types.

use serde::Serialize;

use crate::controller::Phase;
use crate::status::StatusCard;

/// Controller flags plus the status cards of the held payload.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub phase: Phase,
    pub loading: bool,
    /// Last recorded failure, if any.
    pub error: Option<String>,
    pub auto_refresh: bool,
    /// Version of the held payload.
    pub version: Option<String>,
    pub cards: Vec<StatusCard>,
}

/// Result of a state-changing request.
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    /// `false` when a later refresh landed first and this one was dropped.
    pub applied: bool,
    pub version: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AutoRefreshResponse {
    pub enabled: bool,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
