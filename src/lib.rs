//! Data-transformation core of an energy optimization dashboard.
//!
//! A [`controller::DashboardController`] pulls payloads from a
//! [`gateway::DataGateway`]; [`series`] and [`status`] derive chart series and
//! summary cards from the held payload on demand.

#[cfg(feature = "api")]
pub mod api;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod gateway;
/// CSV export of the loaded plan.
pub mod io {
    pub mod export;
}
pub mod payload;
pub mod series;
pub mod status;
pub mod telemetry;
