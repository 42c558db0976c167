//! JSON API over a shared dashboard controller.
//!
//! Read endpoints:
//! - `/status` controller flags and status cards
//! - `/metrics` key solver metrics
//! - `/views/{view}` one chart view with its layout
//! - `/plan` decision timeline
//! - `/runs` stored runs of the selected day
//!
//! Actions: `POST /refresh`, `POST /regenerate`, `POST /auto-refresh`.

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tracing::info;

use crate::controller::DashboardController;
use crate::gateway::DataGateway;
use crate::telemetry::shutdown_signal;

pub use types::{ActionResponse, AutoRefreshResponse, ErrorResponse, StatusResponse};

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `controller` - Controller shared with the rest of the process
pub fn router<G: DataGateway>(controller: Arc<DashboardController<G>>) -> Router {
    Router::new()
        .route("/status", get(handlers::get_status::<G>))
        .route("/metrics", get(handlers::get_metrics::<G>))
        .route("/views/{view}", get(handlers::get_view::<G>))
        .route("/plan", get(handlers::get_plan::<G>))
        .route("/runs", get(handlers::get_runs::<G>))
        .route("/refresh", post(handlers::post_refresh::<G>))
        .route("/regenerate", post(handlers::post_regenerate::<G>))
        .route("/auto-refresh", post(handlers::post_auto_refresh::<G>))
        .with_state(controller)
}

/// Binds to the given address and serves the API until Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve<G: DataGateway>(
    controller: Arc<DashboardController<G>>,
    addr: SocketAddr,
) -> io::Result<()> {
    let app = router(controller);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}
