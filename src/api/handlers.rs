//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use super::types::{ActionResponse, AutoRefreshResponse, ErrorResponse, StatusResponse};
use crate::controller::{DashboardController, RefreshOutcome};
use crate::error::DashboardError;
use crate::gateway::DataGateway;
use crate::payload::{ActionsTimeline, FilterParams};
use crate::series::{ChartView, ViewName};
use crate::status::{KeyMetrics, RunOption};

type Shared<G> = State<Arc<DashboardController<G>>>;
type ApiError = (StatusCode, Json<ErrorResponse>);

fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn upstream_error(err: &DashboardError) -> ApiError {
    error(StatusCode::BAD_GATEWAY, err.to_string())
}

fn action_response<G: DataGateway>(
    controller: &DashboardController<G>,
    outcome: RefreshOutcome,
) -> Json<ActionResponse> {
    Json(ActionResponse {
        applied: outcome == RefreshOutcome::Applied,
        version: controller.payload().and_then(|p| p.version.clone()),
    })
}

/// `GET /status` → 200 + `StatusResponse`
pub async fn get_status<G: DataGateway>(State(controller): Shared<G>) -> Json<StatusResponse> {
    Json(StatusResponse {
        phase: controller.phase(),
        loading: controller.is_loading(),
        error: controller.error(),
        auto_refresh: controller.is_auto_refresh_enabled(),
        version: controller.payload().and_then(|p| p.version.clone()),
        cards: controller.status_cards(),
    })
}

/// `GET /metrics` → 200 + `KeyMetrics`, or 404 while the payload has no results
pub async fn get_metrics<G: DataGateway>(
    State(controller): Shared<G>,
) -> Result<Json<KeyMetrics>, ApiError> {
    controller
        .key_metrics()
        .map(Json)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "no solver results available"))
}

/// `GET /views/{view}` → 200 + `ChartView`, or 404 for an unknown view
pub async fn get_view<G: DataGateway>(
    State(controller): Shared<G>,
    Path(view): Path<String>,
) -> Result<Json<ChartView>, ApiError> {
    let view: ViewName = view
        .parse()
        .map_err(|_| error(StatusCode::NOT_FOUND, format!("unknown view \"{view}\"")))?;
    Ok(Json(controller.chart(view)))
}

/// `GET /plan` → 200 + `ActionsTimeline` (empty object when absent)
pub async fn get_plan<G: DataGateway>(State(controller): Shared<G>) -> Json<ActionsTimeline> {
    Json(controller.action_plan())
}

/// `GET /runs` → 200 + `Vec<RunOption>`
pub async fn get_runs<G: DataGateway>(State(controller): Shared<G>) -> Json<Vec<RunOption>> {
    Json(controller.runs())
}

/// `POST /refresh?day=..&time=..` → 200 + `ActionResponse`, or 502 when the
/// fetch fails
pub async fn post_refresh<G: DataGateway>(
    State(controller): Shared<G>,
    Query(filters): Query<FilterParams>,
) -> Result<Json<ActionResponse>, ApiError> {
    let outcome = controller
        .refresh(&filters)
        .await
        .map_err(|e| upstream_error(&e))?;
    Ok(action_response(&controller, outcome))
}

/// `POST /regenerate` → 200 + `ActionResponse`, or 502 on failure
pub async fn post_regenerate<G: DataGateway>(
    State(controller): Shared<G>,
) -> Result<Json<ActionResponse>, ApiError> {
    let outcome = controller
        .regenerate()
        .await
        .map_err(|e| upstream_error(&e))?;
    Ok(action_response(&controller, outcome))
}

/// `POST /auto-refresh` → 200 + `AutoRefreshResponse` with the new state
pub async fn post_auto_refresh<G: DataGateway>(
    State(controller): Shared<G>,
) -> Json<AutoRefreshResponse> {
    Json(AutoRefreshResponse {
        enabled: controller.toggle_auto_refresh(),
    })
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::controller::{ControllerSettings, FallbackPolicy};
    use crate::error::GatewayError;
    use crate::payload::{Payload, placeholder_payload};

    /// Serves the placeholder, or fails every call.
    struct StaticGateway {
        fail: bool,
    }

    impl StaticGateway {
        fn result<T>(&self, value: T) -> Result<T, GatewayError> {
            if self.fail {
                Err(GatewayError::Status {
                    status: 500,
                    message: "boom".into(),
                })
            } else {
                Ok(value)
            }
        }
    }

    #[async_trait]
    impl DataGateway for StaticGateway {
        async fn fetch_payload(&self, _: &FilterParams) -> Result<Payload, GatewayError> {
            self.result(placeholder_payload())
        }
        async fn trigger_recompute(&self) -> Result<(), GatewayError> {
            self.result(())
        }
        async fn fetch_export_blob(&self, _: &FilterParams) -> Result<Vec<u8>, GatewayError> {
            self.result(Vec::new())
        }
        async fn fetch_settings(&self) -> Result<String, GatewayError> {
            self.result(String::new())
        }
        async fn update_settings(&self, _: &Value) -> Result<(), GatewayError> {
            self.result(())
        }
    }

    fn make_controller(fail: bool) -> Arc<DashboardController<StaticGateway>> {
        let mut settings = ControllerSettings::new(std::env::temp_dir());
        settings.fallback = FallbackPolicy::KeepPrevious;
        Arc::new(DashboardController::new(StaticGateway { fail }, settings))
    }

    async fn call(
        controller: &Arc<DashboardController<StaticGateway>>,
        method: &str,
        uri: &str,
    ) -> (StatusCode, Value) {
        let app = router(Arc::clone(controller));
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn status_before_first_fetch_is_idle() {
        let controller = make_controller(false);
        let (status, json) = call(&controller, "GET", "/status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["phase"], "idle");
        assert_eq!(json["cards"].as_array().map(Vec::len), Some(0));
        assert_eq!(json["auto_refresh"], false);
    }

    #[tokio::test]
    async fn refresh_then_status_shows_cards() {
        let controller = make_controller(false);
        let (status, json) = call(&controller, "POST", "/refresh").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["applied"], true);
        assert_eq!(json["version"], "placeholder");

        let (_, json) = call(&controller, "GET", "/status").await;
        assert_eq!(json["phase"], "ready");
        assert_eq!(json["cards"][0]["title"], "Battery");
        assert_eq!(json["cards"][0]["color"], "positive");
    }

    #[tokio::test]
    async fn metrics_missing_returns_404() {
        let controller = make_controller(false);
        let (status, json) = call(&controller, "GET", "/metrics").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json.get("error").is_some());

        controller.refresh(&FilterParams::default()).await.unwrap();
        let (status, json) = call(&controller, "GET", "/metrics").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["solver_status"], "Optimal");
    }

    #[tokio::test]
    async fn view_returns_layout_and_series() {
        let controller = make_controller(false);
        controller.refresh(&FilterParams::default()).await.unwrap();

        let (status, json) = call(&controller, "GET", "/views/power").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["layout"]["height"], 400);
        let series = json["series"].as_array().unwrap();
        assert_eq!(series.len(), 7);
        assert_eq!(series[6]["id"], "grid_sell");
        assert_eq!(series[6]["y"][0], -0.3);
    }

    #[tokio::test]
    async fn unknown_view_returns_404() {
        let controller = make_controller(false);
        let (status, _) = call(&controller, "GET", "/views/actions").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn failed_refresh_returns_502_and_records_error() {
        let controller = make_controller(true);
        let (status, json) = call(&controller, "POST", "/refresh").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(json["error"].as_str().unwrap().contains("boom"));

        let (_, json) = call(&controller, "GET", "/status").await;
        assert!(json["error"].as_str().is_some());
        assert_eq!(json["loading"], false);
    }

    #[tokio::test]
    async fn auto_refresh_toggles() {
        let controller = make_controller(false);
        let (_, json) = call(&controller, "POST", "/auto-refresh").await;
        assert_eq!(json["enabled"], true);
        assert!(controller.has_active_timer());
        let (_, json) = call(&controller, "POST", "/auto-refresh").await;
        assert_eq!(json["enabled"], false);
        assert!(!controller.is_auto_refresh_enabled());
    }

    #[tokio::test]
    async fn plan_and_runs_are_served() {
        let controller = make_controller(false);
        controller.refresh(&FilterParams::default()).await.unwrap();

        let (status, json) = call(&controller, "GET", "/plan").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["times"].as_array().map(Vec::len), Some(6));

        let (status, json) = call(&controller, "GET", "/runs").await;
        assert_eq!(status, StatusCode::OK);
        assert!(json.is_array());
    }
}
