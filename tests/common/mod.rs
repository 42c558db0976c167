//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use powerplan_dash::controller::{ControllerSettings, DashboardController, FallbackPolicy};
use powerplan_dash::error::GatewayError;
use powerplan_dash::gateway::DataGateway;
use powerplan_dash::payload::{ChartData, FilterParams, Payload, SolverOutputs};

/// Call counters and failure switches, shared with the test after the
/// gateway has moved into the controller.
#[derive(Default)]
pub struct Probe {
    pub fetches: AtomicUsize,
    pub recomputes: AtomicUsize,
    pub exports: AtomicUsize,
    pub fail_fetch: AtomicBool,
    pub fail_recompute: AtomicBool,
    pub fail_export: AtomicBool,
    pub fail_settings: AtomicBool,
    /// Per-call fetch latencies, consumed in call order.
    pub delays: Mutex<VecDeque<Duration>>,
    pub last_filters: Mutex<Option<FilterParams>>,
    pub last_settings: Mutex<Option<Value>>,
}

impl Probe {
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn recomputes(&self) -> usize {
        self.recomputes.load(Ordering::SeqCst)
    }

    pub fn set_fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_recompute(&self, fail: bool) {
        self.fail_recompute.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_export(&self, fail: bool) {
        self.fail_export.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_settings(&self, fail: bool) {
        self.fail_settings.store(fail, Ordering::SeqCst);
    }

    pub fn push_delay(&self, delay: Duration) {
        self.delays.lock().push_back(delay);
    }
}

fn unavailable() -> GatewayError {
    GatewayError::Status {
        status: 503,
        message: "upstream unavailable".into(),
    }
}

/// In-memory gateway. The n-th successful fetch returns a payload with
/// version `run-n`.
pub struct FakeGateway {
    probe: Arc<Probe>,
}

impl FakeGateway {
    pub fn new() -> (Self, Arc<Probe>) {
        let probe = Arc::new(Probe::default());
        (
            Self {
                probe: Arc::clone(&probe),
            },
            probe,
        )
    }
}

/// Payload with three hourly slots and the given grid flows.
pub fn grid_payload(version: &str, g_buy: Vec<f64>, g_sell: Vec<f64>) -> Payload {
    Payload {
        version: Some(version.to_string()),
        chart_data: Some(ChartData {
            timestamps: vec!["10:00".into(), "11:00".into(), "12:00".into()],
            inputs: None,
            outputs: Some(SolverOutputs {
                g_buy: Some(g_buy),
                g_sell: Some(g_sell),
                ..SolverOutputs::default()
            }),
        }),
        ..Payload::default()
    }
}

#[async_trait]
impl DataGateway for FakeGateway {
    async fn fetch_payload(&self, filters: &FilterParams) -> Result<Payload, GatewayError> {
        let n = self.probe.fetches.fetch_add(1, Ordering::SeqCst) + 1;
        *self.probe.last_filters.lock() = Some(filters.clone());
        let delay = self.probe.delays.lock().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.probe.fail_fetch.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(grid_payload(
            &format!("run-{n}"),
            vec![1.0, 2.0, 3.0],
            vec![0.0, 1.0, 0.0],
        ))
    }

    async fn trigger_recompute(&self) -> Result<(), GatewayError> {
        self.probe.recomputes.fetch_add(1, Ordering::SeqCst);
        if self.probe.fail_recompute.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(())
    }

    async fn fetch_export_blob(&self, _filters: &FilterParams) -> Result<Vec<u8>, GatewayError> {
        self.probe.exports.fetch_add(1, Ordering::SeqCst);
        if self.probe.fail_export.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(b"time;g_buy;g_sell\n10:00;1;0\n".to_vec())
    }

    async fn fetch_settings(&self) -> Result<String, GatewayError> {
        Ok("<form><input name=\"reserve_soc\" value=\"20\"></form>".to_string())
    }

    async fn update_settings(&self, settings: &Value) -> Result<(), GatewayError> {
        if self.probe.fail_settings.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        *self.probe.last_settings.lock() = Some(settings.clone());
        Ok(())
    }
}

/// Controller over a fresh [`FakeGateway`] with the given fallback policy.
pub fn controller(
    fallback: FallbackPolicy,
    export_dir: &Path,
) -> (DashboardController<FakeGateway>, Arc<Probe>) {
    let (gateway, probe) = FakeGateway::new();
    let mut settings = ControllerSettings::new(export_dir);
    settings.fallback = fallback;
    (DashboardController::new(gateway, settings), probe)
}

/// Version of the payload the controller currently holds.
pub fn held_version(controller: &DashboardController<FakeGateway>) -> Option<String> {
    controller.payload().and_then(|p| p.version.clone())
}
