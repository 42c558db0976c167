//! Dashboard state: the held payload, loading and error flags, and the
//! auto-refresh lifecycle.
//!
//! The controller is built once and shared by reference. Derived views are
//! computed on demand from the payload held at call time; a refresh swaps the
//! payload atomically so readers see either the old run or the new one.

mod export;

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::DashboardError;
use crate::gateway::DataGateway;
use crate::payload::{ActionsTimeline, FilterParams, Payload, placeholder_payload};
use crate::series::{ChartView, ViewName, build_chart};
use crate::status::{
    KeyMetrics, RunOption, StatusCard, project_action_plan, project_key_metrics, project_runs,
    project_status_cards,
};

pub use export::{DirectorySink, ExportSink, export_file_name};

/// Auto-refresh period unless configured otherwise.
pub const DEFAULT_REFRESH_PERIOD: Duration = Duration::from_secs(300);

/// What the controller shows after a failed fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Keep the last good payload, if any.
    KeepPrevious,
    /// Replace the payload with the canned placeholder.
    #[default]
    Placeholder,
}

/// Coarse lifecycle of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No payload yet and nothing in flight.
    Idle,
    Loading,
    /// A payload is held.
    Ready,
}

#[derive(Clone)]
pub struct ControllerSettings {
    pub fallback: FallbackPolicy,
    pub refresh_period: Duration,
    pub export_sink: Arc<dyn ExportSink>,
}

impl ControllerSettings {
    /// Defaults with exports saved into `export_dir`.
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            fallback: FallbackPolicy::default(),
            refresh_period: DEFAULT_REFRESH_PERIOD,
            export_sink: Arc::new(DirectorySink::new(export_dir)),
        }
    }
}

/// How a refresh that did not fail ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The fetched payload (or the fallback) is now held.
    Applied,
    /// A refresh issued later already landed; this result was discarded.
    Superseded,
}

#[derive(Default)]
struct State {
    payload: Option<Arc<Payload>>,
    error: Option<String>,
    /// Sequence number of the last refresh whose result was applied.
    applied: u64,
}

struct Shared<G> {
    gateway: G,
    settings: ControllerSettings,
    state: Mutex<State>,
    in_flight: AtomicUsize,
    issued: AtomicU64,
}

/// Marks the controller as loading until dropped.
struct LoadingGuard<'a>(&'a AtomicUsize);

impl<'a> LoadingGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl<G: DataGateway> Shared<G> {
    fn record_error(&self, err: &DashboardError) {
        warn!(error = %err, "dashboard operation failed");
        self.state.lock().error = Some(err.to_string());
    }

    async fn refresh(
        &self,
        filters: &FilterParams,
        clear_error: bool,
    ) -> Result<RefreshOutcome, DashboardError> {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let _loading = LoadingGuard::enter(&self.in_flight);
        if clear_error {
            self.state.lock().error = None;
        }

        let fetched = self.gateway.fetch_payload(filters).await;

        let mut state = self.state.lock();
        if seq < state.applied {
            debug!(seq, applied = state.applied, "discarding superseded refresh");
            return Ok(RefreshOutcome::Superseded);
        }
        state.applied = seq;

        match fetched {
            Ok(payload) => {
                info!(version = payload.version.as_deref().unwrap_or("-"), "payload refreshed");
                state.payload = Some(Arc::new(payload));
                Ok(RefreshOutcome::Applied)
            }
            Err(e) => {
                let err = DashboardError::Fetch(e);
                warn!(error = %err, fallback = ?self.settings.fallback, "refresh failed");
                state.error = Some(err.to_string());
                match self.settings.fallback {
                    FallbackPolicy::KeepPrevious => {}
                    FallbackPolicy::Placeholder => {
                        state.payload = Some(Arc::new(placeholder_payload()));
                    }
                }
                Err(err)
            }
        }
    }
}

/// Running auto-refresh task and the switch that ends it between ticks.
struct Timer {
    handle: JoinHandle<()>,
    stop: watch::Sender<bool>,
}

impl Timer {
    fn stop(self) {
        self.stop.send_replace(true);
    }
}

/// Owns the current payload and mediates between the gateway and the
/// projections.
pub struct DashboardController<G: DataGateway> {
    shared: Arc<Shared<G>>,
    timer: Mutex<Option<Timer>>,
}

impl<G: DataGateway> DashboardController<G> {
    pub fn new(gateway: G, settings: ControllerSettings) -> Self {
        Self {
            shared: Arc::new(Shared {
                gateway,
                settings,
                state: Mutex::new(State::default()),
                in_flight: AtomicUsize::new(0),
                issued: AtomicU64::new(0),
            }),
            timer: Mutex::new(None),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.shared.gateway
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.shared.settings
    }

    /// Fetches the payload selected by `filters` and makes it current.
    ///
    /// Clears the error first. On failure the error is recorded and the
    /// configured [`FallbackPolicy`] decides what stays on screen. When
    /// refreshes overlap, the one issued last wins; an older result that
    /// lands after it is dropped and reported as
    /// [`RefreshOutcome::Superseded`].
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Fetch`] if the gateway call fails and no
    /// later refresh has already landed.
    pub async fn refresh(&self, filters: &FilterParams) -> Result<RefreshOutcome, DashboardError> {
        self.shared.refresh(filters, true).await
    }

    /// Asks the upstream to recompute, then reloads the latest run.
    ///
    /// The reload is attempted even when the recompute request fails; the
    /// recompute error stays recorded unless the reload itself fails.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Recompute`] if the recompute request failed,
    /// otherwise whatever the reload returned.
    pub async fn regenerate(&self) -> Result<RefreshOutcome, DashboardError> {
        let shared = &self.shared;
        let _loading = LoadingGuard::enter(&shared.in_flight);
        shared.state.lock().error = None;

        info!("regenerating optimization");
        match shared.gateway.trigger_recompute().await {
            Ok(()) => shared.refresh(&FilterParams::default(), false).await,
            Err(e) => {
                let err = DashboardError::Recompute(e);
                shared.record_error(&err);
                if let Err(reload) = shared.refresh(&FilterParams::default(), false).await {
                    debug!(error = %reload, "reload after failed recompute also failed");
                }
                Err(err)
            }
        }
    }

    /// Downloads the CSV export and saves it as
    /// `powerplan-data-<YYYY-MM-DD>.csv` (UTC date).
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Export`] if the download fails or
    /// [`DashboardError::Save`] if the file cannot be written. Either way the
    /// error is recorded and no file is produced.
    pub async fn request_export(&self, filters: &FilterParams) -> Result<PathBuf, DashboardError> {
        let shared = &self.shared;
        let blob = match shared.gateway.fetch_export_blob(filters).await {
            Ok(blob) => blob,
            Err(e) => {
                let err = DashboardError::Export(e);
                shared.record_error(&err);
                return Err(err);
            }
        };

        let file_name = export_file_name(Utc::now().date_naive());
        let sink = Arc::clone(&shared.settings.export_sink);
        let saved = tokio::task::spawn_blocking(move || sink.save(&file_name, &blob))
            .await
            .map_err(std::io::Error::other)
            .and_then(|r| r);

        match saved {
            Ok(path) => {
                info!(path = %path.display(), "export saved");
                Ok(path)
            }
            Err(e) => {
                let err = DashboardError::Save(e);
                shared.record_error(&err);
                Err(err)
            }
        }
    }

    /// Starts the repeating refresh timer, replacing any running one.
    ///
    /// The first tick fires one period from now. A replaced timer stops the
    /// same way as in [`stop_auto_refresh`](Self::stop_auto_refresh).
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime or if the refresh period is
    /// zero.
    pub fn start_auto_refresh(&self) {
        let period = self.shared.settings.refresh_period;
        let shared: Weak<Shared<G>> = Arc::downgrade(&self.shared);

        let (stop, mut stopped) = watch::channel(false);

        let mut slot = self.timer.lock();
        if let Some(previous) = slot.take() {
            previous.stop();
        }
        let handle = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    biased;
                    _ = stopped.changed() => break,
                    _ = ticker.tick() => {}
                }
                let Some(shared) = shared.upgrade() else {
                    break;
                };
                debug!("auto-refresh tick");
                if let Err(err) = shared.refresh(&FilterParams::default(), true).await {
                    debug!(error = %err, "auto-refresh tick failed");
                }
            }
        });
        *slot = Some(Timer { handle, stop });
        info!(period_secs = period.as_secs(), "auto-refresh started");
    }

    /// Cancels the refresh timer. A refresh already in progress completes and
    /// is applied; no further tick fires.
    pub fn stop_auto_refresh(&self) {
        if let Some(timer) = self.timer.lock().take() {
            timer.stop();
            info!("auto-refresh stopped");
        }
    }

    /// Flips auto-refresh and returns whether it is now enabled.
    pub fn toggle_auto_refresh(&self) -> bool {
        if self.is_auto_refresh_enabled() {
            self.stop_auto_refresh();
            false
        } else {
            self.start_auto_refresh();
            true
        }
    }

    pub fn is_auto_refresh_enabled(&self) -> bool {
        self.timer.lock().is_some()
    }

    /// Whether a timer task is scheduled and still running.
    pub fn has_active_timer(&self) -> bool {
        self.timer
            .lock()
            .as_ref()
            .is_some_and(|timer| !timer.handle.is_finished())
    }

    /// The payload currently held, if any.
    pub fn payload(&self) -> Option<Arc<Payload>> {
        self.shared.state.lock().payload.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.shared.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Message of the last recorded failure, cleared by the next refresh.
    pub fn error(&self) -> Option<String> {
        self.shared.state.lock().error.clone()
    }

    pub fn phase(&self) -> Phase {
        if self.is_loading() {
            Phase::Loading
        } else if self.shared.state.lock().payload.is_some() {
            Phase::Ready
        } else {
            Phase::Idle
        }
    }

    /// Status cards of the held payload; empty before the first payload.
    pub fn status_cards(&self) -> Vec<StatusCard> {
        self.payload()
            .map(|p| project_status_cards(&p))
            .unwrap_or_default()
    }

    pub fn key_metrics(&self) -> Option<KeyMetrics> {
        self.payload().and_then(|p| project_key_metrics(&p))
    }

    pub fn action_plan(&self) -> ActionsTimeline {
        self.payload()
            .map(|p| project_action_plan(&p))
            .unwrap_or_default()
    }

    /// One chart view of the held payload; series are empty before the first
    /// payload.
    pub fn chart(&self, view: ViewName) -> ChartView {
        match self.payload() {
            Some(payload) => build_chart(view, &payload),
            None => build_chart(view, &Payload::default()),
        }
    }

    pub fn runs(&self) -> Vec<RunOption> {
        self.payload().map(|p| project_runs(&p)).unwrap_or_default()
    }

    /// Reads the upstream's runtime settings page as served.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Settings`] if the gateway call fails.
    pub async fn fetch_settings(&self) -> Result<String, DashboardError> {
        self.shared
            .gateway
            .fetch_settings()
            .await
            .map_err(DashboardError::Settings)
    }

    /// Submits new runtime settings to the upstream.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Settings`] if the gateway call fails.
    pub async fn update_settings(&self, settings: &Value) -> Result<(), DashboardError> {
        self.shared
            .gateway
            .update_settings(settings)
            .await
            .map_err(DashboardError::Settings)
    }
}

impl<G: DataGateway> Drop for DashboardController<G> {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.get_mut().take() {
            timer.handle.abort();
        }
    }
}
