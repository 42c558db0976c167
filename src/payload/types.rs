//! Wire types for the dashboard payload.
//!
//! Every block and every field inside a block is optional on the wire. Absence
//! is kept as `None` so derivations can tell "missing" apart from a legitimate
//! zero.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One fetched snapshot of solver output, telemetry and forecast.
///
/// Replaced wholesale on every refresh; never mutated after construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    /// Time axis plus forecast inputs and solver outputs.
    #[serde(default)]
    pub chart_data: Option<ChartData>,
    /// Solver decision snapshot, decision timeline and scalar results.
    #[serde(default)]
    pub solution: Option<Solution>,
    /// Live telemetry, independent of the timestamp axis.
    #[serde(default)]
    pub current_state: Option<CurrentState>,
    /// Identifier of the optimization run.
    #[serde(default)]
    pub version: Option<String>,
    /// When the upstream produced this run.
    #[serde(default)]
    pub generated_at: Option<String>,
    /// Days with stored runs (`YYYYMMDD`, newest first).
    #[serde(default)]
    pub available_days: Vec<String>,
    /// Run times stored for the selected day (`HHMMSS`).
    #[serde(default)]
    pub available_times: Vec<String>,
    /// Human-readable form of `available_times` (`HH:MM:SS`).
    #[serde(default)]
    pub available_times_display: Vec<String>,
    /// Selected day, if the payload is a historical run.
    #[serde(default)]
    pub day: Option<String>,
    /// Selected run time, if the payload is a historical run.
    #[serde(default)]
    pub compare_time: Option<String>,
    /// Presentation mode requested by the caller.
    #[serde(default)]
    pub view_type: Option<String>,
}

/// Time axis with the forecast and decision series aligned to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    /// Ordered time labels; the shared index domain of every series.
    #[serde(default)]
    pub timestamps: Vec<String>,
    /// Forecast series fed to the solver.
    #[serde(default)]
    pub inputs: Option<ForecastInputs>,
    /// Decision series produced by the solver.
    #[serde(default)]
    pub outputs: Option<SolverOutputs>,
}

/// Forecast series (index-aligned to `ChartData::timestamps`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastInputs {
    /// PV production forecast (kW).
    #[serde(default)]
    pub fve_pred: Option<Vec<f64>>,
    /// Household load forecast (kW).
    #[serde(default)]
    pub load_pred: Option<Vec<f64>>,
    /// Grid purchase price.
    #[serde(default)]
    pub buy_price: Option<Vec<f64>>,
    /// Grid feed-in price.
    #[serde(default)]
    pub sell_price: Option<Vec<f64>>,
}

/// Solver decision series (index-aligned to `ChartData::timestamps`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolverOutputs {
    /// Grid import (kW, non-negative).
    #[serde(default)]
    pub g_buy: Option<Vec<f64>>,
    /// Grid export magnitude (kW, non-negative).
    #[serde(default)]
    pub g_sell: Option<Vec<f64>>,
    /// Heating power into the lower tank zone (kW).
    #[serde(default)]
    pub h_in_lower: Option<Vec<f64>>,
    /// Heating power into the upper tank zone (kW).
    #[serde(default)]
    pub h_in_upper: Option<Vec<f64>>,
}

/// Solver block: snapshot, timeline and outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    #[serde(default)]
    pub actions: Option<CurrentActions>,
    #[serde(default)]
    pub actions_timeline: Option<ActionsTimeline>,
    #[serde(default)]
    pub results: Option<SolverResults>,
}

/// Decisions for the current slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentActions {
    /// Inverter mode, e.g. `"Manual Charge"` or `"Feedin Priority"`.
    #[serde(default)]
    pub charger_use_mode: Option<String>,
    #[serde(default)]
    pub upper_accumulation_on: Option<bool>,
    #[serde(default)]
    pub lower_accumulation_on: Option<bool>,
    #[serde(default)]
    pub max_heat_on: Option<bool>,
    #[serde(default)]
    pub forced_heating_block: Option<bool>,
    /// Target battery state of charge (%).
    #[serde(default)]
    pub battery_target_soc: Option<f64>,
    /// Reserved charging power (W).
    #[serde(default)]
    pub reserve_power_charging: Option<f64>,
}

/// Decision sequence aligned to the timestamp axis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionsTimeline {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub times: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charger_mode: Option<Vec<String>>,
    /// Target battery state of charge per slot (%).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_target_soc: Option<Vec<f64>>,
    /// Upper tank zone temperature (°C).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_upper: Option<Vec<f64>>,
    /// Lower tank zone temperature (°C).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_lower: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_accumulation: Option<Vec<bool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower_accumulation: Option<Vec<bool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_heat: Option<Vec<bool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comfort_heating_grid: Option<Vec<bool>>,
    /// PV production left after load (kW, non-negative).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fve_surplus: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_buy: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_sell: Option<Vec<f64>>,
}

impl ActionsTimeline {
    /// Returns `true` when no field of the timeline is present.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Scalar solver outcome.
///
/// Known fields are typed; anything else the solver reports is kept in
/// `extra` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolverResults {
    #[serde(default)]
    pub temperature_penalty: Option<f64>,
    #[serde(default)]
    pub total_penalty: Option<f64>,
    #[serde(default)]
    pub runtime_ms: Option<f64>,
    #[serde(default)]
    pub solver_status: Option<String>,
    #[serde(default)]
    pub final_solution: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Live telemetry snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentState {
    /// Battery level (%).
    #[serde(default)]
    pub battery_level: Option<f64>,
    /// Indoor temperature (°C).
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Current electricity price.
    #[serde(default)]
    pub price_now: Option<f64>,
    /// Current PV production (W).
    #[serde(default)]
    pub fve_production: Option<f64>,
}
