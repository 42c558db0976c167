//! Canned payload substituted when a fetch fails under the placeholder policy.

use super::types::{
    ActionsTimeline, ChartData, CurrentActions, CurrentState, ForecastInputs, Payload, Solution,
    SolverOutputs, SolverResults,
};

/// Version label carried by the placeholder so operators can recognise it.
pub const PLACEHOLDER_VERSION: &str = "placeholder";

const HOURS: [&str; 6] = ["10:00", "11:00", "12:00", "13:00", "14:00", "15:00"];

/// Builds the placeholder payload.
///
/// Six hourly slots with every block populated, so each view, card and
/// metric has something to show while the upstream is unreachable.
///
/// # Examples
///
/// ```
/// use powerplan_dash::payload::placeholder_payload;
///
/// let payload = placeholder_payload();
/// assert_eq!(payload.version.as_deref(), Some("placeholder"));
/// ```
pub fn placeholder_payload() -> Payload {
    let timestamps: Vec<String> = HOURS.iter().map(ToString::to_string).collect();

    let fve_pred: Vec<f64> = vec![1.2, 1.8, 2.5, 2.2, 1.5, 0.8];
    let load_pred: Vec<f64> = vec![0.9, 1.1, 1.0, 1.3, 1.2, 1.4];
    let fve_surplus = fve_pred
        .iter()
        .zip(&load_pred)
        .map(|(fve, load)| (fve - load).max(0.0))
        .collect();

    Payload {
        chart_data: Some(ChartData {
            timestamps: timestamps.clone(),
            inputs: Some(ForecastInputs {
                fve_pred: Some(fve_pred),
                load_pred: Some(load_pred),
                buy_price: Some(vec![1.85, 1.92, 2.15, 2.08, 1.76, 1.95]),
                sell_price: Some(vec![0.95, 1.02, 1.20, 1.10, 0.86, 0.99]),
            }),
            outputs: Some(SolverOutputs {
                g_buy: Some(vec![0.0, 0.0, 0.0, 0.3, 0.0, 0.6]),
                g_sell: Some(vec![0.3, 0.4, 0.9, 0.0, 0.3, 0.0]),
                h_in_lower: Some(vec![0.0, 0.3, 0.6, 0.6, 0.0, 0.0]),
                h_in_upper: Some(vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
            }),
        }),
        solution: Some(Solution {
            actions: Some(CurrentActions {
                charger_use_mode: Some("Back Up Mode".to_string()),
                upper_accumulation_on: Some(false),
                lower_accumulation_on: Some(true),
                max_heat_on: Some(false),
                forced_heating_block: Some(false),
                battery_target_soc: Some(80.0),
                reserve_power_charging: Some(0.0),
            }),
            actions_timeline: Some(ActionsTimeline {
                times: Some(timestamps),
                charger_mode: Some(vec!["Back Up Mode".to_string(); 6]),
                battery_target_soc: Some(vec![75.0, 78.0, 82.0, 85.0, 83.0, 80.0]),
                temp_upper: Some(vec![52.0, 52.0, 51.5, 51.5, 51.0, 50.5]),
                temp_lower: Some(vec![41.0, 42.5, 44.0, 45.5, 45.0, 44.5]),
                upper_accumulation: Some(vec![false; 6]),
                lower_accumulation: Some(vec![false, true, true, true, false, false]),
                max_heat: Some(vec![false; 6]),
                comfort_heating_grid: Some(vec![false; 6]),
                fve_surplus: Some(fve_surplus),
                grid_buy: None,
                grid_sell: None,
            }),
            results: Some(SolverResults {
                temperature_penalty: Some(1.2),
                total_penalty: Some(2500.0),
                runtime_ms: Some(850.0),
                solver_status: Some("Optimal".to_string()),
                final_solution: Some("Found".to_string()),
                ..SolverResults::default()
            }),
        }),
        current_state: Some(CurrentState {
            battery_level: Some(75.0),
            temperature: Some(22.5),
            price_now: Some(1.85),
            fve_production: Some(1200.0),
        }),
        version: Some(PLACEHOLDER_VERSION.to_string()),
        ..Payload::default()
    }
}
