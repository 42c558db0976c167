//! Summary cards and key metrics projected from a payload.
//!
//! Each card resolves its value through a fixed fallback chain and ends at
//! `"N/A"` when nothing in the chain is present.

use std::fmt;

use serde::Serialize;

use crate::payload::{ActionsTimeline, Payload};

/// Shown when no source for a card value is present.
pub const NOT_AVAILABLE: &str = "N/A";

/// Battery level strictly above this counts as healthy.
pub const BATTERY_HEALTHY_ABOVE: f64 = 50.0;

/// Semantic color of a status card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardColor {
    Positive,
    Warning,
    Primary,
    Info,
    Orange,
    /// No numeric state to judge.
    Neutral,
}

impl CardColor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Warning => "warning",
            Self::Primary => "primary",
            Self::Info => "info",
            Self::Orange => "orange",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for CardColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One summary tile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCard {
    pub title: &'static str,
    /// Material icon name.
    pub icon: &'static str,
    pub value: String,
    pub color: CardColor,
}

impl fmt::Display for StatusCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<14}{:>16}  [{}]", self.title, self.value, self.color)
    }
}

/// Headline solver figures.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeyMetrics {
    pub temperature_penalty: Option<f64>,
    pub total_penalty: Option<f64>,
    pub runtime_ms: Option<f64>,
    pub solver_status: Option<String>,
    pub final_solution: Option<String>,
}

impl fmt::Display for KeyMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn num(v: Option<f64>) -> String {
            v.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{v:.2}"))
        }
        fn text(v: Option<&str>) -> &str {
            v.unwrap_or(NOT_AVAILABLE)
        }

        writeln!(f, "--- Key metrics ---")?;
        writeln!(f, "Temperature penalty: {}", num(self.temperature_penalty))?;
        writeln!(f, "Total penalty:       {}", num(self.total_penalty))?;
        writeln!(f, "Runtime (ms):        {}", num(self.runtime_ms))?;
        writeln!(f, "Solver status:       {}", text(self.solver_status.as_deref()))?;
        write!(f, "Final solution:      {}", text(self.final_solution.as_deref()))
    }
}

/// A stored run the caller can select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunOption {
    /// Day of the run (`YYYYMMDD`), when the payload names one.
    pub day: Option<String>,
    /// Run time as the upstream keys it (`HHMMSS`).
    pub time: String,
    /// Run time for display; falls back to `time`.
    pub label: String,
}

/// Projects the four status cards in fixed order: battery, charger mode,
/// accumulation, optimization.
pub fn project_status_cards(payload: &Payload) -> Vec<StatusCard> {
    vec![
        battery_card(payload),
        charger_card(payload),
        accumulation_card(payload),
        optimization_card(payload),
    ]
}

fn battery_card(payload: &Payload) -> StatusCard {
    let level = payload
        .current_state
        .as_ref()
        .and_then(|s| s.battery_level)
        .or_else(|| {
            payload
                .solution
                .as_ref()
                .and_then(|s| s.actions.as_ref())
                .and_then(|a| a.battery_target_soc)
        });

    let (value, color) = match level {
        Some(level) if level > BATTERY_HEALTHY_ABOVE => (format!("{level}%"), CardColor::Positive),
        Some(level) => (format!("{level}%"), CardColor::Warning),
        None => (NOT_AVAILABLE.to_string(), CardColor::Neutral),
    };

    StatusCard {
        title: "Battery",
        icon: "battery_std",
        value,
        color,
    }
}

fn charger_card(payload: &Payload) -> StatusCard {
    let mode = payload
        .solution
        .as_ref()
        .and_then(|s| s.actions.as_ref())
        .and_then(|a| a.charger_use_mode.clone());

    StatusCard {
        title: "Charger mode",
        icon: "power",
        value: mode.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        color: CardColor::Primary,
    }
}

fn accumulation_card(payload: &Payload) -> StatusCard {
    let actions = payload.solution.as_ref().and_then(|s| s.actions.as_ref());
    let lower = actions.and_then(|a| a.lower_accumulation_on).unwrap_or(false);
    let upper = actions.and_then(|a| a.upper_accumulation_on).unwrap_or(false);

    StatusCard {
        title: "Accumulation",
        icon: "thermostat",
        value: accumulation_label(lower, upper).to_string(),
        color: CardColor::Info,
    }
}

fn optimization_card(payload: &Payload) -> StatusCard {
    StatusCard {
        title: "Optimization",
        icon: "settings",
        value: payload
            .version
            .clone()
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        color: CardColor::Orange,
    }
}

/// Label for the accumulation flags of the two tank zones.
pub fn accumulation_label(lower: bool, upper: bool) -> &'static str {
    match (lower, upper) {
        (true, true) => "Both zones",
        (true, false) => "Lower zone",
        (false, true) => "Upper zone",
        (false, false) => "Off",
    }
}

/// Key solver metrics, or `None` until the payload carries results.
pub fn project_key_metrics(payload: &Payload) -> Option<KeyMetrics> {
    let results = payload.solution.as_ref()?.results.as_ref()?;
    Some(KeyMetrics {
        temperature_penalty: results.temperature_penalty,
        total_penalty: results.total_penalty,
        runtime_ms: results.runtime_ms,
        solver_status: results.solver_status.clone(),
        final_solution: results.final_solution.clone(),
    })
}

/// The decision timeline as sent, or an empty timeline.
pub fn project_action_plan(payload: &Payload) -> ActionsTimeline {
    payload
        .solution
        .as_ref()
        .and_then(|s| s.actions_timeline.clone())
        .unwrap_or_default()
}

/// Stored runs of the payload's day, paired with their display labels.
pub fn project_runs(payload: &Payload) -> Vec<RunOption> {
    payload
        .available_times
        .iter()
        .enumerate()
        .map(|(i, time)| RunOption {
            day: payload.day.clone(),
            time: time.clone(),
            label: payload
                .available_times_display
                .get(i)
                .cloned()
                .unwrap_or_else(|| time.clone()),
        })
        .collect()
}
