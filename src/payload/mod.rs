//! Typed dashboard payload and the request filters that select it.

mod placeholder;
pub mod types;

use serde::{Deserialize, Serialize};

pub use placeholder::{PLACEHOLDER_VERSION, placeholder_payload};
pub use types::{
    ActionsTimeline, ChartData, CurrentActions, CurrentState, ForecastInputs, Payload, Solution,
    SolverOutputs, SolverResults,
};

/// Selects which optimization run the gateway returns.
///
/// All fields empty means "latest run".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterParams {
    /// Day of the run (`YYYYMMDD`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    /// Time of the run (`HHMMSS`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Presentation mode hint passed through to the upstream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_type: Option<String>,
}

impl FilterParams {
    /// Filters for one stored run.
    pub fn for_run(day: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            day: Some(day.into()),
            time: Some(time.into()),
            view_type: None,
        }
    }

    /// Present filters as `(key, value)` query pairs.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::with_capacity(3);
        if let Some(day) = &self.day {
            pairs.push(("day", day.as_str()));
        }
        if let Some(time) = &self.time {
            pairs.push(("time", time.as_str()));
        }
        if let Some(view_type) = &self.view_type {
            pairs.push(("view_type", view_type.as_str()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filters_have_no_query() {
        assert!(FilterParams::default().query_pairs().is_empty());
    }

    #[test]
    fn run_filters_emit_day_and_time() {
        let filters = FilterParams::for_run("20250707", "140000");
        assert_eq!(
            filters.query_pairs(),
            vec![("day", "20250707"), ("time", "140000")]
        );
    }
}
