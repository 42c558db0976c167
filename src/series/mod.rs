//! Chart series derived from a payload.
//!
//! Every function here is pure and total: a missing block yields an empty
//! view, never an error and never a partial view.

pub mod layout;
pub mod palette;
mod views;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::payload::Payload;

pub use layout::{LayoutSpec, layout, view_layout};
pub use palette::{LineShape, RenderKind, SeriesId, StyleHint};

/// The five built-in chart views.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ViewName {
    Overview,
    States,
    Power,
    Prices,
    Heating,
}

/// One named, styled, time-aligned trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub id: SeriesId,
    pub name: String,
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub render: RenderKind,
    pub style: StyleHint,
    pub secondary_axis: bool,
}

/// A view's series bundled with its layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    pub view: ViewName,
    pub layout: LayoutSpec,
    pub series: Vec<ChartSeries>,
}

/// Builds the ordered series of `view` from `payload`.
///
/// # Examples
///
/// ```
/// use powerplan_dash::payload::Payload;
/// use powerplan_dash::series::{ViewName, build_view};
///
/// assert!(build_view(ViewName::Overview, &Payload::default()).is_empty());
/// ```
pub fn build_view(view: ViewName, payload: &Payload) -> Vec<ChartSeries> {
    views::build(view, payload)
}

/// Builds a view together with its layout metadata.
pub fn build_chart(view: ViewName, payload: &Payload) -> ChartView {
    ChartView {
        view,
        layout: view_layout(view),
        series: build_view(view, payload),
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;
    use crate::payload::{
        ActionsTimeline, ChartData, ForecastInputs, Solution, SolverOutputs, placeholder_payload,
    };

    fn times(n: usize) -> Vec<String> {
        (0..n).map(|h| format!("{:02}:00", 10 + h)).collect()
    }

    fn payload_with(inputs: Option<ForecastInputs>, outputs: Option<SolverOutputs>) -> Payload {
        Payload {
            chart_data: Some(ChartData {
                timestamps: times(6),
                inputs,
                outputs,
            }),
            ..Payload::default()
        }
    }

    fn ids(series: &[ChartSeries]) -> Vec<SeriesId> {
        series.iter().map(|s| s.id).collect()
    }

    #[test]
    fn every_view_is_empty_without_chart_data() {
        let payload = Payload::default();
        for view in ViewName::iter() {
            assert!(build_view(view, &payload).is_empty(), "{view}");
        }
    }

    #[test]
    fn decision_views_are_empty_without_outputs() {
        let payload = payload_with(Some(ForecastInputs::default()), None);
        for view in [
            ViewName::Overview,
            ViewName::States,
            ViewName::Power,
            ViewName::Heating,
        ] {
            assert!(build_view(view, &payload).is_empty(), "{view}");
        }
        assert_eq!(build_view(ViewName::Prices, &payload).len(), 2);
    }

    #[test]
    fn prices_view_is_empty_without_inputs() {
        let payload = payload_with(None, Some(SolverOutputs::default()));
        assert!(build_view(ViewName::Prices, &payload).is_empty());
        assert_eq!(build_view(ViewName::Power, &payload).len(), 7);
    }

    #[test]
    fn compositions_are_fixed_and_ordered() {
        let payload = placeholder_payload();
        assert_eq!(
            ids(&build_view(ViewName::Overview, &payload)),
            vec![
                SeriesId::BatterySoc,
                SeriesId::FveForecast,
                SeriesId::FveSurplus,
                SeriesId::LoadForecast,
                SeriesId::GridBuy,
                SeriesId::GridSell,
            ]
        );
        assert_eq!(
            ids(&build_view(ViewName::States, &payload)),
            vec![SeriesId::BatterySoc, SeriesId::TempLower, SeriesId::TempUpper]
        );
        assert_eq!(
            ids(&build_view(ViewName::Power, &payload)),
            vec![
                SeriesId::FveForecast,
                SeriesId::FveSurplus,
                SeriesId::LoadForecast,
                SeriesId::HeatLower,
                SeriesId::HeatUpper,
                SeriesId::GridBuy,
                SeriesId::GridSell,
            ]
        );
        assert_eq!(
            ids(&build_view(ViewName::Prices, &payload)),
            vec![SeriesId::BuyPrice, SeriesId::SellPrice]
        );
        assert_eq!(
            ids(&build_view(ViewName::Heating, &payload)),
            vec![
                SeriesId::TempLower,
                SeriesId::TempUpper,
                SeriesId::HeatLower,
                SeriesId::HeatUpper,
            ]
        );
    }

    #[test]
    fn short_series_is_used_in_full_and_absent_series_is_empty() {
        let payload = payload_with(
            Some(ForecastInputs {
                fve_pred: Some(vec![1.0, 2.0, 3.0]),
                ..ForecastInputs::default()
            }),
            Some(SolverOutputs::default()),
        );
        let power = build_view(ViewName::Power, &payload);
        let fve = &power[0];
        assert_eq!(fve.id, SeriesId::FveForecast);
        assert_eq!(fve.x.len(), 6);
        assert_eq!(fve.y, vec![1.0, 2.0, 3.0]);

        let load = &power[2];
        assert_eq!(load.id, SeriesId::LoadForecast);
        assert!(load.y.is_empty());
        assert_eq!(load.x.len(), 6);
    }

    #[test]
    fn grid_sell_is_negated_elementwise() {
        let raw = vec![0.0, 1.5, 0.25, 3.0];
        let payload = payload_with(
            None,
            Some(SolverOutputs {
                g_sell: Some(raw.clone()),
                ..SolverOutputs::default()
            }),
        );
        for view in [ViewName::Overview, ViewName::Power] {
            let series = build_view(view, &payload);
            let sell = series.iter().find(|s| s.id == SeriesId::GridSell).unwrap();
            let expected: Vec<f64> = raw.iter().map(|v| -v).collect();
            assert_eq!(sell.y, expected, "{view}");
        }
    }

    #[test]
    fn timeline_series_come_from_solution() {
        let mut payload = payload_with(None, Some(SolverOutputs::default()));
        payload.solution = Some(Solution {
            actions_timeline: Some(ActionsTimeline {
                battery_target_soc: Some(vec![50.0, 60.0]),
                temp_lower: Some(vec![40.0]),
                ..ActionsTimeline::default()
            }),
            ..Solution::default()
        });
        let states = build_view(ViewName::States, &payload);
        assert_eq!(states[0].y, vec![50.0, 60.0]);
        assert_eq!(states[1].y, vec![40.0]);
        assert!(states[2].y.is_empty());
    }

    #[test]
    fn heating_power_sits_on_secondary_axis() {
        let series = build_view(ViewName::Heating, &placeholder_payload());
        let secondary: Vec<SeriesId> = series
            .iter()
            .filter(|s| s.secondary_axis)
            .map(|s| s.id)
            .collect();
        assert_eq!(secondary, vec![SeriesId::HeatLower, SeriesId::HeatUpper]);
        assert!(series.iter().all(|s| s.render == s.id.render_kind()));
    }

    #[test]
    fn prices_render_as_stepped_lines_with_markers() {
        let series = build_view(ViewName::Prices, &placeholder_payload());
        for s in &series {
            assert_eq!(s.render, RenderKind::LineWithMarkers);
            assert_eq!(s.style.shape, LineShape::Hv);
        }
    }

    #[test]
    fn view_names_parse_and_print() {
        assert_eq!("heating".parse::<ViewName>().ok(), Some(ViewName::Heating));
        assert!("actions".parse::<ViewName>().is_err());
        assert_eq!(ViewName::Overview.to_string(), "overview");
    }

    #[test]
    fn chart_bundles_layout_with_series() {
        let chart = build_chart(ViewName::Heating, &placeholder_payload());
        assert!(chart.layout.y_axis2.is_some());
        assert_eq!(chart.series.len(), 4);
    }
}
