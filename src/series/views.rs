//! View compositions and series extraction.

use crate::payload::{ActionsTimeline, ChartData, ForecastInputs, Payload, SolverOutputs};

use super::palette::SeriesId;
use super::{ChartSeries, ViewName};

/// Ordered series of a view; `true` places the series on the secondary axis.
type Composition = &'static [(SeriesId, bool)];

const OVERVIEW: Composition = &[
    (SeriesId::BatterySoc, false),
    (SeriesId::FveForecast, false),
    (SeriesId::FveSurplus, false),
    (SeriesId::LoadForecast, false),
    (SeriesId::GridBuy, false),
    (SeriesId::GridSell, false),
];

const STATES: Composition = &[
    (SeriesId::BatterySoc, false),
    (SeriesId::TempLower, false),
    (SeriesId::TempUpper, false),
];

const POWER: Composition = &[
    (SeriesId::FveForecast, false),
    (SeriesId::FveSurplus, false),
    (SeriesId::LoadForecast, false),
    (SeriesId::HeatLower, false),
    (SeriesId::HeatUpper, false),
    (SeriesId::GridBuy, false),
    (SeriesId::GridSell, false),
];

const PRICES: Composition = &[(SeriesId::BuyPrice, false), (SeriesId::SellPrice, false)];

const HEATING: Composition = &[
    (SeriesId::TempLower, false),
    (SeriesId::TempUpper, false),
    (SeriesId::HeatLower, true),
    (SeriesId::HeatUpper, true),
];

/// Borrowed view of the payload blocks a chart draws from.
struct Sources<'a> {
    timestamps: &'a [String],
    inputs: Option<&'a ForecastInputs>,
    outputs: Option<&'a SolverOutputs>,
    timeline: Option<&'a ActionsTimeline>,
}

impl<'a> Sources<'a> {
    fn new(chart: &'a ChartData, payload: &'a Payload) -> Self {
        Self {
            timestamps: &chart.timestamps,
            inputs: chart.inputs.as_ref(),
            outputs: chart.outputs.as_ref(),
            timeline: payload
                .solution
                .as_ref()
                .and_then(|s| s.actions_timeline.as_ref()),
        }
    }

    fn raw(&self, id: SeriesId) -> Option<&'a [f64]> {
        let inputs = self.inputs;
        let outputs = self.outputs;
        let timeline = self.timeline;
        match id {
            SeriesId::BatterySoc => timeline.and_then(|t| t.battery_target_soc.as_deref()),
            SeriesId::FveSurplus => timeline.and_then(|t| t.fve_surplus.as_deref()),
            SeriesId::TempLower => timeline.and_then(|t| t.temp_lower.as_deref()),
            SeriesId::TempUpper => timeline.and_then(|t| t.temp_upper.as_deref()),
            SeriesId::FveForecast => inputs.and_then(|i| i.fve_pred.as_deref()),
            SeriesId::LoadForecast => inputs.and_then(|i| i.load_pred.as_deref()),
            SeriesId::BuyPrice => inputs.and_then(|i| i.buy_price.as_deref()),
            SeriesId::SellPrice => inputs.and_then(|i| i.sell_price.as_deref()),
            SeriesId::GridBuy => outputs.and_then(|o| o.g_buy.as_deref()),
            SeriesId::GridSell => outputs.and_then(|o| o.g_sell.as_deref()),
            SeriesId::HeatLower => outputs.and_then(|o| o.h_in_lower.as_deref()),
            SeriesId::HeatUpper => outputs.and_then(|o| o.h_in_upper.as_deref()),
        }
    }

    /// Display values: absent is empty, short is kept as-is, export is negated.
    fn values(&self, id: SeriesId) -> Vec<f64> {
        let raw = self.raw(id).unwrap_or_default();
        match id {
            SeriesId::GridSell => raw.iter().map(|v| -v).collect(),
            _ => raw.to_vec(),
        }
    }

    fn series(&self, id: SeriesId, secondary_axis: bool) -> ChartSeries {
        ChartSeries {
            id,
            name: id.display_name().to_string(),
            x: self.timestamps.to_vec(),
            y: self.values(id),
            render: id.render_kind(),
            style: id.style(),
            secondary_axis,
        }
    }
}

fn composition(view: ViewName) -> Composition {
    match view {
        ViewName::Overview => OVERVIEW,
        ViewName::States => STATES,
        ViewName::Power => POWER,
        ViewName::Prices => PRICES,
        ViewName::Heating => HEATING,
    }
}

/// Whether the block the view is guarded on is present.
fn guard_satisfied(view: ViewName, chart: &ChartData) -> bool {
    match view {
        ViewName::Prices => chart.inputs.is_some(),
        ViewName::Overview | ViewName::States | ViewName::Power | ViewName::Heating => {
            chart.outputs.is_some()
        }
    }
}

pub(super) fn build(view: ViewName, payload: &Payload) -> Vec<ChartSeries> {
    let Some(chart) = payload.chart_data.as_ref() else {
        return Vec::new();
    };
    if !guard_satisfied(view, chart) {
        return Vec::new();
    }
    let sources = Sources::new(chart, payload);
    composition(view)
        .iter()
        .map(|&(id, secondary)| sources.series(id, secondary))
        .collect()
}
