//! Per-view layout metadata for the rendering surface.

use serde::Serialize;

use super::ViewName;

/// Fixed chart height (px).
pub const CHART_HEIGHT: u32 = 400;

/// Title of the secondary (right-hand) axis.
pub const SECONDARY_AXIS_TITLE: &str = "Power [kW]";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleSpec {
    pub text: String,
    /// Horizontal anchor in paper coordinates; 0.5 centres the title.
    pub x: f32,
    pub font_size: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisSpec {
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisSide {
    Left,
    Right,
}

/// Right-side axis sharing the x domain of the primary axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecondaryAxisSpec {
    pub title: String,
    /// Axis this one is drawn over.
    pub overlaying: &'static str,
    pub side: AxisSide,
}

/// Declarative chart layout. Carries no data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutSpec {
    pub title: TitleSpec,
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis2: Option<SecondaryAxisSpec>,
    pub show_legend: bool,
    pub autosize: bool,
    pub height: u32,
}

/// Builds the layout for a chart.
///
/// # Arguments
///
/// * `title` - Chart title, centred
/// * `y_axis_title` - Primary y axis title
/// * `has_secondary_axis` - Adds a right-side axis overlaying the primary one
pub fn layout(title: &str, y_axis_title: &str, has_secondary_axis: bool) -> LayoutSpec {
    LayoutSpec {
        title: TitleSpec {
            text: title.to_string(),
            x: 0.5,
            font_size: 16,
        },
        x_axis: AxisSpec {
            title: "Time".to_string(),
        },
        y_axis: AxisSpec {
            title: y_axis_title.to_string(),
        },
        y_axis2: has_secondary_axis.then(|| SecondaryAxisSpec {
            title: SECONDARY_AXIS_TITLE.to_string(),
            overlaying: "y",
            side: AxisSide::Right,
        }),
        show_legend: true,
        autosize: true,
        height: CHART_HEIGHT,
    }
}

/// Layout used for each built-in view.
pub fn view_layout(view: ViewName) -> LayoutSpec {
    match view {
        ViewName::Overview => layout("Optimization overview", "Power [kW] / SoC [%]", false),
        ViewName::States => layout("Battery and tank states", "SoC [%] / Temperature [°C]", false),
        ViewName::Power => layout("Power flows", "Power [kW]", false),
        ViewName::Prices => layout("Electricity prices", "Price [CZK/kWh]", false),
        ViewName::Heating => layout("Tank heating", "Temperature [°C]", true),
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn secondary_axis_only_when_requested() {
        assert!(layout("t", "y", false).y_axis2.is_none());
        let spec = layout("t", "y", true);
        let axis = spec.y_axis2.unwrap();
        assert_eq!(axis.overlaying, "y");
        assert_eq!(axis.side, AxisSide::Right);
        assert_eq!(axis.title, SECONDARY_AXIS_TITLE);
    }

    #[test]
    fn title_is_centred_and_legend_on() {
        let spec = layout("Prices", "Price", false);
        assert_eq!(spec.title.text, "Prices");
        assert_eq!(spec.title.x, 0.5);
        assert_eq!(spec.x_axis.title, "Time");
        assert!(spec.show_legend);
        assert_eq!(spec.height, CHART_HEIGHT);
    }

    #[test]
    fn only_heating_view_has_secondary_axis() {
        for view in ViewName::iter() {
            let has_secondary = view_layout(view).y_axis2.is_some();
            assert_eq!(has_secondary, view == ViewName::Heating, "{view}");
        }
    }
}
