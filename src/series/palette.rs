//! Fixed style table keyed by series identity.
//!
//! The same series always renders the same way, whichever view it appears in.

use serde::Serialize;

/// Identity of every series the builder can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesId {
    BatterySoc,
    FveForecast,
    FveSurplus,
    LoadForecast,
    GridBuy,
    GridSell,
    TempLower,
    TempUpper,
    HeatLower,
    HeatUpper,
    BuyPrice,
    SellPrice,
}

/// How a trace is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderKind {
    Line,
    LineWithMarkers,
    Bar,
}

/// Interpolation between samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineShape {
    /// Straight segments between points.
    Linear,
    /// Value holds until the next timestamp, then steps.
    Hv,
}

/// Visual attributes of one trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StyleHint {
    /// CSS hex color.
    pub color: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker_size: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    pub shape: LineShape,
}

const BAR_OPACITY: f32 = 0.7;

const fn line(color: &'static str, width: f32) -> StyleHint {
    StyleHint {
        color,
        line_width: Some(width),
        marker_size: None,
        opacity: None,
        shape: LineShape::Linear,
    }
}

const fn bar(color: &'static str) -> StyleHint {
    StyleHint {
        color,
        line_width: None,
        marker_size: None,
        opacity: Some(BAR_OPACITY),
        shape: LineShape::Linear,
    }
}

const fn stepped(color: &'static str) -> StyleHint {
    StyleHint {
        color,
        line_width: Some(3.0),
        marker_size: Some(6),
        opacity: None,
        shape: LineShape::Hv,
    }
}

impl SeriesId {
    /// Legend label.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::BatterySoc => "Battery SoC (%)",
            Self::FveForecast => "PV forecast",
            Self::FveSurplus => "PV surplus",
            Self::LoadForecast => "Load forecast",
            Self::GridBuy => "Grid purchase",
            Self::GridSell => "Grid export",
            Self::TempLower => "Lower zone temperature",
            Self::TempUpper => "Upper zone temperature",
            Self::HeatLower => "Lower zone heating",
            Self::HeatUpper => "Upper zone heating",
            Self::BuyPrice => "Buy price",
            Self::SellPrice => "Sell price",
        }
    }

    pub fn render_kind(self) -> RenderKind {
        match self {
            Self::BatterySoc | Self::BuyPrice | Self::SellPrice => RenderKind::LineWithMarkers,
            Self::GridBuy | Self::GridSell | Self::HeatLower | Self::HeatUpper => RenderKind::Bar,
            Self::FveForecast
            | Self::FveSurplus
            | Self::LoadForecast
            | Self::TempLower
            | Self::TempUpper => RenderKind::Line,
        }
    }

    pub fn style(self) -> StyleHint {
        match self {
            Self::BatterySoc => StyleHint {
                marker_size: Some(4),
                ..line("#4db6ac", 3.0)
            },
            Self::FveForecast => line("#ff9800", 2.0),
            Self::FveSurplus => line("#ffc107", 2.0),
            Self::LoadForecast => line("#9c27b0", 2.0),
            Self::GridBuy => bar("#488fc2"),
            Self::GridSell => bar("#8353d1"),
            Self::TempLower => line("#ff8f00", 2.0),
            Self::TempUpper => line("#ffc107", 2.0),
            Self::HeatLower => bar("#c2185b"),
            Self::HeatUpper => bar("#e91e63"),
            Self::BuyPrice => stepped("#488fc2"),
            Self::SellPrice => stepped("#8353d1"),
        }
    }
}
