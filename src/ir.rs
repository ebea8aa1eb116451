use crate::config::Axis;
use crate::dataset::RecordId;
use crate::selector::LabelClass;

// =============================================================================
// Sampled scene
// =============================================================================
//
// A Frame is the chart at one instant with every transition evaluated.
// Coordinates are relative to the plot origin (the canvas translated by the
// left and top margins), matching how the controller lays things out.
// Backends add `origin` when drawing.

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub origin: (f64, f64),
    pub plot_size: (f64, f64),
    pub x_axis: AxisFrame,
    pub y_axis: AxisFrame,
    pub marks: Vec<MarkFrame>,
    pub selector_labels: Vec<SelectorLabelFrame>,
    pub tooltip: Option<TooltipFrame>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Horizontal axis, ticks pointing down
    Bottom,
    /// Vertical axis, ticks pointing left
    Left,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisFrame {
    pub orientation: Orientation,
    /// Offset of the axis group inside the plot area
    pub translate: (f64, f64),
    /// Pixel extent of the domain line along the axis
    pub extent: (f64, f64),
    pub ticks: Vec<TickFrame>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickFrame {
    pub value: f64,
    pub position: f64,
    pub opacity: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkFrame {
    pub record: RecordId,
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub fill: String,
    pub opacity: f64,
    pub label: TextFrame,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextFrame {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub font_family: String,
    pub font_size: f64,
    pub fill: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectorLabelFrame {
    pub axis: Axis,
    pub key: String,
    pub text: String,
    pub x: f64,
    pub y: f64,
    /// Degrees, counter-clockwise negative as in SVG `rotate()`
    pub rotation: f64,
    pub font_size: f64,
    pub class: LabelClass,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TooltipFrame {
    pub record: RecordId,
    pub x: f64,
    pub y: f64,
    pub lines: Vec<String>,
}
