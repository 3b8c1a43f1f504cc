//! Renderer-neutral chart options
//!
//! Field names serialize in the camelCase dialect most JavaScript chart
//! libraries accept, so [`ChartOption::to_json`] can be handed to a web
//! renderer unchanged. The terminal renderer reads the structs directly.

use serde::Serialize;

use super::spec::HeatCell;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOption {
    pub tooltip: Tooltip,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visual_map: Option<VisualMap>,
    pub series: Vec<Series>,
}

impl ChartOption {
    pub fn to_json(&self) -> serde_json::Value {
        // Every field is a plain struct/enum/number/string; serialization cannot fail.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TooltipTrigger {
    Item,
    Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub trigger: TooltipTrigger,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub top: String,
    pub left: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisKind {
    Category,
    Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    #[serde(rename = "type")]
    pub kind: AxisKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub split_area: bool,
}

impl Axis {
    pub fn category(data: Vec<String>) -> Self {
        Self {
            kind: AxisKind::Category,
            name: None,
            data,
            split_area: false,
        }
    }

    pub fn value() -> Self {
        Self {
            kind: AxisKind::Value,
            name: None,
            data: Vec::new(),
            split_area: false,
        }
    }

    pub fn named(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }
}

/// Continuous colour scale for heatmap cells
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualMap {
    pub min: f64,
    pub max: f64,
    pub calculable: bool,
    pub orient: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub show: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Emphasis {
    pub label: Label,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieDatum {
    pub name: String,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Series {
    Heatmap {
        name: String,
        data: Vec<HeatCell>,
        label: Label,
    },
    Pie {
        name: String,
        /// `[inner, outer]`
        radius: [String; 2],
        #[serde(rename = "avoidLabelOverlap")]
        avoid_label_overlap: bool,
        label: Label,
        emphasis: Emphasis,
        data: Vec<PieDatum>,
    },
    Bar {
        data: Vec<Option<f64>>,
    },
    Line {
        data: Vec<Option<f64>>,
        smooth: bool,
    },
}
