//! Chart specifications as returned by `/analyze/chart`
//!
//! The service tags each spec with `type`; the payload shape depends on it.
//! Decoding goes through [`ChartSpec::from_value`] so an unknown type becomes
//! [`ChartSpec::Unhandled`] instead of a decode failure.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::models::display_value;
use crate::types::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq)]
pub enum ChartSpec {
    Heatmap(HeatmapPayload),
    Pie(PiePayload),
    Bar(SeriesPayload),
    Line(SeriesPayload),
    Unhandled { chart_type: String },
}

/// Correlation matrix flattened to `(x, y, value)` cells
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HeatmapPayload {
    pub x_axis: Vec<String>,
    pub y_axis: Vec<String>,
    pub data: Vec<HeatCell>,
}

/// `[xIndex, yIndex, value]`. A null value marks an undefined correlation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatCell(pub usize, pub usize, pub Option<f64>);

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PiePayload {
    pub data: Vec<PieSlice>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PieSlice {
    pub name: Value,
    #[serde(default, deserialize_with = "lenient_number")]
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeriesPayload {
    pub data: Vec<SeriesRow>,
    /// Label column name, when the service sends it
    #[serde(rename = "xAxis", default)]
    pub x_name: Option<String>,
    /// Value column name, when the service sends it
    #[serde(rename = "yAxis", default)]
    pub y_name: Option<String>,
}

/// A bar/line data point. The service has sent both `{name, value}` objects
/// and `[name, value]` pairs; both are accepted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SeriesRow {
    Positional(Vec<Value>),
    Named {
        #[serde(default)]
        name: Option<Value>,
        #[serde(default)]
        value: Option<Value>,
    },
}

impl SeriesRow {
    /// `name` first, else the first positional element
    pub fn category(&self) -> String {
        let raw = match self {
            SeriesRow::Named { name, .. } => name.as_ref(),
            SeriesRow::Positional(items) => items.first(),
        };
        raw.map(display_value).unwrap_or_default()
    }

    /// `value` first, else the second positional element
    pub fn value(&self) -> Option<f64> {
        let raw = match self {
            SeriesRow::Named { value, .. } => value.as_ref(),
            SeriesRow::Positional(items) => items.get(1),
        };
        raw.and_then(numeric)
    }
}

impl PieSlice {
    pub fn label(&self) -> String {
        display_value(&self.name)
    }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Numbers and numeric strings; anything else reads as missing
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(numeric))
}

impl ChartSpec {
    /// Decode a `chart_config` object.
    ///
    /// A config carrying an `error` string (e.g. fewer than two numeric
    /// columns for a heatmap) is reported as [`AppError::Validation`].
    pub fn from_value(config: Value) -> AppResult<Self> {
        if let Some(Value::String(message)) = config.get("error") {
            return Err(AppError::Validation(message.clone()));
        }

        let chart_type = config
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::Decode("chart_config has no type".to_string()))?
            .to_string();

        let spec = match chart_type.as_str() {
            "heatmap" => ChartSpec::Heatmap(serde_json::from_value(config)?),
            "pie" => ChartSpec::Pie(serde_json::from_value(config)?),
            "bar" => ChartSpec::Bar(serde_json::from_value(config)?),
            "line" => ChartSpec::Line(serde_json::from_value(config)?),
            _ => ChartSpec::Unhandled { chart_type },
        };
        Ok(spec)
    }

    pub fn type_name(&self) -> &str {
        match self {
            ChartSpec::Heatmap(_) => "heatmap",
            ChartSpec::Pie(_) => "pie",
            ChartSpec::Bar(_) => "bar",
            ChartSpec::Line(_) => "line",
            ChartSpec::Unhandled { chart_type } => chart_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_heatmap() {
        let spec = ChartSpec::from_value(json!({
            "type": "heatmap",
            "x_axis": ["a", "b"],
            "y_axis": ["a", "b"],
            "data": [[0, 0, 1.0], [1, 0, -0.25], [0, 1, -0.25], [1, 1, null]]
        }))
        .unwrap();
        match spec {
            ChartSpec::Heatmap(p) => {
                assert_eq!(p.x_axis, vec!["a", "b"]);
                assert_eq!(p.data[1], HeatCell(1, 0, Some(-0.25)));
                assert_eq!(p.data[3], HeatCell(1, 1, None));
            }
            other => panic!("expected heatmap, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_mixed_series_rows() {
        let spec = ChartSpec::from_value(json!({
            "type": "line",
            "data": [["2024-01", 3], {"name": "2024-02", "value": 4.5}],
            "xAxis": "month",
            "yAxis": "sales"
        }))
        .unwrap();
        let ChartSpec::Line(payload) = spec else {
            panic!("expected line");
        };
        assert_eq!(payload.data[0].category(), "2024-01");
        assert_eq!(payload.data[0].value(), Some(3.0));
        assert_eq!(payload.data[1].category(), "2024-02");
        assert_eq!(payload.data[1].value(), Some(4.5));
        assert_eq!(payload.x_name.as_deref(), Some("month"));
    }

    #[test]
    fn test_numeric_category_is_rendered_as_text() {
        let row: SeriesRow = serde_json::from_value(json!({"name": 2023, "value": 1})).unwrap();
        assert_eq!(row.category(), "2023");
        let row: SeriesRow = serde_json::from_value(json!({"name": "x", "value": null})).unwrap();
        assert_eq!(row.value(), None);
    }

    #[test]
    fn test_pie_values_accept_numeric_strings() {
        let spec = ChartSpec::from_value(json!({
            "type": "pie",
            "data": [
                {"name": "north", "value": "5"},
                {"name": "south", "value": 2.5},
                {"name": "east", "value": "n/a"},
                {"name": "west"}
            ]
        }))
        .unwrap();
        let ChartSpec::Pie(payload) = spec else {
            panic!("expected pie");
        };
        let values: Vec<Option<f64>> = payload.data.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![Some(5.0), Some(2.5), None, None]);
        assert_eq!(payload.data[0].label(), "north");
    }

    #[test]
    fn test_unknown_type_is_unhandled() {
        let spec = ChartSpec::from_value(json!({"type": "scatter", "data": []})).unwrap();
        assert_eq!(
            spec,
            ChartSpec::Unhandled {
                chart_type: "scatter".to_string()
            }
        );
        assert_eq!(spec.type_name(), "scatter");
    }

    #[test]
    fn test_error_payload_is_validation() {
        let err = ChartSpec::from_value(json!({
            "type": "heatmap",
            "error": "need at least two numeric columns"
        }))
        .unwrap_err();
        assert_eq!(
            err,
            AppError::Validation("need at least two numeric columns".to_string())
        );
    }

    #[test]
    fn test_missing_type_is_decode_error() {
        let err = ChartSpec::from_value(json!({"data": []})).unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
    }
}
