//! Chart Adapter
//!
//! Pure mapping from a [`ChartSpec`] to a [`ChartOption`]. No I/O and no
//! state: the same spec always produces the same option.

use super::option::{
    Axis, ChartOption, Emphasis, Label, Legend, PieDatum, Series, Tooltip, TooltipTrigger,
    VisualMap,
};
use super::spec::{ChartSpec, HeatmapPayload, PiePayload, SeriesPayload};

/// Heatmaps show correlation coefficients, so the colour scale is pinned to
/// [-1, 1] whatever the actual cell values are.
pub const HEATMAP_SCALE: (f64, f64) = (-1.0, 1.0);

/// Donut radii, inner then outer
pub const PIE_RADIUS: [&str; 2] = ["40%", "70%"];

/// The spec's `type` has no renderer mapping.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unhandled chart type: {chart_type}")]
pub struct UnhandledChart {
    pub chart_type: String,
}

pub fn adapt(spec: &ChartSpec) -> Result<ChartOption, UnhandledChart> {
    match spec {
        ChartSpec::Heatmap(payload) => Ok(heatmap(payload)),
        ChartSpec::Pie(payload) => Ok(pie(payload)),
        ChartSpec::Bar(payload) => Ok(cartesian(payload, false)),
        ChartSpec::Line(payload) => Ok(cartesian(payload, true)),
        ChartSpec::Unhandled { chart_type } => Err(UnhandledChart {
            chart_type: chart_type.clone(),
        }),
    }
}

fn heatmap(payload: &HeatmapPayload) -> ChartOption {
    let mut x_axis = Axis::category(payload.x_axis.clone());
    x_axis.split_area = true;
    let mut y_axis = Axis::category(payload.y_axis.clone());
    y_axis.split_area = true;

    ChartOption {
        tooltip: Tooltip {
            trigger: TooltipTrigger::Item,
        },
        legend: None,
        x_axis: Some(x_axis),
        y_axis: Some(y_axis),
        visual_map: Some(VisualMap {
            min: HEATMAP_SCALE.0,
            max: HEATMAP_SCALE.1,
            calculable: true,
            orient: "horizontal".to_string(),
        }),
        series: vec![Series::Heatmap {
            name: "Correlation".to_string(),
            data: payload.data.clone(),
            label: Label {
                show: true,
                position: None,
            },
        }],
    }
}

fn pie(payload: &PiePayload) -> ChartOption {
    let data = payload
        .data
        .iter()
        .map(|slice| PieDatum {
            name: slice.label(),
            value: slice.value,
        })
        .collect();

    ChartOption {
        tooltip: Tooltip {
            trigger: TooltipTrigger::Item,
        },
        legend: Some(Legend {
            top: "5%".to_string(),
            left: "center".to_string(),
        }),
        x_axis: None,
        y_axis: None,
        visual_map: None,
        series: vec![Series::Pie {
            name: "Data".to_string(),
            radius: PIE_RADIUS.map(String::from),
            avoid_label_overlap: false,
            // centre label stays hidden until a slice is hovered
            label: Label {
                show: false,
                position: Some("center".to_string()),
            },
            emphasis: Emphasis {
                label: Label {
                    show: true,
                    position: None,
                },
            },
            data,
        }],
    }
}

fn cartesian(payload: &SeriesPayload, line: bool) -> ChartOption {
    let categories = payload.data.iter().map(|row| row.category()).collect();
    let values: Vec<Option<f64>> = payload.data.iter().map(|row| row.value()).collect();

    let series = if line {
        Series::Line {
            data: values,
            smooth: true,
        }
    } else {
        Series::Bar { data: values }
    };

    ChartOption {
        tooltip: Tooltip {
            trigger: TooltipTrigger::Axis,
        },
        legend: None,
        x_axis: Some(Axis::category(categories).named(payload.x_name.clone())),
        y_axis: Some(Axis::value().named(payload.y_name.clone())),
        visual_map: None,
        series: vec![series],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::option::AxisKind;
    use serde_json::json;

    fn spec(value: serde_json::Value) -> ChartSpec {
        ChartSpec::from_value(value).unwrap()
    }

    #[test]
    fn test_heatmap_scale_is_fixed() {
        for data in [json!([[0, 0, 0.1]]), json!([[0, 0, 0.9], [0, 1, 0.95]]), json!([])] {
            let option = adapt(&spec(json!({
                "type": "heatmap",
                "x_axis": ["a", "b"],
                "y_axis": ["a", "b"],
                "data": data
            })))
            .unwrap();
            let scale = option.visual_map.unwrap();
            assert_eq!((scale.min, scale.max), (-1.0, 1.0));
        }
    }

    #[test]
    fn test_heatmap_axes_and_labels() {
        let option = adapt(&spec(json!({
            "type": "heatmap",
            "x_axis": ["price", "qty"],
            "y_axis": ["price", "qty"],
            "data": [[0, 0, 1.0], [1, 0, 0.3]]
        })))
        .unwrap();
        let x = option.x_axis.as_ref().unwrap();
        assert_eq!(x.kind, AxisKind::Category);
        assert_eq!(x.data, vec!["price", "qty"]);
        match &option.series[0] {
            Series::Heatmap { label, data, .. } => {
                assert!(label.show);
                assert_eq!(data.len(), 2);
            }
            other => panic!("expected heatmap series, got {:?}", other),
        }
    }

    #[test]
    fn test_pie_is_donut_with_hidden_centre_label() {
        let option = adapt(&spec(json!({
            "type": "pie",
            "data": [{"name": "x", "value": 5}]
        })))
        .unwrap();
        match &option.series[0] {
            Series::Pie {
                radius,
                label,
                emphasis,
                data,
                ..
            } => {
                assert_eq!(radius, &["40%".to_string(), "70%".to_string()]);
                assert!(!label.show);
                assert!(emphasis.label.show);
                assert_eq!(
                    data,
                    &vec![PieDatum {
                        name: "x".to_string(),
                        value: Some(5.0)
                    }]
                );
            }
            other => panic!("expected pie series, got {:?}", other),
        }
    }

    #[test]
    fn test_bar_positional_pair() {
        let option = adapt(&spec(json!({"type": "bar", "data": [["x", 5]]}))).unwrap();
        assert_eq!(option.x_axis.unwrap().data, vec!["x"]);
        assert_eq!(option.series, vec![Series::Bar { data: vec![Some(5.0)] }]);
    }

    #[test]
    fn test_line_named_rows_and_axis_names() {
        let option = adapt(&spec(json!({
            "type": "line",
            "data": [{"name": "a", "value": 0}, {"name": "b", "value": 2}],
            "xAxis": "city",
            "yAxis": "sales"
        })))
        .unwrap();
        let x = option.x_axis.unwrap();
        assert_eq!(x.data, vec!["a", "b"]);
        assert_eq!(x.name.as_deref(), Some("city"));
        assert_eq!(option.y_axis.unwrap().name.as_deref(), Some("sales"));
        assert_eq!(
            option.series,
            vec![Series::Line {
                data: vec![Some(0.0), Some(2.0)],
                smooth: true
            }]
        );
    }

    #[test]
    fn test_unhandled_type_does_not_panic() {
        let err = adapt(&ChartSpec::Unhandled {
            chart_type: "radar".to_string(),
        })
        .unwrap_err();
        assert_eq!(err.chart_type, "radar");
    }

    #[test]
    fn test_adapt_is_deterministic() {
        let s = spec(json!({"type": "bar", "data": [{"name": "a", "value": 1}, ["b", 2]]}));
        assert_eq!(adapt(&s), adapt(&s));
    }

    #[test]
    fn test_option_json_shape() {
        let option = adapt(&spec(json!({"type": "pie", "data": [{"name": "x", "value": 5}]}))).unwrap();
        let json = option.to_json();
        assert_eq!(json["series"][0]["type"], "pie");
        assert_eq!(json["series"][0]["radius"], json!(["40%", "70%"]));
        assert_eq!(json["series"][0]["avoidLabelOverlap"], false);
        assert_eq!(json["tooltip"]["trigger"], "item");
        assert!(json.get("xAxis").is_none());
    }
}
